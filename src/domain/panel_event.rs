//! View updates broadcast to UI subscribers.
//!
//! Every change to the panel view emits a [`PanelEvent`] through the
//! [`super::EventBus`]. UI WebSocket connections filter them by
//! [`Topic`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConnectionState;

/// Subscription topic of a [`PanelEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Log console lines.
    Log,
    /// Webcam frames.
    Webcam,
    /// Step size changes.
    Step,
    /// Rig connection status.
    Connection,
}

impl Topic {
    /// All topics.
    pub const ALL: [Self; 4] = [Self::Log, Self::Webcam, Self::Step, Self::Connection];
}

/// A change to the panel view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PanelEvent {
    /// A line was appended to the log console.
    LogAppended {
        /// Appended text, without the leading line break.
        text: String,
        /// When the line arrived.
        timestamp: DateTime<Utc>,
    },

    /// The webcam image was replaced.
    FrameUpdated {
        /// New image source (`data:image/png;base64,...`).
        image_src: String,
        /// When the frame arrived.
        timestamp: DateTime<Utc>,
    },

    /// The active step size changed.
    StepChanged {
        /// New step in millimeters.
        step_mm: i32,
        /// When the selection changed.
        timestamp: DateTime<Utc>,
    },

    /// The rig connection changed state.
    ConnectionChanged {
        /// New connection state.
        connection: ConnectionState,
        /// When the state changed.
        timestamp: DateTime<Utc>,
    },
}

impl PanelEvent {
    /// Returns the topic this event belongs to.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::LogAppended { .. } => Topic::Log,
            Self::FrameUpdated { .. } => Topic::Webcam,
            Self::StepChanged { .. } => Topic::Step,
            Self::ConnectionChanged { .. } => Topic::Connection,
        }
    }

    /// Returns the timestamp of the event.
    #[must_use]
    pub const fn timestamp(&self) -> &DateTime<Utc> {
        match self {
            Self::LogAppended { timestamp, .. }
            | Self::FrameUpdated { timestamp, .. }
            | Self::StepChanged { timestamp, .. }
            | Self::ConnectionChanged { timestamp, .. } => timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_type_tag() {
        let event = PanelEvent::StepChanged {
            step_mm: 100,
            timestamp: Utc::now(),
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json["event_type"], "step_changed");
        assert_eq!(json["step_mm"], 100);
    }

    #[test]
    fn topic_matches_variant() {
        let event = PanelEvent::ConnectionChanged {
            connection: ConnectionState::Connecting,
            timestamp: Utc::now(),
        };
        assert_eq!(event.topic(), Topic::Connection);
    }
}
