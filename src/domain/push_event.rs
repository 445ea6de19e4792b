//! Events pushed by the rig without a request.

use serde::Serialize;

/// A server-originated event the panel renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum PushEvent {
    /// A line for the log console.
    Log {
        /// Text to append.
        text: String,
    },
    /// A new webcam frame.
    Webcam {
        /// Base64-encoded image bytes.
        frame: String,
    },
}

impl PushEvent {
    /// Socket.IO event name the rig uses for this event.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::Log { .. } => "log",
            Self::Webcam { .. } => "webcam",
        }
    }
}
