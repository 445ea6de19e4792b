//! Panel view DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Command, ConnectionState, StepControl};
use crate::service::PanelSnapshot;

/// One step-size button as the UI renders it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StepButtonView {
    /// DOM id (`step1`, `step10`, `step100`).
    pub id: String,
    /// Step the button selects, in millimeters.
    pub step_mm: i32,
    /// Whether the button is disabled (it is the active step).
    pub disabled: bool,
}

impl From<StepControl> for StepButtonView {
    fn from(control: StepControl) -> Self {
        Self {
            id: control.size.control_id().to_string(),
            step_mm: control.size.millimeters(),
            disabled: control.disabled,
        }
    }
}

/// Rig connection status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionView {
    /// `connecting`, `connected` or `disconnected`.
    pub state: String,
    /// Engine.IO session id while connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Why the connection ended, once disconnected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ConnectionState> for ConnectionView {
    fn from(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Connecting => Self {
                state: "connecting".to_string(),
                sid: None,
                reason: None,
            },
            ConnectionState::Connected { sid } => Self {
                state: "connected".to_string(),
                sid: Some(sid),
                reason: None,
            },
            ConnectionState::Disconnected { reason } => Self {
                state: "disconnected".to_string(),
                sid: None,
                reason: Some(reason),
            },
        }
    }
}

/// Response body for `GET /api/v1/panel`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PanelView {
    /// Active jog step in millimeters.
    pub step_mm: i32,
    /// The three step buttons in panel order.
    pub step_buttons: Vec<StepButtonView>,
    /// Log console text.
    pub log: String,
    /// Webcam image source (`data:image/png;base64,...`), once a frame
    /// has arrived.
    pub image_src: Option<String>,
    /// Rig connection status.
    pub connection: ConnectionView,
}

impl From<PanelSnapshot> for PanelView {
    fn from(snapshot: PanelSnapshot) -> Self {
        Self {
            step_mm: snapshot.step.millimeters(),
            step_buttons: snapshot
                .step_controls
                .into_iter()
                .map(StepButtonView::from)
                .collect(),
            log: snapshot.log,
            image_src: snapshot.image_src,
            connection: snapshot.connection.into(),
        }
    }
}

/// A command as it was queued for the rig.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommandView {
    /// Channel (`printer` or `panorama`).
    pub channel: String,
    /// Command kind (`move`, `homez`, `homexy`, `start`, `stop`).
    pub kind: String,
    /// Command parameters, if any.
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl From<Command> for CommandView {
    fn from(command: Command) -> Self {
        let body = serde_json::to_value(command)
            .ok()
            .and_then(|mut value| value.get_mut("body").map(serde_json::Value::take));
        Self {
            channel: command.channel().to_string(),
            kind: command.kind().to_string(),
            body,
        }
    }
}
