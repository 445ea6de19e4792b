//! Rig message envelopes carried inside Socket.IO events.
//!
//! The rig wraps every payload in the same message shape:
//! `{ "success": bool, "text": string, "body": {...} }`. Outbound
//! commands only fill `text` and `body`; inbound push events and acks
//! fill `success` and `text`.

use serde::Deserialize;
use serde_json::Value;

use super::packet::Packet;
use crate::domain::{Command, PushEvent};
use crate::error::PanelError;

/// Generic rig message as received in push events and acks.
///
/// A message without a `success` field counts as a success.
#[derive(Debug, Clone, Deserialize)]
pub struct RigMessage {
    /// Whether the rig considers the message a success.
    #[serde(default = "accepted")]
    pub success: bool,
    /// Message text (log line, base64 frame, or ack reason).
    #[serde(default)]
    pub text: Option<String>,
}

const fn accepted() -> bool {
    true
}

/// Builds the Socket.IO event for an outbound command.
///
/// # Errors
///
/// Returns [`PanelError::Internal`] if the command cannot be serialized.
pub fn command_packet(command: &Command, ack_id: u64) -> Result<Packet, PanelError> {
    let payload = serde_json::to_value(command)
        .map_err(|e| PanelError::Internal(format!("command serialization failed: {e}")))?;
    Ok(Packet::Event {
        ack_id: Some(ack_id),
        name: command.channel().as_str().to_string(),
        payload,
    })
}

/// Interprets an inbound event.
///
/// Returns `Ok(None)` for event names the panel does not render.
///
/// # Errors
///
/// Returns [`PanelError::Protocol`] if a `log` or `webcam` payload has no
/// string `text` field.
pub fn decode_push(name: &str, payload: Value) -> Result<Option<PushEvent>, PanelError> {
    if !matches!(name, "log" | "webcam") {
        return Ok(None);
    }
    let message: RigMessage = serde_json::from_value(payload)
        .map_err(|e| PanelError::Protocol(format!("malformed {name} event: {e}")))?;
    let Some(text) = message.text else {
        return Err(PanelError::Protocol(format!("{name} event without text")));
    };
    Ok(Some(match name {
        "log" => PushEvent::Log { text },
        _ => PushEvent::Webcam { frame: text },
    }))
}

/// Interprets an ack payload. Anything that is not a rig message is
/// treated as an unexplained success.
#[must_use]
pub fn decode_ack(payload: Value) -> RigMessage {
    serde_json::from_value(payload).unwrap_or(RigMessage {
        success: true,
        text: None,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{CaptureRequest, Jog, JogDirection, StepSize};

    #[test]
    fn move_command_packet_matches_rig_format() {
        let command = Command::Move(Jog::new(JogDirection::YPlus, StepSize::One));
        let Ok(packet) = command_packet(&command, 1) else {
            panic!("packet build failed");
        };
        let frame = packet.encode();
        assert!(frame.starts_with(r#"421["printer","#));
        let Ok(Packet::Event { payload, .. }) = Packet::decode(&frame) else {
            panic!("frame did not decode");
        };
        assert_eq!(
            payload,
            json!({ "text": "move", "body": { "axis": "Y", "mm": 1 } })
        );
    }

    #[test]
    fn start_command_uses_panorama_event() {
        let Ok(request) = CaptureRequest::new(100, 50, 4) else {
            panic!("valid request rejected");
        };
        let Ok(Packet::Event { name, payload, .. }) =
            command_packet(&Command::StartCapture(request), 2)
        else {
            panic!("expected event packet");
        };
        assert_eq!(name, "panorama");
        assert_eq!(
            payload,
            json!({ "text": "start", "body": { "width": 100, "height": 50, "step": 4 } })
        );
    }

    #[test]
    fn decodes_log_event() {
        let event = decode_push("log", json!({ "success": true, "text": "T" }));
        assert_eq!(
            event.ok().flatten(),
            Some(PushEvent::Log {
                text: "T".to_string()
            })
        );
    }

    #[test]
    fn decodes_webcam_event() {
        let event = decode_push("webcam", json!({ "text": "P" }));
        assert_eq!(
            event.ok().flatten(),
            Some(PushEvent::Webcam {
                frame: "P".to_string()
            })
        );
    }

    #[test]
    fn unknown_event_is_ignored() {
        assert!(matches!(decode_push("status", json!({})), Ok(None)));
    }

    #[test]
    fn log_without_text_is_malformed() {
        assert!(decode_push("log", json!({ "success": true })).is_err());
        assert!(decode_push("webcam", json!("raw")).is_err());
        assert!(decode_push("log", json!({ "text": 5 })).is_err());
    }

    #[test]
    fn ack_failure_is_reported() {
        let ack = decode_ack(json!({ "success": false, "text": "Bad width" }));
        assert!(!ack.success);
        assert_eq!(ack.text.as_deref(), Some("Bad width"));
    }

    #[test]
    fn bare_ack_counts_as_success() {
        assert!(decode_ack(Value::Null).success);
    }

    #[test]
    fn ack_without_success_field_counts_as_success() {
        let ack = decode_ack(json!({ "text": "ok" }));
        assert!(ack.success);
        assert_eq!(ack.text.as_deref(), Some("ok"));
    }
}
