//! Commands sent from the panel to the rig.
//!
//! [`Command`] is the single tagged union for everything the panel can
//! emit. It serializes directly to the payload the rig expects
//! (`{ "text": <kind>, "body": {...} }`) and [`Command::channel`] decides
//! which Socket.IO event name it travels on.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::{Axis, StepSize};
use crate::error::PanelError;

/// Accepted capture width and height, in millimeters.
pub const CAPTURE_EXTENT_MM: RangeInclusive<i32> = 5..=500;

/// Accepted capture step, in millimeters.
pub const CAPTURE_STEP_MM: RangeInclusive<i32> = 1..=50;

/// Logical channel a command is emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Motion and homing commands.
    Printer,
    /// Capture sequence control.
    Panorama,
}

impl Channel {
    /// Socket.IO event name for this channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Printer => "printer",
            Self::Panorama => "panorama",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six jog buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JogDirection {
    /// `xyup`: +Y.
    YPlus,
    /// `xydown`: -Y.
    YMinus,
    /// `xyleft`: -X.
    XMinus,
    /// `xyright`: +X.
    XPlus,
    /// `zup`: +Z.
    ZPlus,
    /// `zdown`: -Z.
    ZMinus,
}

impl JogDirection {
    /// Axis moved by this direction.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::XMinus | Self::XPlus => Axis::X,
            Self::YPlus | Self::YMinus => Axis::Y,
            Self::ZPlus | Self::ZMinus => Axis::Z,
        }
    }

    /// `1` for positive directions, `-1` for negative ones.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::YPlus | Self::XPlus | Self::ZPlus => 1,
            Self::YMinus | Self::XMinus | Self::ZMinus => -1,
        }
    }
}

/// Body of a `move` command: a relative move along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jog {
    /// Axis to move.
    pub axis: Axis,
    /// Signed distance in millimeters.
    #[serde(rename = "mm")]
    pub distance_mm: i32,
}

impl Jog {
    /// Builds the jog for `direction` at the given step.
    #[must_use]
    pub const fn new(direction: JogDirection, step: StepSize) -> Self {
        Self {
            axis: direction.axis(),
            distance_mm: direction.sign() * step.millimeters(),
        }
    }
}

/// Body of a `start` command: the capture grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Width of the captured area in millimeters.
    #[serde(rename = "width")]
    pub width_mm: i32,
    /// Height of the captured area in millimeters.
    #[serde(rename = "height")]
    pub height_mm: i32,
    /// Distance between consecutive pictures in millimeters.
    #[serde(rename = "step")]
    pub step_count: i32,
}

impl CaptureRequest {
    /// Validates a capture grid against the limits the rig enforces.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidInput`] if any value is out of range.
    pub fn new(width_mm: i32, height_mm: i32, step_count: i32) -> Result<Self, PanelError> {
        check_range("width", width_mm, &CAPTURE_EXTENT_MM)?;
        check_range("height", height_mm, &CAPTURE_EXTENT_MM)?;
        check_range("step", step_count, &CAPTURE_STEP_MM)?;
        Ok(Self {
            width_mm,
            height_mm,
            step_count,
        })
    }

    /// Parses the three capture form fields as base-10 integers.
    ///
    /// Surrounding whitespace is ignored; anything else that is not an
    /// integer is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidInput`] if a field is not an integer or
    /// is out of range.
    pub fn parse(width: &str, height: &str, steps: &str) -> Result<Self, PanelError> {
        Self::new(
            parse_field("width", width)?,
            parse_field("height", height)?,
            parse_field("step", steps)?,
        )
    }
}

fn parse_field(name: &str, raw: &str) -> Result<i32, PanelError> {
    raw.trim()
        .parse()
        .map_err(|_| PanelError::InvalidInput(format!("{name} must be an integer, got {raw:?}")))
}

fn check_range(name: &str, value: i32, range: &RangeInclusive<i32>) -> Result<(), PanelError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PanelError::InvalidInput(format!(
            "{name} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// Every command the panel can emit.
///
/// Serialized adjacently tagged: the variant name goes to `text` and the
/// parameters, if any, to `body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "text", content = "body")]
pub enum Command {
    /// Relative move on the printer channel.
    #[serde(rename = "move")]
    Move(Jog),
    /// Home the Z axis.
    #[serde(rename = "homez")]
    HomeZ,
    /// Home the X and Y axes.
    #[serde(rename = "homexy")]
    HomeXy,
    /// Start a panorama capture.
    #[serde(rename = "start")]
    StartCapture(CaptureRequest),
    /// Abort the running panorama capture.
    #[serde(rename = "stop")]
    StopCapture,
}

impl Command {
    /// Channel this command is emitted on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Move(_) | Self::HomeZ | Self::HomeXy => Channel::Printer,
            Self::StartCapture(_) | Self::StopCapture => Channel::Panorama,
        }
    }

    /// Wire name of the command (`move`, `homez`, ...).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move(_) => "move",
            Self::HomeZ => "homez",
            Self::HomeXy => "homexy",
            Self::StartCapture(_) => "start",
            Self::StopCapture => "stop",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_json(command: &Command) -> serde_json::Value {
        serde_json::to_value(command).unwrap_or_else(|e| panic!("serialize failed: {e}"))
    }

    #[test]
    fn jog_signs_follow_direction() {
        let cases = [
            (JogDirection::YPlus, Axis::Y, 10),
            (JogDirection::YMinus, Axis::Y, -10),
            (JogDirection::XMinus, Axis::X, -10),
            (JogDirection::XPlus, Axis::X, 10),
            (JogDirection::ZPlus, Axis::Z, 10),
            (JogDirection::ZMinus, Axis::Z, -10),
        ];
        for (direction, axis, mm) in cases {
            let jog = Jog::new(direction, StepSize::Ten);
            assert_eq!(jog.axis, axis);
            assert_eq!(jog.distance_mm, mm);
        }
    }

    #[test]
    fn move_serializes_with_body() {
        let command = Command::Move(Jog::new(JogDirection::XMinus, StepSize::Hundred));
        assert_eq!(
            to_json(&command),
            json!({ "text": "move", "body": { "axis": "X", "mm": -100 } })
        );
        assert_eq!(command.channel(), Channel::Printer);
    }

    #[test]
    fn home_commands_have_no_body() {
        assert_eq!(to_json(&Command::HomeXy), json!({ "text": "homexy" }));
        assert_eq!(to_json(&Command::HomeZ), json!({ "text": "homez" }));
    }

    #[test]
    fn start_goes_to_panorama_channel() {
        let request = CaptureRequest::parse("100", "50", "4")
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        let command = Command::StartCapture(request);
        assert_eq!(command.channel(), Channel::Panorama);
        assert_eq!(
            to_json(&command),
            json!({ "text": "start", "body": { "width": 100, "height": 50, "step": 4 } })
        );
    }

    #[test]
    fn stop_goes_to_panorama_channel() {
        assert_eq!(Command::StopCapture.channel(), Channel::Panorama);
        assert_eq!(to_json(&Command::StopCapture), json!({ "text": "stop" }));
    }

    #[test]
    fn capture_parse_trims_whitespace() {
        let request = CaptureRequest::parse(" 20 ", "30\n", "5")
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(request.width_mm, 20);
        assert_eq!(request.height_mm, 30);
    }

    #[test]
    fn capture_parse_rejects_non_numeric() {
        assert!(matches!(
            CaptureRequest::parse("abc", "50", "4"),
            Err(PanelError::InvalidInput(_))
        ));
        assert!(CaptureRequest::parse("100", "", "4").is_err());
        assert!(CaptureRequest::parse("100", "50", "4.5").is_err());
    }

    #[test]
    fn capture_rejects_out_of_range() {
        assert!(CaptureRequest::new(4, 50, 4).is_err());
        assert!(CaptureRequest::new(100, 501, 4).is_err());
        assert!(CaptureRequest::new(100, 50, 0).is_err());
        assert!(CaptureRequest::new(100, 50, 51).is_err());
        assert!(CaptureRequest::new(500, 5, 50).is_ok());
    }

    #[test]
    fn command_deserializes_from_wire() {
        let command: Command = serde_json::from_value(json!({ "text": "homexy" }))
            .unwrap_or_else(|e| panic!("deserialize failed: {e}"));
        assert_eq!(command, Command::HomeXy);
    }
}
