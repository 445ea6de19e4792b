//! Panel buttons addressable by their DOM id.

use std::str::FromStr;

use super::{JogDirection, StepSize};
use crate::error::PanelError;

/// A button on the panel that acts without form input.
///
/// The capture start button is not listed here because it reads the
/// capture form; see [`crate::service::ControlPanel::start_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// One of the six jog buttons.
    Jog(JogDirection),
    /// `zhome`.
    HomeZ,
    /// `xyhome`.
    HomeXy,
    /// `step1`, `step10` or `step100`.
    Step(StepSize),
    /// `btnstop`.
    StopCapture,
}

impl Control {
    /// Every control in panel order.
    pub const ALL: [Self; 12] = [
        Self::Jog(JogDirection::YPlus),
        Self::Jog(JogDirection::YMinus),
        Self::Jog(JogDirection::XMinus),
        Self::Jog(JogDirection::XPlus),
        Self::Jog(JogDirection::ZPlus),
        Self::Jog(JogDirection::ZMinus),
        Self::HomeZ,
        Self::HomeXy,
        Self::Step(StepSize::One),
        Self::Step(StepSize::Ten),
        Self::Step(StepSize::Hundred),
        Self::StopCapture,
    ];

    /// DOM id of the button.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Jog(JogDirection::YPlus) => "xyup",
            Self::Jog(JogDirection::YMinus) => "xydown",
            Self::Jog(JogDirection::XMinus) => "xyleft",
            Self::Jog(JogDirection::XPlus) => "xyright",
            Self::Jog(JogDirection::ZPlus) => "zup",
            Self::Jog(JogDirection::ZMinus) => "zdown",
            Self::HomeZ => "zhome",
            Self::HomeXy => "xyhome",
            Self::Step(size) => size.control_id(),
            Self::StopCapture => "btnstop",
        }
    }
}

impl FromStr for Control {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|control| control.id() == s)
            .ok_or_else(|| PanelError::UnknownControl(s.to_string()))
    }
}
