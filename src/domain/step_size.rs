//! Jog step size selection.
//!
//! The panel offers three mutually exclusive step buttons (1, 10 and
//! 100 mm). [`StepSelector`] owns both the remembered step and the
//! enabled/disabled flag of each button, so the invariant "exactly one
//! button is disabled, and it is the active one" lives in one place.

use std::fmt;

use serde::Serialize;

/// Discrete jog distance in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "i32")]
pub enum StepSize {
    /// 1 mm.
    One,
    /// 10 mm (initial selection).
    #[default]
    Ten,
    /// 100 mm.
    Hundred,
}

impl StepSize {
    /// All step sizes in button order.
    pub const ALL: [Self; 3] = [Self::One, Self::Ten, Self::Hundred];

    /// Returns the step in millimeters.
    #[must_use]
    pub const fn millimeters(self) -> i32 {
        match self {
            Self::One => 1,
            Self::Ten => 10,
            Self::Hundred => 100,
        }
    }

    /// DOM id of the button selecting this step (`step1`, `step10`, `step100`).
    #[must_use]
    pub const fn control_id(self) -> &'static str {
        match self {
            Self::One => "step1",
            Self::Ten => "step10",
            Self::Hundred => "step100",
        }
    }
}

impl From<StepSize> for i32 {
    fn from(size: StepSize) -> Self {
        size.millimeters()
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.millimeters())
    }
}

/// Enabled state of a single step button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepControl {
    /// Step size the button selects.
    pub size: StepSize,
    /// `true` while this button is the active selection.
    pub disabled: bool,
}

/// Three-state machine over [`StepSize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSelector {
    active: StepSize,
    controls: [StepControl; 3],
}

impl StepSelector {
    /// Creates a selector with 10 mm active and its button disabled.
    #[must_use]
    pub fn new() -> Self {
        let mut selector = Self {
            active: StepSize::default(),
            controls: StepSize::ALL.map(|size| StepControl {
                size,
                disabled: false,
            }),
        };
        selector.apply(StepSize::default());
        selector
    }

    /// Returns the active step size.
    #[must_use]
    pub const fn active(&self) -> StepSize {
        self.active
    }

    /// Returns the three button states in button order.
    #[must_use]
    pub const fn controls(&self) -> &[StepControl; 3] {
        &self.controls
    }

    /// Returns `true` if the button for `size` is currently disabled.
    #[must_use]
    pub fn is_disabled(&self, size: StepSize) -> bool {
        self.controls
            .iter()
            .any(|control| control.size == size && control.disabled)
    }

    /// Selects `size` as the active step.
    ///
    /// Selecting the already active size is a no-op: its button is
    /// disabled, so nothing observable changes. Returns `true` when the
    /// selection changed.
    pub fn select(&mut self, size: StepSize) -> bool {
        if size == self.active && self.is_disabled(size) {
            return false;
        }
        self.apply(size);
        true
    }

    fn apply(&mut self, size: StepSize) {
        for control in &mut self.controls {
            control.disabled = false;
        }
        for control in &mut self.controls {
            if control.size == size {
                control.disabled = true;
            }
        }
        self.active = size;
    }
}

impl Default for StepSelector {
    fn default() -> Self {
        Self::new()
    }
}
