//! Motion axes of the rig.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three linear axes of the XY/Z stage.
///
/// Serialized as the bare uppercase letter (`"X"`, `"Y"`, `"Z"`), which is
/// what the rig firmware bridge expects in `move` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis (left / right).
    X,
    /// Depth axis (up / down on the panel).
    Y,
    /// Vertical axis carrying the camera.
    Z,
}

impl Axis {
    /// Returns the axis letter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
