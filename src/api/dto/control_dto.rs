//! Control and capture DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CommandView;

/// Response body for `POST /api/v1/controls/{id}` and the panorama
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ControlResponse {
    /// DOM id of the pressed control.
    pub control: String,
    /// Command sent to the rig; absent for step buttons.
    pub command: Option<CommandView>,
    /// Active jog step after the press.
    pub step_mm: i32,
}

/// Request body for `POST /api/v1/panorama/start`.
///
/// Fields carry the raw text of the capture form inputs; they are parsed
/// as integers server-side.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CaptureForm {
    /// Width of the area, in millimeters (`pcbwidth`).
    pub width: String,
    /// Height of the area, in millimeters (`pcbheight`).
    pub height: String,
    /// Distance between pictures, in millimeters (`steps`).
    pub steps: String,
}
