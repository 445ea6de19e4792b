//! Panorama capture handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CaptureForm, ControlResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PanelError};

/// `POST /panorama/start`: Start a capture from the form fields.
///
/// # Errors
///
/// Returns [`PanelError::InvalidInput`] if a field is not an integer or is
/// out of range; nothing is sent in that case.
#[utoipa::path(
    post,
    path = "/api/v1/panorama/start",
    tag = "Panorama",
    summary = "Start a panorama capture",
    description = "Parses width, height and step as integers and sends `start` on the panorama channel.",
    request_body = CaptureForm,
    responses(
        (status = 200, description = "Capture requested", body = ControlResponse),
        (status = 400, description = "Invalid form input", body = ErrorResponse),
        (status = 503, description = "Rig connection unavailable", body = ErrorResponse),
    )
)]
pub async fn start_capture(
    State(state): State<AppState>,
    Json(form): Json<CaptureForm>,
) -> Result<impl IntoResponse, PanelError> {
    let command = state
        .panel
        .start_capture(&form.width, &form.height, &form.steps)?;

    Ok(Json(ControlResponse {
        control: "btnstart".to_string(),
        command: Some(command.into()),
        step_mm: state.panel.step().await.millimeters(),
    }))
}

/// `POST /panorama/stop`: Abort the running capture.
///
/// # Errors
///
/// Returns a transport error if the command cannot be queued.
#[utoipa::path(
    post,
    path = "/api/v1/panorama/stop",
    tag = "Panorama",
    summary = "Stop the panorama capture",
    responses(
        (status = 200, description = "Stop requested", body = ControlResponse),
        (status = 503, description = "Rig connection unavailable", body = ErrorResponse),
    )
)]
pub async fn stop_capture(State(state): State<AppState>) -> Result<impl IntoResponse, PanelError> {
    let command = state.panel.stop_capture()?;

    Ok(Json(ControlResponse {
        control: "btnstop".to_string(),
        command: Some(command.into()),
        step_mm: state.panel.step().await.millimeters(),
    }))
}

/// Panorama routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/panorama/start", post(start_capture))
        .route("/panorama/stop", post(stop_capture))
}
