//! Button press handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::ControlResponse;
use crate::app_state::AppState;
use crate::domain::Control;
use crate::error::{ErrorResponse, PanelError};

/// `POST /controls/{id}`: Press a panel button.
///
/// # Errors
///
/// Returns [`PanelError::UnknownControl`] for ids that are not plain
/// buttons, or a transport error if the command cannot be queued.
#[utoipa::path(
    post,
    path = "/api/v1/controls/{id}",
    tag = "Controls",
    summary = "Press a button",
    description = "Presses a jog, home, step-size or stop button by its DOM id. \
        Jog distances use the active step size; step buttons only change local state.",
    params(
        ("id" = String, Path, description = "Button id, e.g. `xyup`, `zhome`, `step100`, `btnstop`"),
    ),
    responses(
        (status = 200, description = "Button pressed", body = ControlResponse),
        (status = 404, description = "Unknown control", body = ErrorResponse),
        (status = 503, description = "Rig connection unavailable", body = ErrorResponse),
    )
)]
pub async fn press_control(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PanelError> {
    let control: Control = id.parse()?;
    let command = state.panel.press(control).await?;
    let step_mm = state.panel.step().await.millimeters();

    Ok(Json(ControlResponse {
        control: control.id().to_string(),
        command: command.map(Into::into),
        step_mm,
    }))
}

/// Control routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/controls/{id}", post(press_control))
}
