//! Panel view handlers: snapshot, latest frame, results download.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::PanelView;
use crate::app_state::AppState;
use crate::domain::webcam::FRAME_MIME;
use crate::error::{ErrorResponse, PanelError};

/// `GET /panel`: Current panel view.
#[utoipa::path(
    get,
    path = "/api/v1/panel",
    tag = "Panel",
    summary = "Panel snapshot",
    description = "Returns the step selection, log console, webcam image source and rig connection state.",
    responses(
        (status = 200, description = "Current panel view", body = PanelView),
    )
)]
pub async fn get_panel(State(state): State<AppState>) -> impl IntoResponse {
    Json(PanelView::from(state.panel.snapshot().await))
}

/// `GET /webcam`: Latest webcam frame as an image.
///
/// # Errors
///
/// Returns [`PanelError::NoFrame`] before the first frame arrives.
#[utoipa::path(
    get,
    path = "/api/v1/webcam",
    tag = "Panel",
    summary = "Latest webcam frame",
    responses(
        (status = 200, description = "Decoded frame", content_type = "image/png", body = Vec<u8>),
        (status = 404, description = "No frame yet", body = ErrorResponse),
        (status = 502, description = "Frame payload is not valid base64", body = ErrorResponse),
    )
)]
pub async fn get_webcam(State(state): State<AppState>) -> Result<impl IntoResponse, PanelError> {
    let bytes = state.panel.latest_frame().await?;
    Ok(([(header::CONTENT_TYPE, FRAME_MIME)], bytes))
}

/// `GET /download`: Navigate to the results archive.
#[utoipa::path(
    get,
    path = "/download",
    tag = "Panel",
    summary = "Download capture results",
    description = "Redirects to the rig's static `results.zip`.",
    responses(
        (status = 303, description = "Redirect to the results archive"),
    )
)]
pub async fn download(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!(url = %state.results_url, "download results");
    Redirect::to(&state.results_url)
}

/// Panel routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/panel", get(get_panel))
        .route("/webcam", get(get_webcam))
}

/// Download route mounted at the root level.
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/download", get(download))
}
