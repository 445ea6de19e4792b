//! REST endpoint handlers organized by resource.

pub mod controls;
pub mod panel;
pub mod panorama;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(controls::routes())
        .merge(panorama::routes())
        .merge(panel::routes())
}
