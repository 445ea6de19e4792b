//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Panel endpoints are mounted under `/api/v1`; `/health`, `/download`
//! and `/ws` live at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI document for the panel's HTTP surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "rig-panel",
        description = "Control panel for a motorized XY/Z camera rig"
    ),
    paths(
        handlers::system::health_handler,
        handlers::panel::get_panel,
        handlers::panel::get_webcam,
        handlers::panel::download,
        handlers::controls::press_control,
        handlers::panorama::start_capture,
        handlers::panorama::stop_capture,
    ),
    tags(
        (name = "Controls", description = "Jog, home and step-size buttons"),
        (name = "Panorama", description = "Capture sequence control"),
        (name = "Panel", description = "Panel view"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(handlers::panel::download_routes())
}

/// Builds the full application: REST API, UI WebSocket, tracing and CORS.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
