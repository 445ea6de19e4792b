//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::ControlPanel;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The panel view-model.
    pub panel: Arc<ControlPanel>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Where the download button sends the browser.
    pub results_url: Arc<str>,
}
