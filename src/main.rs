//! rig-panel entry point.
//!
//! Connects to the rig and serves the panel's HTTP and WebSocket surface.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use rig_panel::api;
use rig_panel::app_state::AppState;
use rig_panel::config::PanelConfig;
use rig_panel::domain::EventBus;
use rig_panel::rig;
use rig_panel::service::ControlPanel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = PanelConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        rig = %config.rig_endpoint,
        "starting rig-panel"
    );

    // Build the panel and its command queue
    let event_bus = EventBus::new(config.event_bus_capacity);
    let (command_tx, command_rx) = mpsc::channel(config.command_queue_capacity);
    let panel = Arc::new(ControlPanel::new(
        command_tx,
        event_bus.clone(),
        config.log_max_bytes,
    ));

    // Connect to the rig once; no reconnect
    let _rig_task = rig::spawn(config.rig_options(), command_rx, Arc::clone(&panel));

    // Build application state
    let app_state = AppState {
        panel,
        event_bus,
        results_url: config.results_url.as_str().into(),
    };

    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
