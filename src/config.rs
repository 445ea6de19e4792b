//! Panel configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use crate::rig::RigOptions;

/// Top-level panel configuration.
///
/// Loaded once at startup via [`PanelConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Socket address the panel's HTTP surface binds to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Base WebSocket URL of the rig's Socket.IO endpoint.
    pub rig_endpoint: String,

    /// URL of the results archive the download button navigates to.
    pub results_url: String,

    /// Capacity of the outbound command queue.
    pub command_queue_capacity: usize,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Ping interval used until the rig announces its own.
    pub ping_interval_secs: u64,

    /// Seconds to wait for a command ack before logging it as lost.
    pub ack_timeout_secs: u64,

    /// Byte cap of the log console (`None` = unbounded).
    pub log_max_bytes: Option<usize>,
}

impl PanelConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()?;

        let rig_endpoint =
            std::env::var("RIG_ENDPOINT").unwrap_or_else(|_| "ws://127.0.0.1:9099".to_string());
        let results_url = std::env::var("RESULTS_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:9001/results.zip".to_string());

        let command_queue_capacity = parse_env("COMMAND_QUEUE_CAPACITY", 64);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 256);
        let ping_interval_secs = parse_env("PING_INTERVAL_SECS", 25);
        let ack_timeout_secs = parse_env("ACK_TIMEOUT_SECS", 120);

        // 0 disables the cap
        let log_max_bytes = Some(parse_env("LOG_MAX_BYTES", 0_usize)).filter(|&max| max > 0);

        Ok(Self {
            listen_addr,
            rig_endpoint,
            results_url,
            command_queue_capacity,
            event_bus_capacity,
            ping_interval_secs,
            ack_timeout_secs,
            log_max_bytes,
        })
    }

    /// Transport options derived from this configuration.
    #[must_use]
    pub fn rig_options(&self) -> RigOptions {
        RigOptions {
            endpoint: self.rig_endpoint.clone(),
            ping_interval: Duration::from_secs(self.ping_interval_secs),
            ack_timeout: Duration::from_secs(self.ack_timeout_secs),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
