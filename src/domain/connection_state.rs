//! Rig connection status shown on the panel.

use serde::Serialize;

/// State of the single rig connection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    /// Dialing the rig or waiting for the Socket.IO handshake.
    #[default]
    Connecting,
    /// Handshake completed.
    Connected {
        /// Engine.IO session id assigned by the rig.
        sid: String,
    },
    /// The connection ended; there is no automatic reconnect.
    Disconnected {
        /// Why the connection ended.
        reason: String,
    },
}

impl ConnectionState {
    /// Returns `true` once the handshake has completed and the connection
    /// is still up.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}
