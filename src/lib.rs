//! # rig-panel
//!
//! Headless control panel for a motorized XY/Z camera rig.
//!
//! The rig exposes a Socket.IO endpoint that accepts jog, home and
//! panorama commands and pushes log lines and webcam frames back. This
//! crate holds the panel side of that conversation: the step-size
//! selection, the log console and the latest frame live in a
//! view-model, and a small HTTP/WebSocket surface lets any front-end
//! press buttons and render the view.
//!
//! ## Architecture
//!
//! ```text
//! Front-ends (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ControlPanel (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── Rig transport (rig/) ── Socket.IO ──▶ camera rig
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod rig;
pub mod service;
pub mod ws;
