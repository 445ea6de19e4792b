//! UI WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams panel events (log lines,
//! webcam frames, step and connection changes) to front-ends.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
