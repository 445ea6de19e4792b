//! Rig transport: Socket.IO over WebSocket.
//!
//! The rig exposes one Socket.IO endpoint. Commands travel as events
//! named after their channel (`printer`, `panorama`); the rig pushes
//! `log` and `webcam` events back.

pub mod client;
pub mod packet;
pub mod wire;

pub use client::{RigOptions, spawn};
pub use packet::{Handshake, Packet};
