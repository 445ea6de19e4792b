//! Domain layer: panel vocabulary, view state, and event system.
//!
//! This module contains the control panel's model: the axes and jog
//! directions, the step-size state machine, the command union sent to
//! the rig, the push events it sends back, the log and webcam views,
//! and the event bus that fans view changes out to UI clients.

pub mod axis;
pub mod command;
pub mod connection_state;
pub mod control;
pub mod event_bus;
pub mod log_console;
pub mod panel_event;
pub mod push_event;
pub mod step_size;
pub mod webcam;

pub use axis::Axis;
pub use command::{CaptureRequest, Channel, Command, Jog, JogDirection};
pub use connection_state::ConnectionState;
pub use control::Control;
pub use event_bus::EventBus;
pub use log_console::LogConsole;
pub use panel_event::{PanelEvent, Topic};
pub use push_event::PushEvent;
pub use step_size::{StepControl, StepSelector, StepSize};
pub use webcam::WebcamView;
