//! Service layer: the control panel view-model.

pub mod panel_service;

pub use panel_service::{ControlPanel, PanelSnapshot};
