//! Data Transfer Objects for REST request/response serialization.

pub mod control_dto;
pub mod panel_dto;

pub use control_dto::*;
pub use panel_dto::*;
