//! Panel error types with HTTP status code mapping.
//!
//! [`PanelError`] is the central error type for the control panel. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid input: width must be an integer",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Control panel error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                 |
/// |-----------|------------|-----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request / 404       |
/// | 2000–2999 | State      | 404 Not Found               |
/// | 3000–3999 | Internal   | 500 Internal Server Error   |
/// | 5000–5999 | Transport  | 502 / 503                   |
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// A form field or request parameter failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No control with the given DOM id exists.
    #[error("unknown control: {0}")]
    UnknownControl(String),

    /// No webcam frame has been received yet.
    #[error("no webcam frame received yet")]
    NoFrame,

    /// The rig connection is gone; commands can no longer be delivered.
    #[error("rig connection closed")]
    Disconnected,

    /// The outbound command queue is full.
    #[error("command queue full; rig is not keeping up")]
    QueueFull,

    /// WebSocket transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// A packet from the rig could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PanelError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::UnknownControl(_) => 1002,
            Self::NoFrame => 2001,
            Self::Internal(_) => 3000,
            Self::Disconnected => 5001,
            Self::QueueFull => 5002,
            Self::Transport(_) => 5003,
            Self::Protocol(_) => 5004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UnknownControl(_) | Self::NoFrame => StatusCode::NOT_FOUND,
            Self::Disconnected | Self::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            Self::Transport(_) | Self::Protocol(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for PanelError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
