//! Latest webcam frame.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::PanelError;

/// MIME type used for the image data URI.
pub const FRAME_MIME: &str = "image/png";

/// Holds the most recent frame. Each new frame replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct WebcamView {
    frame: Option<String>,
}

impl WebcamView {
    /// Creates a view with no frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current frame with a base64 payload.
    pub fn replace(&mut self, frame: String) {
        self.frame = Some(frame);
    }

    /// Image source for the current frame, as a data URI.
    #[must_use]
    pub fn image_src(&self) -> Option<String> {
        self.frame.as_deref().map(data_uri)
    }

    /// Decodes the current frame into raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NoFrame`] if no frame has arrived and
    /// [`PanelError::Protocol`] if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, PanelError> {
        let frame = self.frame.as_deref().ok_or(PanelError::NoFrame)?;
        STANDARD
            .decode(frame)
            .map_err(|e| PanelError::Protocol(format!("invalid base64 webcam frame: {e}")))
    }
}

/// Builds `data:image/png;base64,<payload>`.
#[must_use]
pub fn data_uri(payload: &str) -> String {
    format!("data:{FRAME_MIME};base64,{payload}")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn image_src_is_exact_data_uri() {
        let mut view = WebcamView::new();
        view.replace("P".to_string());
        assert_eq!(view.image_src().as_deref(), Some("data:image/png;base64,P"));
    }

    #[test]
    fn new_frame_replaces_previous() {
        let mut view = WebcamView::new();
        view.replace("first".to_string());
        view.replace("second".to_string());
        assert_eq!(
            view.image_src().as_deref(),
            Some("data:image/png;base64,second")
        );
    }

    #[test]
    fn decode_without_frame_fails() {
        assert!(matches!(WebcamView::new().decode(), Err(PanelError::NoFrame)));
    }

    #[test]
    fn decode_returns_bytes() {
        let mut view = WebcamView::new();
        view.replace(STANDARD.encode(b"\x89PNG"));
        let Ok(bytes) = view.decode() else {
            panic!("decode failed");
        };
        assert_eq!(bytes, b"\x89PNG");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let mut view = WebcamView::new();
        view.replace("not base64!".to_string());
        assert!(matches!(view.decode(), Err(PanelError::Protocol(_))));
    }
}
