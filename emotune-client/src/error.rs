//! Error types for emotune-client
//!
//! Capture errors never escape the workflow unhandled: the controller turns
//! each one into a user-visible notice before returning it.

use thiserror::Error;

/// Capture workflow errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    /// Camera permission or hardware failure
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Snapshot requested with no live stream
    #[error("Camera stream is not open")]
    NotOpen,

    /// Input is not an image/* type
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Data URI without a usable MIME segment or payload
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),

    /// No response, timeout, or non-2xx status
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 2xx response whose payload failed validation
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Track has no playable embed URL
    #[error("Preview unavailable for this song")]
    PreviewUnavailable,

    /// Track is not part of the current recommendation list
    #[error("Track not in current recommendations: {0}")]
    TrackNotFound(String),
}

impl CaptureError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::DeviceUnavailable(_) => {
                "Could not access the camera. Check permissions and try again.".to_string()
            }
            CaptureError::NotOpen => "Please start the camera first.".to_string(),
            CaptureError::UnsupportedType(_) => {
                "Please upload a valid image file (JPG, PNG).".to_string()
            }
            CaptureError::MalformedDataUri(_) => "Could not read the captured image.".to_string(),
            CaptureError::PreviewUnavailable => "Preview unavailable for this song.".to_string(),
            CaptureError::TrackNotFound(_) => "That song is not in the current list.".to_string(),
            CaptureError::NetworkError(msg) | CaptureError::InvalidResponse(msg) => msg.clone(),
        }
    }
}

/// Account and session errors
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Backend answered non-2xx; `detail` is its message
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rejected before any request was sent
    #[error("{0}")]
    InvalidInput(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Image error: {0}")]
    Image(#[from] CaptureError),

    #[error(transparent)]
    Common(#[from] emotune_common::Error),
}
