//! Error types for albumposter-canvas.

use albumposter_layout::RenderError;
use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while rasterizing a poster.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Invalid page dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid page scale.
    #[error("Invalid page scale: {0}")]
    InvalidScale(f32),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Font data could not be registered.
    #[error("Font error: {0}")]
    FontError(String),
}

impl From<png::EncodingError> for CanvasError {
    fn from(err: png::EncodingError) -> Self {
        CanvasError::PngError(err.to_string())
    }
}

impl From<CanvasError> for RenderError {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::PngError(msg) => RenderError::Encode(msg),
            CanvasError::FontError(msg) => RenderError::Font(msg),
            other => RenderError::Backend(other.to_string()),
        }
    }
}
