//! Error types for albumposter-layout.

use thiserror::Error;

/// Result type alias using LayoutError.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors raised while composing a poster scene.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A color field could not be parsed as a hex color.
    #[error("Invalid color for `{field}`: {value:?}")]
    InvalidColor { field: &'static str, value: String },

    /// The layout template failed validation.
    #[error("Invalid layout template: {0}")]
    InvalidTemplate(String),

    /// SVG parsing or rasterization failed.
    #[error("SVG rasterization error: {0}")]
    Rasterize(String),

    /// Image bytes could not be decoded.
    #[error("Image decoding error: {0}")]
    Decode(String),

    /// A render backend reported a failure.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors reported by a [`RenderBackend`](crate::RenderBackend) implementation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend could not load or embed a font.
    #[error("Font error: {0}")]
    Font(String),

    /// An operation referenced a handle the backend never issued.
    #[error("Unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: u32 },

    /// Final document encoding failed.
    #[error("Document encoding error: {0}")]
    Encode(String),

    /// Any other backend failure.
    #[error("Render backend error: {0}")]
    Backend(String),
}
