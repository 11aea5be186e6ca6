//! Raster backend for album posters using tiny-skia and cosmic-text.
//!
//! [`CanvasBackend`] replays a poster draw list into a pixmap whose size is the
//! canonical page size multiplied by a page scale, and encodes it as PNG with
//! matching pixel density metadata. It uses:
//! - `tiny-skia` for rectangles and bitmap compositing
//! - `cosmic-text` for text shaping and glyph outlines
//! - `fontdb` for font database management (see [`FontConfig`])

mod backend;
mod error;
mod font_config;
mod text;

pub use backend::CanvasBackend;
pub use error::{CanvasError, CanvasResult};
pub use font_config::{
    default_sans_serif, font_config_to_fontdb, CustomFont, FontConfig, ResolvedFontConfig,
};
