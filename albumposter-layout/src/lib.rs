//! Deterministic layout engine for printable album posters.
//!
//! [`compose`] turns a [`PosterData`] into an ordered list of [`DrawOp`]s on
//! the canonical 2480×3508 pixel grid (A4 at 300 dpi). Text measurement is
//! delegated to a [`TextMeasure`] implementation, and the draw list is replayed
//! by a [`RenderBackend`]. Nothing in this crate performs I/O.

pub mod backend;
pub mod bitmap;
pub mod color;
pub mod composer;
pub mod error;
pub mod gradient;
pub mod model;
pub mod ops;
pub mod scan_code;
pub mod template;
pub mod title_fit;
pub mod tracklist;
pub mod units;
pub mod watermark;

pub use backend::{RenderBackend, TextMeasure};
pub use bitmap::{rasterize_svg, rasterize_svg_intrinsic, Bitmap};
pub use color::{ContrastColor, ParseColorError, Rgb};
pub use composer::{compose, PosterColors, Scene, SceneAssets, TracklistStats};
pub use error::{LayoutError, LayoutResult, RenderError};
pub use gradient::GradientMask;
pub use model::PosterData;
pub use ops::{DrawKind, DrawOp, FilledRect, FontHandle, ImageDraw, ImageHandle, Layer, TextRun};
pub use template::{LayoutTemplate, Slot};
pub use title_fit::{fit_title, TitleFit};
pub use tracklist::{flow_tracklist, TracklistLayout, TracklistStyle, TracklistZone};
pub use scan_code::{recolor_scan_code, scan_code_url};
pub use units::{to_pixels, to_points};
pub use watermark::rasterize_watermark;
