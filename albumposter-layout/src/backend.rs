//! Capability traits implemented by the vector and raster renderers.

use crate::bitmap::Bitmap;
use crate::error::RenderError;
use crate::ops::{DrawKind, DrawOp, FilledRect, FontHandle, ImageDraw, ImageHandle, TextRun};
use crate::units::{to_pixels, to_points};

/// Text measurement in a given font.
pub trait TextMeasure {
    /// Advance width of `text` set at `size_pt` points, in points.
    fn text_width(&mut self, font: FontHandle, text: &str, size_pt: f64) -> f64;

    /// Advance width of `text` set at `size_px` canonical pixels, in pixels.
    fn text_width_px(&mut self, font: FontHandle, text: &str, size_px: f64) -> f64 {
        to_pixels(self.text_width(font, text, to_points(size_px)))
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn text_width(&mut self, font: FontHandle, text: &str, size_pt: f64) -> f64 {
        (**self).text_width(font, text, size_pt)
    }
}

/// A document renderer driven by [`DrawOp`] lists.
///
/// Geometry handed to a backend is always expressed in canonical pixels with
/// the origin at the top-left of the page. Backends convert to their own
/// coordinate space.
pub trait RenderBackend: TextMeasure {
    /// Register a TrueType/OpenType font from raw bytes.
    fn register_font(&mut self, data: Vec<u8>) -> Result<FontHandle, RenderError>;

    /// Embed a bitmap so it can be referenced by later image draws.
    fn embed_image(&mut self, bitmap: &Bitmap) -> Result<ImageHandle, RenderError>;

    fn fill_rect(&mut self, rect: &FilledRect) -> Result<(), RenderError>;

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError>;

    fn draw_image(&mut self, image: &ImageDraw) -> Result<(), RenderError>;

    /// Replay a draw list in order.
    fn execute(&mut self, ops: &[DrawOp]) -> Result<(), RenderError> {
        for op in ops {
            log::trace!("executing {:?} operation", op.layer);
            match &op.kind {
                DrawKind::FilledRect(rect) => self.fill_rect(rect)?,
                DrawKind::TextRun(run) => self.draw_text(run)?,
                DrawKind::Image(image) => self.draw_image(image)?,
            }
        }
        Ok(())
    }

    /// Encode the finished document.
    fn finish(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}
