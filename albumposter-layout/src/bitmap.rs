//! Decoded bitmaps and SVG rasterization.

use crate::error::{LayoutError, LayoutResult};
use image::{ColorType, ImageFormat};
use std::sync::Arc;
use tiny_skia::{ColorU8, Pixmap, Transform};

/// Largest raster edge we are willing to allocate.
const MAX_DIMENSION: u32 = 16_384;

/// A premultiplied RGBA bitmap.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixmap: Pixmap,
    /// Source bytes of a baseline RGB JPEG, kept for pass-through embedding.
    jpeg: Option<Arc<[u8]>>,
}

impl Bitmap {
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap, jpeg: None }
    }

    /// Decode PNG or JPEG bytes (the format is sniffed from the content).
    pub fn decode(bytes: &[u8]) -> LayoutResult<Self> {
        let format = image::guess_format(bytes).map_err(|e| LayoutError::Decode(e.to_string()))?;
        let dynamic = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| LayoutError::Decode(e.to_string()))?;
        let jpeg = (format == ImageFormat::Jpeg && dynamic.color() == ColorType::Rgb8)
            .then(|| Arc::from(bytes));
        let decoded = dynamic.to_rgba8();
        let (width, height) = decoded.dimensions();
        let mut pixmap = new_pixmap(width, height)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(decoded.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        log::debug!("decoded {:?} image {}x{}", format, width, height);
        Ok(Self { pixmap, jpeg })
    }

    /// The original JPEG stream, when this bitmap was decoded from an RGB JPEG.
    pub fn jpeg_source(&self) -> Option<&[u8]> {
        self.jpeg.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        data
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 255)
    }
}

fn new_pixmap(width: u32, height: u32) -> LayoutResult<Pixmap> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(LayoutError::Rasterize(format!(
            "raster size {width}x{height} out of range (max {MAX_DIMENSION}x{MAX_DIMENSION})"
        )));
    }
    Pixmap::new(width, height)
        .ok_or_else(|| LayoutError::Rasterize(format!("failed to allocate {width}x{height}")))
}

fn parse_svg(svg: &str) -> LayoutResult<usvg::Tree> {
    usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| LayoutError::Rasterize(format!("Failed to parse SVG string: {e}")))
}

fn render_tree(tree: &usvg::Tree, width: u32, height: u32) -> LayoutResult<Bitmap> {
    let mut pixmap = new_pixmap(width, height)?;
    let size = tree.size();
    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    resvg::render(tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());
    Ok(Bitmap::from_pixmap(pixmap))
}

/// Rasterize an SVG document stretched into `width × height` logical pixels,
/// supersampled by `scale`.
pub fn rasterize_svg(svg: &str, width: f64, height: f64, scale: f64) -> LayoutResult<Bitmap> {
    let tree = parse_svg(svg)?;
    let w = (width * scale).ceil().max(1.0) as u32;
    let h = (height * scale).ceil().max(1.0) as u32;
    log::debug!("rasterizing svg into {w}x{h} (scale {scale})");
    render_tree(&tree, w, h)
}

/// Rasterize an SVG document at its own size, supersampled by `scale`.
pub fn rasterize_svg_intrinsic(svg: &str, scale: f64) -> LayoutResult<Bitmap> {
    let tree = parse_svg(svg)?;
    let size = tree.size();
    let w = (size.width() as f64 * scale).ceil().max(1.0) as u32;
    let h = (size.height() as f64 * scale).ceil().max(1.0) as u32;
    render_tree(&tree, w, h)
}
