//! Backend-neutral drawing operations.

use crate::color::Rgb;

/// Handle to an image embedded in a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub u32);

/// Handle to a font registered with a render backend.
///
/// `FontHandle::DEFAULT` is always available and refers to the backend's
/// built-in bold sans-serif face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FontHandle(pub u32);

impl FontHandle {
    pub const DEFAULT: FontHandle = FontHandle(0);
}

/// The poster element an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Cover,
    Fade,
    SeamFill,
    Title,
    Artist,
    ReleaseRow,
    SecondaryRow,
    Swatch,
    Track,
    Watermark,
    ScanCode,
}

/// Filled axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    pub opacity: Option<f32>,
}

/// Single line of text. `y` is the top of the em box; the baseline sits at
/// `y + size_px`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size_px: f64,
    pub font: FontHandle,
    pub color: Rgb,
    pub opacity: Option<f32>,
}

impl TextRun {
    /// Baseline position in canonical pixels.
    pub fn baseline(&self) -> f64 {
        self.y + self.size_px
    }
}

/// Embedded image stretched into a destination rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraw {
    pub image: ImageHandle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    FilledRect(FilledRect),
    TextRun(TextRun),
    Image(ImageDraw),
}

/// One entry of the ordered draw list.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub layer: Layer,
    pub kind: DrawKind,
}

impl DrawOp {
    pub fn rect(layer: Layer, rect: FilledRect) -> Self {
        Self {
            layer,
            kind: DrawKind::FilledRect(rect),
        }
    }

    pub fn text(layer: Layer, run: TextRun) -> Self {
        Self {
            layer,
            kind: DrawKind::TextRun(run),
        }
    }

    pub fn image(layer: Layer, image: ImageDraw) -> Self {
        Self {
            layer,
            kind: DrawKind::Image(image),
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match &self.kind {
            DrawKind::TextRun(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageDraw> {
        match &self.kind {
            DrawKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&FilledRect> {
        match &self.kind {
            DrawKind::FilledRect(rect) => Some(rect),
            _ => None,
        }
    }
}
