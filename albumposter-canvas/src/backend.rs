//! Raster render backend.

use crate::error::{CanvasError, CanvasResult};
use crate::font_config::ResolvedFontConfig;
use crate::text::{fill_text, measure_width, FontFace};
use albumposter_layout::units::{to_pixels, to_points, REFERENCE_DPI};
use albumposter_layout::{
    Bitmap, FilledRect, FontHandle, ImageDraw, ImageHandle, LayoutTemplate, RenderBackend,
    RenderError, Rgb, TextMeasure, TextRun,
};
use cosmic_text::{FontSystem, SwashCache};
use std::collections::HashSet;
use tiny_skia::{Paint, Pixmap, PixmapPaint, Rect, Transform};

/// Maximum raster dimension (same as Chrome's canvas limit).
const MAX_DIMENSION: u32 = 32767;

/// Renders a poster into a pixmap of `page size × scale` pixels.
pub struct CanvasBackend {
    width: u32,
    height: u32,
    scale: f32,
    pixmap: Pixmap,
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Index 0 is the default bold sans-serif face.
    fonts: Vec<FontFace>,
    images: Vec<Pixmap>,
    hinting_enabled: bool,
}

impl CanvasBackend {
    /// Create a backend for the page described by `template`.
    pub fn new(
        template: &LayoutTemplate,
        scale: f32,
        fonts: &ResolvedFontConfig,
    ) -> CanvasResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CanvasError::InvalidScale(scale));
        }
        let width = (template.page_width * scale as f64).round() as u32;
        let height = (template.page_height * scale as f64).round() as u32;
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        let font_system =
            FontSystem::new_with_locale_and_db("en".to_string(), fonts.fontdb.clone());

        log::debug!(target: "canvas", "new raster page {}x{} (scale {})", width, height, scale);
        Ok(Self {
            width,
            height,
            scale,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            fonts: vec![FontFace::default_bold()],
            images: Vec::new(),
            hinting_enabled: fonts.hinting_enabled,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Physical pixel density of the output.
    pub fn ppi(&self) -> f32 {
        REFERENCE_DPI as f32 * self.scale
    }

    /// Straight-alpha RGBA pixel data of the whole page.
    pub fn get_image_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        data
    }

    /// Export the page as PNG data with pixel density metadata.
    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixels per meter
            let ppm = (self.ppi().max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.get_image_data())?;
        }
        Ok(buf)
    }

    fn face(&self, font: FontHandle) -> Result<&FontFace, RenderError> {
        self.fonts
            .get(font.0 as usize)
            .ok_or(RenderError::UnknownHandle {
                kind: "font",
                id: font.0,
            })
    }

    fn color_paint(color: Rgb, opacity: Option<f32>) -> Paint<'static> {
        let alpha = (opacity.unwrap_or(1.0).clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint
    }
}

impl TextMeasure for CanvasBackend {
    fn text_width(&mut self, font: FontHandle, text: &str, size_pt: f64) -> f64 {
        let face = match self.fonts.get(font.0 as usize) {
            Some(face) => face.clone(),
            None => FontFace::default_bold(),
        };
        let width_px = measure_width(
            &mut self.font_system,
            text,
            &face,
            to_pixels(size_pt) as f32,
            self.hinting_enabled,
        );
        to_points(width_px as f64)
    }
}

impl RenderBackend for CanvasBackend {
    fn register_font(&mut self, data: Vec<u8>) -> Result<FontHandle, RenderError> {
        let db = self.font_system.db_mut();
        let before: HashSet<fontdb::ID> = db.faces().map(|face| face.id).collect();
        db.load_font_data(data);
        let face = db
            .faces()
            .find(|face| !before.contains(&face.id))
            .ok_or_else(|| CanvasError::FontError("no usable face in font data".to_string()))?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| CanvasError::FontError("font has no family name".to_string()))?;
        let weight = face.weight;

        log::debug!(target: "canvas", "registered font family {family} ({weight:?})");
        self.fonts.push(FontFace {
            family: Some(family),
            weight,
        });
        Ok(FontHandle((self.fonts.len() - 1) as u32))
    }

    fn embed_image(&mut self, bitmap: &Bitmap) -> Result<ImageHandle, RenderError> {
        self.images.push(bitmap.pixmap().clone());
        Ok(ImageHandle((self.images.len() - 1) as u32))
    }

    fn fill_rect(&mut self, rect: &FilledRect) -> Result<(), RenderError> {
        let s = self.scale;
        let Some(target) = Rect::from_xywh(
            rect.x as f32 * s,
            rect.y as f32 * s,
            rect.width as f32 * s,
            rect.height as f32 * s,
        ) else {
            log::debug!(target: "canvas", "skipping degenerate rect {:?}", rect);
            return Ok(());
        };
        let paint = Self::color_paint(rect.color, rect.opacity);
        self.pixmap
            .fill_rect(target, &paint, Transform::identity(), None);
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
        let face = self.face(run.font)?.clone();
        let s = self.scale;
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", run.text, run.x, run.y);
        let paint = Self::color_paint(run.color, run.opacity);
        fill_text(
            &mut self.pixmap,
            &mut self.font_system,
            &mut self.swash_cache,
            &run.text,
            &face,
            run.size_px as f32 * s,
            run.x as f32 * s,
            run.baseline() as f32 * s,
            &paint,
            self.hinting_enabled,
        );
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageDraw) -> Result<(), RenderError> {
        let source = self
            .images
            .get(image.image.0 as usize)
            .ok_or(RenderError::UnknownHandle {
                kind: "image",
                id: image.image.0,
            })?;
        let s = self.scale;
        let paint = PixmapPaint {
            opacity: image.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Bicubic,
        };
        let scale_x = image.width as f32 * s / source.width() as f32;
        let scale_y = image.height as f32 * s / source.height() as f32;
        let transform = Transform::from_translate(image.x as f32 * s, image.y as f32 * s)
            .pre_scale(scale_x, scale_y);
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.to_png()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_config::FontConfig;
    use albumposter_layout::rasterize_svg;

    fn backend(scale: f32) -> CanvasBackend {
        let fonts = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        CanvasBackend::new(&LayoutTemplate::default(), scale, &fonts).unwrap()
    }

    fn pixel(backend: &CanvasBackend, x: u32, y: u32) -> [u8; 4] {
        let data = backend.get_image_data();
        let idx = ((y * backend.width() + x) * 4) as usize;
        [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
    }

    #[test]
    fn test_page_size_follows_scale() {
        let b = backend(0.1);
        assert_eq!((b.width(), b.height()), (248, 351));
        assert!((b.ppi() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_bad_scale() {
        let fonts = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        assert!(matches!(
            CanvasBackend::new(&LayoutTemplate::default(), 0.0, &fonts),
            Err(CanvasError::InvalidScale(_))
        ));
        assert!(matches!(
            CanvasBackend::new(&LayoutTemplate::default(), 20.0, &fonts),
            Err(CanvasError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_fill_rect_is_scaled() {
        let mut b = backend(0.1);
        b.fill_rect(&FilledRect {
            x: 1000.0,
            y: 2000.0,
            width: 500.0,
            height: 500.0,
            color: Rgb::new(255, 0, 0),
            opacity: None,
        })
        .unwrap();
        assert_eq!(pixel(&b, 120, 220), [255, 0, 0, 255]);
        assert_eq!(pixel(&b, 90, 220), [0, 0, 0, 0]);
    }

    #[test]
    fn test_rect_opacity() {
        let mut b = backend(0.1);
        b.fill_rect(&FilledRect {
            x: 0.0,
            y: 0.0,
            width: 2480.0,
            height: 3508.0,
            color: Rgb::WHITE,
            opacity: Some(0.5),
        })
        .unwrap();
        let [_, _, _, a] = pixel(&b, 10, 10);
        assert!((126..=129).contains(&a));
    }

    #[test]
    fn test_draw_image_stretches_into_rect() {
        let mut b = backend(0.1);
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#00ff00"/></svg>"##;
        let bitmap = rasterize_svg(svg, 4.0, 4.0, 1.0).unwrap();
        let handle = b.embed_image(&bitmap).unwrap();
        b.draw_image(&ImageDraw {
            image: handle,
            x: 500.0,
            y: 500.0,
            width: 1000.0,
            height: 1000.0,
            opacity: None,
        })
        .unwrap();
        let [r, g, _, a] = pixel(&b, 100, 100);
        assert!(r <= 2 && g >= 253 && a >= 253);
        assert_eq!(pixel(&b, 40, 40), [0, 0, 0, 0]);
        assert_eq!(pixel(&b, 160, 100), [0, 0, 0, 0]);
    }

    #[test]
    fn test_unknown_handles_are_rejected() {
        let mut b = backend(0.1);
        let err = b
            .draw_image(&ImageDraw {
                image: ImageHandle(7),
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
                opacity: None,
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownHandle { kind: "image", id: 7 }));

        let err = b
            .draw_text(&TextRun {
                text: "x".into(),
                x: 0.0,
                y: 0.0,
                size_px: 10.0,
                font: FontHandle(3),
                color: Rgb::BLACK,
                opacity: None,
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownHandle { kind: "font", .. }));
    }

    #[test]
    fn test_register_garbage_font_fails() {
        let mut b = backend(0.1);
        assert!(b.register_font(b"not a font".to_vec()).is_err());
    }

    #[test]
    fn test_png_has_density_metadata() {
        let b = backend(0.1);
        let png_data = b.to_png().unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(png_data));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (248, 351));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.unit, png::Unit::Meter);
        assert_eq!(dims.xppu, (30.0f32 / 0.0254).round() as u32);
    }
}
