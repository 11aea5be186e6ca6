//! Text measurement and rendering using cosmic-text.

use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache,
    Weight,
};
use tiny_skia::{Paint, Pixmap, Transform};

/// A face the backend can set text in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FontFace {
    /// Concrete family name, or `None` for the generic sans-serif family.
    pub family: Option<String>,
    pub weight: Weight,
}

impl FontFace {
    pub fn default_bold() -> Self {
        Self {
            family: None,
            weight: Weight::BOLD,
        }
    }

    fn attrs(&self, hinting_enabled: bool) -> Attrs<'_> {
        let family = match &self.family {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        };
        let flags = if hinting_enabled {
            CacheKeyFlags::empty()
        } else {
            CacheKeyFlags::DISABLE_HINTING
        };
        Attrs::new()
            .family(family)
            .weight(self.weight)
            .cache_key_flags(flags)
    }
}

fn shape(
    font_system: &mut FontSystem,
    text: &str,
    face: &FontFace,
    size_px: f32,
    hinting_enabled: bool,
) -> Buffer {
    let metrics = Metrics::new(size_px, size_px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);
    let attrs = face.attrs(hinting_enabled);
    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    buffer
}

/// Advance width of a single line of text in pixels.
pub(crate) fn measure_width(
    font_system: &mut FontSystem,
    text: &str,
    face: &FontFace,
    size_px: f32,
    hinting_enabled: bool,
) -> f32 {
    if text.is_empty() || size_px <= 0.0 || font_system.db().is_empty() {
        return 0.0;
    }
    let buffer = shape(font_system, text, face, size_px, hinting_enabled);
    buffer
        .layout_runs()
        .map(|run| run.line_w)
        .fold(0.0, f32::max)
}

/// Fill `text` with its alphabetic baseline at `(x, baseline)`.
///
/// Glyphs are drawn as vector outlines so the raster output scales cleanly
/// with the page scale.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_text(
    pixmap: &mut Pixmap,
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    text: &str,
    face: &FontFace,
    size_px: f32,
    x: f32,
    baseline: f32,
    paint: &Paint<'_>,
    hinting_enabled: bool,
) {
    // Shaping requires at least one face to fall back to
    if font_system.db().is_empty() {
        log::warn!(target: "canvas", "no fonts available, skipping text \"{}\"", text);
        return;
    }
    let buffer = shape(font_system, text, face, size_px, hinting_enabled);
    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            let physical_glyph = glyph.physical((x, baseline), 1.0);

            // Floating-point glyph position for sub-pixel precision
            let glyph_x = x + glyph.x + glyph.font_size * glyph.x_offset;
            let glyph_y = baseline + glyph.y - glyph.font_size * glyph.y_offset;

            let Some(commands) =
                swash_cache.get_outline_commands(font_system, physical_glyph.cache_key)
            else {
                continue;
            };

            // Font outlines have Y pointing up
            let mut path_builder = tiny_skia::PathBuilder::new();
            for cmd in commands {
                match cmd {
                    Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                    Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                    Command::QuadTo(ctrl, end) => {
                        path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                    }
                    Command::CurveTo(c1, c2, end) => {
                        path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                    }
                    Command::Close => path_builder.close(),
                }
            }

            if let Some(path) = path_builder.finish() {
                pixmap.fill_path(
                    &path,
                    paint,
                    tiny_skia::FillRule::Winding,
                    Transform::from_translate(glyph_x, glyph_y),
                    None,
                );
            }
        }
    }
}
