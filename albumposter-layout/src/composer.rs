//! Fixed-order composition of a poster into a draw list.

use crate::backend::TextMeasure;
use crate::color::{ContrastColor, Rgb};
use crate::error::{LayoutError, LayoutResult};
use crate::model::PosterData;
use crate::ops::{DrawOp, FilledRect, FontHandle, ImageDraw, ImageHandle, Layer, TextRun};
use crate::template::LayoutTemplate;
use crate::title_fit::{fit_title, TitleFit};
use crate::tracklist::{flow_tracklist, TracklistStyle, TracklistZone};

/// Parsed colors of a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterColors {
    pub background: Rgb,
    pub text: Rgb,
    pub swatches: [Rgb; 3],
}

impl PosterColors {
    pub fn from_data(data: &PosterData) -> LayoutResult<Self> {
        fn parse(field: &'static str, value: &str) -> LayoutResult<Rgb> {
            Rgb::from_hex(value).map_err(|_| LayoutError::InvalidColor {
                field,
                value: value.to_string(),
            })
        }
        Ok(Self {
            background: parse("backgroundColor", &data.background_color)?,
            text: parse("textColor", &data.text_color)?,
            swatches: [
                parse("color1", &data.color1)?,
                parse("color2", &data.color2)?,
                parse("color3", &data.color3)?,
            ],
        })
    }

    /// Overlay tint legible on the background.
    pub fn contrast(&self) -> ContrastColor {
        self.background.contrast_color()
    }
}

/// Assets already embedded in the target backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneAssets {
    pub font: FontHandle,
    pub cover: Option<ImageHandle>,
    pub fade: Option<ImageHandle>,
    pub watermark: Option<ImageHandle>,
    pub scan_code: Option<ImageHandle>,
}

/// Summary of the tracklist flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracklistStats {
    pub placed: usize,
    pub columns: usize,
    pub dropped: usize,
}

/// A composed poster.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
    pub title_fit: TitleFit,
    /// Present when the tracklist is shown.
    pub tracklist: Option<TracklistStats>,
}

impl Scene {
    /// Operations that belong to `layer`, in draw order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.layer == layer)
    }
}

struct SceneBuilder {
    ops: Vec<DrawOp>,
    font: FontHandle,
    color: Rgb,
}

impl SceneBuilder {
    fn rect(&mut self, layer: Layer, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.ops.push(DrawOp::rect(
            layer,
            FilledRect {
                x,
                y,
                width,
                height,
                color,
                opacity: None,
            },
        ));
    }

    fn text(&mut self, layer: Layer, text: &str, x: f64, y: f64, size_px: f64, opacity: Option<f32>) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::text(
            layer,
            TextRun {
                text: text.to_string(),
                x,
                y,
                size_px,
                font: self.font,
                color: self.color,
                opacity,
            },
        ));
    }

    fn image(
        &mut self,
        layer: Layer,
        image: ImageHandle,
        (x, y, width, height): (f64, f64, f64, f64),
        opacity: Option<f32>,
    ) {
        self.ops.push(DrawOp::image(
            layer,
            ImageDraw {
                image,
                x,
                y,
                width,
                height,
                opacity,
            },
        ));
    }
}

/// Compose the draw list of a poster.
///
/// Pure apart from calls into `measure`. The title fit is returned on the
/// scene; `data` is never modified.
pub fn compose<M: TextMeasure + ?Sized>(
    data: &PosterData,
    template: &LayoutTemplate,
    assets: &SceneAssets,
    measure: &mut M,
) -> LayoutResult<Scene> {
    template.validate()?;
    let colors = PosterColors::from_data(data)?;

    let width = template.page_width;
    let height = template.page_height;
    let margin_side = data.margin_side as f64;
    let margin_top = data.margin_top as f64;
    let margin_cover = data.margin_cover as f64;
    let margin_background = data.margin_background as f64;

    let mut scene = SceneBuilder {
        ops: Vec::new(),
        font: assets.font,
        color: colors.text,
    };

    // Background and artwork
    scene.rect(Layer::Background, 0.0, 0.0, width, height, colors.background);
    if let Some(cover) = assets.cover {
        let side = width - 2.0 * margin_cover;
        scene.image(
            Layer::Cover,
            cover,
            (margin_cover, margin_cover, side, side),
            None,
        );
        if let (true, Some(fade)) = (data.use_fade, assets.fade) {
            scene.image(
                Layer::Fade,
                fade,
                (
                    0.0,
                    template.fade_top,
                    width,
                    template.fade_draw_height_for(data.margin_background),
                ),
                None,
            );
        }
    }
    let seam_top = template.seam_top - margin_background;
    scene.rect(
        Layer::SeamFill,
        0.0,
        seam_top,
        width,
        height - seam_top,
        colors.background,
    );

    // Title and artist
    let title_fit = fit_title(data, template, assets.font, measure);
    let title_top = if data.show_tracklist {
        template.title_top_with_tracklist
    } else {
        template.title_top_without_tracklist
    } + margin_top;
    scene.text(
        Layer::Title,
        &data.album_name,
        margin_side,
        title_top,
        title_fit.size_px as f64,
        None,
    );

    let artists_size = data.artists_size_px() as f64;
    let artist_top = if data.show_tracklist {
        template.title_top_with_tracklist + margin_top + artists_size * template.artist_offset_factor
    } else {
        template.artist_top_without_tracklist + margin_top + artists_size
    };
    scene.text(
        Layer::Artist,
        &data.artists_name,
        margin_side,
        artist_top,
        artists_size,
        None,
    );

    // Release and runtime rows share the second column offset
    let release_width =
        measure.text_width_px(assets.font, &data.title_release, template.release_row_size);
    let second_column = margin_side + release_width + template.release_column_gap;
    scene.text(
        Layer::ReleaseRow,
        &data.title_release,
        margin_side,
        template.release_row_top,
        template.release_row_size,
        None,
    );
    scene.text(
        Layer::ReleaseRow,
        &data.title_runtime,
        second_column,
        template.release_row_top,
        template.release_row_size,
        None,
    );
    let secondary_opacity = Some(template.secondary_row_opacity);
    scene.text(
        Layer::SecondaryRow,
        &data.release_date,
        margin_side,
        template.secondary_row_top,
        template.secondary_row_size,
        secondary_opacity,
    );
    scene.text(
        Layer::SecondaryRow,
        &data.runtime,
        second_column,
        template.secondary_row_top,
        template.secondary_row_size,
        secondary_opacity,
    );

    for (left, color) in template.swatch_lefts.iter().zip(colors.swatches) {
        scene.rect(
            Layer::Swatch,
            left - margin_side,
            template.swatch_top,
            template.swatch_width,
            template.swatch_height,
            color,
        );
    }

    let tracklist = if data.show_tracklist {
        let zone = TracklistZone::for_poster(data, template);
        let style = TracklistStyle::for_poster(data, template, assets.font, colors.text);
        let layout = flow_tracklist(&data.tracks(), &zone, &style, measure);
        let stats = TracklistStats {
            placed: layout.runs.len(),
            columns: layout.columns,
            dropped: layout.dropped,
        };
        scene
            .ops
            .extend(layout.runs.into_iter().map(|run| DrawOp::text(Layer::Track, run)));
        Some(stats)
    } else {
        None
    };

    if let (true, Some(watermark)) = (data.use_watermark, assets.watermark) {
        let (x, y) = template.watermark_origin();
        scene.image(
            Layer::Watermark,
            watermark,
            (x, y, template.watermark_width, template.watermark_height),
            Some(template.watermark_opacity),
        );
    }

    if let Some(scan_code) = assets.scan_code {
        let slot = template.scan_code;
        scene.image(
            Layer::ScanCode,
            scan_code,
            (slot.x - margin_side, slot.y, slot.width, slot.height),
            None,
        );
    }

    log::debug!(
        "composed {} draw operations (title {}px, tracklist {:?})",
        scene.ops.len(),
        title_fit.size_px,
        tracklist
    );
    Ok(Scene {
        ops: scene.ops,
        title_fit,
        tracklist,
    })
}
