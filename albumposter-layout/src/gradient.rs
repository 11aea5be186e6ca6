//! Transparency ramp that fades the cover art into the background.

use crate::bitmap::{rasterize_svg, Bitmap};
use crate::color::Rgb;
use crate::error::{LayoutError, LayoutResult};
use crate::model::PosterData;
use crate::template::LayoutTemplate;

/// Default supersampling factor for the fade raster.
pub const DEFAULT_SUPERSAMPLE: f64 = 2.0;

/// A color stop of the fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    pub color: Rgb,
    pub alpha: f64,
}

/// Vertical linear gradient from transparent to the background color.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMask {
    pub width: f64,
    pub height: f64,
    pub stops: Vec<FadeStop>,
}

impl GradientMask {
    /// Build the fade for a poster. Returns `None` when fading is disabled.
    pub fn for_poster(
        data: &PosterData,
        background: Rgb,
        template: &LayoutTemplate,
    ) -> Option<Self> {
        if !data.use_fade {
            return None;
        }
        let cover_width = template.page_width - 2.0 * data.margin_cover as f64;
        Some(Self::new(
            cover_width.max(1.0),
            template.fade_raster_height_for(data.margin_background),
            background,
            template.fade_start,
            template.fade_end,
        ))
    }

    pub fn new(width: f64, height: f64, background: Rgb, start: f64, end: f64) -> Self {
        Self {
            width,
            height,
            stops: vec![
                FadeStop {
                    offset: start,
                    color: background,
                    alpha: 0.0,
                },
                FadeStop {
                    offset: end,
                    color: background,
                    alpha: 1.0,
                },
            ],
        }
    }

    /// SVG document describing the gradient.
    pub fn to_svg(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|stop| {
                format!(
                    r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                    stop.offset,
                    stop.color.to_hex(),
                    stop.alpha
                )
            })
            .collect();
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
<defs>
<linearGradient id="g" x1="0" x2="0" y1="0" y2="1">
{stops}
</linearGradient>
</defs>
<rect width="100%" height="100%" fill="url(#g)"/>
</svg>"#,
            width = self.width,
            height = self.height,
            stops = stops.join("\n"),
        )
    }

    /// Rasterize at `supersample` times the logical size.
    pub fn rasterize(&self, supersample: f64) -> LayoutResult<Bitmap> {
        if !(2.0..=3.0).contains(&supersample) {
            return Err(LayoutError::Rasterize(format!(
                "fade supersampling must lie in [2, 3], got {supersample}"
            )));
        }
        rasterize_svg(&self.to_svg(), self.width, self.height, supersample)
    }
}
