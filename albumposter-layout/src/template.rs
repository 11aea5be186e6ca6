//! Named layout constants of the poster template.
//!
//! Every coordinate is expressed in the canonical 300 dpi pixel grid with the
//! origin at the top-left corner of the page. Margins from [`PosterData`] are
//! applied on top of these values by the composer.
//!
//! [`PosterData`]: crate::PosterData

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};

/// Position and size of a fixed element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTemplate {
    /// Page width (A4 at 300 dpi).
    pub page_width: f64,
    /// Page height (A4 at 300 dpi).
    pub page_height: f64,

    /// Top of the seam fill band, before `marginBackground` pulls it upwards.
    pub seam_top: f64,

    /// Gradient raster height before subtracting `marginBackground`.
    pub fade_raster_height: f64,
    /// Top edge of the composited fade.
    pub fade_top: f64,
    /// Composited fade height before subtracting `marginBackground`.
    pub fade_draw_height: f64,
    /// Normalized offset where the fade starts (fully transparent).
    pub fade_start: f64,
    /// Normalized offset where the fade reaches the solid background.
    pub fade_end: f64,

    /// Title top when the tracklist is shown.
    pub title_top_with_tracklist: f64,
    /// Title top when the tracklist is hidden.
    pub title_top_without_tracklist: f64,
    /// Artist line top when the tracklist is hidden (artist size is added).
    pub artist_top_without_tracklist: f64,
    /// Artist offset below the title, as a multiple of the artist size.
    pub artist_offset_factor: f64,
    /// Smallest title size the auto-fit may reach.
    pub title_fit_floor: u32,

    pub release_row_top: f64,
    pub release_row_size: f64,
    pub secondary_row_top: f64,
    pub secondary_row_size: f64,
    pub secondary_row_opacity: f32,
    /// Gap between the release title and the runtime column.
    pub release_column_gap: f64,

    /// Left edge of each swatch before subtracting `marginSide`.
    pub swatch_lefts: [f64; 3],
    pub swatch_top: f64,
    pub swatch_width: f64,
    pub swatch_height: f64,

    /// Gap between the artist line and the tracklist zone.
    pub tracklist_gap: f64,
    pub tracklist_zone_height: f64,
    /// Artist size factor used for the zone when no artist size is set.
    pub tracklist_default_artist_factor: f64,
    pub tracklist_line_height_factor: f64,
    /// Column gap as a multiple of the line height.
    pub tracklist_column_gap_factor: f64,
    /// Inset of the first column from `marginSide`.
    pub tracklist_first_column_inset: f64,
    /// Clearance kept above the bottom of the zone.
    pub tracklist_bottom_clearance: f64,

    pub watermark_width: f64,
    pub watermark_height: f64,
    pub watermark_right_inset: f64,
    pub watermark_bottom_inset: f64,
    pub watermark_opacity: f32,

    /// Scan-code slot before subtracting `marginSide` from `x`.
    pub scan_code: Slot,
}

impl Default for LayoutTemplate {
    fn default() -> Self {
        Self {
            page_width: 2480.0,
            page_height: 3508.0,
            seam_top: 2480.0,
            fade_raster_height: 3000.0,
            fade_top: 500.0,
            fade_draw_height: 2500.0,
            fade_start: 0.5,
            fade_end: 0.8,
            title_top_with_tracklist: 2500.0,
            title_top_without_tracklist: 2790.0,
            artist_top_without_tracklist: 2820.0,
            artist_offset_factor: 1.3,
            title_fit_floor: 10,
            release_row_top: 3310.0,
            release_row_size: 70.0,
            secondary_row_top: 3390.0,
            secondary_row_size: 60.0,
            secondary_row_opacity: 0.7,
            release_column_gap: 100.0,
            swatch_lefts: [2045.0, 2190.0, 2335.0],
            swatch_top: 3368.0,
            swatch_width: 145.0,
            swatch_height: 30.0,
            tracklist_gap: 130.0,
            tracklist_zone_height: 500.0,
            tracklist_default_artist_factor: 1.2,
            tracklist_line_height_factor: 1.3,
            tracklist_column_gap_factor: 2.5,
            tracklist_first_column_inset: 10.0,
            tracklist_bottom_clearance: 10.0,
            watermark_width: 500.0,
            watermark_height: 134.0,
            watermark_right_inset: 70.0,
            watermark_bottom_inset: 50.0,
            watermark_opacity: 0.5,
            scan_code: Slot {
                x: 2020.0,
                y: 3235.0,
                width: 480.0,
                height: 120.0,
            },
        }
    }
}

impl LayoutTemplate {
    /// Check that the template describes a drawable page.
    pub fn validate(&self) -> LayoutResult<()> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("fade_raster_height", self.fade_raster_height),
            ("fade_draw_height", self.fade_draw_height),
            ("release_row_size", self.release_row_size),
            ("secondary_row_size", self.secondary_row_size),
            ("swatch_width", self.swatch_width),
            ("swatch_height", self.swatch_height),
            ("tracklist_zone_height", self.tracklist_zone_height),
            ("tracklist_line_height_factor", self.tracklist_line_height_factor),
            ("watermark_width", self.watermark_width),
            ("watermark_height", self.watermark_height),
            ("scan_code.width", self.scan_code.width),
            ("scan_code.height", self.scan_code.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidTemplate(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.seam_top > self.page_height {
            return Err(LayoutError::InvalidTemplate(format!(
                "seam_top {} lies below the page",
                self.seam_top
            )));
        }
        if !(0.0..=1.0).contains(&self.fade_start)
            || !(0.0..=1.0).contains(&self.fade_end)
            || self.fade_start >= self.fade_end
        {
            return Err(LayoutError::InvalidTemplate(format!(
                "fade stops must satisfy 0 <= start < end <= 1, got {} and {}",
                self.fade_start, self.fade_end
            )));
        }
        for (name, opacity) in [
            ("secondary_row_opacity", self.secondary_row_opacity),
            ("watermark_opacity", self.watermark_opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(LayoutError::InvalidTemplate(format!(
                    "{name} must lie in [0, 1], got {opacity}"
                )));
            }
        }
        if self.title_fit_floor == 0 {
            return Err(LayoutError::InvalidTemplate(
                "title_fit_floor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Height of the gradient raster for a given background margin.
    pub fn fade_raster_height_for(&self, margin_background: u32) -> f64 {
        (self.fade_raster_height - margin_background as f64).max(1.0)
    }

    /// Composited fade height for a given background margin.
    pub fn fade_draw_height_for(&self, margin_background: u32) -> f64 {
        (self.fade_draw_height - margin_background as f64).max(1.0)
    }

    /// Top-left corner of the watermark.
    pub fn watermark_origin(&self) -> (f64, f64) {
        (
            self.page_width - self.watermark_right_inset - self.watermark_width,
            self.page_height - self.watermark_bottom_inset - self.watermark_height,
        )
    }
}
