//! Pixel/point conversion at the fixed 300 dpi reference grid.

/// Units per inch of the canonical poster grid.
pub const REFERENCE_DPI: f64 = 300.0;

/// PDF points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert canonical pixels to points.
pub fn to_points(px: f64) -> f64 {
    px * POINTS_PER_INCH / REFERENCE_DPI
}

/// Convert points to canonical pixels.
pub fn to_pixels(pt: f64) -> f64 {
    pt * REFERENCE_DPI / POINTS_PER_INCH
}
