//! Logo watermark tinted with the poster text color.

use crate::bitmap::{rasterize_svg, Bitmap};
use crate::color::Rgb;
use crate::error::LayoutResult;

/// Supersampling factor of the watermark raster.
pub const WATERMARK_SUPERSAMPLE: f64 = 3.0;

/// The logo as an SVG document of `width × height` units.
///
/// The mark is a disc with three sound-wave arcs cut out of it, followed by a
/// bar wordmark, drawn on a 500×134 grid and stretched to the requested box.
pub fn logo_svg(color: Rgb, width: f64, height: f64) -> String {
    let fill = color.to_hex();
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 500 134" preserveAspectRatio="none">
<defs>
<mask id="waves" maskUnits="userSpaceOnUse" x="0" y="0" width="500" height="134">
<rect width="500" height="134" fill="white"/>
<g fill="none" stroke="black" stroke-width="9" stroke-linecap="round">
<path d="M35 50 Q67 38 100 52"/>
<path d="M39 70 Q67 60 95 71"/>
<path d="M43 88 Q67 80 90 89"/>
</g>
</mask>
</defs>
<g fill="{fill}" mask="url(#waves)">
<circle cx="67" cy="67" r="60"/>
<rect x="150" y="28" width="330" height="30" rx="15"/>
<rect x="150" y="76" width="220" height="30" rx="15"/>
</g>
</svg>"#
    )
}

/// Rasterize the logo for a `width × height` slot.
pub fn rasterize_watermark(color: Rgb, width: f64, height: f64) -> LayoutResult<Bitmap> {
    rasterize_svg(
        &logo_svg(color, width, height),
        width,
        height,
        WATERMARK_SUPERSAMPLE,
    )
}
