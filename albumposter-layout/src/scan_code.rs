//! Scan-code URL construction and recoloring.

use crate::color::{ContrastColor, Rgb};
use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

/// Scan-code service endpoint. Placeholders: `{background}`, `{contrast}`,
/// `{size}`, `{album_id}`.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://scannables.scdn.co/uri/plain/svg/{background}/{contrast}/{size}/spotify:album:{album_id}";

/// Pixel size requested from the scan-code service.
pub const DEFAULT_REQUEST_SIZE: u32 = 640;

lazy_static! {
    static ref BLACK_FILL: Regex = Regex::new(r##"(?i)fill="#000000""##).expect("valid regex");
    static ref WHITE_FILL: Regex = Regex::new(r##"(?i)fill="#ffffff""##).expect("valid regex");
}

/// Expand the URL template for an album.
pub fn scan_code_url(
    template: &str,
    background: Rgb,
    contrast: ContrastColor,
    size: u32,
    album_id: &str,
) -> String {
    let background = background.to_hex();
    template
        .replace("{background}", background.trim_start_matches('#'))
        .replace("{contrast}", contrast.as_str())
        .replace("{size}", &size.to_string())
        .replace("{album_id}", album_id.trim())
}

/// Tint the bars of a scan-code SVG with `text_color` and make its
/// background transparent.
///
/// The service draws the bars in the contrast color, so every fill in that
/// color is replaced. The first mention of the background color is the
/// backdrop rectangle.
pub fn recolor_scan_code(
    svg: &str,
    contrast: ContrastColor,
    text_color: Rgb,
    background: Rgb,
) -> String {
    let fill = format!(r#"fill="{}""#, text_color.to_hex());
    let bars = match contrast {
        ContrastColor::Black => &*BLACK_FILL,
        ContrastColor::White => &*WHITE_FILL,
    };
    let tinted = bars.replace_all(svg, NoExpand(&fill));

    let backdrop = match Regex::new(&format!("(?i){}", regex::escape(&background.to_hex()))) {
        Ok(re) => re,
        Err(_) => return tinted.into_owned(),
    };
    backdrop
        .replacen(&tinted, 1, NoExpand("transparent"))
        .into_owned()
}
