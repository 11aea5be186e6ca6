use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FONT_FILE: Regex = Regex::new(r"(?i)\.(ttf|otf|woff2?)$").expect("valid regex");
}

/// Where a custom poster font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A font file to fetch, either a URL or a path.
    Location(String),
    /// The family name of an installed font.
    Family(String),
}

impl FontSource {
    /// Classify a `customFont` value. Values starting with `http` or ending in
    /// a font file extension are fetched; anything else names a family.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.starts_with("http") || FONT_FILE.is_match(value) {
            Some(FontSource::Location(value.to_string()))
        } else {
            Some(FontSource::Family(value.to_string()))
        }
    }
}
