//! Poster description supplied by the caller.
//!
//! The JSON shape is the camelCase form produced by the poster editor. Numeric
//! inputs arrive from form fields, so margins and size overrides accept numbers,
//! numeric strings (`"120"`, `"120px"`) or nothing at all.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default album title size in canonical pixels.
pub const DEFAULT_TITLE_SIZE: u32 = 230;
/// Default artist line size in canonical pixels.
pub const DEFAULT_ARTISTS_SIZE: u32 = 110;
/// Default track line size in canonical pixels.
pub const DEFAULT_TRACKS_SIZE: u32 = 50;

/// Structured description of one album poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosterData {
    #[serde(deserialize_with = "null_as_empty")]
    pub album_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub artists_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title_release: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title_runtime: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub runtime: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(rename = "albumID", deserialize_with = "null_as_empty")]
    pub album_id: String,
    /// Newline-delimited track titles.
    #[serde(deserialize_with = "null_as_empty")]
    pub tracklist: String,

    #[serde(deserialize_with = "lenient_margin")]
    pub margin_side: u32,
    #[serde(deserialize_with = "lenient_margin")]
    pub margin_top: u32,
    #[serde(deserialize_with = "lenient_margin")]
    pub margin_cover: u32,
    #[serde(deserialize_with = "lenient_margin")]
    pub margin_background: u32,

    pub background_color: String,
    pub text_color: String,
    pub color1: String,
    pub color2: String,
    pub color3: String,
    /// Font URL, local font file, or system family name.
    pub custom_font: Option<String>,

    pub use_fade: bool,
    pub use_watermark: bool,
    pub show_tracklist: bool,
    pub use_uncompressed: bool,

    #[serde(deserialize_with = "lenient_size")]
    pub title_size: Option<u32>,
    #[serde(deserialize_with = "lenient_size")]
    pub artists_size: Option<u32>,
    #[serde(deserialize_with = "lenient_size")]
    pub tracks_size: Option<u32>,
    pub user_adjusted_title_size: bool,
    pub initial_title_size_set: bool,

    pub album_cover: Option<String>,
    pub uncompressed_album_cover: Option<String>,
}

impl Default for PosterData {
    fn default() -> Self {
        Self {
            album_name: String::new(),
            artists_name: String::new(),
            title_release: String::new(),
            title_runtime: String::new(),
            runtime: String::new(),
            release_date: String::new(),
            album_id: String::new(),
            tracklist: String::new(),
            margin_side: 0,
            margin_top: 0,
            margin_cover: 0,
            margin_background: 0,
            background_color: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            color1: "#000000".to_string(),
            color2: "#000000".to_string(),
            color3: "#000000".to_string(),
            custom_font: None,
            use_fade: false,
            use_watermark: false,
            show_tracklist: false,
            use_uncompressed: false,
            title_size: None,
            artists_size: None,
            tracks_size: None,
            user_adjusted_title_size: false,
            initial_title_size_set: false,
            album_cover: None,
            uncompressed_album_cover: None,
        }
    }
}

impl PosterData {
    /// Cover URL selected by `use_uncompressed`, if non-empty.
    pub fn cover_url(&self) -> Option<&str> {
        let url = if self.use_uncompressed {
            self.uncompressed_album_cover.as_deref()
        } else {
            self.album_cover.as_deref()
        };
        url.map(str::trim).filter(|u| !u.is_empty())
    }

    /// Track titles in order. An empty tracklist yields no tracks.
    pub fn tracks(&self) -> Vec<&str> {
        if self.tracklist.is_empty() {
            return Vec::new();
        }
        self.tracklist
            .split('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .collect()
    }

    /// Whether the title size still needs the one-time auto-fit.
    pub fn needs_title_fit(&self) -> bool {
        !self.user_adjusted_title_size && !self.initial_title_size_set
    }

    pub fn title_size_px(&self) -> u32 {
        self.title_size.unwrap_or(DEFAULT_TITLE_SIZE)
    }

    pub fn artists_size_px(&self) -> u32 {
        self.artists_size.unwrap_or(DEFAULT_ARTISTS_SIZE)
    }

    pub fn tracks_size_px(&self) -> u32 {
        self.tracks_size.unwrap_or(DEFAULT_TRACKS_SIZE)
    }

    /// Custom font reference, if one was given.
    pub fn custom_font(&self) -> Option<&str> {
        self.custom_font
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// Parse the leading integer of a string the way form inputs are read:
/// optional whitespace and sign, then digits. Anything else yields `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| v * sign)
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

fn lenient_margin<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_int(&value).map(clamp_u32).unwrap_or(0))
}

fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_int(&value).map(clamp_u32).filter(|v| *v > 0))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
