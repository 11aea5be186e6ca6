//! Hex color decomposition and luminance-based contrast selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Luminance above which dark overlay content is more legible.
const CONTRAST_THRESHOLD: f64 = 0.179;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Overlay tint chosen for legibility against a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastColor {
    Black,
    White,
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a hex color: {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, or the CSS `#rgb` shorthand.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ParseColorError(hex.to_string())),
        };
        let value =
            u32::from_str_radix(&expanded, 16).map_err(|_| ParseColorError(hex.to_string()))?;
        Ok(Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        })
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels normalized to `0.0..=1.0`.
    pub fn to_unit(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = channel as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// The overlay tint that stays legible on top of this color.
    pub fn contrast_color(&self) -> ContrastColor {
        if self.relative_luminance() > CONTRAST_THRESHOLD {
            ContrastColor::Black
        } else {
            ContrastColor::White
        }
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ContrastColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContrastColor::Black => "black",
            ContrastColor::White => "white",
        }
    }

    /// The fill value the scan-code service uses for this tint.
    pub fn fill_hex(&self) -> &'static str {
        match self {
            ContrastColor::Black => "#000000",
            ContrastColor::White => "#ffffff",
        }
    }
}

impl fmt::Display for ContrastColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
