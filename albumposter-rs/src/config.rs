use crate::error::{PosterError, PosterResult};
use albumposter_canvas::FontConfig;
use albumposter_layout::gradient::DEFAULT_SUPERSAMPLE;
use albumposter_layout::scan_code::{DEFAULT_REQUEST_SIZE, DEFAULT_URL_TEMPLATE};
use albumposter_layout::LayoutTemplate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Png => "image/png",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "png" => Ok(OutputFormat::Png),
            other => Err(PosterError::InvalidConfig(format!(
                "unsupported output format `{other}`"
            ))),
        }
    }
}

/// Where and how the scan code is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanCodeConfig {
    pub enabled: bool,
    /// URL template with `{background}`, `{contrast}`, `{size}` and `{album_id}`
    /// placeholders.
    pub url_template: String,
    pub size: u32,
}

impl Default for ScanCodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            size: DEFAULT_REQUEST_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub format: OutputFormat,
    /// Raster page scale; 1.0 renders the canonical 2480×3508 page.
    pub scale: f32,
    /// Supersampling of the fade raster, between 2 and 3.
    pub supersample: f64,
    pub scan_code: ScanCodeConfig,
    pub fonts: FontConfig,
    pub template: LayoutTemplate,
    /// Whether remote (`http(s)://`) assets may be fetched.
    pub allow_remote: bool,
    /// Directory that relative asset paths resolve against.
    pub base_dir: Option<PathBuf>,
    /// Reject the result of a run that finished after a newer run started.
    pub discard_superseded: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            scale: 1.0,
            supersample: DEFAULT_SUPERSAMPLE,
            scan_code: ScanCodeConfig::default(),
            fonts: FontConfig::default(),
            template: LayoutTemplate::default(),
            allow_remote: true,
            base_dir: None,
            discard_superseded: true,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> PosterResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PosterError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(2.0..=3.0).contains(&self.supersample) {
            return Err(PosterError::InvalidConfig(format!(
                "supersample must be between 2 and 3, got {}",
                self.supersample
            )));
        }
        self.template.validate()?;
        Ok(())
    }
}
