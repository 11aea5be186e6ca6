//! Generate printable album posters.
//!
//! [`PosterGenerator`] fetches the cover art, custom font and scan code a
//! [`PosterData`] refers to, composes the poster layout and renders it with
//! either the vector PDF backend or the raster PNG backend.
//!
//! ```no_run
//! use albumposter_rs::{GeneratorConfig, PosterData, PosterGenerator};
//!
//! # async fn run() -> Result<(), albumposter_rs::PosterError> {
//! let generator = PosterGenerator::new(GeneratorConfig::default())?;
//! let data: PosterData = PosterData {
//!     album_name: "Kid A".into(),
//!     artists_name: "Radiohead".into(),
//!     ..PosterData::default()
//! };
//! let output = generator.generate(&data).await?;
//! std::fs::write("poster.pdf", &output.bytes).ok();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod run_token;

pub use config::{GeneratorConfig, OutputFormat, ScanCodeConfig};
pub use error::{PosterError, PosterResult};
pub use generator::{PosterGenerator, PosterOutput};
pub use run_token::{RunCounter, RunToken};

pub use albumposter_canvas::FontConfig;
pub use albumposter_common::{AssetSource, HttpAssetSource, MemoryAssetSource};
pub use albumposter_layout::{Layer, LayoutTemplate, PosterData, Scene, TitleFit};

pub use albumposter_canvas;
pub use albumposter_common;
pub use albumposter_layout;
pub use albumposter_pdf;
