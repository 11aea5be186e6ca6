use albumposter_canvas::CanvasError;
use albumposter_layout::{LayoutError, RenderError};

pub type PosterResult<T> = Result<T, PosterError>;

#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A newer run started before this one finished.
    #[error("Run {run} was superseded by run {latest}")]
    Superseded { run: u64, latest: u64 },
}
