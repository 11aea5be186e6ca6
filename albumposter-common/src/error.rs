use std::path::PathBuf;

pub type CommonResult<T> = Result<T, CommonError>;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("Request to `{url}` failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to `{url}` returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote access is disabled, refusing to fetch `{0}`")]
    RemoteDisabled(String),

    #[error("Asset not found: `{0}`")]
    NotFound(String),

    #[error("Asset `{0}` is not valid UTF-8")]
    Utf8(String),
}
