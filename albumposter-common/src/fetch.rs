//! Retrieval of cover art, scan codes and font files.

use crate::error::{CommonError, CommonResult};
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use lazy_static::lazy_static;
use log::{error, info};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

static ALBUMPOSTER_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref REQWEST_CLIENT: Client = reqwest::ClientBuilder::new()
        .user_agent(ALBUMPOSTER_USER_AGENT)
        .build()
        .expect("Failed to construct reqwest client");
}

/// Source of the binary assets a poster refers to by location string.
pub trait AssetSource: Send + Sync {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, CommonResult<Vec<u8>>>;

    /// Fetch an asset and decode it as UTF-8 text.
    fn fetch_text<'a>(&'a self, location: &'a str) -> BoxFuture<'a, CommonResult<String>> {
        async move {
            let bytes = self.fetch(location).await?;
            String::from_utf8(bytes).map_err(|_| CommonError::Utf8(location.to_string()))
        }
        .boxed()
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches `http(s)://` URLs with reqwest and everything else from the local
/// filesystem. `file://` prefixes are accepted and relative paths resolve
/// against `base_dir` when set.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    pub allow_remote: bool,
    pub base_dir: Option<PathBuf>,
}

impl Default for HttpAssetSource {
    fn default() -> Self {
        Self {
            allow_remote: true,
            base_dir: None,
        }
    }
}

impl HttpAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that only reads local files.
    pub fn offline() -> Self {
        Self {
            allow_remote: false,
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    fn resolve_path(&self, location: &str) -> PathBuf {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        match &self.base_dir {
            Some(base_dir) if path.is_relative() => base_dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, CommonResult<Vec<u8>>> {
        async move {
            if is_remote(location) {
                if !self.allow_remote {
                    return Err(CommonError::RemoteDisabled(location.to_string()));
                }
                fetch_http(location).await
            } else {
                read_file(self.resolve_path(location)).await
            }
        }
        .boxed()
    }
}

async fn fetch_http(url: &str) -> CommonResult<Vec<u8>> {
    info!("Fetching {url}");
    let http_error = |source| CommonError::Http {
        url: url.to_string(),
        source,
    };
    let response = REQWEST_CLIENT.get(url).send().await.map_err(http_error)?;
    match response.status() {
        StatusCode::OK => {
            let bytes = response.bytes().await.map_err(http_error)?;
            Ok(bytes.to_vec())
        }
        status => {
            error!("Failed to load {} with status code {:?}", url, status);
            Err(CommonError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

async fn read_file(path: PathBuf) -> CommonResult<Vec<u8>> {
    info!("Reading {}", path.display());
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(source) => Err(CommonError::Io { path, source }),
    }
}

/// Assets held in memory, keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(location.into(), bytes.into());
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, CommonResult<Vec<u8>>> {
        let result = self
            .assets
            .get(location)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(location.to_string()));
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://i.scdn.co/image/abc", true)]
    #[case("http://example.com/font.ttf", true)]
    #[case("file:///tmp/cover.png", false)]
    #[case("covers/cover.png", false)]
    #[case("httpfoo.png", false)]
    fn test_is_remote(#[case] location: &str, #[case] expected: bool) {
        assert_eq!(is_remote(location), expected);
    }

    #[test]
    fn test_resolve_path() {
        let source = HttpAssetSource::new().with_base_dir("/data");
        assert_eq!(source.resolve_path("cover.png"), PathBuf::from("/data/cover.png"));
        assert_eq!(
            source.resolve_path("file:///tmp/cover.png"),
            PathBuf::from("/tmp/cover.png")
        );
        assert_eq!(
            HttpAssetSource::new().resolve_path("cover.png"),
            PathBuf::from("cover.png")
        );
    }

    #[tokio::test]
    async fn test_offline_refuses_remote() {
        let err = HttpAssetSource::offline()
            .fetch("https://example.com/cover.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, CommonError::RemoteDisabled(_)));
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemoryAssetSource::new().with("scan", b"<svg/>".to_vec());
        assert_eq!(source.fetch_text("scan").await.unwrap(), "<svg/>");
        assert!(matches!(
            source.fetch("missing").await,
            Err(CommonError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_binary() {
        let source = MemoryAssetSource::new().with("bin", vec![0xff, 0xfe, 0x00]);
        assert!(matches!(
            source.fetch_text("bin").await,
            Err(CommonError::Utf8(_))
        ));
    }
}
