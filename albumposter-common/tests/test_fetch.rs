use albumposter_common::{AssetSource, CommonError, HttpAssetSource};
use std::io::Write;

#[tokio::test]
async fn test_reads_local_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"cover bytes").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let source = HttpAssetSource::offline();
    assert_eq!(source.fetch(&path).await.unwrap(), b"cover bytes");

    let url = format!("file://{path}");
    assert_eq!(source.fetch(&url).await.unwrap(), b"cover bytes");
}

#[tokio::test]
async fn test_reads_relative_to_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scan.svg"), "<svg/>").unwrap();

    let source = HttpAssetSource::offline().with_base_dir(dir.path());
    assert_eq!(source.fetch_text("scan.svg").await.unwrap(), "<svg/>");
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = HttpAssetSource::offline().with_base_dir(dir.path());
    let err = source.fetch("nope.png").await.unwrap_err();
    match err {
        CommonError::Io { path, .. } => assert_eq!(path, dir.path().join("nope.png")),
        other => panic!("unexpected error {other:?}"),
    }
}
