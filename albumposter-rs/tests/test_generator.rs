use albumposter_rs::albumposter_common::CommonResult;
use albumposter_rs::albumposter_layout::{FontHandle, LayoutError};
use albumposter_rs::{
    AssetSource, FontConfig, GeneratorConfig, Layer, MemoryAssetSource, OutputFormat,
    PosterData, PosterError, PosterGenerator, ScanCodeConfig,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use tiny_skia::{Color, Pixmap};
use tokio::sync::Notify;

const SCAN_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="16">
<rect width="64" height="16" fill="#1a1a1a"/>
<rect x="4" y="2" width="4" height="12" fill="#ffffff"/>
</svg>"##;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        fonts: FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        },
        scan_code: ScanCodeConfig {
            url_template: "scan/{album_id}/{contrast}.svg".into(),
            ..ScanCodeConfig::default()
        },
        ..GeneratorConfig::default()
    }
}

fn cover_png() -> Vec<u8> {
    let mut pixmap = Pixmap::new(16, 16).unwrap();
    pixmap.fill(Color::from_rgba8(200, 40, 40, 255));
    pixmap.encode_png().unwrap()
}

fn source() -> MemoryAssetSource {
    MemoryAssetSource::new()
        .with("cover.png", cover_png())
        .with("scan/abc/white.svg", SCAN_SVG)
}

fn poster() -> PosterData {
    PosterData {
        album_name: "Amnesiac".into(),
        artists_name: "Radiohead".into(),
        background_color: "#1a1a1a".into(),
        text_color: "#f5f5f5".into(),
        album_cover: Some("cover.png".into()),
        album_id: "abc".into(),
        tracklist: "Packt Like Sardines in a Crushd Tin Box\nPyramid Song".into(),
        use_watermark: true,
        show_tracklist: true,
        ..PosterData::default()
    }
}

fn generator_with(source: MemoryAssetSource) -> PosterGenerator {
    PosterGenerator::with_assets(config(), Arc::new(source)).unwrap()
}

#[tokio::test]
async fn test_pdf_with_all_assets() {
    let generator = generator_with(source());
    let mut data = poster();
    data.use_fade = true;
    let output = generator.generate(&data).await.unwrap();

    assert_eq!(output.format, OutputFormat::Pdf);
    assert!(output.bytes.starts_with(b"%PDF-"));
    for layer in [Layer::Cover, Layer::Fade, Layer::Watermark, Layer::ScanCode] {
        assert_eq!(output.scene.layer(layer).count(), 1, "{layer:?}");
    }
    assert_eq!(output.scene.layer(Layer::Track).count(), 2);
}

#[tokio::test]
async fn test_missing_cover_skips_cover_and_fade() {
    let generator = generator_with(source());
    let mut data = poster();
    data.use_fade = true;
    data.album_cover = Some("missing.png".into());
    let output = generator.generate(&data).await.unwrap();

    assert_eq!(output.scene.layer(Layer::Cover).count(), 0);
    assert_eq!(output.scene.layer(Layer::Fade).count(), 0);
    assert_eq!(output.scene.layer(Layer::Watermark).count(), 1);
}

#[tokio::test]
async fn test_undecodable_cover_is_skipped() {
    let generator = generator_with(source().with("cover.png", b"not an image".to_vec()));
    let output = generator.generate(&poster()).await.unwrap();
    assert_eq!(output.scene.layer(Layer::Cover).count(), 0);
}

#[tokio::test]
async fn test_bad_font_falls_back_to_default() {
    let generator = generator_with(source().with("fonts/broken.ttf", b"nope".to_vec()));
    for font in ["fonts/broken.ttf", "fonts/missing.otf", "No Such Family"] {
        let mut data = poster();
        data.custom_font = Some(font.into());
        let output = generator.generate(&data).await.unwrap();
        assert!(output
            .scene
            .ops
            .iter()
            .filter_map(|op| op.as_text())
            .all(|run| run.font == FontHandle::DEFAULT));
    }
}

#[tokio::test]
async fn test_scan_code_failures_are_omitted() {
    let generator = generator_with(source().with("scan/bad/white.svg", "<not svg"));
    for album_id in ["unknown", "bad", ""] {
        let mut data = poster();
        data.album_id = album_id.into();
        let output = generator.generate(&data).await.unwrap();
        assert_eq!(output.scene.layer(Layer::ScanCode).count(), 0, "{album_id}");
    }
}

#[tokio::test]
async fn test_scan_code_can_be_disabled() {
    let mut config = config();
    config.scan_code.enabled = false;
    let generator = PosterGenerator::with_assets(config, Arc::new(source())).unwrap();
    let output = generator.generate(&poster()).await.unwrap();
    assert_eq!(output.scene.layer(Layer::ScanCode).count(), 0);
}

#[tokio::test]
async fn test_title_callback_fires_once() {
    let generator = generator_with(source());
    let mut data = poster();
    data.margin_side = 100;
    data.album_name = "The King of Limbs Deluxe Anniversary Remaster Edition".into();

    let calls = Mutex::new(Vec::new());
    let output = generator
        .generate_with_callback(&data, |size, fitted| {
            calls.lock().unwrap().push((size, fitted))
        })
        .await
        .unwrap();

    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), 1);
    let (size, fitted) = calls[0];
    assert!(fitted);
    assert!(size < 230);
    assert_eq!(size, output.scene.title_fit.size_px);

    // Once written back, the size is kept and no callback fires
    output.write_back(&mut data);
    assert_eq!(data.title_size, Some(size));
    assert!(data.initial_title_size_set);

    let second = generator
        .generate_with_callback(&data, |_, _| panic!("title was already fitted"))
        .await
        .unwrap();
    assert_eq!(second.scene.title_fit.size_px, size);
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let generator = generator_with(source());
    let mut data = poster();
    data.text_color = "not a color".into();
    let err = generator.generate(&data).await.unwrap_err();
    assert!(matches!(
        err,
        PosterError::Layout(LayoutError::InvalidColor {
            field: "textColor",
            ..
        })
    ));
}

#[tokio::test]
async fn test_png_output() {
    let mut config = config();
    config.format = OutputFormat::Png;
    config.scale = 0.05;
    let generator = PosterGenerator::with_assets(config, Arc::new(source())).unwrap();
    let output = generator.generate(&poster()).await.unwrap();

    let decoded = image::load_from_memory(&output.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (124, 175));
}

/// Holds back one location until released.
struct GatedSource {
    inner: MemoryAssetSource,
    gate: Arc<Notify>,
    gated: &'static str,
}

impl AssetSource for GatedSource {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, CommonResult<Vec<u8>>> {
        async move {
            if location == self.gated {
                self.gate.notified().await;
            }
            self.inner.fetch(location).await
        }
        .boxed()
    }
}

/// Generator whose cover fetch waits on `gate`.
fn gated_generator(gate: Arc<Notify>, discard_superseded: bool) -> PosterGenerator {
    let source = GatedSource {
        inner: source(),
        gate,
        gated: "cover.png",
    };
    let config = GeneratorConfig {
        discard_superseded,
        ..config()
    };
    PosterGenerator::with_assets(config, Arc::new(source)).unwrap()
}

async fn race(discard_superseded: bool) -> (Result<(), PosterError>, Result<(), PosterError>) {
    let gate = Arc::new(Notify::new());
    let generator = gated_generator(gate.clone(), discard_superseded);

    let slow_data = poster();
    let mut fast_data = poster();
    fast_data.album_cover = None;

    let slow = generator.generate(&slow_data);
    let fast = async {
        let result = generator.generate(&fast_data).await;
        gate.notify_one();
        result
    };
    let (slow, fast) = tokio::join!(slow, fast);
    (slow.map(|_| ()), fast.map(|_| ()))
}

#[tokio::test]
async fn test_stale_run_is_superseded() {
    let (slow, fast) = race(true).await;
    fast.unwrap();
    assert!(matches!(
        slow,
        Err(PosterError::Superseded { run: 1, latest: 2 })
    ));
}

#[tokio::test]
async fn test_stale_run_kept_when_not_discarding() {
    let (slow, fast) = race(false).await;
    fast.unwrap();
    slow.unwrap();
}

#[tokio::test]
async fn test_stale_run_skips_title_callback() {
    let gate = Arc::new(Notify::new());
    let generator = gated_generator(gate.clone(), true);
    let slow_data = poster();
    let mut fast_data = poster();
    fast_data.album_cover = None;

    let stale_calls = Mutex::new(Vec::new());
    let fresh_calls = Mutex::new(Vec::new());
    let slow = generator.generate_with_callback(&slow_data, |size, fitted| {
        stale_calls.lock().unwrap().push((size, fitted))
    });
    let fast = async {
        let result = generator
            .generate_with_callback(&fast_data, |size, fitted| {
                fresh_calls.lock().unwrap().push((size, fitted))
            })
            .await;
        gate.notify_one();
        result
    };
    let (slow, fast) = tokio::join!(slow, fast);

    fast.unwrap();
    assert!(matches!(slow, Err(PosterError::Superseded { .. })));
    assert!(stale_calls.into_inner().unwrap().is_empty());
    assert_eq!(fresh_calls.into_inner().unwrap().len(), 1);
}
