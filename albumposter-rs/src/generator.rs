//! Asynchronous poster generation.

use crate::config::{GeneratorConfig, OutputFormat};
use crate::error::{PosterError, PosterResult};
use crate::run_token::{RunCounter, RunToken};
use albumposter_canvas::{CanvasBackend, ResolvedFontConfig};
use albumposter_common::{AssetSource, FontSource, HttpAssetSource};
use albumposter_layout::{
    compose, rasterize_svg_intrinsic, rasterize_watermark, recolor_scan_code, scan_code_url,
    Bitmap, FontHandle, GradientMask, PosterColors, PosterData, RenderBackend, Scene,
    SceneAssets,
};
use albumposter_pdf::PdfBackend;
use log::{debug, info, warn};
use std::sync::Arc;

/// Supersampling of the scan-code raster.
const SCAN_CODE_SUPERSAMPLE: f64 = 3.0;

/// A finished poster.
#[derive(Debug, Clone)]
pub struct PosterOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub scene: Scene,
}

impl PosterOutput {
    /// Record the auto-fit result in `data` so later runs keep the size.
    pub fn write_back(&self, data: &mut PosterData) {
        self.scene.title_fit.apply_to(data);
    }
}

/// Assets retrieved before rendering starts.
#[derive(Default)]
struct FetchedAssets {
    cover: Option<Bitmap>,
    font: Option<Vec<u8>>,
    scan_code: Option<Bitmap>,
}

pub struct PosterGenerator {
    config: GeneratorConfig,
    fonts: ResolvedFontConfig,
    assets: Arc<dyn AssetSource>,
    runs: RunCounter,
}

impl PosterGenerator {
    /// Create a generator that fetches assets over HTTP and from the
    /// filesystem.
    pub fn new(config: GeneratorConfig) -> PosterResult<Self> {
        let source = HttpAssetSource {
            allow_remote: config.allow_remote,
            base_dir: config.base_dir.clone(),
        };
        Self::with_assets(config, Arc::new(source))
    }

    pub fn with_assets(
        config: GeneratorConfig,
        assets: Arc<dyn AssetSource>,
    ) -> PosterResult<Self> {
        config.validate()?;
        let fonts = config.fonts.resolve();
        debug!("font database holds {} faces", fonts.face_count());
        Ok(Self {
            config,
            fonts,
            assets,
            runs: RunCounter::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a poster.
    pub async fn generate(&self, data: &PosterData) -> PosterResult<PosterOutput> {
        self.generate_with_callback(data, |_, _| {}).await
    }

    /// Generate a poster, calling `on_title_size(size_px, true)` once if the
    /// title was auto-fitted. A superseded run never calls it.
    pub async fn generate_with_callback<F>(
        &self,
        data: &PosterData,
        on_title_size: F,
    ) -> PosterResult<PosterOutput>
    where
        F: FnOnce(u32, bool) + Send,
    {
        let token = self.runs.begin();
        info!(
            "run {}: generating {} poster for {:?}",
            token.get(),
            self.config.format,
            data.album_name
        );
        let colors = PosterColors::from_data(data)?;
        let fetched = self.fetch_assets(data, &colors).await;

        let (bytes, scene) = match self.config.format {
            OutputFormat::Pdf => {
                let backend = PdfBackend::new(&self.config.template).with_title(&data.album_name);
                self.render(backend, data, &colors, fetched)?
            }
            OutputFormat::Png => {
                let backend =
                    CanvasBackend::new(&self.config.template, self.config.scale, &self.fonts)?;
                self.render(backend, data, &colors, fetched)?
            }
        };

        self.check_current(token)?;
        if scene.title_fit.auto_fitted {
            on_title_size(scene.title_fit.size_px, true);
        }
        info!("run {}: produced {} bytes", token.get(), bytes.len());
        Ok(PosterOutput {
            bytes,
            format: self.config.format,
            scene,
        })
    }

    fn check_current(&self, token: RunToken) -> PosterResult<()> {
        if self.config.discard_superseded && !self.runs.is_current(token) {
            let latest = self.runs.latest();
            warn!("run {} superseded by run {}", token.get(), latest);
            return Err(PosterError::Superseded {
                run: token.get(),
                latest,
            });
        }
        Ok(())
    }

    async fn fetch_assets(&self, data: &PosterData, colors: &PosterColors) -> FetchedAssets {
        FetchedAssets {
            cover: self.fetch_cover(data).await,
            font: self.fetch_font(data).await,
            scan_code: self.fetch_scan_code(data, colors).await,
        }
    }

    async fn fetch_cover(&self, data: &PosterData) -> Option<Bitmap> {
        let url = data.cover_url()?;
        let bytes = match self.assets.fetch(url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("skipping cover: {err}");
                return None;
            }
        };
        match Bitmap::decode(&bytes) {
            Ok(bitmap) => Some(bitmap),
            Err(err) => {
                warn!("skipping cover {url}: {err}");
                None
            }
        }
    }

    async fn fetch_font(&self, data: &PosterData) -> Option<Vec<u8>> {
        match FontSource::parse(data.custom_font()?)? {
            FontSource::Location(location) => match self.assets.fetch(&location).await {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    warn!("using default font: {err}");
                    None
                }
            },
            FontSource::Family(family) => {
                let face = self.fonts.family_face_data(&family);
                if face.is_none() {
                    warn!("using default font: family {family:?} is not installed");
                }
                face
            }
        }
    }

    async fn fetch_scan_code(&self, data: &PosterData, colors: &PosterColors) -> Option<Bitmap> {
        let album_id = data.album_id.trim();
        if !self.config.scan_code.enabled || album_id.is_empty() {
            return None;
        }
        let contrast = colors.contrast();
        let url = scan_code_url(
            &self.config.scan_code.url_template,
            colors.background,
            contrast,
            self.config.scan_code.size,
            album_id,
        );
        let svg = match self.assets.fetch_text(&url).await {
            Ok(svg) => svg,
            Err(err) => {
                warn!("omitting scan code: {err}");
                return None;
            }
        };
        let svg = recolor_scan_code(&svg, contrast, colors.text, colors.background);
        match rasterize_svg_intrinsic(&svg, SCAN_CODE_SUPERSAMPLE) {
            Ok(bitmap) => Some(bitmap),
            Err(err) => {
                warn!("omitting scan code: {err}");
                None
            }
        }
    }

    fn render<B: RenderBackend>(
        &self,
        mut backend: B,
        data: &PosterData,
        colors: &PosterColors,
        fetched: FetchedAssets,
    ) -> PosterResult<(Vec<u8>, Scene)> {
        let template = &self.config.template;
        let mut assets = SceneAssets::default();

        if let Some(font) = fetched.font {
            assets.font = backend.register_font(font).unwrap_or_else(|err| {
                warn!("using default font: {err}");
                FontHandle::DEFAULT
            });
        }

        if let Some(cover) = fetched.cover {
            match backend.embed_image(&cover) {
                Ok(handle) => assets.cover = Some(handle),
                Err(err) => warn!("skipping cover: {err}"),
            }
        }
        if assets.cover.is_some() {
            if let Some(mask) = GradientMask::for_poster(data, colors.background, template) {
                let fade = mask.rasterize(self.config.supersample)?;
                assets.fade = Some(backend.embed_image(&fade)?);
            }
        }

        if data.use_watermark {
            let watermark =
                rasterize_watermark(colors.text, template.watermark_width, template.watermark_height)?;
            assets.watermark = Some(backend.embed_image(&watermark)?);
        }

        if let Some(scan_code) = fetched.scan_code {
            match backend.embed_image(&scan_code) {
                Ok(handle) => assets.scan_code = Some(handle),
                Err(err) => warn!("omitting scan code: {err}"),
            }
        }

        let scene = compose(data, template, &assets, &mut backend)?;
        backend.execute(&scene.ops)?;
        let bytes = backend.finish()?;
        Ok((bytes, scene))
    }
}
