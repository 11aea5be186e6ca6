//! Vector PDF backend for album posters.
//!
//! [`PdfBackend`] writes a single-page document whose media box is the poster
//! page converted to points. Rectangles and text are written as vector
//! content; bitmaps are embedded losslessly as Flate-compressed image XObjects
//! with an optional soft mask, or passed through when they came from a JPEG.
//! Text is set in the built-in Helvetica-Bold face unless a TrueType or CFF
//! OpenType font has been registered.

mod encoding;
mod font;
mod metrics;
mod xobject;

pub use encoding::{Encoding, WIN_ANSI_ENCODING};
pub use metrics::helvetica_bold_width;

use albumposter_layout::{
    to_points, Bitmap, FilledRect, FontHandle, ImageDraw, ImageHandle, LayoutTemplate,
    RenderBackend, RenderError, TextMeasure, TextRun,
};
use font::{EmbeddedFont, FontRefs};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use xobject::PreparedImage;

const BUILTIN_FONT: &[u8] = b"Helvetica-Bold";
const PRODUCER: &str = concat!("albumposter ", env!("CARGO_PKG_VERSION"));

pub struct PdfBackend {
    width_pt: f32,
    height_pt: f32,
    content: Content,
    fonts: Vec<EmbeddedFont>,
    images: Vec<PreparedImage>,
    alpha_states: Vec<f32>,
    title: Option<String>,
}

impl PdfBackend {
    pub fn new(template: &LayoutTemplate) -> Self {
        Self {
            width_pt: to_points(template.page_width) as f32,
            height_pt: to_points(template.page_height) as f32,
            content: Content::new(),
            fonts: Vec::new(),
            images: Vec::new(),
            alpha_states: Vec::new(),
            title: None,
        }
    }

    /// Set the document title recorded in the info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width_pt(&self) -> f32 {
        self.width_pt
    }

    pub fn height_pt(&self) -> f32 {
        self.height_pt
    }

    /// Convert a top-left pixel rectangle to a bottom-left point rectangle
    /// `[x, y, width, height]`.
    fn page_rect(&self, x: f64, y: f64, width: f64, height: f64) -> [f32; 4] {
        [
            to_points(x) as f32,
            self.flip_y(y + height),
            to_points(width) as f32,
            to_points(height) as f32,
        ]
    }

    fn flip_y(&self, y_px: f64) -> f32 {
        self.height_pt - to_points(y_px) as f32
    }

    /// Resource name of the graphics state for `opacity`, registering it on
    /// first use. Fully opaque draws need no state.
    fn alpha_state(&mut self, opacity: Option<f32>) -> Option<Vec<u8>> {
        let alpha = opacity?.clamp(0.0, 1.0);
        if alpha >= 1.0 {
            return None;
        }
        let index = match self
            .alpha_states
            .iter()
            .position(|a| a.to_bits() == alpha.to_bits())
        {
            Some(index) => index,
            None => {
                self.alpha_states.push(alpha);
                self.alpha_states.len() - 1
            }
        };
        Some(format!("Gs{index}").into_bytes())
    }

    fn begin_draw(&mut self, opacity: Option<f32>) {
        let state = self.alpha_state(opacity);
        self.content.save_state();
        if let Some(name) = state {
            self.content.set_parameters(Name(&name));
        }
    }

    fn embedded_font(&self, font: FontHandle) -> Option<&EmbeddedFont> {
        match font.0 {
            0 => None,
            id => self.fonts.get(id as usize - 1),
        }
    }

    fn write_document(self) -> anyhow::Result<Vec<u8>> {
        // Allocate the indirect reference IDs
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let builtin_font_id = Ref::new(5);
        let mut next_ref = Ref::new(6);

        let image_refs: Vec<(Ref, Ref)> = self
            .images
            .iter()
            .map(|_| (next_ref.bump(), next_ref.bump()))
            .collect();
        let font_refs: Vec<FontRefs> = self
            .fonts
            .iter()
            .map(|_| FontRefs {
                type0: next_ref.bump(),
                cid: next_ref.bump(),
                descriptor: next_ref.bump(),
                file: next_ref.bump(),
                to_unicode: next_ref.bump(),
            })
            .collect();
        let alpha_refs: Vec<Ref> = self.alpha_states.iter().map(|_| next_ref.bump()).collect();
        let info_id = next_ref.bump();

        let image_names: Vec<Vec<u8>> = (0..self.images.len())
            .map(|i| image_resource_name(ImageHandle(i as u32)))
            .collect();
        let font_names: Vec<Vec<u8>> = (0..=self.fonts.len())
            .map(|i| font_resource_name(FontHandle(i as u32)))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.width_pt, self.height_pt));
        page.parent(page_tree_id);
        page.contents(content_id);

        let mut resources = page.resources();
        {
            let mut x_objects = resources.x_objects();
            for (name, (image_ref, _)) in image_names.iter().zip(&image_refs) {
                x_objects.pair(Name(name), *image_ref);
            }
        }
        {
            let mut fonts = resources.fonts();
            fonts.pair(Name(&font_names[0]), builtin_font_id);
            for (name, refs) in font_names[1..].iter().zip(&font_refs) {
                fonts.pair(Name(name), refs.type0);
            }
        }
        {
            let mut states = resources.ext_g_states();
            for (index, alpha_ref) in alpha_refs.iter().enumerate() {
                states.pair(Name(format!("Gs{index}").as_bytes()), *alpha_ref);
            }
        }
        resources.finish();
        page.finish();

        let encoding_name = WIN_ANSI_ENCODING.get_name();
        pdf.type1_font(builtin_font_id)
            .base_font(Name(BUILTIN_FONT))
            .encoding_predefined(Name(encoding_name.as_bytes()));

        for (font, refs) in self.fonts.iter().zip(&font_refs) {
            log::debug!("embedding font {}", font.postscript_name());
            font.write(&mut pdf, refs)?;
        }
        for (image, (image_ref, mask_ref)) in self.images.iter().zip(&image_refs) {
            image.write(&mut pdf, *image_ref, *mask_ref);
        }
        for (alpha, alpha_ref) in self.alpha_states.iter().zip(&alpha_refs) {
            pdf.ext_graphics(*alpha_ref)
                .non_stroking_alpha(*alpha)
                .stroking_alpha(*alpha);
        }

        {
            let mut info = pdf.document_info(info_id);
            info.producer(TextStr(PRODUCER));
            if let Some(title) = &self.title {
                info.title(TextStr(title));
            }
        }

        pdf.stream(content_id, &self.content.finish());
        Ok(pdf.finish())
    }
}

fn font_resource_name(font: FontHandle) -> Vec<u8> {
    format!("F{}", font.0).into_bytes()
}

fn image_resource_name(image: ImageHandle) -> Vec<u8> {
    format!("Im{}", image.0).into_bytes()
}

impl TextMeasure for PdfBackend {
    fn text_width(&mut self, font: FontHandle, text: &str, size_pt: f64) -> f64 {
        match self.embedded_font(font) {
            Some(embedded) => embedded.text_width(text, size_pt),
            None => {
                if font != FontHandle::DEFAULT {
                    log::warn!("unknown font handle {}, measuring with {}", font.0, "Helvetica-Bold");
                }
                helvetica_bold_width(text, size_pt)
            }
        }
    }
}

impl RenderBackend for PdfBackend {
    fn register_font(&mut self, data: Vec<u8>) -> Result<FontHandle, RenderError> {
        let font = EmbeddedFont::parse(data).map_err(|e| {
            log::warn!("pdf cannot embed font, text falls back to Helvetica-Bold: {e}");
            RenderError::Font(e.to_string())
        })?;
        log::info!(
            "registered font {} ({:?} outlines)",
            font.postscript_name(),
            font.outlines()
        );
        self.fonts.push(font);
        Ok(FontHandle(self.fonts.len() as u32))
    }

    fn embed_image(&mut self, bitmap: &Bitmap) -> Result<ImageHandle, RenderError> {
        self.images.push(PreparedImage::from_bitmap(bitmap));
        Ok(ImageHandle(self.images.len() as u32 - 1))
    }

    fn fill_rect(&mut self, rect: &FilledRect) -> Result<(), RenderError> {
        let [x, y, w, h] = self.page_rect(rect.x, rect.y, rect.width, rect.height);
        let [r, g, b] = rect.color.to_unit();
        self.begin_draw(rect.opacity);
        self.content
            .set_fill_rgb(r, g, b)
            .rect(x, y, w, h)
            .fill_nonzero()
            .restore_state();
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
        if run.text.is_empty() {
            return Ok(());
        }
        let encoded = match run.font.0 {
            0 => WIN_ANSI_ENCODING.encode_string(&run.text),
            id => self
                .fonts
                .get_mut(id as usize - 1)
                .ok_or(RenderError::UnknownHandle { kind: "font", id })?
                .encode(&run.text),
        };
        let name = font_resource_name(run.font);
        let size = to_points(run.size_px) as f32;
        let x = to_points(run.x) as f32;
        let baseline = self.flip_y(run.baseline());
        let [r, g, b] = run.color.to_unit();

        self.begin_draw(run.opacity);
        self.content
            .set_fill_rgb(r, g, b)
            .begin_text()
            .set_font(Name(&name), size)
            .next_line(x, baseline)
            .show(Str(&encoded))
            .end_text()
            .restore_state();
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageDraw) -> Result<(), RenderError> {
        if image.image.0 as usize >= self.images.len() {
            return Err(RenderError::UnknownHandle {
                kind: "image",
                id: image.image.0,
            });
        }
        let [x, y, w, h] = self.page_rect(image.x, image.y, image.width, image.height);
        let name = image_resource_name(image.image);

        // Image space is the unit square, stretch it over the destination
        self.begin_draw(image.opacity);
        self.content
            .transform([w, 0.0, 0.0, h, x, y])
            .x_object(Name(&name))
            .restore_state();
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.write_document()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}
