//! Bitmaps as image XObjects.

use albumposter_layout::Bitmap;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Filter, Pdf, Ref};

/// zlib level for pixel and mask streams.
const FLATE_LEVEL: u8 = 6;

/// An embedded bitmap, compressed and ready to write.
#[derive(Debug, Clone)]
pub(crate) struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Color samples, either a JPEG stream or zlib-compressed RGB.
    pub rgb: Vec<u8>,
    pub filter: Filter,
    /// zlib-compressed grayscale soft mask, present when any pixel is not
    /// fully opaque.
    pub alpha: Option<Vec<u8>>,
}

impl PreparedImage {
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        let (width, height) = (bitmap.width(), bitmap.height());
        if let Some(jpeg) = bitmap.jpeg_source() {
            return Self {
                width,
                height,
                rgb: jpeg.to_vec(),
                filter: Filter::DctDecode,
                alpha: None,
            };
        }

        let rgba = bitmap.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.len() / 4);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        let alpha = if bitmap.is_opaque() {
            None
        } else {
            Some(compress_to_vec_zlib(&alpha, FLATE_LEVEL))
        };
        Self {
            width,
            height,
            rgb: compress_to_vec_zlib(&rgb, FLATE_LEVEL),
            filter: Filter::FlateDecode,
            alpha,
        }
    }

    /// Write the image (and its mask under `mask_id`) to the document.
    pub fn write(&self, pdf: &mut Pdf, id: Ref, mask_id: Ref) {
        {
            let mut image = pdf.image_xobject(id, &self.rgb);
            image.filter(self.filter);
            image.width(self.width as i32);
            image.height(self.height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            if self.alpha.is_some() {
                image.s_mask(mask_id);
            }
        }
        if let Some(alpha) = &self.alpha {
            let mut mask = pdf.image_xobject(mask_id, alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(self.width as i32);
            mask.height(self.height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albumposter_layout::rasterize_svg;
    use miniz_oxide::inflate::decompress_to_vec_zlib;
    use tiny_skia::{Color, Pixmap};

    fn solid(r: u8, g: u8, b: u8, a: u8) -> Bitmap {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(Color::from_rgba8(r, g, b, a));
        Bitmap::from_pixmap(pixmap)
    }

    #[test]
    fn test_opaque_bitmap_has_no_mask() {
        let prepared = PreparedImage::from_bitmap(&solid(255, 0, 0, 255));
        assert_eq!((prepared.width, prepared.height), (8, 8));
        assert_eq!(prepared.filter, Filter::FlateDecode);
        assert!(prepared.alpha.is_none());
        let rgb = decompress_to_vec_zlib(&prepared.rgb).unwrap();
        assert_eq!(rgb, [255u8, 0, 0].repeat(64));
    }

    #[test]
    fn test_translucent_bitmap_has_exact_mask() {
        let prepared = PreparedImage::from_bitmap(&solid(0, 0, 255, 128));
        let alpha = decompress_to_vec_zlib(&prepared.alpha.unwrap()).unwrap();
        assert_eq!(alpha, vec![128u8; 64]);
    }

    #[test]
    fn test_scan_code_bars_are_lossless() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="4" shape-rendering="crispEdges">
<rect x="1" width="1" height="4" fill="#ffffff"/>
<rect x="4" width="2" height="4" fill="#ffffff"/>
<rect x="9" width="1" height="4" fill="#ffffff"/>
</svg>"##;
        let bitmap = rasterize_svg(svg, 12.0, 4.0, 1.0).unwrap();
        let prepared = PreparedImage::from_bitmap(&bitmap);

        let expected: Vec<u8> = bitmap
            .to_rgba8()
            .chunks_exact(4)
            .flat_map(|px| px[..3].to_vec())
            .collect();
        assert_eq!(decompress_to_vec_zlib(&prepared.rgb).unwrap(), expected);

        let alpha = decompress_to_vec_zlib(prepared.alpha.as_ref().unwrap()).unwrap();
        // Bar columns are fully covered, gaps fully transparent
        assert_eq!(&alpha[..12], &[0u8, 255, 0, 0, 255, 255, 0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_jpeg_source_is_passed_through() {
        let rgb: Vec<u8> = (0..16 * 16).flat_map(|i| [(i % 256) as u8, 40, 200]).collect();
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
            .encode(&rgb, 16, 16, image::ExtendedColorType::Rgb8)
            .unwrap();

        let prepared = PreparedImage::from_bitmap(&Bitmap::decode(&jpeg).unwrap());
        assert_eq!(prepared.filter, Filter::DctDecode);
        assert_eq!(prepared.rgb, jpeg);
        assert!(prepared.alpha.is_none());
    }
}
