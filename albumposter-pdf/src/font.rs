//! TrueType and CFF-flavored OpenType embedding as a CID-keyed Type0 font.

use anyhow::{anyhow, bail};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Finish, Name, Pdf, Rect, Ref, Str};
use std::collections::BTreeMap;
use std::sync::Arc;
use ttf_parser::{name_id, Face, GlyphId, Tag};

/// Refs needed to write one embedded font.
pub(crate) struct FontRefs {
    pub type0: Ref,
    pub cid: Ref,
    pub descriptor: Ref,
    pub file: Ref,
    pub to_unicode: Ref,
}

/// Glyph outline flavor of a font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outlines {
    /// `glyf` outlines, embedded as FontFile2.
    TrueType,
    /// `CFF ` outlines, embedded whole as an OpenType FontFile3.
    Cff,
}

/// A registered font and the glyphs used so far.
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedFont {
    data: Arc<Vec<u8>>,
    outlines: Outlines,
    postscript_name: String,
    used: BTreeMap<u16, char>,
}

impl EmbeddedFont {
    pub fn parse(data: Vec<u8>) -> anyhow::Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| anyhow!("Failed to parse font: {e}"))?;
        let raw = face.raw_face();
        let outlines = if face.tables().glyf.is_some() {
            Outlines::TrueType
        } else if raw.table(Tag::from_bytes(b"CFF ")).is_some() {
            Outlines::Cff
        } else if raw.table(Tag::from_bytes(b"CFF2")).is_some() {
            bail!("CFF2 (variable) outlines cannot be embedded");
        } else {
            bail!("Font has neither TrueType nor CFF outlines");
        };
        let postscript_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|name| sanitize_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "CustomFont".to_string());
        Ok(Self {
            data: Arc::new(data),
            outlines,
            postscript_name,
            used: BTreeMap::new(),
        })
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn outlines(&self) -> Outlines {
        self.outlines
    }

    fn face(&self) -> anyhow::Result<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| anyhow!("Failed to parse font: {e}"))
    }

    /// Width of `text` at `size_pt`, in points.
    pub fn text_width(&self, text: &str, size_pt: f64) -> f64 {
        let Ok(face) = self.face() else {
            return 0.0;
        };
        let units_per_em = face.units_per_em() as f64;
        let advance: f64 = text
            .chars()
            .map(|ch| {
                let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                face.glyph_hor_advance(gid).unwrap_or(0) as f64
            })
            .sum();
        advance / units_per_em * size_pt
    }

    /// Encode `text` as big-endian glyph ids, remembering which glyphs are used.
    pub fn encode(&mut self, text: &str) -> Vec<u8> {
        let face = Face::parse(&self.data, 0).ok();
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = face
                .as_ref()
                .and_then(|f| f.glyph_index(ch))
                .map(|g| g.0)
                .unwrap_or(0);
            if gid != 0 {
                self.used.entry(gid).or_insert(ch);
            }
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        bytes
    }

    /// Write the font dictionaries and the font program.
    pub fn write(&self, pdf: &mut Pdf, refs: &FontRefs) -> anyhow::Result<()> {
        let face = self.face()?;
        let scale = 1000.0 / face.units_per_em() as f32;
        let base_font = Name(self.postscript_name.as_bytes());

        pdf.type0_font(refs.type0)
            .base_font(base_font)
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(refs.cid)
            .to_unicode(refs.to_unicode);

        let widths: Vec<f32> = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0) as f32 * scale)
            .collect();
        {
            let mut cid = pdf.cid_font(refs.cid);
            cid.base_font(base_font)
                .system_info(identity_system_info())
                .font_descriptor(refs.descriptor);
            // Non CID-keyed CFF programs select glyphs by CID directly
            match self.outlines {
                Outlines::TrueType => {
                    cid.subtype(CidFontType::Type2)
                        .cid_to_gid_map_predefined(Name(b"Identity"));
                }
                Outlines::Cff => {
                    cid.subtype(CidFontType::Type0);
                }
            }
            cid.widths().consecutive(0, widths);
        }

        let bbox = face.global_bounding_box();
        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags |= FontFlags::FIXED_PITCH;
        }
        if face.is_italic() {
            flags |= FontFlags::ITALIC;
        }
        let cap_height = face.capital_height().unwrap_or(face.ascender()) as f32 * scale;
        let mut descriptor = pdf.font_descriptor(refs.descriptor);
        descriptor
            .name(base_font)
            .flags(flags)
            .bbox(Rect::new(
                bbox.x_min as f32 * scale,
                bbox.y_min as f32 * scale,
                bbox.x_max as f32 * scale,
                bbox.y_max as f32 * scale,
            ))
            .italic_angle(face.italic_angle())
            .ascent(face.ascender() as f32 * scale)
            .descent(face.descender() as f32 * scale)
            .cap_height(cap_height)
            .stem_v(if face.is_bold() { 120.0 } else { 80.0 });
        match self.outlines {
            Outlines::TrueType => descriptor.font_file2(refs.file),
            Outlines::Cff => descriptor.font_file3(refs.file),
        };
        descriptor.finish();

        let mut program = pdf.stream(refs.file, self.data.as_slice());
        match self.outlines {
            Outlines::TrueType => program.pair(Name(b"Length1"), self.data.len() as i32),
            Outlines::Cff => program.pair(Name(b"Subtype"), Name(b"OpenType")),
        };
        program.finish();

        let mut cmap: UnicodeCmap = UnicodeCmap::new(Name(b"Custom"), identity_system_info());
        for (gid, ch) in &self.used {
            cmap.pair(*gid, *ch);
        }
        pdf.cmap(refs.to_unicode, &cmap.finish());
        Ok(())
    }
}

fn identity_system_info() -> SystemInfo<'static> {
    SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    }
}

/// PostScript names may only contain printable ASCII without delimiters.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .collect()
}
