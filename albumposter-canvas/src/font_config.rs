use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Backend-agnostic font configuration.
///
/// Describes which fonts are available to the renderers using only standard
/// library types. The raster backend converts it into a `fontdb` database via
/// [`font_config_to_fontdb`]; the orchestration layer also uses the resolved
/// database to look up system families by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Custom font data to register ahead of any poster-specific font.
    #[serde(skip)]
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families for the default bold sans-serif face, in priority order.
    pub sans_serif: Vec<String>,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Whether font hinting is enabled for text rendering (default: false).
    ///
    /// Disabled by default so raster glyph outlines match the vector backend.
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            sans_serif: default_sans_serif(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

/// Families closest to Helvetica Bold, the face the vector backend uses.
pub fn default_sans_serif() -> Vec<String> {
    vec![
        "Helvetica".into(),
        "Arial".into(),
        "Liberation Sans".into(),
        "DejaVu Sans".into(),
    ]
}

/// A custom font to register, consisting of raw font file data and an optional family name override.
#[derive(Clone, Debug)]
pub struct CustomFont {
    /// Raw font file data (TTF/OTF). Arc-wrapped for cheap cloning.
    pub data: Arc<Vec<u8>>,
    /// Optional family name override. If None, the family name is read from
    /// the font's name table.
    pub family_name: Option<String>,
}

impl FontConfig {
    /// Resolve this configuration into a concrete font database.
    ///
    /// System font scanning happens once here; the result can be cloned
    /// cheaply for every render.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A [`FontConfig`] that has been resolved into a concrete font database.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    pub(crate) hinting_enabled: bool,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        Self {
            fontdb: font_config_to_fontdb(config),
            hinting_enabled: config.hinting_enabled,
        }
    }

    /// Number of faces in the database.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Raw data of the bold face of a named family, if installed.
    ///
    /// Faces inside font collections other than the first are skipped since
    /// the backends only load index 0.
    pub fn family_face_data(&self, family: &str) -> Option<Vec<u8>> {
        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            ..fontdb::Query::default()
        };
        let id = self.fontdb.query(&query)?;
        let (data, index) = self
            .fontdb
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        if index != 0 {
            log::warn!("font family {family} lives at collection index {index}; skipping");
            return None;
        }
        Some(data)
    }
}

/// Convert a [`FontConfig`] into a [`fontdb::Database`].
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    if config.load_system_fonts {
        db.load_system_fonts();
    }

    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    for font in &config.custom_fonts {
        db.load_font_data(Vec::from(font.data.as_slice()));
    }

    apply_sans_serif(&mut db, &config.sans_serif);

    db
}

/// Point the generic sans-serif family at the first installed preference.
fn apply_sans_serif(db: &mut fontdb::Database, preferences: &[String]) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(fam, _lang)| fam.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    if let Some(family) = preferences.iter().find(|f| available.contains(*f)) {
        log::debug!("default sans-serif family: {family}");
        db.set_sans_serif_family(family);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
        assert_eq!(config.sans_serif[0], "Helvetica");
        assert!(!config.hinting_enabled);
    }

    #[test]
    fn test_font_config_to_fontdb_no_system_fonts() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!(resolved.face_count(), 0);
        assert!(resolved.family_face_data("Helvetica").is_none());
    }

    #[test]
    fn test_font_config_clone_is_cheap() {
        let data = Arc::new(vec![0u8; 1000]);
        let font = CustomFont {
            data: data.clone(),
            family_name: None,
        };
        let config = FontConfig {
            custom_fonts: vec![font],
            ..FontConfig::default()
        };
        let cloned = config.clone();
        assert!(Arc::ptr_eq(
            &config.custom_fonts[0].data,
            &cloned.custom_fonts[0].data
        ));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FontConfig =
            serde_json::from_str(r#"{"load_system_fonts": false, "font_dirs": ["/opt/fonts"]}"#)
                .unwrap();
        assert!(!config.load_system_fonts);
        assert_eq!(config.font_dirs, vec![PathBuf::from("/opt/fonts")]);
        assert_eq!(config.sans_serif, default_sans_serif());
    }
}
