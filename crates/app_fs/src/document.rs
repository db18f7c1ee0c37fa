//! Catalog document schema (`images.json`) and deep-link segment encoding

use crate::Result;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Characters left unescaped by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One category record of the catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Stable key, unique across the catalog
    #[serde(rename = "category")]
    pub id: String,

    /// Human label; empty when the document omits it
    #[serde(rename = "displayName", default)]
    pub display_name: String,

    pub images: Vec<ImageRecord>,
}

/// One image record of the catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Locator of the binary asset, relative to the site root
    pub path: String,

    /// Identifier, unique within the owning category
    pub name: String,

    #[serde(default)]
    pub filename: String,
}

impl ImageRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into();
        let filename = filename_from_path(&path).to_string();
        Self {
            path,
            name: name.into(),
            filename,
        }
    }
}

/// Last `/`-separated segment of an asset locator
pub fn filename_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parse a catalog document
pub fn read_catalog(json: &str) -> Result<Vec<CategoryRecord>> {
    let mut records: Vec<CategoryRecord> = serde_json::from_str(json)?;

    for record in &mut records {
        for image in &mut record.images {
            if image.filename.is_empty() {
                image.filename = filename_from_path(&image.path).to_string();
            }
        }
    }

    Ok(records)
}

/// Write a catalog document as pretty-printed UTF-8 JSON
pub fn write_catalog<P: AsRef<Path>>(path: P, records: &[CategoryRecord]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)?;

    tracing::info!("Catalog written to {:?} ({} categories)", path, records.len());
    Ok(())
}

/// Percent-encode one deep-link path segment
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Decode one deep-link path segment; `None` if the bytes are not UTF-8
pub fn decode_segment(encoded: &str) -> Option<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_catalog_field_names() {
        let json = r#"[
            {"category": "kodi", "displayName": "Riddles",
             "images": [{"path": "phalakimages/kodi/c.jpg", "name": "c", "filename": "c.jpg"}]}
        ]"#;

        let records = read_catalog(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "kodi");
        assert_eq!(records[0].display_name, "Riddles");
        assert_eq!(records[0].images[0].name, "c");
    }

    #[test]
    fn test_read_catalog_derives_filename() {
        let json = r#"[{"category": "kodi", "images": [{"path": "a/b/c.png", "name": "c"}]}]"#;
        let records = read_catalog(json).unwrap();
        assert_eq!(records[0].images[0].filename, "c.png");
        assert_eq!(records[0].display_name, "");
    }

    #[test]
    fn test_read_catalog_rejects_missing_name() {
        let json = r#"[{"category": "kodi", "displayName": "K", "images": [{"path": "c.png"}]}]"#;
        assert!(read_catalog(json).is_err());
    }

    #[test]
    fn test_read_catalog_rejects_object_root() {
        assert!(read_catalog(r#"{"category": "kodi"}"#).is_err());
    }

    #[test]
    fn test_write_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("images.json");
        let records = vec![CategoryRecord {
            id: "vyakti".into(),
            display_name: "व्यक्ती (Personalities)".into(),
            images: vec![ImageRecord::new("phalakimages/vyakti/a.jpg", "a")],
        }];

        write_catalog(&out, &records).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("व्यक्ती"));
        assert!(content.contains("\"displayName\""));
        assert_eq!(read_catalog(&content).unwrap(), records);
    }

    #[test]
    fn test_encode_segment_matches_uri_component() {
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_segment("it's(ok)!~*"), "it's(ok)!~*");
        assert_eq!(encode_segment("दिन"), "%E0%A4%A6%E0%A4%BF%E0%A4%A8");
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("a%20b%2Fc").as_deref(), Some("a b/c"));
        assert_eq!(decode_segment("%FF"), None);
    }
}
