//! Image tree scanning and catalog generation

use crate::document::{CategoryRecord, ImageRecord};
use crate::{FsError, Result};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options for scanning an image tree
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory to scan
    pub root: PathBuf,
    /// Prefix of emitted asset paths (the root as seen from the site root)
    pub asset_prefix: String,
    /// Accepted extensions, lowercase
    pub extensions: Vec<String>,
    /// Directories whose lowercase name starts with one of these are skipped
    pub skip_prefixes: Vec<String>,
    /// Directories whose lowercase name contains one of these are skipped
    pub skip_contains: Vec<String>,
    /// Category assigned to images directly under the root (never emitted)
    pub misc_category: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("phalakimages"),
            asset_prefix: "phalakimages".to_string(),
            extensions: vec!["jpg".into(), "jpeg".into(), "png".into(), "gif".into()],
            skip_prefixes: vec!["scan".into()],
            skip_contains: vec!["renamed".into(), "test".into()],
            misc_category: "Miscellaneous".to_string(),
        }
    }
}

/// An image found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedImage {
    /// Path for file system access
    pub disk_path: PathBuf,
    /// Components of the path below the scan root
    pub components: Vec<String>,
}

impl ScannedImage {
    fn file_name(&self) -> &str {
        self.components.last().map(String::as_str).unwrap_or("")
    }

    fn stem(&self) -> String {
        Path::new(self.file_name())
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Check whether a directory is excluded from the scan
pub fn is_skipped_dir(name: &str, options: &ScanOptions) -> bool {
    let lower = name.to_lowercase();
    options.skip_prefixes.iter().any(|p| lower.starts_with(p.as_str()))
        || options.skip_contains.iter().any(|c| lower.contains(c.as_str()))
}

/// Check whether a file has one of the accepted extensions
pub fn is_supported_image(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Recursively collect images below `options.root`
pub fn scan_images(options: &ScanOptions) -> Result<Vec<ScannedImage>> {
    let root = &options.root;
    if !root.is_dir() {
        return Err(FsError::NotFound(root.display().to_string()));
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(&entry.file_name().to_string_lossy(), options)
        });

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path(), &options.extensions) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| FsError::InvalidPath(entry.path().display().to_string()))?;

        let components = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        images.push(ScannedImage {
            disk_path: entry.path().to_path_buf(),
            components,
        });
    }

    tracing::debug!("Scanned {} images under {:?}", images.len(), root);
    Ok(images)
}

/// Group scanned images into catalog records
///
/// The first component below the root names the category. Images sit in
/// name order, categories in display-name order. A name seen twice within a
/// category keeps its first occurrence.
pub fn build_catalog(
    images: &[ScannedImage],
    options: &ScanOptions,
    names: &BTreeMap<String, String>,
) -> Vec<CategoryRecord> {
    let mut grouped: BTreeMap<String, Vec<ImageRecord>> = BTreeMap::new();

    for image in images {
        let category = if image.components.len() == 1 {
            options.misc_category.clone()
        } else {
            image.components[0].clone()
        };

        let relative = image.components.join("/");
        let path = if options.asset_prefix.is_empty() {
            relative
        } else {
            format!("{}/{}", options.asset_prefix.trim_end_matches('/'), relative)
        };

        grouped.entry(category).or_default().push(ImageRecord {
            path,
            name: image.stem(),
            filename: image.file_name().to_string(),
        });
    }

    let mut records: Vec<CategoryRecord> = grouped
        .into_iter()
        .filter(|(id, _)| *id != options.misc_category)
        .map(|(id, mut images)| {
            images.sort_by(|a, b| name_order(&a.name, &b.name));
            images.dedup_by(|later, first| {
                let duplicate = later.name == first.name;
                if duplicate {
                    tracing::warn!(
                        "Duplicate image name {:?} in category {:?}: keeping {}, dropping {}",
                        later.name, id, first.path, later.path
                    );
                }
                duplicate
            });

            let display_name = names.get(&id).cloned().unwrap_or_else(|| id.clone());
            CategoryRecord { id, display_name, images }
        })
        .collect();

    records.sort_by(|a, b| name_order(&a.display_name, &b.display_name));
    records
}

/// Case-insensitive, ties broken by the exact text so equal names stay adjacent
fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Display names of the site's known categories
pub fn default_category_names() -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();

    names.insert("1".into(), "Collection 1".into());
    names.insert("2".into(), "Collection 2".into());
    names.insert("3".into(), "Collection 3".into());
    names.insert("dinvishesh".into(), "दिनविशेष (Special Days)".into());
    names.insert("vyakti".into(), "व्यक्ती (Personalities)".into());
    names.insert("vaishishtya".into(), "वैशिष्ट्य (Distinguished)".into());
    names.insert("kodi".into(), "कोडी (Riddles)".into());
    names.insert("lalit".into(), "ललित (Creative)".into());
    names.insert("additional-dina".into(), "Additional - Special Days".into());
    names.insert("additional-vaishis".into(), "Additional - Distinguished".into());
    names.insert("Miscellaneous".into(), "Miscellaneous".into());

    names
}
