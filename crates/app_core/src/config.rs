//! Application configuration

use crate::route::{RoutingMode, UrlCodec};
use crate::AppError;
use app_fs::{PageOptions, ScanOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub routing: RoutingConfig,
    pub navigation: NavigationConfig,
    pub display: DisplayConfig,
    pub keybindings: HashMap<String, Vec<String>>,
    pub generator: GeneratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            routing: RoutingConfig::default(),
            navigation: NavigationConfig::default(),
            display: DisplayConfig::default(),
            keybindings: default_keybindings(),
            generator: GeneratorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Location of the catalog document
    pub catalog_url: String,
    pub site_title: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            catalog_url: "images.json".to_string(),
            site_title: "फलक लेखन".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub mode: RoutingMode,
    /// Path the SPA is served under
    pub base_path: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mode: RoutingMode::Path,
            base_path: "/phalakpages/".to_string(),
        }
    }
}

impl RoutingConfig {
    pub fn codec(&self) -> UrlCodec {
        UrlCodec::new(self.mode, &self.base_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Minimum horizontal travel of a touch gesture to count as a swipe
    pub swipe_threshold_px: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Category ids shown first, in this order; the rest follow by display name
    pub category_order: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            category_order: vec![
                "vyakti".into(),
                "dinvishesh".into(),
                "lalit".into(),
                "vaishishtya".into(),
                "kodi".into(),
            ],
        }
    }
}

/// Catalog generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    pub pages_dir: PathBuf,
    pub base_url: String,
    pub spa_root: String,
    pub site_name: String,
    pub collection_label: String,
    pub lang: String,
    pub extensions: Vec<String>,
    pub skip_prefixes: Vec<String>,
    pub skip_contains: Vec<String>,
    pub default_og_size: (u32, u32),
    /// Overrides and additions to the built-in category names
    pub category_names: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let scan = ScanOptions::default();
        let pages = PageOptions::default();
        Self {
            source_dir: scan.root,
            output: PathBuf::from("images.json"),
            pages_dir: PathBuf::from("image"),
            base_url: pages.base_url,
            spa_root: pages.spa_root,
            site_name: pages.site_name,
            collection_label: pages.collection_label,
            lang: pages.lang,
            extensions: scan.extensions,
            skip_prefixes: scan.skip_prefixes,
            skip_contains: scan.skip_contains,
            default_og_size: pages.default_size,
            category_names: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Scan settings; `source_dir` is taken relative to the site root
    pub fn scan_options(&self) -> ScanOptions {
        let asset_prefix = self
            .source_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        ScanOptions {
            root: self.source_dir.clone(),
            asset_prefix,
            extensions: self.extensions.iter().map(|e| e.to_lowercase()).collect(),
            skip_prefixes: self.skip_prefixes.iter().map(|p| p.to_lowercase()).collect(),
            skip_contains: self.skip_contains.iter().map(|c| c.to_lowercase()).collect(),
            ..ScanOptions::default()
        }
    }

    /// Share page options; `site_root` is where asset paths resolve on disk
    pub fn page_options(&self, site_title: &str, site_root: &Path) -> PageOptions {
        PageOptions {
            base_url: self.base_url.clone(),
            spa_root: self.spa_root.clone(),
            site_title: site_title.to_string(),
            site_name: self.site_name.clone(),
            collection_label: self.collection_label.clone(),
            lang: self.lang.clone(),
            site_root: site_root.to_path_buf(),
            default_size: self.default_og_size,
        }
    }

    /// Built-in category names merged with the configured ones
    pub fn category_names(&self) -> BTreeMap<String, String> {
        let mut names = app_fs::default_category_names();
        names.extend(self.category_names.clone());
        names
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, AppError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content)?;
        tracing::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("org", "Phalak", "PhalakGallery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

/// Lightbox keys, named like `KeyboardEvent.key`
pub fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    kb.insert("nav.close_lightbox".into(), vec!["Escape".into()]);
    kb.insert("nav.next_image".into(), vec!["ArrowRight".into()]);
    kb.insert("nav.prev_image".into(), vec!["ArrowLeft".into()]);

    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [routing]
            mode = "hash"

            [navigation]
            swipe_threshold_px = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(config.routing.mode, RoutingMode::Hash);
        assert_eq!(config.routing.base_path, "/phalakpages/");
        assert_eq!(config.navigation.swipe_threshold_px, 80.0);
        assert_eq!(config.general.catalog_url, "images.json");
        assert!(config.keybindings.contains_key("nav.next_image"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.display.category_order, config.display.category_order);
        assert_eq!(back.generator.default_og_size, (1200, 630));
    }

    #[test]
    fn test_load_from_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "routing = 3").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(AppError::Config(_))));
        assert!(matches!(
            AppConfig::load_from(&dir.path().join("absent.toml")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_scan_options_from_generator() {
        let generator = GeneratorConfig {
            source_dir: PathBuf::from("./site/phalakimages"),
            extensions: vec!["JPG".into()],
            ..Default::default()
        };
        let scan = generator.scan_options();
        assert_eq!(scan.asset_prefix, "site/phalakimages");
        assert_eq!(scan.extensions, vec!["jpg"]);
    }

    #[test]
    fn test_category_name_overrides() {
        let mut generator = GeneratorConfig::default();
        generator.category_names.insert("kodi".into(), "Puzzles".into());
        let names = generator.category_names();
        assert_eq!(names["kodi"], "Puzzles");
        assert_eq!(names["lalit"], "ललित (Creative)");
    }
}
