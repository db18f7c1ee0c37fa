//! Per-image share pages carrying Open Graph / Twitter card metadata
//!
//! Each page lives at `<out>/<category>/<name>/index.html`, so the static
//! host serves it for the image's deep link. Crawlers read the meta tags;
//! browsers store their own path for the SPA and redirect to its root.

use crate::document::{encode_segment, CategoryRecord, ImageRecord};
use crate::{FsError, Result};
use std::path::{Path, PathBuf};

/// Session storage key carrying the deep link to the app
pub const REDIRECT_STORAGE_KEY: &str = "spa-redirect-path";

/// Options for share page rendering
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Public URL of the site root, without trailing slash
    pub base_url: String,
    /// Path the pages redirect browsers to
    pub spa_root: String,
    /// Suffix of page titles
    pub site_title: String,
    /// `og:site_name`
    pub site_name: String,
    /// Appended to the category name in descriptions
    pub collection_label: String,
    /// `<html lang>`
    pub lang: String,
    /// Directory the catalog's asset paths are relative to
    pub site_root: PathBuf,
    /// Size announced when the asset cannot be probed
    pub default_size: (u32, u32),
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            base_url: "https://unmeshjoshi.github.io/phalakpages".to_string(),
            spa_root: "/phalakpages/".to_string(),
            site_title: "फलक लेखन".to_string(),
            site_name: "फलक लेखन | Phalak Lekhan".to_string(),
            collection_label: "Phalak Lekhan Collection".to_string(),
            lang: "mr".to_string(),
            site_root: PathBuf::from("."),
            default_size: (1200, 630),
        }
    }
}

/// Public deep-link URL of an image
pub fn share_page_url(base_url: &str, category_id: &str, name: &str) -> String {
    format!(
        "{}/image/{}/{}",
        base_url.trim_end_matches('/'),
        encode_segment(category_id),
        encode_segment(name)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the share page of one image
pub fn render_share_page(
    category: &CategoryRecord,
    image: &ImageRecord,
    size: (u32, u32),
    options: &PageOptions,
) -> String {
    let base = options.base_url.trim_end_matches('/');
    let image_url = escape_html(&format!("{}/{}", base, image.path));
    let page_url = escape_html(&share_page_url(base, &category.id, &image.name));
    let title = escape_html(&format!("{} | {}", image.name, options.site_title));
    let description = escape_html(&format!("{} - {}", category.display_name, options.collection_label));
    let name = escape_html(&image.name);
    let site_name = escape_html(&options.site_name);
    let lang = escape_html(&options.lang);
    // A JSON string literal is a valid JS string literal; `</` is split so it cannot close the script
    let spa_root = serde_json::Value::String(options.spa_root.clone())
        .to_string()
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>

    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{image_url}">
    <meta property="og:image:width" content="{width}">
    <meta property="og:image:height" content="{height}">
    <meta property="og:url" content="{page_url}">
    <meta property="og:type" content="website">
    <meta property="og:site_name" content="{site_name}">

    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{image_url}">

    <script>
        sessionStorage.setItem('{redirect_key}', window.location.pathname);
        window.location.replace({spa_root});
    </script>
</head>
<body>
    <p>Loading {name}...</p>
    <img src="{image_url}" alt="{name}" style="max-width: 100%;">
</body>
</html>
"#,
        width = size.0,
        height = size.1,
        redirect_key = REDIRECT_STORAGE_KEY,
    )
}

fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(FsError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

fn probe_size(path: &Path, fallback: (u32, u32)) -> (u32, u32) {
    match image::image_dimensions(path) {
        Ok(size) => size,
        Err(e) => {
            tracing::debug!("Cannot probe {:?}, announcing {:?}: {}", path, fallback, e);
            fallback
        }
    }
}

/// Write one share page per image below `out_dir`, returning the page count
pub fn write_share_pages<P: AsRef<Path>>(
    out_dir: P,
    catalog: &[CategoryRecord],
    options: &PageOptions,
) -> Result<usize> {
    let out_dir = out_dir.as_ref();
    let mut count = 0;

    for category in catalog {
        check_segment(&category.id)?;

        for image in &category.images {
            check_segment(&image.name)?;

            let dir = out_dir.join(&category.id).join(&image.name);
            std::fs::create_dir_all(&dir)?;

            let size = probe_size(&options.site_root.join(&image.path), options.default_size);
            let html = render_share_page(category, image, size, options);
            std::fs::write(dir.join("index.html"), html)?;

            count += 1;
        }
    }

    tracing::info!("Generated {} share pages under {:?}", count, out_dir);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CategoryRecord {
        CategoryRecord {
            id: "kodi".into(),
            display_name: "कोडी (Riddles)".into(),
            images: vec![ImageRecord::new("phalakimages/kodi/c d.jpg", "c d")],
        }
    }

    #[test]
    fn test_share_page_url_encodes_segments() {
        assert_eq!(
            share_page_url("https://example.org/site/", "kodi", "c d"),
            "https://example.org/site/image/kodi/c%20d"
        );
    }

    #[test]
    fn test_render_contains_meta_tags() {
        let cat = sample();
        let html = render_share_page(&cat, &cat.images[0], (800, 600), &PageOptions::default());

        assert!(html.contains(r#"<meta property="og:title" content="c d | फलक लेखन">"#));
        assert!(html.contains(r#"content="कोडी (Riddles) - Phalak Lekhan Collection""#));
        assert!(html.contains(r#"<meta property="og:image:width" content="800">"#));
        assert!(html.contains(r#"<meta property="og:image:height" content="600">"#));
        assert!(html.contains("https://unmeshjoshi.github.io/phalakpages/image/kodi/c%20d"));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains("window.location.replace(\"/phalakpages/\")"));
        assert!(html.contains("spa-redirect-path"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let cat = CategoryRecord {
            id: "x".into(),
            display_name: "<b>\"Bold\"</b>".into(),
            images: vec![ImageRecord::new("x/a.jpg", "a&b")],
        };
        let html = render_share_page(&cat, &cat.images[0], (1, 1), &PageOptions::default());

        assert!(html.contains("&lt;b&gt;&quot;Bold&quot;&lt;/b&gt;"));
        assert!(html.contains("a&amp;b | "));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_write_share_pages() {
        let dir = tempfile::tempdir().unwrap();
        let options = PageOptions {
            site_root: dir.path().to_path_buf(),
            ..Default::default()
        };

        let count = write_share_pages(dir.path().join("image"), &[sample()], &options).unwrap();
        assert_eq!(count, 1);

        let page = dir.path().join("image").join("kodi").join("c d").join("index.html");
        let html = std::fs::read_to_string(page).unwrap();
        // Asset is missing, so the default size is announced
        assert!(html.contains(r#"<meta property="og:image:width" content="1200">"#));
        assert!(html.contains(r#"<meta property="og:image:height" content="630">"#));
    }

    #[test]
    fn test_write_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let cat = CategoryRecord {
            id: "..".into(),
            display_name: "up".into(),
            images: vec![ImageRecord::new("a.jpg", "a")],
        };

        let result = write_share_pages(dir.path(), &[cat], &PageOptions::default());
        assert!(matches!(result, Err(FsError::InvalidPath(_))));
    }
}
