//! Routes and their URL encodings
//!
//! Three route shapes exist: home, a category gallery and a single image.
//! `UrlCodec` maps them to and from either path URLs
//! (`<base>category/<id>`, `<base>image/<id>/<name>`) or fragment URLs
//! (`<base>#category/<id>`, `<base>#image/<id>/<name>`). Segments are
//! percent-encoded like `encodeURIComponent`.

use app_fs::{decode_segment, encode_segment};
use serde::{Deserialize, Serialize};

const CATEGORY_PREFIX: &str = "category";
const IMAGE_PREFIX: &str = "image";

/// A navigable location of the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category { category_id: String },
    Image { category_id: String, name: String },
}

impl Route {
    pub fn category(category_id: &str) -> Self {
        Route::Category {
            category_id: category_id.to_string(),
        }
    }

    pub fn image(category_id: &str, name: &str) -> Self {
        Route::Image {
            category_id: category_id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Where the route lives in the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoutingMode {
    #[serde(rename = "path")]
    #[default]
    Path,
    #[serde(rename = "hash")]
    Hash,
}

/// Bidirectional mapping between routes and URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCodec {
    mode: RoutingMode,
    /// Always starts and ends with `/`
    base: String,
}

impl UrlCodec {
    pub fn new(mode: RoutingMode, base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        Self { mode, base }
    }

    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of a route
    pub fn format(&self, route: &Route) -> String {
        let tail = match route {
            Route::Home => return self.base.clone(),
            Route::Category { category_id } => {
                format!("{}/{}", CATEGORY_PREFIX, encode_segment(category_id))
            }
            Route::Image { category_id, name } => format!(
                "{}/{}/{}",
                IMAGE_PREFIX,
                encode_segment(category_id),
                encode_segment(name)
            ),
        };

        match self.mode {
            RoutingMode::Path => format!("{}{}", self.base, tail),
            RoutingMode::Hash => format!("{}#{}", self.base, tail),
        }
    }

    /// Route of a URL; anything unrecognized is home
    pub fn parse(&self, url: &str) -> Route {
        let local = strip_origin(url);

        let route_part = match self.mode {
            RoutingMode::Path => {
                let path = local.split(['?', '#']).next().unwrap_or("");
                match path.strip_prefix(self.base.as_str()) {
                    Some(rest) => rest,
                    None => {
                        if path != self.base.trim_end_matches('/') {
                            tracing::debug!("URL {:?} is outside base {:?}", url, self.base);
                        }
                        ""
                    }
                }
            }
            RoutingMode::Hash => match local.split_once('#') {
                Some((_, fragment)) => fragment.split('?').next().unwrap_or(""),
                None => "",
            },
        };

        parse_segments(route_part)
    }
}

/// Drop `scheme://host` from an absolute URL
fn strip_origin(url: &str) -> &str {
    match url.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            match rest.find(['/', '#', '?']) {
                Some(i) => &rest[i..],
                None => "/",
            }
        }
        _ => url,
    }
}

fn parse_segments(route_part: &str) -> Route {
    let trimmed = route_part.trim_matches('/');
    if trimmed.is_empty() {
        return Route::Home;
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    let decoded: Option<Vec<String>> = parts[1..].iter().map(|p| decode_segment(p)).collect();

    let Some(args) = decoded else {
        tracing::debug!("Undecodable route {:?}", route_part);
        return Route::Home;
    };

    match (parts[0], args.as_slice()) {
        (CATEGORY_PREFIX, [category_id]) if !category_id.is_empty() => Route::Category {
            category_id: category_id.clone(),
        },
        (IMAGE_PREFIX, [category_id, name]) if !category_id.is_empty() && !name.is_empty() => {
            Route::Image {
                category_id: category_id.clone(),
                name: name.clone(),
            }
        }
        _ => {
            tracing::debug!("Unrecognized route {:?}", route_part);
            Route::Home
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path_codec() -> UrlCodec {
        UrlCodec::new(RoutingMode::Path, "/phalakpages/")
    }

    fn hash_codec() -> UrlCodec {
        UrlCodec::new(RoutingMode::Hash, "/phalakpages")
    }

    #[test]
    fn test_base_normalization() {
        assert_eq!(UrlCodec::new(RoutingMode::Path, "").base(), "/");
        assert_eq!(UrlCodec::new(RoutingMode::Path, "/").base(), "/");
        assert_eq!(UrlCodec::new(RoutingMode::Path, "site").base(), "/site/");
        assert_eq!(UrlCodec::new(RoutingMode::Path, "/a/b/").base(), "/a/b/");
    }

    #[test]
    fn test_format_path_mode() {
        let codec = path_codec();
        assert_eq!(codec.format(&Route::Home), "/phalakpages/");
        assert_eq!(codec.format(&Route::category("vyakti")), "/phalakpages/category/vyakti");
        assert_eq!(codec.format(&Route::image("vyakti", "b c")), "/phalakpages/image/vyakti/b%20c");
    }

    #[test]
    fn test_format_hash_mode() {
        let codec = hash_codec();
        assert_eq!(codec.format(&Route::Home), "/phalakpages/");
        assert_eq!(codec.format(&Route::category("kodi")), "/phalakpages/#category/kodi");
        assert_eq!(codec.format(&Route::image("kodi", "c")), "/phalakpages/#image/kodi/c");
    }

    #[test]
    fn test_parse_path_mode() {
        let codec = path_codec();
        assert_eq!(codec.parse("/phalakpages/"), Route::Home);
        assert_eq!(codec.parse("/phalakpages"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/category/kodi"), Route::category("kodi"));
        assert_eq!(codec.parse("/phalakpages/category/kodi/"), Route::category("kodi"));
        assert_eq!(codec.parse("/phalakpages/image/kodi/c?ref=share"), Route::image("kodi", "c"));
        assert_eq!(
            codec.parse("https://example.org/phalakpages/image/a%2Fb/%E0%A4%95"),
            Route::image("a/b", "क")
        );
    }

    #[test]
    fn test_parse_hash_mode() {
        let codec = hash_codec();
        assert_eq!(codec.parse("/phalakpages/"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/#"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/#category/vyakti"), Route::category("vyakti"));
        assert_eq!(codec.parse("#image/vyakti/a"), Route::image("vyakti", "a"));
    }

    #[test]
    fn test_parse_unrecognized_is_home() {
        let codec = path_codec();
        assert_eq!(codec.parse("/phalakpages/image/onlyone"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/image/a/b/c"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/about"), Route::Home);
        assert_eq!(codec.parse("/elsewhere/category/kodi"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/category/%FF"), Route::Home);
        assert_eq!(codec.parse("/phalakpages/image//c"), Route::Home);
    }

    proptest! {
        #[test]
        fn prop_image_route_round_trip(category in "\\PC{1,12}", name in "\\PC{1,12}") {
            for codec in [path_codec(), hash_codec()] {
                let route = Route::image(&category, &name);
                let url = codec.format(&route);
                prop_assert_eq!(codec.parse(&url), route);
            }
        }

        #[test]
        fn prop_category_route_round_trip(category in "\\PC{1,12}") {
            for codec in [path_codec(), hash_codec()] {
                let route = Route::category(&category);
                prop_assert_eq!(codec.parse(&codec.format(&route)), route);
            }
        }
    }
}
