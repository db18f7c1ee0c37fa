//! Catalog fetching

use crate::AppError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Fetches the catalog document by URL
#[async_trait]
pub trait CatalogFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}

/// Serves URLs from a local directory, like a static host would
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, AppError> {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let relative = path.trim_start_matches('/');

        if relative.is_empty() || relative.split('/').any(|s| s == "..") {
            return Err(AppError::CatalogLoad(format!("invalid catalog URL: {}", url)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl CatalogFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let path = self.resolve(url)?;
        tracing::debug!("Fetching catalog {} from {:?}", url, path);

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::CatalogLoad(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_relative_url() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("images.json"), "[]").unwrap();

        let fetcher = FileFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("images.json").await.unwrap(), "[]");
        assert_eq!(fetcher.fetch("/images.json?v=2").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_fetch_failures() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path());

        assert!(matches!(fetcher.fetch("missing.json").await, Err(AppError::CatalogLoad(_))));
        assert!(matches!(fetcher.fetch("../etc/passwd").await, Err(AppError::CatalogLoad(_))));
    }
}
