//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (fall back to a well-defined view) =====
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Image not found: {category}/{name}")]
    ImageNotFound { category: String, name: String },

    #[error("Invalid command {command}: {reason}")]
    InvalidCommand { command: String, reason: String },

    // ===== Fatal Errors (terminal for the session) =====
    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("Catalog load failed: {0}")]
    CatalogLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::CategoryNotFound(_)
                | AppError::ImageNotFound { .. }
                | AppError::InvalidCommand { .. }
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::MalformedCatalog(_) | AppError::CatalogLoad(_) => {
                "Error loading images. Please make sure images.json exists.".to_string()
            }
            AppError::CategoryNotFound(id) => format!("No such category: {}", id),
            AppError::ImageNotFound { category, name } => {
                format!("No such image: {} in {}", name, category)
            }
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::Document(e) => AppError::MalformedCatalog(e.to_string()),
            _ => AppError::CatalogLoad(e.to_string()),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(AppError::CategoryNotFound("x".into()).is_recoverable());
        assert!(AppError::MalformedCatalog("x".into()).is_fatal());
        assert!(AppError::CatalogLoad("404".into()).is_fatal());
    }

    #[test]
    fn test_image_not_found_is_recoverable() {
        let err = AppError::ImageNotFound {
            category: "kodi".into(),
            name: "zzz".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Image not found: kodi/zzz");
        assert_eq!(err.user_message(), "No such image: zzz in kodi");
    }

    #[test]
    fn test_document_error_is_malformed() {
        let err = app_fs::read_catalog("{").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::MalformedCatalog(_)));
    }
}
