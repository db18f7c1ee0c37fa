//! Phalak Gallery File System Layer
//!
//! Build-time side of the gallery:
//! - Catalog document schema shared with the client core
//! - Deep-link segment encoding
//! - Image tree scanning and catalog generation
//! - Social share page emission

mod document;
mod scan;
mod pages;

pub use document::{
    CategoryRecord, ImageRecord, read_catalog, write_catalog, encode_segment, decode_segment,
    filename_from_path,
};
pub use scan::{ScanOptions, ScannedImage, scan_images, build_catalog, default_category_names, is_skipped_dir, is_supported_image};
pub use pages::{REDIRECT_STORAGE_KEY, PageOptions, render_share_page, write_share_pages, share_page_url};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Catalog document error: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
