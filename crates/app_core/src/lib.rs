//! Phalak Gallery core
//!
//! This crate contains:
//! - The catalog store and selections
//! - Routes and the URL codec
//! - The view-state navigator and its history/rendering boundaries
//! - Command system and input translation
//! - Configuration
//! - Error types
//! - The session lifecycle around catalog loading

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod loader;
pub mod navigation;
pub mod render;
pub mod route;
pub mod session;

pub use catalog::{
    CatalogStore, CategoryCard, CategoryMeta, GalleryImage, ImageKey, Selection, SelectionScope,
};
pub use command::{Command, CommandDispatcher, CommandHandler, CommandId, CommandParams, Dispatch};
pub use config::{
    AppConfig, DisplayConfig, GeneralConfig, GeneratorConfig, NavigationConfig, RoutingConfig,
};
pub use error::AppError;
pub use history::{History, MemoryHistory};
pub use input::{InputEvent, InputHandler, SwipeDirection, SwipeTracker};
pub use loader::{CatalogFetcher, FileFetcher};
pub use navigation::{Navigator, UrlSync, ViewKind, ViewState};
pub use render::{RecordingRenderer, RenderCall, Renderer};
pub use route::{Route, RoutingMode, UrlCodec};
pub use session::{navigation_commands, Session, SessionState};
pub use app_fs::REDIRECT_STORAGE_KEY;
