//! Phalak Gallery logging
//!
//! Console and rolling JSON file logging, plus a panic hook writing crash reports.

mod panic_hook;
mod logging;

pub use panic_hook::init_panic_hook;
pub use logging::{init_logging, cleanup_old_logs, LogGuard, LogOptions};

use std::path::PathBuf;
use directories::ProjectDirs;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("org", "Phalak", "PhalakGallery")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging and the panic hook
///
/// Keep the returned guard alive until exit so buffered file output is flushed.
pub fn init(options: LogOptions) -> anyhow::Result<LogGuard> {
    let guard = init_logging(options)?;
    init_panic_hook();
    Ok(guard)
}
