//! Structured logging setup with tracing

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where and how to log
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub dir: PathBuf,
    /// Log file name prefix; files are `<prefix>.<date>.log`
    pub file_prefix: String,
    /// Human-readable output on stderr
    pub console: bool,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            dir: super::log_dir(),
            file_prefix: "phalak_gallery".to_string(),
            console: cfg!(debug_assertions),
            default_filter: "info".to_string(),
        }
    }
}

/// Flushes the file writer when dropped
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Initialize the logging system
pub fn init_logging(options: LogOptions) -> anyhow::Result<LogGuard> {
    std::fs::create_dir_all(&options.dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&options.file_prefix)
        .filename_suffix("log")
        .build(&options.dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let console = options
        .console
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(fmt::layer().json().with_writer(non_blocking))
        .try_init()?;

    tracing::info!("Logging initialized in {:?}", options.dir);
    Ok(LogGuard { _file: guard })
}

/// Clean up log files in `log_dir` older than specified days
pub fn cleanup_old_logs(log_dir: &Path, days: u32) -> anyhow::Result<usize> {
    use std::time::{Duration, SystemTime};

    if !log_dir.exists() {
        return Ok(0);
    }

    let age = Duration::from_secs(days as u64 * 24 * 60 * 60);
    let Some(threshold) = SystemTime::now().checked_sub(age) else {
        return Ok(0);
    };
    let mut deleted = 0;

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().map_or(false, |ext| ext == "log") {
            let modified = entry.metadata().and_then(|m| m.modified());
            if matches!(modified, Ok(time) if time < threshold) && std::fs::remove_file(&path).is_ok() {
                deleted += 1;
                tracing::debug!("Deleted old log: {:?}", path);
            }
        }
    }

    tracing::info!("Cleaned up {} old log files", deleted);
    Ok(deleted)
}
