//! Phalak Gallery - catalog generator and headless navigation driver
//!
//! Main entry point for the command line tool.

mod app;
mod cli;

use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging and panic hook first
    let options = app_log::LogOptions {
        console: cli.verbose,
        ..Default::default()
    };
    let _log_guard = match app_log::init(options) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {:#}", e);
            None
        }
    };

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(&app_log::log_dir(), 7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Phalak Gallery starting...");

    let config = match &cli.config {
        Some(path) => app_core::AppConfig::load_from(path)?,
        None => app_core::AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {}", e);
            Default::default()
        }),
    };

    app::run(cli.command, &config).await
}
