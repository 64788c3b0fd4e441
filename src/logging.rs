//! File logging
//!
//! The terminal belongs to the UI, so all tracing output goes to a daily
//! rotated file under the configured log directory.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppConfig;

const LOG_FILE_NAME: &str = "games-admin.log";

/// Installs the global subscriber. The returned guard flushes pending
/// records on drop and must be held until exit.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    info!(log_dir = ?config.log_dir, level = %config.log_level, "logging initialized");
    Ok(guard)
}
