use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_dir};

pub const LOG_ENV: &str = "PLAYDECK_LOG";
const LOG_FILE: &str = "playdeck.log";

/// Route `tracing` output to `playdeck.log`. The terminal belongs to the
/// TUI, so nothing is written to stdout or stderr.
///
/// The returned guard flushes the writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init(settings: &LoggingSettings) -> Result<WorkerGuard> {
    let dir = settings
        .directory
        .clone()
        .or_else(default_log_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("installing the tracing subscriber")?;

    Ok(guard)
}
