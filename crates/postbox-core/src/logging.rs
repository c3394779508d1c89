//! Tracing subscriber setup.
//!
//! Filter resolution order: `POSTBOX_LOG` env var, then the configured
//! `log_level`, then `warn`.

use std::io::stderr;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "POSTBOX_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from env, falling back to the configured level.
pub fn env_filter(config_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = config_level
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive until exit
/// so buffered lines are flushed.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config.log_level.as_deref());

    if config.log_to_file {
        let dir = paths::logs_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::daily(&dir, "postbox.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;
        Ok(None)
    }
}
