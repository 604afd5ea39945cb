//! File logging

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "pubsub-tui.log";

/// `{data_dir}/pubsub-tui/logs`, or `./logs` when there is no data dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("pubsub-tui"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` so a single crate can be turned up without
/// touching the CLI flags. `log` records from the client crate reach the
/// same file through the subscriber's `tracing-log` bridge.
pub fn init_logging(dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(guard)
}
