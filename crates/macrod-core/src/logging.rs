//! Logging configuration using tracing

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/macrod/logs/`. A daemon has no
/// terminal, so when `stderr` is false the file appender is the only
/// output; foreground runs add a stderr layer on top.
///
/// Log level is controlled by the `MACROD_LOG` environment variable.
///
/// # Examples
/// ```bash
/// MACROD_LOG=debug macrod --foreground
/// ```
pub fn init(stderr: bool) -> Result<()> {
    let log_dir = default_log_directory();
    init_with_dir(&log_dir, stderr)
}

/// Initialize logging with an explicit log directory
pub fn init_with_dir(log_dir: &Path, stderr: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "macrod.log");

    // Default to info, allow override via MACROD_LOG
    let env_filter =
        EnvFilter::try_from_env("MACROD_LOG").unwrap_or_else(|_| EnvFilter::new("macrod=info,warn"));

    let registry = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(fmt::time::ChronoLocal::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            )),
    );

    if stderr {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    } else {
        registry.init();
    }

    tracing::info!("macrod starting, log directory: {}", log_dir.display());

    Ok(())
}

/// Default log directory under the platform data dir
pub fn default_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("macrod").join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directory_ends_with_logs() {
        let dir = default_log_directory();
        assert!(dir.ends_with("macrod/logs"));
    }
}
