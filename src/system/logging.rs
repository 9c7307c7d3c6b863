//! Logging system initialization
//!
//! Sets up the tracing subscriber from `[logging]`: console or file output,
//! optional daily rotation, text or JSON format.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::{LoggingConfig, StaticConfig};

const DEFAULT_LOG_NAME: &str = "nepstay.log";

fn log_to_console(config: &LoggingConfig) -> bool {
    config.file.as_ref().is_none_or(|f| f.is_empty())
}

fn build_writer(config: &LoggingConfig) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Ok(Box::new(std::io::stdout()));
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_NAME);

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .with_context(|| format!("Failed to create rolling log appender in {:?}", dir))?;
        return Ok(Box::new(appender));
    }

    // 不轮转，追加写入
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file))?;
    Ok(Box::new(file))
}

/// Initialize logging system based on configuration
///
/// The returned `WorkerGuard` must be kept alive for the duration of the
/// program so that buffered log lines are flushed.
///
/// `RUST_LOG` overrides `logging.level` when set.
pub fn init_logging(config: &StaticConfig) -> Result<WorkerGuard> {
    let logging = &config.logging;
    let writer = build_writer(logging)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_to_console(logging));

    if logging.format.eq_ignore_ascii_case("json") {
        subscriber_builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to install logger: {}", e))?;
    } else {
        subscriber_builder
            .try_init()
            .map_err(|e| anyhow!("Failed to install logger: {}", e))?;
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(file: Option<&str>, enable_rotation: bool) -> LoggingConfig {
        LoggingConfig {
            level: "info".into(),
            format: "text".into(),
            file: file.map(String::from),
            max_backups: 3,
            enable_rotation,
        }
    }

    #[test]
    fn test_console_when_file_empty() {
        assert!(log_to_console(&logging(None, false)));
        assert!(log_to_console(&logging(Some(""), true)));
        assert!(!log_to_console(&logging(Some("logs/app.log"), true)));
    }

    #[test]
    fn test_append_file_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nepstay.log");
        let path_str = path.to_str().unwrap();

        let mut writer = build_writer(&logging(Some(path_str), false)).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(build_writer(&logging(path.to_str(), false)).is_err());
    }
}
