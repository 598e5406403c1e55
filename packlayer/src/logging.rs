//! Tracing subscriber setup.
//!
//! Logs always go to stderr. When a log directory is configured, a daily
//! rolling file is written as well through a non-blocking appender; keep the
//! returned guard alive until shutdown so buffered lines are flushed.

use std::io;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// File name prefix for rolling log files.
pub const LOG_FILE_NAME: &str = "packlayer.log";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// The log directory could not be created.
    #[error("Failed to create log directory: {0}")]
    Io(#[from] io::Error),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// Returns the file writer guard when file logging is enabled.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = build_filter(&settings.level)?;
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("packlayer=debug,warn").is_ok());
    }

    #[test]
    fn test_init_with_directory_creates_it() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        let settings = LoggingSettings {
            level: "debug".to_string(),
            directory: Some(dir.clone()),
        };

        let guard = init_logging(&settings).unwrap();
        assert!(guard.is_some());
        assert!(dir.is_dir());

        // Second install in the same process is refused.
        let err = init_logging(&LoggingSettings::default()).unwrap_err();
        assert!(matches!(err, LoggingError::AlreadyInitialized(_)));
    }
}
