//! CLI error type.

use std::io;

use packlayer::config::ConfigError;
use packlayer::logging::LoggingError;
use packlayer::PackError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("{0}")]
    Logging(#[from] LoggingError),

    /// A pack operation failed.
    #[error("{0}")]
    Pack(#[from] PackError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A command argument was rejected.
    #[error("{0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_error_passes_through() {
        let err: CliError = PackError::not_found("assets", "ns", "foo").into();
        assert_eq!(err.to_string(), "Resource not found: assets/ns/foo");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument("bad id".to_string());
        assert_eq!(err.to_string(), "bad id");
    }
}
