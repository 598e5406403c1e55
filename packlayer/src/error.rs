//! Error types for container operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for container operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while resolving or reading resources.
#[derive(Debug, Error)]
pub enum PackError {
    /// No member supplies the requested resource.
    ///
    /// `path` is the fully-qualified logical path, e.g. `assets/minecraft/lang/en_us.json`.
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },

    /// I/O error raised by a member while reading.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to open or read a zip archive.
    #[error("Archive error in {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A `pack.mcmeta` document or metadata section could not be decoded.
    #[error("Invalid metadata in pack '{pack}': {reason}")]
    InvalidMetadata { pack: String, reason: String },

    /// A resource identifier is malformed.
    #[error("Invalid resource identifier '{0}'")]
    InvalidIdentifier(String),

    /// The container has already released its underlying handles.
    #[error("Container '{name}' is closed")]
    Closed { name: String },

    /// One or more members failed to close.
    #[error("Failed to close {} member(s): {}", .failures.len(), describe_failures(.failures))]
    Close { failures: Vec<CloseFailure> },
}

impl PackError {
    /// Create a not-found error from its logical path components.
    pub fn not_found(directory: &str, namespace: &str, path: &str) -> Self {
        PackError::ResourceNotFound {
            path: format!("{}/{}/{}", directory, namespace, path),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PackError::ResourceNotFound { .. })
    }
}

/// A single member's failure during a cascading close.
#[derive(Debug)]
pub struct CloseFailure {
    /// Name of the member that failed to close.
    pub container: String,

    /// The error it reported.
    pub error: PackError,
}

impl CloseFailure {
    /// Create a new close failure record.
    pub fn new(container: impl Into<String>, error: PackError) -> Self {
        Self {
            container: container.into(),
            error,
        }
    }
}

fn describe_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.container, f.error))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PackError::not_found("assets", "minecraft", "lang/en_us.json");
        assert_eq!(
            err.to_string(),
            "Resource not found: assets/minecraft/lang/en_us.json"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_error_is_not_not_found() {
        let err: PackError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_close_error_lists_members() {
        let err = PackError::Close {
            failures: vec![
                CloseFailure::new("a", PackError::Io(io::Error::other("boom"))),
                CloseFailure::new(
                    "b",
                    PackError::Closed {
                        name: "b".to_string(),
                    },
                ),
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("Failed to close 2 member(s)"));
        assert!(message.contains("a (I/O error: boom)"));
        assert!(message.contains("b (Container 'b' is closed)"));
    }
}
