//! Error types for nimbus.

use crate::core::validator::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nimbus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// The definition violates a structural invariant
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Several violations reported by collect-all validation
    #[error("{0} validation error(s)")]
    ValidationFailed(usize),

    /// Authored document could not be decoded
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Execution message could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File access failed
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A string is not a `$(collection.items.N.field)` placeholder
    #[error("invalid placeholder: {0}")]
    Placeholder(String),
}

impl Error {
    /// Create an I/O error carrying the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a placeholder parse error
    pub fn placeholder(msg: impl Into<String>) -> Self {
        Self::Placeholder(msg.into())
    }
}
