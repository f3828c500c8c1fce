//! Error types for the record model and filter configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a [`FilterConfig`](crate::FilterConfig).
#[derive(Debug, Error)]
pub enum ModelError {
    /// A dynamic key pattern does not carry exactly one placeholder.
    #[error("invalid dynamic pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for a filter configuration.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InvalidPattern {
            pattern: "kind-nahrung".to_string(),
            reason: "expected exactly one {id} placeholder, found 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid dynamic pattern 'kind-nahrung': expected exactly one {id} placeholder, found 0"
        );
    }
}
