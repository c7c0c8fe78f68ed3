//! Error types for mapping operations.

use std::path::PathBuf;

use sheetmap_model::ValidationError;
use thiserror::Error;

/// Errors from mapping operations.
///
/// Junk headers are not an error: they produce a result with every field
/// unmapped. Only structurally unusable input and bad configuration fail.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid collection: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid mapping option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },
}
