//! Error types module
//!
//! Configuration errors are fatal: a field whose upload directory cannot be used must
//! abort schema setup. Validation failures are not errors in this sense; they are
//! recorded on [`crate::ValidationErrors`] instead.

use std::io;
use std::path::PathBuf;

/// Errors raised while building a [`crate::FieldConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("upload field must have a `path` property set that points to a writable directory")]
    MissingPath,

    #[error("upload directory {path} does not exist: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("upload path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("upload directory {path} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid upload field options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidOptions(format!("JSON parsing error: {}", err))
    }
}

impl From<envy::Error> for ConfigError {
    fn from(err: envy::Error) -> Self {
        ConfigError::InvalidOptions(format!("environment error: {}", err))
    }
}
