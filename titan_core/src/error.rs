//! Error types for the titan_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for titan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad numeric input (non-positive mass, MET, sets or reps)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The durable store could not be written
    #[error("Storage unavailable at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Store written by a newer layout version
    #[error("Unsupported store version {0}")]
    UnsupportedVersion(u32),

    /// Exercise name not present in the catalog
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}
