//! Error types for the overlay session and its configuration.

use std::path::PathBuf;
use thiserror::Error;

use gridlens_core::GridError;

/// Result type for session and configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An operation needs a snapshot but none is loaded.
    #[error("no snapshot loaded")]
    NoSnapshotLoaded,

    /// Reading or normalizing a snapshot file failed.
    #[error("failed to load snapshot from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: GridError,
    },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other error from the data model.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
