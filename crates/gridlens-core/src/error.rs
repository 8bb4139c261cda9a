//! Error types for snapshot ingestion.
//!
//! The geometric operations never fail; they report absence through `Option`
//! and empty collections. [`GridError`] covers the ingestion boundary where a
//! collaborator hands over a malformed document.
//!
//! # Example
//!
//! ```ignore
//! use gridlens_core::{GridResult, ingest};
//!
//! fn load(path: &str) -> GridResult<()> {
//!     let report = ingest::load_snapshot_file(path)?;
//!     println!("{}", report.diagnostics.summary());
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Error type for loading and normalizing network snapshots.
#[derive(Error, Debug)]
pub enum GridError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors (duplicate ids, malformed identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Parse(err.to_string())
    }
}
