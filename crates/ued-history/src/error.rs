// error.rs — Error types for outcome logging and history persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while logging outcomes or merging history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A file could not be opened, read, or written.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A persisted line was not a valid notification record.
    #[error("malformed record at {path}:{line}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    /// Serialization of a record failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
