// error.rs — Error types for roster loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the roster dataset.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The roster file could not be opened or read.
    #[error("cannot read roster file {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A roster line was not valid JSON.
    #[error("malformed roster record at {path}:{line}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}
