// outcome_log.rs — Append-and-flush JSONL log of a single run's outcomes.
//
// Each outcome is written and flushed the moment it is classified, so a
// fatal mid-run channel failure leaves every completed attempt on disk.
// After a clean run the log is merged into the history; after a crash the
// `merge` subcommand folds the orphaned log in.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::record::NotificationRecord;

/// A per-run write-ahead log of notification outcomes, one JSON line each.
pub struct OutcomeLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl OutcomeLog {
    /// Open (or create) an outcome log at the given path. Append mode —
    /// reopening after a crash never clobbers recorded outcomes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| HistoryError::IoError {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Append one outcome and flush it to the OS immediately.
    pub fn append(&mut self, record: &NotificationRecord) -> Result<(), HistoryError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json).map_err(|source| HistoryError::IoError {
            path: self.path.clone(),
            source,
        })?;
        self.writer.flush().map_err(|source| HistoryError::IoError {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Read every outcome from a log file, oldest first. Blank lines are
    /// skipped gracefully.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<NotificationRecord>, HistoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| HistoryError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| HistoryError::IoError {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: NotificationRecord =
                serde_json::from_str(&line).map_err(|source| HistoryError::MalformedRecord {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
