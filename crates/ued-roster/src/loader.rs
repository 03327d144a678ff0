// loader.rs — RosterLoader: read the roster file and select expired records.
//
// The roster is stored as JSONL: one record per line, column names matching
// the operational spreadsheet. The loader never writes to the file; the
// loaded records are the immutable input of a run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::RosterError;
use crate::record::RosterRecord;

/// Reads the roster dataset and selects the records due for notification.
pub struct RosterLoader {
    path: PathBuf,
}

impl RosterLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load every record from the roster file. Blank lines are skipped;
    /// a malformed line is an error (a silently dropped beneficiary is worse
    /// than a failed run).
    pub fn load(&self) -> Result<Vec<RosterRecord>, RosterError> {
        let file = File::open(&self.path).map_err(|source| RosterError::IoError {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| RosterError::IoError {
                path: self.path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RosterRecord =
                serde_json::from_str(&line).map_err(|source| RosterError::MalformedRecord {
                    path: self.path.clone(),
                    line: idx + 1,
                    source,
                })?;
            records.push(record);
        }

        tracing::info!("loaded {} roster records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Load the roster and keep only the expired records.
    pub fn expired_records(&self) -> Result<Vec<RosterRecord>, RosterError> {
        let all = self.load()?;
        let total = all.len();
        let expired: Vec<RosterRecord> = all.into_iter().filter(RosterRecord::is_expired).collect();
        tracing::info!("{} of {} roster records have expired validity", expired.len(), total);
        Ok(expired)
    }
}
