// store.rs — HistoryStore: the cumulative, deduplicated notification history.
//
// The history is a flat JSONL table, rewritten wholesale on every merge.
// Merge order is prior history first, new outcomes second; a record whose
// (supply id, phone, notification stamp) triple is already present is
// dropped, so a prior entry always wins over a same-key rerun record.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::record::NotificationRecord;

/// In-memory view of the persisted history.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Vec<NotificationRecord>,
}

impl HistoryStore {
    /// Load the history file; an absent file is an empty history (first run).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("no history at {} yet — starting empty", path.display());
            return Ok(Self::default());
        }

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

        Ok(Self { records })
    }

    /// Fold a run's outcomes into the history. Existing entries keep their
    /// place; a new record whose dedup triple is already present is dropped.
    /// Returns how many records were actually added.
    pub fn merge(&mut self, new_records: impl IntoIterator<Item = NotificationRecord>) -> usize {
        let mut seen: HashSet<(String, String, String)> =
            self.records.iter().map(|r| r.dedup_key()).collect();

        let mut added = 0;
        for record in new_records {
            if seen.insert(record.dedup_key()) {
                self.records.push(record);
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("merged {} new notification records into history", added);
        }
        added
    }

    /// Persist the full history, overwriting the prior file. Written to a
    /// sibling temp file first and renamed into place, so a crash mid-write
    /// cannot truncate the history.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HistoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp: PathBuf = path.with_extension("jsonl.tmp");
        {
            let file = File::create(&tmp).map_err(|source| HistoryError::IoError {
                path: tmp.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            for record in &self.records {
                let json = serde_json::to_string(record)?;
                writeln!(writer, "{}", json).map_err(|source| HistoryError::IoError {
                    path: tmp.clone(),
                    source,
                })?;
            }
            writer.flush().map_err(|source| HistoryError::IoError {
                path: tmp.clone(),
                source,
            })?;
        }
        std::fs::rename(&tmp, path).map_err(|source| HistoryError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// All records, oldest merge position first.
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
