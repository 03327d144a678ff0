// merge.rs — Fold an orphaned outcome log into the history.
//
// Used after a run aborted between dispatch and merge: the per-task
// append-and-flush log holds every classified outcome, so nothing is lost.
// Merging is idempotent — running it twice adds nothing the second time.

use std::path::Path;

use anyhow::Context;

use ued_history::{HistoryStore, OutcomeLog};

use crate::config::NotifierConfig;

pub fn execute(config: &NotifierConfig, outcome_log: &Path) -> anyhow::Result<()> {
    let records = OutcomeLog::read_all(outcome_log)
        .with_context(|| format!("reading outcome log {}", outcome_log.display()))?;

    if records.is_empty() {
        println!("Outcome log {} holds no records.", outcome_log.display());
        return Ok(());
    }

    let mut history = HistoryStore::load(&config.paths.history).context("loading history")?;
    let added = history.merge(records);
    history
        .save(&config.paths.history)
        .context("saving history")?;

    println!(
        "Merged {} new records from {} into {} ({} total).",
        added,
        outcome_log.display(),
        config.paths.history.display(),
        history.len()
    );
    Ok(())
}
