// notify.rs — The full dispatch pipeline for one run.
//
// Roster → expired records → phone extraction → task fan-out → sequential
// delivery (each outcome flushed to the run's outcome log) → history merge.
// A fatal channel failure aborts before the merge; the outcome log then
// holds everything completed so far, recoverable with `ued merge`.

use std::path::Path;

use anyhow::Context;

use ued_dispatch::{ConsoleChannel, Dispatcher};
use ued_history::{DeliveryStatus, HistoryStore, OutcomeLog};
use ued_roster::{expand_tasks, RosterLoader};

use crate::config::NotifierConfig;

pub fn execute(config: &NotifierConfig, roster_override: Option<&Path>) -> anyhow::Result<()> {
    let roster_path = roster_override.unwrap_or(&config.paths.roster);

    let expired = RosterLoader::new(roster_path)
        .expired_records()
        .context("loading roster")?;
    let tasks = expand_tasks(expired);

    if tasks.is_empty() {
        println!("No expired records with usable phones — nothing to send.");
        return Ok(());
    }
    tracing::info!("dispatching {} send tasks", tasks.len());

    let dispatcher = Dispatcher::new(config.pacing.to_send_pacing());
    let log_path = config
        .paths
        .outcome_dir
        .join(format!("run-{}.jsonl", dispatcher.run_id()));
    let mut log = OutcomeLog::open(&log_path).context("opening outcome log")?;

    // The channel lifecycle belongs here, not inside the dispatcher. The
    // console channel logs instead of sending; a browser-driven channel
    // plugs in through the same trait.
    let mut channel = ConsoleChannel::new();
    let records = dispatcher
        .run(&mut channel, tasks, &mut log)
        .with_context(|| {
            format!(
                "dispatch aborted — completed outcomes are preserved in {}",
                log_path.display()
            )
        })?;

    let sent = records
        .iter()
        .filter(|r| r.status == DeliveryStatus::Sent)
        .count();
    let failed = records.len() - sent;

    let mut history = HistoryStore::load(&config.paths.history).context("loading history")?;
    let added = history.merge(records);
    history
        .save(&config.paths.history)
        .context("saving history")?;

    println!(
        "Run {} finished: {} sent, {} failed, {} new history records in {}",
        dispatcher.run_id(),
        sent,
        failed,
        added,
        config.paths.history.display()
    );
    Ok(())
}
