// query.rs — Filter the notification history from the command line.
//
// The same three filters the follow-up workflow uses: notification type,
// calendar date, free text. Results print as a compact table, or export as
// CSV for the spreadsheet-inclined.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use ued_history::{query::export_csv, HistoryQuery, HistoryStore};

use crate::config::NotifierConfig;

pub fn execute(
    config: &NotifierConfig,
    notification_type: Option<&str>,
    date: Option<&str>,
    text: Option<&str>,
    export: Option<&Path>,
) -> anyhow::Result<()> {
    let date = date
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{d}' — expected YYYY-MM-DD"))
        })
        .transpose()?;

    let query = HistoryQuery {
        notification_type: notification_type.map(str::to_string),
        date,
        text: text.map(str::to_string),
    };

    let history = HistoryStore::load(&config.paths.history).context("loading history")?;
    let hits = query.filter(history.records());

    if hits.is_empty() {
        println!("No records match the given filters.");
        return Ok(());
    }

    if let Some(export_path) = export {
        let csv = export_csv(&hits);
        std::fs::write(export_path, csv)
            .with_context(|| format!("writing export {}", export_path.display()))?;
        println!("Exported {} records to {}.", hits.len(), export_path.display());
        return Ok(());
    }

    println!("{} matching records:", hits.len());
    for record in hits {
        println!(
            "{} | {} | {} | {} | {} | {}",
            record.roster.supply_id.as_deref().unwrap_or("S/D"),
            record.roster.name.as_deref().unwrap_or("Usuario"),
            record.phone,
            record.notified_at,
            record.status,
            record.observation
        );
    }
    Ok(())
}
