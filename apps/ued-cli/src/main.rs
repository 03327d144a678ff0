//! # ued-cli
//!
//! Command-line interface for the UED renewal notifier.
//!
//! - `ued notify` — run a dispatch batch: load the roster, select expired
//!   records, extract phones, deliver, and fold the outcomes into history
//! - `ued merge <log>` — fold an orphaned per-run outcome log into history
//!   after an aborted run
//! - `ued query` — filter the notification history, optionally exporting CSV

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::NotifierConfig;

/// UED renewal notifier — dispatch, recover, and query notifications.
#[derive(Parser)]
#[command(name = "ued", version, about)]
struct Cli {
    /// Configuration file (defaults to ./ued.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a notification batch over the expired roster records.
    Notify {
        /// Roster file, overriding the configured path.
        #[arg(long)]
        roster: Option<PathBuf>,
    },
    /// Merge an orphaned outcome log into the history (crash recovery).
    Merge {
        /// Path to the per-run outcome log.
        outcome_log: PathBuf,
    },
    /// Filter the notification history.
    Query {
        /// Exact notification type ("Renovación - DI Vencida", …).
        #[arg(long)]
        notification_type: Option<String>,
        /// Calendar date the notification stamp must fall on (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
        /// Case-insensitive text matched against phone, contact, name, and
        /// supply id.
        #[arg(long)]
        text: Option<String>,
        /// Write the filtered records as CSV to this path instead of
        /// printing them.
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = NotifierConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Notify { roster } => commands::notify::execute(&config, roster.as_deref()),
        Commands::Merge { outcome_log } => commands::merge::execute(&config, outcome_log),
        Commands::Query {
            notification_type,
            date,
            text,
            export,
        } => commands::query::execute(
            &config,
            notification_type.as_deref(),
            date.as_deref(),
            text.as_deref(),
            export.as_deref(),
        ),
    }
}
