// config.rs — Notifier configuration.
//
// Loaded from `ued.toml` next to the data files; every field has a default,
// so a missing file (or a partial one) still yields a working layout under
// `.ued/`. The pacing values exist so the dispatcher waits are tunable
// operational settings instead of magic constants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use ued_dispatch::SendPacing;

/// Top-level configuration for the `ued` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Where the roster, history, and per-run outcome logs live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// The roster dataset (JSONL, read-only input).
    #[serde(default = "default_roster")]
    pub roster: PathBuf,
    /// The cumulative notification history (JSONL, rewritten on merge).
    #[serde(default = "default_history")]
    pub history: PathBuf,
    /// Directory for per-run outcome logs.
    #[serde(default = "default_outcome_dir")]
    pub outcome_dir: PathBuf,
}

fn default_roster() -> PathBuf {
    PathBuf::from("padron.jsonl")
}

fn default_history() -> PathBuf {
    PathBuf::from(".ued/historial.jsonl")
}

fn default_outcome_dir() -> PathBuf {
    PathBuf::from(".ued/outcomes")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            history: default_history(),
            outcome_dir: default_outcome_dir(),
        }
    }
}

/// Second-granularity overrides for the dispatcher waits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_session_settle")]
    pub session_settle_secs: u64,
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_focus_settle")]
    pub focus_settle_secs: u64,
    #[serde(default = "default_pre_submit")]
    pub pre_submit_secs: u64,
    #[serde(default = "default_post_submit")]
    pub post_submit_secs: u64,
}

fn default_session_settle() -> u64 {
    6
}
fn default_ready_timeout() -> u64 {
    20
}
fn default_focus_settle() -> u64 {
    2
}
fn default_pre_submit() -> u64 {
    1
}
fn default_post_submit() -> u64 {
    3
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            session_settle_secs: default_session_settle(),
            ready_timeout_secs: default_ready_timeout(),
            focus_settle_secs: default_focus_settle(),
            pre_submit_secs: default_pre_submit(),
            post_submit_secs: default_post_submit(),
        }
    }
}

impl PacingConfig {
    pub fn to_send_pacing(&self) -> SendPacing {
        SendPacing {
            session_settle: Duration::from_secs(self.session_settle_secs),
            ready_timeout: Duration::from_secs(self.ready_timeout_secs),
            focus_settle: Duration::from_secs(self.focus_settle_secs),
            pre_submit: Duration::from_secs(self.pre_submit_secs),
            post_submit: Duration::from_secs(self.post_submit_secs),
        }
    }
}

impl NotifierConfig {
    /// Load configuration. An explicitly given path must exist; the default
    /// `ued.toml` is optional and falls back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from("ued.toml");
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: NotifierConfig = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}
