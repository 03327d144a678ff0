// record.rs — NotificationRecord: the durable outcome of one send attempt.
//
// Column names match the history file the follow-up tooling reads, so
// records serialize straight into the operational schema. All roster fields
// are flattened in — the history carries the full beneficiary row alongside
// the delivery metadata.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ued_roster::RosterRecord;

/// Minute-resolution wall-clock stamp, the granularity the history keys on.
pub fn now_minute() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Terminal delivery status of a send attempt.
///
/// Soft and hard failures both record `Failed` — the distinction lives in
/// the observation text, not the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "Sent"),
            DeliveryStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One notification outcome. Written once when the outcome is determined,
/// never updated within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// The originating roster row, carried through in full.
    #[serde(flatten)]
    pub roster: RosterRecord,

    /// The normalized phone this attempt targeted.
    #[serde(rename = "telefonos")]
    pub phone: String,

    /// Notification type — one fixed string per run.
    #[serde(rename = "Tipo Notificación")]
    pub notification_type: String,

    /// Minute-resolution stamp taken when the outcome was determined.
    /// Part of the history deduplication key.
    #[serde(rename = "Fecha Notificación")]
    pub notified_at: String,

    /// Terminal delivery status.
    #[serde(rename = "Estado Notificación")]
    pub status: DeliveryStatus,

    /// Empty on success; diagnostic detail on failure.
    #[serde(rename = "Observaciones", default)]
    pub observation: String,

    /// Minute-resolution stamp of the run this record belongs to.
    #[serde(rename = "Timestamp de Ejecución")]
    pub executed_at: String,

    /// Identifier of the execution batch. Absent in history written by
    /// older versions of the tool.
    #[serde(rename = "Run ID", default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,

    // Follow-up columns maintained by hand after the fact. Defaulted so
    // history files that predate them still deserialize.
    #[serde(rename = "Visto", default)]
    pub seen: String,
    #[serde(rename = "Respondió", default)]
    pub replied: String,
    #[serde(rename = "Respuesta", default)]
    pub reply: String,
    #[serde(rename = "Estado Caso", default)]
    pub case_status: String,
}

impl NotificationRecord {
    /// Create a record for an outcome determined right now. The notification
    /// timestamp is stamped here — tasks processed later in a run carry
    /// later stamps.
    pub fn new(
        roster: RosterRecord,
        phone: impl Into<String>,
        notification_type: impl Into<String>,
        status: DeliveryStatus,
        observation: impl Into<String>,
        executed_at: impl Into<String>,
        run_id: Uuid,
    ) -> Self {
        Self {
            roster,
            phone: phone.into(),
            notification_type: notification_type.into(),
            notified_at: now_minute(),
            status,
            observation: observation.into(),
            executed_at: executed_at.into(),
            run_id: Some(run_id),
            seen: String::new(),
            replied: String::new(),
            reply: String::new(),
            case_status: String::new(),
        }
    }

    /// The deduplication identity: (supply id, phone, notification stamp).
    /// The same phone under a different supply id is never a duplicate.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.roster.supply_id.clone().unwrap_or_default(),
            self.phone.clone(),
            self.notified_at.clone(),
        )
    }
}
