// query.rs — Typed filtering over the notification history.
//
// The follow-up workflow asks three questions: which notification type,
// which calendar day, and does any identifying field contain this text.
// All three are optional; an empty query matches everything.

use chrono::{NaiveDate, NaiveDateTime};

use crate::record::NotificationRecord;

/// A filter over the history. Unset fields mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Exact notification-type match.
    pub notification_type: Option<String>,
    /// Calendar date the notification stamp must fall on.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring matched against phone, raw contact,
    /// beneficiary name, and supply id.
    pub text: Option<String>,
}

impl HistoryQuery {
    /// Whether a record passes every set constraint.
    pub fn matches(&self, record: &NotificationRecord) -> bool {
        if let Some(ref kind) = self.notification_type {
            if record.notification_type != *kind {
                return false;
            }
        }

        if let Some(date) = self.date {
            // A stamp that doesn't parse can't match a date filter.
            match parse_stamp(&record.notified_at) {
                Some(stamp) if stamp.date() == date => {}
                _ => return false,
            }
        }

        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            let haystacks = [
                record.phone.as_str(),
                record.roster.contact.as_str(),
                record.roster.name.as_deref().unwrap_or(""),
                record.roster.supply_id.as_deref().unwrap_or(""),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }

        true
    }

    /// Filter a slice of records, preserving order.
    pub fn filter<'a>(&self, records: &'a [NotificationRecord]) -> Vec<&'a NotificationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Parse a minute-resolution history stamp.
fn parse_stamp(stamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M").ok()
}

/// Render records as a CSV document for download/hand-off. The follow-up
/// columns are always present, empty when never filled in.
pub fn export_csv(records: &[&NotificationRecord]) -> String {
    const HEADER: &[&str] = &[
        "Nº SUMINISTRO",
        "NOMBRE ELECTRODEPENDIENTE",
        "telefonos",
        "Fecha Notificación",
        "Tipo Notificación",
        "Estado Notificación",
        "Observaciones",
        "Estado Caso",
        "Visto",
        "Respondió",
        "Respuesta",
    ];

    let mut out = String::new();
    out.push_str(&HEADER.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(","));
    out.push('\n');

    for record in records {
        let status = record.status.to_string();
        let fields = [
            record.roster.supply_id.as_deref().unwrap_or(""),
            record.roster.name.as_deref().unwrap_or(""),
            record.phone.as_str(),
            record.notified_at.as_str(),
            record.notification_type.as_str(),
            status.as_str(),
            record.observation.as_str(),
            record.case_status.as_str(),
            record.seen.as_str(),
            record.replied.as_str(),
            record.reply.as_str(),
        ];
        out.push_str(&fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
