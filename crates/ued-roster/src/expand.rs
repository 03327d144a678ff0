// expand.rs — Fan roster records out into individually addressable send tasks.
//
// One roster record can carry several phone numbers; each one gets its own
// delivery attempt and its own history entry. A record whose contact field
// yields no usable phone is dropped here — that is an expected outcome, not
// an error.

use crate::phone::extract_phones;
use crate::record::RosterRecord;

/// One unit of dispatch work: a roster record paired with a single
/// normalized phone. Consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct SendTask {
    /// The owning roster record (shared unchanged across the record's tasks).
    pub record: RosterRecord,
    /// The normalized phone this task will be delivered to.
    pub phone: String,
}

/// Explode each record into one [`SendTask`] per extracted phone, preserving
/// roster order and, within a record, extraction order.
pub fn expand_tasks(records: Vec<RosterRecord>) -> Vec<SendTask> {
    let mut tasks = Vec::new();

    for record in records {
        let phones = extract_phones(&record.contact);
        if phones.is_empty() {
            tracing::warn!(
                "no usable phone for supply {} — skipping",
                record.supply_id.as_deref().unwrap_or("S/D")
            );
            continue;
        }
        for phone in phones {
            tasks.push(SendTask {
                record: record.clone(),
                phone,
            });
        }
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(supply_id: &str, contact: &str) -> RosterRecord {
        RosterRecord {
            supply_id: Some(supply_id.to_string()),
            name: Some("Test".to_string()),
            contact: contact.to_string(),
            validity: Some("VENCIDA".to_string()),
            extras: serde_json::Map::new(),
        }
    }

    #[test]
    fn record_with_two_phones_yields_two_tasks() {
        let tasks = expand_tasks(vec![record("1", "2611234567 / 2617654321")]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].phone, "5492611234567");
        assert_eq!(tasks[1].phone, "5492617654321");
        // Both tasks reference the same roster fields.
        assert_eq!(tasks[0].record, tasks[1].record);
    }

    #[test]
    fn record_without_phone_yields_no_tasks() {
        let tasks = expand_tasks(vec![record("1", "sin datos")]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn unusable_record_does_not_block_the_rest() {
        let tasks = expand_tasks(vec![
            record("1", "sin datos"),
            record("2", "2611234567"),
        ]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].record.supply_id.as_deref(), Some("2"));
    }

    #[test]
    fn every_task_has_a_phone() {
        let tasks = expand_tasks(vec![
            record("1", "Tel: 261-123-4567 / 54 9 2611234568"),
            record("2", ""),
            record("3", "2617654321"),
        ]);
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| !t.phone.is_empty()));
    }
}
