//! # ued-history
//!
//! Durable side of the UED notification pipeline:
//! - [`NotificationRecord`] — the outcome of one send attempt, carrying the
//!   originating roster fields plus delivery metadata
//! - [`OutcomeLog`] — per-run append-and-flush JSONL write-ahead log, so a
//!   fatal mid-run failure never discards completed sends
//! - [`HistoryStore`] — the cumulative, deduplicated notification history
//! - [`HistoryQuery`] — typed filtering over the history plus CSV export

pub mod error;
pub mod outcome_log;
pub mod query;
pub mod record;
pub mod store;

pub use error::HistoryError;
pub use outcome_log::OutcomeLog;
pub use query::HistoryQuery;
pub use record::{now_minute, DeliveryStatus, NotificationRecord};
pub use store::HistoryStore;
