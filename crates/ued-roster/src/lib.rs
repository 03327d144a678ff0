//! # ued-roster
//!
//! Roster-side half of the UED notification pipeline:
//! - [`RosterRecord`] — one beneficiary row, field names matching the
//!   operational dataset's Spanish column headers
//! - [`loader`] — read the roster file and select expired records
//! - [`phone`] — normalize free-form contact text into `549…` phone numbers
//! - [`expand`] — fan roster records out into one [`SendTask`] per phone

pub mod error;
pub mod expand;
pub mod loader;
pub mod phone;
pub mod record;

pub use error::RosterError;
pub use expand::{expand_tasks, SendTask};
pub use loader::RosterLoader;
pub use phone::extract_phones;
pub use record::RosterRecord;
