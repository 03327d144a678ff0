pub mod merge;
pub mod notify;
pub mod query;
