// error.rs — Error types for the dispatcher.
//
// Per-task delivery failures are not errors here — they become recorded
// outcomes. Only conditions that end the whole run surface as DispatchError.

use thiserror::Error;

use crate::channel::ChannelError;

/// Run-fatal dispatcher errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The messaging channel became unusable outside the per-task boundary.
    #[error("messaging channel failure: {0}")]
    Channel(#[from] ChannelError),

    /// An outcome could not be persisted to the run's outcome log.
    #[error("outcome log failure: {0}")]
    OutcomeLog(#[from] ued_history::HistoryError),

    /// A send task attempted an invalid lifecycle transition.
    #[error("invalid task transition: {from} → {to}")]
    InvalidTransition { from: String, to: String },
}
