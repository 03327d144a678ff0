//! # ued-dispatch
//!
//! Delivery side of the UED notification pipeline:
//! - [`message`] — the fixed renewal template, rendered per task
//! - [`channel`] — the messaging-channel seam ([`MessagingChannel`] /
//!   [`ChatSession`]) plus the logging [`ConsoleChannel`]
//! - [`dispatcher`] — sequential per-task delivery with outcome
//!   classification and append-and-flush persistence
//!
//! The channel is injected: its lifecycle (login, browser session, teardown)
//! belongs to the caller. The dispatcher only drives sessions.

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod message;

pub use channel::{ChannelError, ChatSession, ConsoleChannel, MessagingChannel};
pub use dispatcher::{Dispatcher, SendPacing, TaskState};
pub use error::DispatchError;
pub use message::{compose_renewal_message, NOTIFICATION_TYPE};
