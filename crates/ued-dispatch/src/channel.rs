// channel.rs — The messaging-channel seam.
//
// The real delivery surface is an automated browser session driving a chat
// web client. That integration lives outside this repo; the dispatcher only
// needs the small capability set below. The traits keep the channel
// injectable, so tests script outcomes and the CLI can run against the
// logging ConsoleChannel.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a messaging channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A per-task interaction failed (element missing, send rejected, …).
    /// Caught by the dispatcher and recorded as a failed outcome.
    #[error("channel interaction failed: {0}")]
    Interaction(String),

    /// The channel itself became unusable — the underlying session is gone
    /// at a level no per-task handling can recover. Aborts the run.
    #[error("channel session lost: {0}")]
    SessionLost(String),
}

impl ChannelError {
    /// Whether this error is fatal to the whole run rather than to one task.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChannelError::SessionLost(_))
    }
}

/// An open conversation with one phone. One session exists at a time; the
/// dispatcher is strictly sequential.
pub trait ChatSession {
    /// Poll until the message-input surface is interactively ready, up to
    /// `timeout`. `Ok(false)` means the surface never appeared in time.
    fn wait_for_input_ready(&mut self, timeout: Duration) -> Result<bool, ChannelError>;

    /// Give the input surface keyboard focus.
    fn focus_input(&mut self) -> Result<(), ChannelError>;

    /// Type one line of text into the input surface.
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError>;

    /// Force an explicit line break without submitting.
    fn insert_line_break(&mut self) -> Result<(), ChannelError>;

    /// Submit the composed message — the single final confirmation action.
    fn submit(&mut self) -> Result<(), ChannelError>;

    /// Whether the input surface was observed present at any point in this
    /// session. Discriminates a possible partial send (soft failure) from a
    /// session that never opened (hard failure).
    fn input_was_present(&self) -> bool;
}

/// A messaging channel that can open per-phone sessions. Lifecycle
/// (authentication, browser startup, teardown) is the caller's concern.
pub trait MessagingChannel {
    type Session: ChatSession;

    /// Open a session addressed to `phone`.
    fn open_session(&mut self, phone: &str) -> Result<Self::Session, ChannelError>;
}

/// A channel that logs instead of sending. Every session is immediately
/// ready and every interaction succeeds — useful for dry runs and as the
/// default CLI channel while the browser integration is wired up elsewhere.
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

/// Session counterpart of [`ConsoleChannel`].
#[derive(Debug)]
pub struct ConsoleSession {
    phone: String,
}

impl MessagingChannel for ConsoleChannel {
    type Session = ConsoleSession;

    fn open_session(&mut self, phone: &str) -> Result<Self::Session, ChannelError> {
        tracing::info!("console channel: opening session for {}", phone);
        Ok(ConsoleSession {
            phone: phone.to_string(),
        })
    }
}

impl ChatSession for ConsoleSession {
    fn wait_for_input_ready(&mut self, _timeout: Duration) -> Result<bool, ChannelError> {
        Ok(true)
    }

    fn focus_input(&mut self) -> Result<(), ChannelError> {
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        tracing::info!("[{}] {}", self.phone, line);
        Ok(())
    }

    fn insert_line_break(&mut self) -> Result<(), ChannelError> {
        Ok(())
    }

    fn submit(&mut self) -> Result<(), ChannelError> {
        tracing::info!("[{}] message submitted", self.phone);
        Ok(())
    }

    fn input_was_present(&self) -> bool {
        true
    }
}
