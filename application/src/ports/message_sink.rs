//! Message sink port
//!
//! Defines how the relay talks to a chat platform. Adapters (Telegram,
//! Discord, the console) implement [`MessageSink`]; the relay only ever sees
//! opaque [`MessageHandle`]s.

use async_trait::async_trait;
use relay_domain::{ChatId, MessageHandle, MessageId, Rendered};
use std::time::Duration;
use thiserror::Error;

/// Errors a message sink can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The platform could not parse the message markup. The relay retries
    /// once as plain text.
    #[error("Markup rejected: {0}")]
    MarkupRejected(String),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageHandle),

    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SinkError {
    /// Whether a plain-text retry may succeed.
    pub fn is_markup_error(&self) -> bool {
        matches!(self, SinkError::MarkupRejected(_))
    }
}

/// Output port for creating and editing chat messages.
///
/// Every call may fail; the relay logs failures and carries on. Timeouts and
/// transport-level retries are the adapter's business.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Post a new message, optionally as a reply.
    async fn send(
        &self,
        chat_id: ChatId,
        message: &Rendered,
        reply_to: Option<MessageId>,
    ) -> Result<MessageHandle, SinkError>;

    /// Replace the text and controls of an existing message.
    async fn edit(&self, handle: &MessageHandle, message: &Rendered) -> Result<(), SinkError>;

    /// Remove all controls from an existing message, leaving its text.
    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_markup_errors_allow_plain_retry() {
        assert!(SinkError::MarkupRejected("can't parse entities".into()).is_markup_error());
        assert!(!SinkError::Transport("reset".into()).is_markup_error());
        assert!(!SinkError::RateLimited { retry_after: None }.is_markup_error());
    }
}
