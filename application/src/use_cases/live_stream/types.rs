//! Type definitions for the live stream use case.

use relay_domain::{ChatId, SessionId, SessionPhase, UserId};
use thiserror::Error;

/// Errors returned by [`LiveStreamRelay`](super::LiveStreamRelay).
///
/// Only `start` can fail; event handling and finalization never surface
/// sink failures to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Session {0} is already live")]
    DuplicateSession(SessionId),

    #[error("Invalid session id: {0}")]
    InvalidSession(String),
}

/// Read-only view of a session, returned by `start` and `finalize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub phase: SessionPhase,
    pub tools_invoked: usize,
    pub messages_sent: usize,
    pub todo_count: usize,
    pub content_chars: usize,
}
