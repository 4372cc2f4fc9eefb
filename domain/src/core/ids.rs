//! Identifiers for sessions, chats and chat messages.
//!
//! - [`SessionId`] - opaque, caller-supplied id of one assistant execution
//! - [`ChatId`], [`UserId`], [`MessageId`] - chat platform identifiers
//! - [`MessageHandle`] - what a message sink returns for a sent message

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque identifier of one in-flight assistant execution.
///
/// Supplied by the caller, who must keep it unique among live sessions.
/// An id may be started again once its session has been finalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptySessionId);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Chat the session's messages are posted into.
    ChatId
);
numeric_id!(
    /// User who triggered the execution.
    UserId
);
numeric_id!(
    /// Platform-assigned id of a single chat message.
    MessageId
);

/// Handle to a message previously created by a message sink.
///
/// The relay stores these in its message slots and hands them back to the
/// sink for later edits; it never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageHandle {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_parse_trims() {
        let id: SessionId = "  proc-42 ".parse().unwrap();
        assert_eq!(id.as_str(), "proc-42");
    }

    #[test]
    fn session_id_parse_rejects_blank() {
        assert_eq!("   ".parse::<SessionId>(), Err(DomainError::EmptySessionId));
    }

    #[test]
    fn message_handle_display() {
        let handle = MessageHandle::new(ChatId(-100), MessageId(7));
        assert_eq!(handle.to_string(), "-100/7");
    }
}
