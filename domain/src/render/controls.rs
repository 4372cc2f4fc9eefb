//! The cancel control attached to live messages.

use crate::core::ids::SessionId;

/// Prefix of the callback payload carried by the cancel button.
pub const CANCEL_CALLBACK_PREFIX: &str = "cancel:";

/// A single "stop" button bound to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelControl {
    pub session_id: SessionId,
    pub label: String,
}

impl CancelControl {
    pub fn new(session_id: impl Into<SessionId>, label: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            label: label.into(),
        }
    }

    /// Payload the chat platform echoes back when the button is pressed.
    pub fn callback_data(&self) -> String {
        format!("{CANCEL_CALLBACK_PREFIX}{}", self.session_id)
    }
}

/// Decode a cancel button payload back into its session id.
pub fn parse_cancel_callback(data: &str) -> Option<SessionId> {
    data.strip_prefix(CANCEL_CALLBACK_PREFIX)?.parse().ok()
}
