//! Per-session state owned by the registry.

use super::types::SessionSummary;
use relay_domain::{
    ChatId, MessageHandle, MessageId, SessionId, SessionPhase, TodoItem, UserId,
};
use std::collections::HashMap;
use tokio::time::Instant;

/// A chat message occupying one logical slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MessageSlot {
    pub handle: MessageHandle,
    /// Whether the message currently shows the cancel control.
    pub has_controls: bool,
}

/// A tool invocation and, in per-tool display, its own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ToolSlot {
    pub name: String,
    pub message: Option<MessageSlot>,
}

/// Everything the relay tracks for one assistant execution.
#[derive(Debug)]
pub(crate) struct LiveSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub trigger_message_id: MessageId,
    pub phase: SessionPhase,

    pub status: Option<MessageSlot>,
    pub content: Option<MessageSlot>,
    pub todo: Option<MessageSlot>,
    pub tools: HashMap<String, ToolSlot>,

    /// Accumulated assistant text. Append-only; cut only when rendered.
    pub buffer: String,
    buffer_chars: usize,
    pub last_content_edit: Option<Instant>,

    /// Last rendered todo list.
    pub todos: Vec<TodoItem>,

    pub tools_invoked: usize,
    pub messages_sent: usize,
}

impl LiveSession {
    pub fn new(
        id: SessionId,
        user_id: UserId,
        chat_id: ChatId,
        trigger_message_id: MessageId,
    ) -> Self {
        Self {
            id,
            user_id,
            chat_id,
            trigger_message_id,
            phase: SessionPhase::Starting,
            status: None,
            content: None,
            todo: None,
            tools: HashMap::new(),
            buffer: String::new(),
            buffer_chars: 0,
            last_content_edit: None,
            todos: Vec::new(),
            tools_invoked: 0,
            messages_sent: 0,
        }
    }

    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer_chars += text.chars().count();
    }

    /// Buffer length in characters.
    pub fn buffer_chars(&self) -> usize {
        self.buffer_chars
    }

    pub fn has_renderable_content(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    /// Move to `next` if the lifecycle allows it.
    pub fn advance(&mut self, next: SessionPhase) -> bool {
        if self.phase.can_transition_to(next) {
            self.phase = next;
            true
        } else {
            false
        }
    }

    /// Messages that still show the cancel control.
    pub fn controlled_messages(&self) -> Vec<MessageHandle> {
        [self.status, self.content, self.todo]
            .into_iter()
            .flatten()
            .chain(self.tools.values().filter_map(|tool| tool.message))
            .filter(|slot| slot.has_controls)
            .map(|slot| slot.handle)
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            user_id: self.user_id,
            chat_id: self.chat_id,
            phase: self.phase,
            tools_invoked: self.tools_invoked,
            messages_sent: self.messages_sent,
            todo_count: self.todos.len(),
            content_chars: self.buffer_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> LiveSession {
        LiveSession::new(SessionId::new("s"), UserId(1), ChatId(2), MessageId(3))
    }

    #[test]
    fn append_counts_characters() {
        let mut session = session();
        session.append("⏳ab");
        session.append("c");
        assert_eq!(session.buffer, "⏳abc");
        assert_eq!(session.buffer_chars(), 4);
    }

    #[test]
    fn whitespace_is_not_renderable() {
        let mut session = session();
        session.append(" \n ");
        assert!(!session.has_renderable_content());
        session.append("x");
        assert!(session.has_renderable_content());
    }

    #[test]
    fn advance_follows_lifecycle() {
        let mut session = session();
        assert!(session.advance(SessionPhase::Streaming));
        assert!(!session.advance(SessionPhase::Starting));
        assert!(session.advance(SessionPhase::Finalizing));
        assert!(session.advance(SessionPhase::Closed));
        assert_eq!(session.phase, SessionPhase::Closed);
    }

    #[test]
    fn controlled_messages_lists_only_active_controls() {
        let mut session = session();
        let handle = |id| MessageHandle::new(ChatId(2), MessageId(id));
        session.status = Some(MessageSlot {
            handle: handle(10),
            has_controls: true,
        });
        session.content = Some(MessageSlot {
            handle: handle(11),
            has_controls: false,
        });
        session.tools.insert(
            "t1".into(),
            ToolSlot {
                name: "Read".into(),
                message: Some(MessageSlot {
                    handle: handle(12),
                    has_controls: true,
                }),
            },
        );
        let mut controlled = session.controlled_messages();
        controlled.sort_by_key(|h| h.message_id.get());
        assert_eq!(controlled, vec![handle(10), handle(12)]);
    }
}
