//! Live stream relay
//!
//! Mirrors one assistant execution into a handful of chat messages that are
//! edited in place as events arrive:
//!
//! | Slot | Created | Updated by |
//! |------|---------|------------|
//! | status | `start` (reply to the trigger message) | tool batches, tool failures, progress, `finalize` |
//! | content | first content delta | content deltas (throttled), `finalize` |
//! | todo | first non-empty task list | content deltas whose task list changed |
//! | tool | per-tool display only | the matching tool result |
//!
//! Error events always produce a new message. Every live message carries a
//! cancel control until `finalize` strips it.
//!
//! Events for one session are handled one at a time (the registry entry's
//! mutex); different sessions run concurrently. A failed sink call is logged
//! and dropped, so the worst outcome is a stale message.

mod delivery;
mod session;
mod types;

pub use types::{RelayError, SessionSummary};

use crate::config::{RelayParams, ToolDisplay};
use crate::ports::message_sink::MessageSink;
use crate::registry::{SessionEntry, SessionRegistry};
use delivery::{Delivery, clear_controls_best_effort, send_with_fallback, upsert};
use relay_domain::{
    CancelControl, ChatId, MessageFormatter, MessageId, ProgressUpdate, RelayEvent, Rendered,
    SessionId, SessionPhase, ThrottlePolicy, ToolInvocation, ToolOutcome, UserId, extract_todos,
};
use session::{LiveSession, MessageSlot, ToolSlot};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Relays streaming assistant events into live-updating chat messages.
pub struct LiveStreamRelay<S: MessageSink + ?Sized> {
    sink: Arc<S>,
    registry: SessionRegistry<LiveSession>,
    formatter: MessageFormatter,
    throttle: ThrottlePolicy,
    params: RelayParams,
}

impl<S: MessageSink + ?Sized> LiveStreamRelay<S> {
    pub fn new(sink: Arc<S>, params: RelayParams) -> Self {
        Self {
            sink,
            registry: SessionRegistry::new(),
            formatter: MessageFormatter::new(params.render_options()),
            throttle: params.throttle_policy(),
            params,
        }
    }

    fn cancel_control(&self, session_id: &SessionId) -> Option<CancelControl> {
        Some(CancelControl::new(
            session_id.clone(),
            self.params.cancel_label.as_str(),
        ))
    }

    // ==================== Lifecycle ====================

    /// Register a session and post its initial status message.
    ///
    /// The status message replies to `trigger_message_id` and carries the
    /// cancel control. A failed send leaves the session registered without a
    /// status message; the next status update creates one.
    pub async fn start(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        trigger_message_id: MessageId,
        session_id: SessionId,
    ) -> Result<SessionSummary, RelayError> {
        if session_id.as_str().trim().is_empty() {
            return Err(RelayError::InvalidSession(session_id.to_string()));
        }
        let live = LiveSession::new(session_id.clone(), user_id, chat_id, trigger_message_id);
        let entry = self
            .registry
            .insert(session_id.clone(), live)
            .ok_or_else(|| RelayError::DuplicateSession(session_id.clone()))?;

        let mut session = entry.state.lock().await;
        let initial = self.formatter.starting(self.cancel_control(&session_id));
        let delivery = upsert(
            self.sink.as_ref(),
            chat_id,
            &mut session.status,
            &initial,
            Some(trigger_message_id),
            "status",
        )
        .await;
        if delivery == Delivery::Created {
            session.messages_sent += 1;
        }

        info!(
            session_id = %session_id,
            user_id = %user_id,
            chat_id = %chat_id,
            "Started live stream"
        );
        Ok(session.summary())
    }

    /// Dispatch one upstream event to its session.
    ///
    /// Unknown sessions, cancelled sessions and sessions already finalizing
    /// drop the event. Never fails.
    pub async fn handle_event(&self, session_id: &SessionId, event: RelayEvent) {
        let Some(entry) = self.registry.get(session_id) else {
            warn!(session_id = %session_id, kind = event.kind(), "Stream session not found");
            return;
        };
        if entry.gate.is_cancelled() {
            debug!(session_id = %session_id, kind = event.kind(), "Dropping event for cancelled session");
            return;
        }

        let mut session = entry.state.lock().await;
        // The flag may have flipped while an earlier event held the lock.
        if entry.gate.is_cancelled() {
            debug!(session_id = %session_id, kind = event.kind(), "Dropping event for cancelled session");
            return;
        }
        if !session.phase.accepts_events() {
            debug!(
                session_id = %session_id,
                phase = %session.phase,
                kind = event.kind(),
                "Dropping event for closing session"
            );
            return;
        }
        session.advance(SessionPhase::Streaming);

        match event {
            RelayEvent::Content(text) => self.on_content(&mut session, &text).await,
            RelayEvent::ToolCallBatch(tools) => self.on_tool_calls(&mut session, tools).await,
            RelayEvent::ToolResult(outcome) => self.on_tool_result(&mut session, &outcome).await,
            RelayEvent::Progress(update) => self.on_progress(&mut session, &update).await,
            RelayEvent::Error(message) => self.on_error(&mut session, &message).await,
            RelayEvent::Unrecognized { kind } => {
                warn!(session_id = %session_id, kind = %kind, "Ignoring unrecognized event");
            }
        }
    }

    /// Render the final state, strip every cancel control and close the
    /// session.
    ///
    /// When nothing was streamed, a non-empty `final_message` becomes the
    /// content. Returns `None` if the session is unknown or already
    /// finalizing.
    pub async fn finalize(
        &self,
        session_id: &SessionId,
        final_message: &str,
        is_error: bool,
    ) -> Option<SessionSummary> {
        let Some(entry) = self.registry.get(session_id) else {
            warn!(session_id = %session_id, "Cannot finalize unknown stream session");
            return None;
        };
        let mut session = entry.state.lock().await;
        if !session.advance(SessionPhase::Finalizing) {
            debug!(session_id = %session_id, phase = %session.phase, "Session already finalizing");
            return None;
        }

        self.render_final_content(&mut session, final_message).await;
        self.strip_controls(&mut session).await;
        self.render_terminal_status(&mut session, is_error).await;
        let leftover = session.controlled_messages();
        if !leftover.is_empty() {
            warn!(session_id = %session_id, count = leftover.len(), "Cancel controls left on messages");
        }

        session.advance(SessionPhase::Closed);
        self.close(session_id, &entry);

        info!(
            session_id = %session_id,
            messages_sent = session.messages_sent,
            tools_used = session.tools_invoked,
            cancelled = entry.gate.is_cancelled(),
            is_error,
            "Finalized stream"
        );
        Some(session.summary())
    }

    /// Ask a session to stop. Returns whether a live session was found.
    pub fn request_cancel(&self, session_id: &SessionId) -> bool {
        let Some(entry) = self.registry.get(session_id) else {
            debug!(session_id = %session_id, "Cancel requested for unknown session");
            return false;
        };
        if entry.gate.cancel() {
            info!(session_id = %session_id, "Cancel requested");
        }
        true
    }

    /// Whether a live session has been cancelled. Unknown sessions are not.
    pub fn is_cancelled(&self, session_id: &SessionId) -> bool {
        self.registry
            .get(session_id)
            .is_some_and(|entry| entry.gate.is_cancelled())
    }

    fn close(&self, session_id: &SessionId, entry: &Arc<SessionEntry<LiveSession>>) {
        if let Some(removed) = self.registry.remove(session_id)
            && !Arc::ptr_eq(&removed, entry)
        {
            warn!(session_id = %session_id, "Registry held a different session under this id");
        }
    }

    // ==================== Event Handlers ====================

    async fn on_content(&self, session: &mut LiveSession, text: &str) {
        session.append(text);

        let todos = extract_todos(&session.buffer);
        if !todos.is_empty() && todos != session.todos {
            debug!(session_id = %session.id, count = todos.len(), "Task list changed");
            let rendered = self
                .formatter
                .todo_list(&todos, self.cancel_control(&session.id));
            session.todos = todos;
            self.upsert_todo(session, &rendered).await;
        }

        if !session.has_renderable_content() {
            return;
        }
        let since_last_edit = session.last_content_edit.map(|at| at.elapsed());
        if !self
            .throttle
            .should_emit(session.buffer_chars(), since_last_edit)
        {
            debug!(session_id = %session.id, chars = session.buffer_chars(), "Content edit throttled");
            return;
        }
        let rendered = self
            .formatter
            .content(&session.buffer, self.cancel_control(&session.id));
        if self.upsert_content(session, &rendered).await.succeeded() {
            session.last_content_edit = Some(Instant::now());
        }
    }

    async fn on_tool_calls(&self, session: &mut LiveSession, tools: Vec<ToolInvocation>) {
        if tools.is_empty() {
            return;
        }
        let mut names = Vec::with_capacity(tools.len());
        for tool in tools {
            let invocation_id = tool
                .invocation_id
                .unwrap_or_else(|| format!("tool-{}", session.tools_invoked));
            let message = match self.params.tool_display {
                ToolDisplay::Batched => None,
                ToolDisplay::PerTool => self.send_tool_message(session, &tool.name).await,
            };
            names.push(tool.name.clone());
            session.tools.insert(
                invocation_id,
                ToolSlot {
                    name: tool.name,
                    message,
                },
            );
            session.tools_invoked += 1;
        }

        if self.params.tool_display == ToolDisplay::Batched {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let rendered = self
                .formatter
                .tool_batch(&names, self.cancel_control(&session.id));
            self.upsert_status(session, &rendered).await;
        }
    }

    async fn send_tool_message(
        &self,
        session: &mut LiveSession,
        tool_name: &str,
    ) -> Option<MessageSlot> {
        let rendered = self
            .formatter
            .tool_started(tool_name, self.cancel_control(&session.id));
        let mut slot = None;
        let delivery = upsert(
            self.sink.as_ref(),
            session.chat_id,
            &mut slot,
            &rendered,
            None,
            "tool",
        )
        .await;
        if delivery == Delivery::Created {
            session.messages_sent += 1;
        }
        slot
    }

    async fn on_tool_result(&self, session: &mut LiveSession, outcome: &ToolOutcome) {
        let chat_id = session.chat_id;
        let Some(tool) = session.tools.get_mut(&outcome.invocation_id) else {
            debug!(
                session_id = %session.id,
                invocation_id = %outcome.invocation_id,
                "Result for unknown tool invocation"
            );
            return;
        };

        if tool.message.is_some() {
            let rendered = self.formatter.tool_finished(
                &tool.name,
                outcome.success,
                outcome.error_message.as_deref(),
            );
            upsert(
                self.sink.as_ref(),
                chat_id,
                &mut tool.message,
                &rendered,
                None,
                "tool",
            )
            .await;
            return;
        }
        if outcome.success {
            return;
        }

        let rendered = self.formatter.tool_failure(
            &tool.name,
            outcome.error_message.as_deref(),
            self.cancel_control(&session.id),
        );
        self.upsert_status(session, &rendered).await;
    }

    async fn on_progress(&self, session: &mut LiveSession, update: &ProgressUpdate) {
        let rendered = self
            .formatter
            .progress(update, self.cancel_control(&session.id));
        self.upsert_status(session, &rendered).await;
    }

    async fn on_error(&self, session: &mut LiveSession, message: &str) {
        let rendered = self.formatter.error(message);
        match send_with_fallback(self.sink.as_ref(), session.chat_id, &rendered, None).await {
            Ok(_) => session.messages_sent += 1,
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "Failed to send error message");
            }
        }
    }

    // ==================== Finalization ====================

    async fn render_final_content(&self, session: &mut LiveSession, final_message: &str) {
        if !session.has_renderable_content() && !final_message.trim().is_empty() {
            session.append(final_message);
        }
        if !session.has_renderable_content() {
            return;
        }
        let rendered = self.formatter.content(&session.buffer, None);
        if self.upsert_content(session, &rendered).await.succeeded() {
            session.last_content_edit = Some(Instant::now());
        }
    }

    async fn strip_controls(&self, session: &mut LiveSession) {
        let sink = self.sink.as_ref();
        if let Some(slot) = session.content.as_mut() {
            clear_controls_best_effort(sink, slot, "content").await;
        }
        if let Some(slot) = session.todo.as_mut() {
            clear_controls_best_effort(sink, slot, "todo").await;
        }
        for tool in session.tools.values_mut() {
            if let Some(slot) = tool.message.as_mut() {
                clear_controls_best_effort(sink, slot, "tool").await;
            }
        }
    }

    async fn render_terminal_status(&self, session: &mut LiveSession, is_error: bool) {
        let rendered = self.formatter.terminal(is_error);
        self.upsert_status(session, &rendered).await;
        // A failed terminal edit would leave the cancel button behind.
        if let Some(slot) = session.status.as_mut() {
            clear_controls_best_effort(self.sink.as_ref(), slot, "status").await;
        }
    }

    // ==================== Slot Helpers ====================

    async fn upsert_status(&self, session: &mut LiveSession, rendered: &Rendered) -> Delivery {
        let reply_to = Some(session.trigger_message_id);
        let delivery = upsert(
            self.sink.as_ref(),
            session.chat_id,
            &mut session.status,
            rendered,
            reply_to,
            "status",
        )
        .await;
        if delivery == Delivery::Created {
            session.messages_sent += 1;
        }
        delivery
    }

    async fn upsert_content(&self, session: &mut LiveSession, rendered: &Rendered) -> Delivery {
        let delivery = upsert(
            self.sink.as_ref(),
            session.chat_id,
            &mut session.content,
            rendered,
            None,
            "content",
        )
        .await;
        if delivery == Delivery::Created {
            session.messages_sent += 1;
        }
        delivery
    }

    async fn upsert_todo(&self, session: &mut LiveSession, rendered: &Rendered) -> Delivery {
        let delivery = upsert(
            self.sink.as_ref(),
            session.chat_id,
            &mut session.todo,
            rendered,
            None,
            "todo",
        )
        .await;
        if delivery == Delivery::Created {
            session.messages_sent += 1;
        }
        delivery
    }
}
