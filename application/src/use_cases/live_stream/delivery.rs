//! Sink calls with markup fallback.
//!
//! Each helper performs one logical message update. A markup rejection gets
//! exactly one retry as plain text; any other failure is returned as-is for
//! the caller to log and drop.

use super::session::MessageSlot;
use crate::ports::message_sink::{MessageSink, SinkError};
use relay_domain::{ChatId, MessageHandle, MessageId, Markup, Rendered};
use tracing::{debug, warn};

/// Outcome of writing into a message slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Created,
    Edited,
    Failed,
}

impl Delivery {
    pub fn succeeded(self) -> bool {
        !matches!(self, Delivery::Failed)
    }
}

pub(crate) async fn send_with_fallback<S: MessageSink + ?Sized>(
    sink: &S,
    chat_id: ChatId,
    message: &Rendered,
    reply_to: Option<MessageId>,
) -> Result<MessageHandle, SinkError> {
    match sink.send(chat_id, message, reply_to).await {
        Err(e) if e.is_markup_error() && message.markup != Markup::Plain => {
            debug!(chat_id = %chat_id, error = %e, "Retrying send as plain text");
            sink.send(chat_id, &message.to_plain(), reply_to).await
        }
        result => result,
    }
}

pub(crate) async fn edit_with_fallback<S: MessageSink + ?Sized>(
    sink: &S,
    handle: &MessageHandle,
    message: &Rendered,
) -> Result<(), SinkError> {
    match sink.edit(handle, message).await {
        Err(e) if e.is_markup_error() && message.markup != Markup::Plain => {
            debug!(handle = %handle, error = %e, "Retrying edit as plain text");
            sink.edit(handle, &message.to_plain()).await
        }
        result => result,
    }
}

/// Create the slot's message if absent, otherwise edit it.
///
/// `role` only labels log lines.
pub(crate) async fn upsert<S: MessageSink + ?Sized>(
    sink: &S,
    chat_id: ChatId,
    slot: &mut Option<MessageSlot>,
    message: &Rendered,
    reply_to: Option<MessageId>,
    role: &'static str,
) -> Delivery {
    match slot {
        Some(existing) => match edit_with_fallback(sink, &existing.handle, message).await {
            Ok(()) => {
                existing.has_controls = message.has_controls();
                Delivery::Edited
            }
            Err(e) => {
                warn!(role, handle = %existing.handle, error = %e, "Failed to update message");
                Delivery::Failed
            }
        },
        None => match send_with_fallback(sink, chat_id, message, reply_to).await {
            Ok(handle) => {
                *slot = Some(MessageSlot {
                    handle,
                    has_controls: message.has_controls(),
                });
                Delivery::Created
            }
            Err(e) => {
                warn!(role, chat_id = %chat_id, error = %e, "Failed to create message");
                Delivery::Failed
            }
        },
    }
}

/// Remove the cancel control from a message. Failure is logged and ignored.
pub(crate) async fn clear_controls_best_effort<S: MessageSink + ?Sized>(
    sink: &S,
    slot: &mut MessageSlot,
    role: &'static str,
) {
    if !slot.has_controls {
        return;
    }
    match sink.clear_controls(&slot.handle).await {
        Ok(()) => slot.has_controls = false,
        Err(e) => warn!(role, handle = %slot.handle, error = %e, "Failed to clear controls"),
    }
}
