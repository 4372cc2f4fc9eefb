//! Console message sink
//!
//! Prints every message the relay sends, edits or strips of controls, as a
//! stand-in for a chat platform. Markdown is checked the way a strict
//! platform would: unbalanced `**`, `_` or backtick markers are rejected so the
//! relay's plain-text fallback kicks in.

use crate::config::ConsoleConfig;
use async_trait::async_trait;
use chrono::Local;
use colored::{ColoredString, Colorize};
use relay_application::{MessageSink, SinkError};
use relay_domain::{ChatId, Markup, MessageHandle, MessageId, Rendered};
use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the console remembers about a posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Posted {
    text: String,
    has_controls: bool,
}

/// [`MessageSink`] that writes to a terminal (or any writer).
pub struct ConsoleSink<W: Write + Send = Stdout> {
    out: Mutex<W>,
    messages: Mutex<HashMap<MessageHandle, Posted>>,
    next_id: AtomicI64,
    config: ConsoleConfig,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(config: ConsoleConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, config: ConsoleConfig) -> Self {
        Self {
            out: Mutex::new(out),
            messages: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            config,
        }
    }

    /// Number of messages posted so far.
    pub fn message_count(&self) -> usize {
        self.messages().len()
    }

    /// Consume the sink and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn messages(&self) -> MutexGuard<'_, HashMap<MessageHandle, Posted>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.config.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, action: &str, handle: &MessageHandle, note: Option<String>) -> String {
        let time = Local::now().format("%H:%M:%S");
        let mut line = format!(
            "{} {} {}",
            self.paint(&format!("[{time}]"), |s| s.dimmed()),
            self.paint(action, |s| s.cyan().bold()),
            self.paint(&format!("#{}", handle.message_id), |s| s.yellow()),
        );
        if let Some(note) = note {
            line.push(' ');
            line.push_str(&self.paint(&format!("({note})"), |s| s.dimmed()));
        }
        line
    }

    fn body(&self, message: &Rendered) -> String {
        let mut body = String::new();
        for line in message.text.lines() {
            body.push_str("  │ ");
            body.push_str(line);
            body.push('\n');
        }
        if self.config.show_controls
            && let Some(control) = &message.controls
        {
            let button = format!("[ {} ]", control.label);
            body.push_str("  └ ");
            body.push_str(&self.paint(&button, |s| s.red().bold()));
            body.push('\n');
        }
        body
    }

    fn write_block(&self, block: &str) -> Result<(), SinkError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(block.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

/// Reject Markdown a strict chat platform could not parse.
fn check_markup(message: &Rendered) -> Result<(), SinkError> {
    if message.markup == Markup::Plain {
        return Ok(());
    }
    let text = &message.text;
    if text.matches("**").count() % 2 != 0 {
        return Err(SinkError::MarkupRejected(
            "can't find end of bold entity".into(),
        ));
    }
    if text.matches('`').count() % 2 != 0 {
        return Err(SinkError::MarkupRejected(
            "can't find end of code entity".into(),
        ));
    }
    if text.replace("**", "").matches('_').count() % 2 != 0 {
        return Err(SinkError::MarkupRejected(
            "can't find end of italic entity".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<W: Write + Send> MessageSink for ConsoleSink<W> {
    async fn send(
        &self,
        chat_id: ChatId,
        message: &Rendered,
        reply_to: Option<MessageId>,
    ) -> Result<MessageHandle, SinkError> {
        check_markup(message)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let handle = MessageHandle::new(chat_id, MessageId(id));

        let note = reply_to.map(|to| format!("reply to #{to}"));
        let block = format!(
            "{}\n{}",
            self.header("send", &handle, note),
            self.body(message)
        );
        self.write_block(&block)?;

        self.messages().insert(
            handle,
            Posted {
                text: message.text.clone(),
                has_controls: message.has_controls(),
            },
        );
        Ok(handle)
    }

    async fn edit(&self, handle: &MessageHandle, message: &Rendered) -> Result<(), SinkError> {
        let next = Posted {
            text: message.text.clone(),
            has_controls: message.has_controls(),
        };
        match self.messages().get(handle) {
            None => return Err(SinkError::MessageNotFound(*handle)),
            Some(current) if *current == next => {
                return Err(SinkError::Other("message is not modified".into()));
            }
            Some(_) => {}
        }
        check_markup(message)?;

        let block = format!("{}\n{}", self.header("edit", handle, None), self.body(message));
        self.write_block(&block)?;
        self.messages().insert(*handle, next);
        Ok(())
    }

    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), SinkError> {
        {
            let mut messages = self.messages();
            let posted = messages
                .get_mut(handle)
                .ok_or(SinkError::MessageNotFound(*handle))?;
            if !posted.has_controls {
                return Ok(());
            }
            posted.has_controls = false;
        }
        let note = Some("controls removed".to_string());
        self.write_block(&format!("{}\n", self.header("edit", handle, note)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::CancelControl;

    fn sink() -> ConsoleSink<Vec<u8>> {
        ConsoleSink::new(Vec::new(), ConsoleConfig::default().with_color(false))
    }

    fn output(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    fn markdown(text: &str) -> Rendered {
        Rendered::new(text, Markup::Markdown)
    }

    #[tokio::test]
    async fn test_send_prints_text_and_button() {
        let sink = sink();
        let message = markdown("**🤖 Claude is starting...**")
            .with_controls(Some(CancelControl::new("p1", "🛑 Stop")));

        let handle = sink.send(ChatId(5), &message, Some(MessageId(9))).await.unwrap();

        assert_eq!(handle, MessageHandle::new(ChatId(5), MessageId(1)));
        assert_eq!(sink.message_count(), 1);
        let out = output(sink);
        assert!(out.contains("send #1 (reply to #9)"));
        assert!(out.contains("  │ **🤖 Claude is starting...**"));
        assert!(out.contains("  └ [ 🛑 Stop ]"));
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let sink = sink();
        let a = sink.send(ChatId(5), &markdown("a"), None).await.unwrap();
        let b = sink.send(ChatId(5), &markdown("b"), None).await.unwrap();
        assert_eq!(a.message_id, MessageId(1));
        assert_eq!(b.message_id, MessageId(2));
    }

    #[tokio::test]
    async fn test_unbalanced_markdown_is_rejected_but_plain_is_not() {
        let sink = sink();
        let broken = markdown("use `cargo build");

        let err = sink.send(ChatId(5), &broken, None).await.unwrap_err();
        assert!(err.is_markup_error());
        assert_eq!(sink.message_count(), 0);

        sink.send(ChatId(5), &broken.to_plain(), None).await.unwrap();
        assert_eq!(sink.message_count(), 1);
    }

    #[tokio::test]
    async fn test_edit_unknown_or_unchanged_message_fails() {
        let sink = sink();
        let unknown = MessageHandle::new(ChatId(5), MessageId(42));
        assert_eq!(
            sink.edit(&unknown, &markdown("x")).await,
            Err(SinkError::MessageNotFound(unknown))
        );

        let handle = sink.send(ChatId(5), &markdown("same"), None).await.unwrap();
        assert!(matches!(
            sink.edit(&handle, &markdown("same")).await,
            Err(SinkError::Other(_))
        ));
        sink.edit(&handle, &markdown("changed")).await.unwrap();
        assert!(output(sink).contains("edit #1"));
    }

    #[tokio::test]
    async fn test_clear_controls_only_prints_once() {
        let sink = sink();
        let message = markdown("live").with_controls(Some(CancelControl::new("p1", "Stop")));
        let handle = sink.send(ChatId(5), &message, None).await.unwrap();

        sink.clear_controls(&handle).await.unwrap();
        sink.clear_controls(&handle).await.unwrap();

        let out = output(sink);
        assert_eq!(out.matches("controls removed").count(), 1);
    }

    #[tokio::test]
    async fn test_hidden_controls() {
        let sink = ConsoleSink::new(
            Vec::new(),
            ConsoleConfig::default()
                .with_color(false)
                .with_show_controls(false),
        );
        let message = markdown("live").with_controls(Some(CancelControl::new("p1", "Stop")));
        sink.send(ChatId(5), &message, None).await.unwrap();
        assert!(!output(sink).contains("[ Stop ]"));
    }

    #[test]
    fn test_check_markup() {
        assert!(check_markup(&markdown("**bold** and `code` and _it_")).is_ok());
        assert!(check_markup(&markdown("**open")).is_err());
        assert!(check_markup(&markdown("snake_case")).is_err());
        assert!(check_markup(&Rendered::new("snake_case", Markup::Plain)).is_ok());
    }
}
