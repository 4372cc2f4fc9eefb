//! JSON Lines event reader
//!
//! One event per line:
//!
//! ```text
//! {"kind":"content","session_id":"p1","payload":{"text":"Hello"}}
//! {"kind":"tool_call_batch","session_id":"p1","payload":{"tools":[{"name":"Read","invocation_id":"t1"}]}}
//! {"kind":"tool_result","session_id":"p1","payload":{"invocation_id":"t1","success":true}}
//! {"kind":"progress","session_id":"p1","payload":{"label":"Indexing","percentage":40}}
//! {"kind":"error","session_id":"p1","payload":{"message":"rate limited"}}
//! ```
//!
//! Unknown kinds decode to [`RelayEvent::Unrecognized`]. Lines that cannot be
//! decoded are logged and skipped by [`JsonlEventReader`].

use relay_domain::{ProgressUpdate, RelayEvent, SessionId, ToolInvocation, ToolOutcome};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{trace, warn};

/// Errors raised while decoding one event line.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("I/O error reading events: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload for '{kind}' event: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Event is missing a session id")]
    MissingSessionId,
}

/// A decoded event addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnvelope {
    pub session_id: SessionId,
    pub event: RelayEvent,
}

#[derive(Deserialize)]
struct RawEnvelope {
    kind: String,
    #[serde(default)]
    session_id: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
struct ContentPayload {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ToolBatchPayload {
    #[serde(default)]
    tools: Vec<ToolInvocation>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

fn payload<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, EventDecodeError> {
    serde_json::from_value(value).map_err(|source| EventDecodeError::InvalidPayload {
        kind: kind.to_string(),
        source,
    })
}

fn decode_event(kind: String, value: Value) -> Result<RelayEvent, EventDecodeError> {
    // An absent payload reads as an empty object so defaulted fields apply.
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let event = match kind.as_str() {
        "content" => RelayEvent::Content(payload::<ContentPayload>(&kind, value)?.text),
        "tool_call_batch" => {
            RelayEvent::ToolCallBatch(payload::<ToolBatchPayload>(&kind, value)?.tools)
        }
        "tool_result" => RelayEvent::ToolResult(payload::<ToolOutcome>(&kind, value)?),
        "progress" => RelayEvent::Progress(payload::<ProgressUpdate>(&kind, value)?),
        "error" => RelayEvent::Error(payload::<ErrorPayload>(&kind, value)?.message),
        _ => RelayEvent::Unrecognized { kind },
    };
    Ok(event)
}

/// Decode one line. Blank lines yield `Ok(None)`.
pub fn decode_line(line: &str) -> Result<Option<SessionEnvelope>, EventDecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let raw: RawEnvelope = serde_json::from_str(line)?;
    let session_id: SessionId = raw
        .session_id
        .parse()
        .map_err(|_| EventDecodeError::MissingSessionId)?;
    let event = decode_event(raw.kind, raw.payload)?;
    Ok(Some(SessionEnvelope { session_id, event }))
}

/// Reads [`SessionEnvelope`]s from a line-oriented async reader.
pub struct JsonlEventReader<R> {
    lines: Lines<R>,
    line_no: usize,
    skipped: usize,
}

impl<R: AsyncBufRead + Unpin> JsonlEventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Next decodable event, or `None` at end of input.
    ///
    /// Undecodable lines are skipped with a warning; only I/O errors are
    /// returned.
    pub async fn next_event(&mut self) -> Result<Option<SessionEnvelope>, EventDecodeError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            match decode_line(&line) {
                Ok(Some(envelope)) => {
                    trace!(line = self.line_no, kind = envelope.event.kind(), "Decoded event");
                    return Ok(Some(envelope));
                }
                Ok(None) => {}
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = self.line_no, error = %e, "Skipping undecodable event");
                }
            }
        }
        Ok(None)
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Number of lines skipped as undecodable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    fn decode(line: &str) -> RelayEvent {
        decode_line(line).unwrap().unwrap().event
    }

    #[test]
    fn test_decode_content() {
        let envelope = decode_line(r#"{"kind":"content","session_id":"p1","payload":{"text":"Hi"}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.session_id, SessionId::new("p1"));
        assert_eq!(envelope.event, RelayEvent::content("Hi"));
    }

    #[test]
    fn test_decode_tool_batch_with_defaults() {
        let event = decode(
            r#"{"kind":"tool_call_batch","session_id":"p1","payload":{"tools":[{"name":"Read","invocation_id":"t1"},{}]}}"#,
        );
        assert_eq!(
            event,
            RelayEvent::ToolCallBatch(vec![
                ToolInvocation::new("Read", "t1"),
                ToolInvocation {
                    name: "Unknown".into(),
                    invocation_id: None,
                },
            ])
        );
    }

    #[test]
    fn test_decode_tool_result_progress_and_error() {
        assert_eq!(
            decode(
                r#"{"kind":"tool_result","session_id":"p1","payload":{"invocation_id":"t1","success":false,"error_message":"denied"}}"#
            ),
            RelayEvent::ToolResult(ToolOutcome::failure("t1", "denied"))
        );
        assert_eq!(
            decode(
                r#"{"kind":"progress","session_id":"p1","payload":{"label":"Indexing","percentage":40}}"#
            ),
            RelayEvent::Progress(ProgressUpdate::new("Indexing").with_percentage(40))
        );
        assert_eq!(
            decode(r#"{"kind":"error","session_id":"p1","payload":{"message":"boom"}}"#),
            RelayEvent::error("boom")
        );
    }

    #[test]
    fn test_progress_with_fractional_or_out_of_range_percentage() {
        assert_eq!(
            decode(
                r#"{"kind":"progress","session_id":"p1","payload":{"label":"Indexing","percentage":42.5}}"#
            ),
            RelayEvent::Progress(ProgressUpdate::new("Indexing").with_percentage(42))
        );
        assert_eq!(
            decode(
                r#"{"kind":"progress","session_id":"p1","payload":{"label":"Indexing","percentage":300}}"#
            ),
            RelayEvent::Progress(ProgressUpdate::new("Indexing").with_percentage(100))
        );
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        assert_eq!(
            decode(r#"{"kind":"tool_call_batch","session_id":"p1"}"#),
            RelayEvent::ToolCallBatch(vec![])
        );
    }

    #[test]
    fn test_unknown_kind_is_unrecognized() {
        assert_eq!(
            decode(r#"{"kind":"heartbeat","session_id":"p1","payload":{"n":1}}"#),
            RelayEvent::Unrecognized {
                kind: "heartbeat".into()
            }
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_line("   ").unwrap().is_none());
        assert!(matches!(
            decode_line("{not json"),
            Err(EventDecodeError::Json(_))
        ));
        assert!(matches!(
            decode_line(r#"{"kind":"content","payload":{"text":"x"}}"#),
            Err(EventDecodeError::MissingSessionId)
        ));
        assert!(matches!(
            decode_line(r#"{"kind":"tool_result","session_id":"p1","payload":{"success":true}}"#),
            Err(EventDecodeError::InvalidPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_reader_skips_bad_lines() {
        let input = concat!(
            "{\"kind\":\"content\",\"session_id\":\"p1\",\"payload\":{\"text\":\"a\"}}\n",
            "garbage\n",
            "\n",
            "{\"kind\":\"error\",\"session_id\":\"p1\",\"payload\":{\"message\":\"x\"}}\n",
        );
        let mut reader = JsonlEventReader::new(BufReader::new(input.as_bytes()));

        let first = reader.next_event().await.unwrap().unwrap();
        assert_eq!(first.event, RelayEvent::content("a"));
        let second = reader.next_event().await.unwrap().unwrap();
        assert_eq!(second.event, RelayEvent::error("x"));
        assert!(reader.next_event().await.unwrap().is_none());

        assert_eq!(reader.lines_read(), 4);
        assert_eq!(reader.skipped(), 1);
    }
}
