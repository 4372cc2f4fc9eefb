//! Events delivered by the upstream event source.
//!
//! [`RelayEvent`] is what the relay consumes for one session. Payload structs
//! derive `Deserialize` so adapters can decode them straight from the wire;
//! only the fields listed here are read.

use serde::{Deserialize, Deserializer, Serialize};

/// One tool call announced in a tool-call batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(default = "unknown_tool_name")]
    pub name: String,
    /// Upstream id used to correlate the later tool result. The relay
    /// assigns a sequential id when the source omits it.
    #[serde(default)]
    pub invocation_id: Option<String>,
}

fn unknown_tool_name() -> String {
    "Unknown".to_string()
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invocation_id: Some(invocation_id.into()),
        }
    }
}

/// Result of a previously announced tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub invocation_id: String,
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ToolOutcome {
    pub fn success(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failure(invocation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Progress signal with an optional completion percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub label: String,
    /// Whole percent in `0..=100`. Sources may send any number; fractions
    /// are floored and out-of-range values clamped.
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub percentage: Option<u8>,
}

fn lenient_percentage<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|p| !p.is_nan()).map(|p| p.floor().clamp(0.0, 100.0) as u8))
}

impl ProgressUpdate {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            percentage: None,
        }
    }

    pub fn with_percentage(mut self, percentage: u8) -> Self {
        self.percentage = Some(percentage);
        self
    }
}

/// A typed event for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A fragment of assistant text, appended to the session buffer.
    Content(String),
    /// Tool calls dispatched together.
    ToolCallBatch(Vec<ToolInvocation>),
    /// Outcome of one tool call.
    ToolResult(ToolOutcome),
    /// Progress signal.
    Progress(ProgressUpdate),
    /// Upstream error, shown to the user as its own message.
    Error(String),
    /// An event kind the relay does not handle.
    Unrecognized { kind: String },
}

impl RelayEvent {
    /// Wire name of the event kind.
    pub fn kind(&self) -> &str {
        match self {
            RelayEvent::Content(_) => "content",
            RelayEvent::ToolCallBatch(_) => "tool_call_batch",
            RelayEvent::ToolResult(_) => "tool_result",
            RelayEvent::Progress(_) => "progress",
            RelayEvent::Error(_) => "error",
            RelayEvent::Unrecognized { kind } => kind,
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        RelayEvent::Content(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        RelayEvent::Error(message.into())
    }
}
