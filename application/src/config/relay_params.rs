//! Relay parameters: how a live session is rendered and throttled.
//!
//! [`RelayParams`] groups the static settings read by
//! [`LiveStreamRelay`](crate::use_cases::live_stream::LiveStreamRelay).
//! Infrastructure builds it from the `[relay]` section of the config file.

use relay_domain::render::{DEFAULT_MAX_MESSAGE_LEN, DEFAULT_STATUS_PREVIEW_LEN};
use relay_domain::stream::throttle::{DEFAULT_FLUSH_CHUNK_SIZE, DEFAULT_MIN_EDIT_INTERVAL};
use relay_domain::{DomainError, Markup, RenderOptions, ThrottlePolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How tool calls are shown in the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolDisplay {
    /// One status edit summarising each tool-call batch.
    #[default]
    Batched,
    /// A dedicated message per tool call, edited with its result.
    PerTool,
}

impl ToolDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolDisplay::Batched => "batched",
            ToolDisplay::PerTool => "per_tool",
        }
    }
}

impl std::str::FromStr for ToolDisplay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "batched" => Ok(ToolDisplay::Batched),
            "per_tool" => Ok(ToolDisplay::PerTool),
            other => Err(DomainError::invalid(
                "tool_display",
                format!("expected 'batched' or 'per_tool', got '{other}'"),
            )),
        }
    }
}

/// Live relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayParams {
    /// Minimum time between two edits of the content message.
    pub min_edit_interval: Duration,
    /// Content length step (characters) that forces an edit regardless of time.
    pub flush_chunk_size: usize,
    /// Platform cap on a single message, in characters.
    pub max_message_len: usize,
    /// Cap on the body shown below a status label.
    pub status_preview_len: usize,
    pub tool_display: ToolDisplay,
    pub markup: Markup,
    /// Label of the cancel button.
    pub cancel_label: String,
    /// Name used in status labels.
    pub assistant_name: String,
}

impl Default for RelayParams {
    fn default() -> Self {
        Self {
            min_edit_interval: DEFAULT_MIN_EDIT_INTERVAL,
            flush_chunk_size: DEFAULT_FLUSH_CHUNK_SIZE,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            status_preview_len: DEFAULT_STATUS_PREVIEW_LEN,
            tool_display: ToolDisplay::Batched,
            markup: Markup::Markdown,
            cancel_label: "🛑 Stop".to_string(),
            assistant_name: "Claude".to_string(),
        }
    }
}

impl RelayParams {
    // ==================== Builder Methods ====================

    pub fn with_min_edit_interval(mut self, interval: Duration) -> Self {
        self.min_edit_interval = interval;
        self
    }

    pub fn with_flush_chunk_size(mut self, size: usize) -> Self {
        self.flush_chunk_size = size;
        self
    }

    pub fn with_max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }

    pub fn with_status_preview_len(mut self, len: usize) -> Self {
        self.status_preview_len = len;
        self
    }

    pub fn with_tool_display(mut self, display: ToolDisplay) -> Self {
        self.tool_display = display;
        self
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    // ==================== Derived Settings ====================

    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy::new(self.min_edit_interval).with_chunk_size(self.flush_chunk_size)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            markup: self.markup,
            max_message_len: self.max_message_len,
            status_preview_len: self.status_preview_len,
            assistant_name: self.assistant_name.clone(),
        }
    }

    /// Reject settings no chat platform could honour.
    pub fn validate(&self) -> Result<(), DomainError> {
        // Room for the continuation marker plus some content.
        if self.max_message_len < 64 {
            return Err(DomainError::invalid(
                "max_message_len",
                format!("must be at least 64, got {}", self.max_message_len),
            ));
        }
        if self.status_preview_len == 0 || self.status_preview_len > self.max_message_len {
            return Err(DomainError::invalid(
                "status_preview_len",
                format!("must be between 1 and {}", self.max_message_len),
            ));
        }
        if self.cancel_label.trim().is_empty() {
            return Err(DomainError::invalid("cancel_label", "must not be empty"));
        }
        Ok(())
    }
}
