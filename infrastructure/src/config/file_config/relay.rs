//! Relay configuration from TOML (`[relay]` section)
//!
//! Enum-like settings stay strings here so a typo surfaces as a
//! [`ConfigError`] naming the field, not as a figment extraction error.
//!
//! # Example
//!
//! ```toml
//! [relay]
//! min_edit_interval_ms = 1000
//! tool_display = "batched"   # or "per_tool"
//! markup = "markdown"        # or "plain"
//! ```

use crate::config::error::ConfigError;
use relay_application::{RelayParams, ToolDisplay};
use relay_domain::Markup;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw relay configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelayConfig {
    /// Minimum milliseconds between two content edits
    pub min_edit_interval_ms: u64,
    /// Content length step that forces an edit (0 disables)
    pub flush_chunk_size: usize,
    /// Platform cap on a single message, in characters
    pub max_message_len: usize,
    /// Cap on the body shown below a status label
    pub status_preview_len: usize,
    /// "batched" or "per_tool"
    pub tool_display: String,
    /// "markdown" or "plain"
    pub markup: String,
    pub cancel_label: String,
    pub assistant_name: String,
}

impl Default for FileRelayConfig {
    fn default() -> Self {
        let params = RelayParams::default();
        Self {
            min_edit_interval_ms: params.min_edit_interval.as_millis() as u64,
            flush_chunk_size: params.flush_chunk_size,
            max_message_len: params.max_message_len,
            status_preview_len: params.status_preview_len,
            tool_display: params.tool_display.as_str().to_string(),
            markup: params.markup.as_str().to_string(),
            cancel_label: params.cancel_label,
            assistant_name: params.assistant_name,
        }
    }
}

impl FileRelayConfig {
    /// Convert to validated [`RelayParams`].
    pub fn to_params(&self) -> Result<RelayParams, ConfigError> {
        let tool_display: ToolDisplay = self.tool_display.parse()?;
        let markup: Markup = self.markup.parse()?;

        let params = RelayParams::default()
            .with_min_edit_interval(Duration::from_millis(self.min_edit_interval_ms))
            .with_flush_chunk_size(self.flush_chunk_size)
            .with_max_message_len(self.max_message_len)
            .with_status_preview_len(self.status_preview_len)
            .with_tool_display(tool_display)
            .with_markup(markup)
            .with_cancel_label(self.cancel_label.clone())
            .with_assistant_name(self.assistant_name.clone());
        params.validate()?;
        Ok(params)
    }
}
