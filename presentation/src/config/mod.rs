//! Presentation-level configuration
//!
//! Configuration for console rendering of relayed messages.

use serde::{Deserialize, Serialize};

/// Output configuration for the console sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Print the cancel button below messages that carry one
    pub show_controls: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_controls: true,
        }
    }
}

impl ConsoleConfig {
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_show_controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }
}
