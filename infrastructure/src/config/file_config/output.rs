//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

/// Raw console output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Print the cancel button below messages that carry one
    pub show_controls: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_controls: true,
        }
    }
}
