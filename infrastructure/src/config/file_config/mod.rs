//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into application settings
//! happens in [`FileRelayConfig::to_params`].

mod output;
mod relay;

pub use output::FileOutputConfig;
pub use relay::FileRelayConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Live relay settings
    pub relay: FileRelayConfig,
    /// Console output settings
    pub output: FileOutputConfig,
}
