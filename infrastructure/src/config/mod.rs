//! Configuration file loading for live-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `LIVE_RELAY_` (`LIVE_RELAY_RELAY__MARKUP=plain`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/live-relay/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{FileConfig, FileOutputConfig, FileRelayConfig};
pub use loader::{ConfigLoader, ConfigSources, ENV_PREFIX, PROJECT_CONFIG_FILE};
