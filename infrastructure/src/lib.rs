//! Infrastructure layer for live-relay
//!
//! This crate contains adapters around the application layer: configuration
//! file loading and decoding of the upstream event stream.

pub mod config;
pub mod events;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigSources, FileConfig, FileOutputConfig, FileRelayConfig,
};
pub use events::{EventDecodeError, JsonlEventReader, SessionEnvelope, decode_line};
