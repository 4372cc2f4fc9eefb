//! Application layer for live-relay
//!
//! This crate contains the relay use case, the session registry, port
//! definitions and application configuration. It depends only on the domain
//! layer.

pub mod cancellation;
pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use cancellation::CancellationGate;
pub use config::{RelayParams, ToolDisplay};
pub use ports::message_sink::{MessageSink, SinkError};
pub use registry::{SessionEntry, SessionRegistry};
pub use use_cases::live_stream::{LiveStreamRelay, RelayError, SessionSummary};
