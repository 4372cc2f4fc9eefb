//! Application-level configuration.
//!
//! - [`RelayParams`]: throttling, rendering and tool display settings for the relay

pub mod relay_params;

pub use relay_params::{RelayParams, ToolDisplay};
