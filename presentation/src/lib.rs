//! Presentation layer for live-relay
//!
//! This crate contains CLI definitions, the console message sink and
//! output formatters.

pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, ToolDisplayArg};
pub use config::ConsoleConfig;
pub use output::console::ConsoleFormatter;
pub use output::console_sink::ConsoleSink;
