//! Domain layer for live-relay
//!
//! This crate contains the pure logic of the live-update relay. It performs
//! no I/O and knows nothing about chat platforms or event transports.
//!
//! # Core Concepts
//!
//! ## Todo extraction
//!
//! The assistant's task list is scraped from its streamed text
//! ([`extract_todos`]) and re-rendered only when it changes.
//!
//! ## Throttling
//!
//! Edits to the streamed content message are rate limited by
//! [`ThrottlePolicy`]; all other messages are edited immediately.
//!
//! ## Rendering
//!
//! [`MessageFormatter`] turns session state into [`Rendered`] messages with
//! an optional [`CancelControl`].

pub mod core;
pub mod render;
pub mod stream;
pub mod todo;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    ids::{ChatId, MessageHandle, MessageId, SessionId, UserId},
};
pub use render::{
    CancelControl, Markup, MessageFormatter, RenderOptions, Rendered, parse_cancel_callback,
    progress_bar,
};
pub use stream::{
    event::{ProgressUpdate, RelayEvent, ToolInvocation, ToolOutcome},
    phase::SessionPhase,
    throttle::{ThrottlePolicy, should_emit},
};
pub use todo::{
    entities::{TodoItem, TodoStatus},
    extractor::extract_todos,
};
pub use tool::category::{ToolCategory, tool_glyph};
