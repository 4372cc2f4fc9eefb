//! Task-list state scraped from the assistant's streamed text.
//!
//! - [`entities::TodoItem`] / [`entities::TodoStatus`]: one task and its state
//! - [`extractor::extract_todos`]: multi-pattern scanner over free-form text

pub mod entities;
pub mod extractor;
