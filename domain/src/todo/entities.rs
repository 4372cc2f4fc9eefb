//! Todo list entities.

use serde::{Deserialize, Serialize};

/// Glyph marking a pending task.
pub const PENDING_GLYPH: &str = "⏳";
/// Glyph marking a task in progress.
pub const IN_PROGRESS_GLYPH: &str = "🔄";
/// Glyph marking a completed task.
pub const COMPLETED_GLYPH: &str = "✅";
/// Glyph for any status word the relay does not recognise.
pub const OTHER_GLYPH: &str = "📌";

/// Status of a single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    /// A status word captured verbatim from a numbered line, e.g. `(blocked)`.
    Other(String),
}

impl TodoStatus {
    /// Parse a status word as written in `1. task (status)` lines.
    pub fn from_word(word: &str) -> Self {
        match word.trim().to_ascii_lowercase().as_str() {
            "pending" => TodoStatus::Pending,
            "in_progress" => TodoStatus::InProgress,
            "completed" => TodoStatus::Completed,
            _ => TodoStatus::Other(word.trim().to_string()),
        }
    }

    /// Status implied by one of the three status glyphs.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            PENDING_GLYPH => Some(TodoStatus::Pending),
            IN_PROGRESS_GLYPH => Some(TodoStatus::InProgress),
            COMPLETED_GLYPH => Some(TodoStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
            TodoStatus::Other(word) => word,
        }
    }

    /// Glyph used when rendering the todo list.
    pub fn glyph(&self) -> &'static str {
        match self {
            TodoStatus::Pending => PENDING_GLYPH,
            TodoStatus::InProgress => IN_PROGRESS_GLYPH,
            TodoStatus::Completed => COMPLETED_GLYPH,
            TodoStatus::Other(_) => OTHER_GLYPH,
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry of the assistant's task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoItem {
    pub description: String,
    pub status: TodoStatus,
}

impl TodoItem {
    pub fn new(description: impl Into<String>, status: TodoStatus) -> Self {
        Self {
            description: description.into(),
            status,
        }
    }

    pub fn pending(description: impl Into<String>) -> Self {
        Self::new(description, TodoStatus::Pending)
    }

    pub fn in_progress(description: impl Into<String>) -> Self {
        Self::new(description, TodoStatus::InProgress)
    }

    pub fn completed(description: impl Into<String>) -> Self {
        Self::new(description, TodoStatus::Completed)
    }
}
