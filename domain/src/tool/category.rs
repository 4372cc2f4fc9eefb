//! Tool categories and their display glyphs.
//!
//! Tool names come straight from the assistant (`Read`, `Bash`, `WebFetch`,
//! ...). Lookup is case-insensitive; anything unknown is [`ToolCategory::Generic`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Read,
    Write,
    Edit,
    Execute,
    Search,
    Fetch,
    /// Sub-agent / task delegation.
    Delegate,
    Generic,
}

impl ToolCategory {
    /// Categorise a tool by name.
    pub fn of(tool_name: &str) -> Self {
        match tool_name.trim().to_ascii_lowercase().as_str() {
            "read" | "notebookread" => ToolCategory::Read,
            "write" => ToolCategory::Write,
            "edit" | "multiedit" | "notebookedit" => ToolCategory::Edit,
            "bash" | "bashoutput" | "killshell" => ToolCategory::Execute,
            "glob" | "grep" | "ls" | "websearch" => ToolCategory::Search,
            "webfetch" => ToolCategory::Fetch,
            "task" => ToolCategory::Delegate,
            _ => ToolCategory::Generic,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ToolCategory::Read => "📖",
            ToolCategory::Write => "✍️",
            ToolCategory::Edit => "📝",
            ToolCategory::Execute => "⚡",
            ToolCategory::Search => "🔍",
            ToolCategory::Fetch => "🌐",
            ToolCategory::Delegate => "🎯",
            ToolCategory::Generic => "🔧",
        }
    }
}

/// Glyph for a tool name, `🔧` when the tool is not recognised.
///
/// Grep keeps its own magnifier so it reads apart from Glob and WebSearch.
pub fn tool_glyph(tool_name: &str) -> &'static str {
    if tool_name.trim().eq_ignore_ascii_case("grep") {
        return "🔎";
    }
    ToolCategory::of(tool_name).glyph()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_map_to_categories() {
        assert_eq!(ToolCategory::of("Read"), ToolCategory::Read);
        assert_eq!(ToolCategory::of("Write"), ToolCategory::Write);
        assert_eq!(ToolCategory::of("MultiEdit"), ToolCategory::Edit);
        assert_eq!(ToolCategory::of("Bash"), ToolCategory::Execute);
        assert_eq!(ToolCategory::of("Grep"), ToolCategory::Search);
        assert_eq!(ToolCategory::of("WebSearch"), ToolCategory::Search);
        assert_eq!(ToolCategory::of("WebFetch"), ToolCategory::Fetch);
        assert_eq!(ToolCategory::of("Task"), ToolCategory::Delegate);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(ToolCategory::of("bash"), ToolCategory::Execute);
        assert_eq!(ToolCategory::of(" READ "), ToolCategory::Read);
    }

    #[test]
    fn unknown_tool_gets_generic_glyph() {
        assert_eq!(ToolCategory::of("mcp__github__create_issue"), ToolCategory::Generic);
        assert_eq!(tool_glyph("mystery"), "🔧");
        assert_eq!(tool_glyph("Bash"), "⚡");
    }

    #[test]
    fn grep_has_its_own_glyph() {
        assert_eq!(tool_glyph("Grep"), "🔎");
        assert_eq!(tool_glyph("Glob"), "🔍");
        assert_eq!(tool_glyph("WebSearch"), "🔍");
        assert_eq!(ToolCategory::of("Grep"), ToolCategory::Search);
    }
}
