//! Message formatters.

use super::{CancelControl, Markup, Rendered};
use crate::stream::event::ProgressUpdate;
use crate::todo::entities::TodoItem;
use crate::tool::category::tool_glyph;
use crate::util::{preview, truncate_chars};

/// Telegram's hard cap on message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4096;

/// Default cap on the body shown under a status label.
pub const DEFAULT_STATUS_PREVIEW_LEN: usize = 200;

/// Appended to content cut at the message cap.
pub const CONTINUATION_MARKER: &str = "\n\n… (truncated)";

/// Number of segments in a progress bar.
pub const PROGRESS_BAR_SEGMENTS: usize = 10;

/// Settings shared by every formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub markup: Markup,
    pub max_message_len: usize,
    pub status_preview_len: usize,
    /// Name shown in status labels ("Claude is starting...").
    pub assistant_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            markup: Markup::Markdown,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            status_preview_len: DEFAULT_STATUS_PREVIEW_LEN,
            assistant_name: "Claude".to_string(),
        }
    }
}

/// `█` for each filled tenth of `percentage`, `░` for the rest.
pub fn progress_bar(percentage: u8) -> String {
    let filled = (usize::from(percentage.min(100)) / 10).min(PROGRESS_BAR_SEGMENTS);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_SEGMENTS - filled)
    )
}

/// Turns session state into [`Rendered`] messages.
///
/// Pure: no I/O and no session state of its own. Callers decide whether a
/// render carries the cancel control.
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    options: RenderOptions,
}

impl MessageFormatter {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn bold(&self, text: &str) -> String {
        match self.options.markup {
            Markup::Markdown => format!("**{text}**"),
            Markup::Plain => text.to_string(),
        }
    }

    fn italic(&self, text: &str) -> String {
        match self.options.markup {
            Markup::Markdown => format!("_{text}_"),
            Markup::Plain => text.to_string(),
        }
    }

    fn code(&self, text: &str) -> String {
        match self.options.markup {
            Markup::Markdown => format!("`{text}`"),
            Markup::Plain => text.to_string(),
        }
    }

    fn finish(&self, text: String, controls: Option<CancelControl>) -> Rendered {
        let text = truncate_chars(&text, self.options.max_message_len).to_string();
        Rendered::new(text, self.options.markup).with_controls(controls)
    }

    // ==================== Status ====================

    /// Short state label plus an optional body, bounded in length.
    pub fn status(
        &self,
        label: &str,
        body: Option<&str>,
        controls: Option<CancelControl>,
    ) -> Rendered {
        let mut text = self.bold(label);
        if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
            text.push_str("\n\n");
            text.push_str(&preview(body, self.options.status_preview_len));
        }
        self.finish(text, controls)
    }

    /// Initial status sent when a session starts.
    pub fn starting(&self, controls: Option<CancelControl>) -> Rendered {
        let label = format!("🤖 {} is starting...", self.options.assistant_name);
        self.status(&label, None, controls)
    }

    /// Final status. Never carries controls.
    pub fn terminal(&self, is_error: bool) -> Rendered {
        let glyph = if is_error { "❌" } else { "✅" };
        let label = format!("{glyph} {} finished", self.options.assistant_name);
        self.status(&label, None, None)
    }

    // ==================== Content ====================

    /// Accumulated assistant text, cut at the message cap.
    pub fn content(&self, text: &str, controls: Option<CancelControl>) -> Rendered {
        let max = self.options.max_message_len;
        if text.chars().count() <= max {
            return Rendered::new(text, self.options.markup).with_controls(controls);
        }
        let keep = max.saturating_sub(CONTINUATION_MARKER.chars().count());
        let mut cut = truncate_chars(text, keep).to_string();
        cut.push_str(CONTINUATION_MARKER);
        Rendered::new(cut, self.options.markup).with_controls(controls)
    }

    // ==================== Tools ====================

    /// One summary for a whole tool-call batch.
    pub fn tool_batch(&self, tool_names: &[&str], controls: Option<CancelControl>) -> Rendered {
        let summary = tool_names
            .iter()
            .map(|name| format!("{} {}", tool_glyph(name), self.code(name)))
            .collect::<Vec<_>>()
            .join(" • ");
        let label = if tool_names.len() == 1 {
            "🛠 Using tool"
        } else {
            "🛠 Using tools"
        };
        self.finish(format!("{}\n\n{summary}", self.bold(label)), controls)
    }

    /// Status shown when a tool call reports failure.
    pub fn tool_failure(
        &self,
        tool_name: &str,
        error: Option<&str>,
        controls: Option<CancelControl>,
    ) -> Rendered {
        let label = format!("❌ {} {tool_name} failed", tool_glyph(tool_name));
        let error = error.unwrap_or("Tool reported an error");
        self.status(&label, Some(error), controls)
    }

    /// Dedicated message for one tool (per-tool display).
    pub fn tool_started(&self, tool_name: &str, controls: Option<CancelControl>) -> Rendered {
        let text = format!(
            "{} {}\n\n{}",
            tool_glyph(tool_name),
            self.bold(&format!("Using tool: {tool_name}")),
            self.italic("Executing...")
        );
        self.finish(text, controls)
    }

    /// Final state of a per-tool message.
    pub fn tool_finished(&self, tool_name: &str, success: bool, error: Option<&str>) -> Rendered {
        let outcome = if success {
            "✅ Completed".to_string()
        } else {
            format!("❌ Failed: {}", error.unwrap_or("unknown error"))
        };
        let text = format!("{} {}\n\n{outcome}", tool_glyph(tool_name), self.bold(tool_name));
        self.finish(text, None)
    }

    // ==================== Progress ====================

    pub fn progress(&self, update: &ProgressUpdate, controls: Option<CancelControl>) -> Rendered {
        let label = match update.label.trim() {
            "" => "Working...",
            label => label,
        };
        let mut text = self.bold(&format!("🔄 {label}"));
        if let Some(percentage) = update.percentage {
            text.push_str(&format!(
                "\n\n{} {percentage}%",
                self.code(&progress_bar(percentage))
            ));
        }
        self.finish(text, controls)
    }

    // ==================== Todo ====================

    pub fn todo_list(&self, todos: &[TodoItem], controls: Option<CancelControl>) -> Rendered {
        let mut text = self.bold(&format!("📋 {}'s Task List:", self.options.assistant_name));
        text.push_str("\n\n");
        for todo in todos {
            text.push_str(todo.status.glyph());
            text.push(' ');
            text.push_str(&todo.description);
            text.push('\n');
        }
        self.finish(text.trim_end().to_string(), controls)
    }

    // ==================== Error ====================

    /// A standalone error message. Never carries controls.
    pub fn error(&self, message: &str) -> Rendered {
        let message = match message.trim() {
            "" => "An error occurred",
            message => message,
        };
        self.finish(format!("{}\n\n{message}", self.bold("❌ Error")), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::entities::TodoStatus;
    use crate::todo::extractor::extract_todos;

    fn formatter() -> MessageFormatter {
        MessageFormatter::default()
    }

    fn cancel() -> Option<CancelControl> {
        Some(CancelControl::new("s1", "🛑 Stop"))
    }

    #[test]
    fn progress_bar_segments() {
        assert_eq!(progress_bar(0), "░░░░░░░░░░");
        assert_eq!(progress_bar(40), "████░░░░░░");
        assert_eq!(progress_bar(99), "█████████░");
        assert_eq!(progress_bar(100), "██████████");
        assert_eq!(progress_bar(250), "██████████");
    }

    #[test]
    fn progress_render_with_percentage() {
        let update = ProgressUpdate::new("Indexing").with_percentage(40);
        let rendered = formatter().progress(&update, cancel());
        assert_eq!(rendered.text, "**🔄 Indexing**\n\n`████░░░░░░` 40%");
        assert!(rendered.has_controls());
        assert_eq!(rendered.text.matches('█').count(), 4);
    }

    #[test]
    fn progress_render_without_label() {
        let rendered = formatter().progress(&ProgressUpdate::new(""), None);
        assert_eq!(rendered.text, "**🔄 Working...**");
    }

    #[test]
    fn status_body_is_bounded() {
        let body = "x".repeat(500);
        let rendered = formatter().status("Thinking", Some(&body), cancel());
        let shown = rendered.text.split("\n\n").nth(1).unwrap();
        assert_eq!(shown.chars().count(), DEFAULT_STATUS_PREVIEW_LEN);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn terminal_status_has_no_controls() {
        let ok = formatter().terminal(false);
        assert_eq!(ok.text, "**✅ Claude finished**");
        assert!(!ok.has_controls());
        assert_eq!(formatter().terminal(true).text, "**❌ Claude finished**");
    }

    #[test]
    fn content_under_cap_is_untouched() {
        let rendered = formatter().content("hello *world*", cancel());
        assert_eq!(rendered.text, "hello *world*");
        assert!(rendered.has_controls());
    }

    #[test]
    fn content_over_cap_is_truncated_with_marker() {
        let options = RenderOptions {
            max_message_len: 50,
            ..RenderOptions::default()
        };
        let text = "a".repeat(80);
        let rendered = MessageFormatter::new(options).content(&text, None);
        assert_eq!(rendered.text.chars().count(), 50);
        assert!(rendered.text.ends_with(CONTINUATION_MARKER));
        assert!(rendered.text.starts_with("aaaa"));
    }

    #[test]
    fn tool_batch_joins_all_tools_in_one_summary() {
        let rendered = formatter().tool_batch(&["Read", "Bash", "mystery"], cancel());
        assert_eq!(
            rendered.text,
            "**🛠 Using tools**\n\n📖 `Read` • ⚡ `Bash` • 🔧 `mystery`"
        );
    }

    #[test]
    fn tool_failure_names_tool_and_error() {
        let rendered = formatter().tool_failure("Bash", Some("permission denied"), cancel());
        assert_eq!(rendered.text, "**❌ ⚡ Bash failed**\n\npermission denied");
    }

    #[test]
    fn per_tool_messages() {
        let started = formatter().tool_started("Read", cancel());
        assert_eq!(started.text, "📖 **Using tool: Read**\n\n_Executing..._");
        let done = formatter().tool_finished("Read", true, None);
        assert_eq!(done.text, "📖 **Read**\n\n✅ Completed");
        assert!(!done.has_controls());
        let failed = formatter().tool_finished("Bash", false, Some("exit 1"));
        assert_eq!(failed.text, "⚡ **Bash**\n\n❌ Failed: exit 1");
    }

    #[test]
    fn todo_list_one_line_per_item() {
        let todos = vec![
            TodoItem::pending("plan"),
            TodoItem::in_progress("build"),
            TodoItem::completed("test"),
            TodoItem::new("wait", TodoStatus::Other("blocked".into())),
        ];
        let rendered = formatter().todo_list(&todos, cancel());
        assert_eq!(
            rendered.text,
            "**📋 Claude's Task List:**\n\n⏳ plan\n🔄 build\n✅ test\n📌 wait"
        );
        assert!(rendered.has_controls());
    }

    #[test]
    fn extraction_survives_todo_render() {
        let text = "- [ ] write docs\n1. run tests (in_progress)\n⏳ release";
        let todos = extract_todos(text);
        let rendered = formatter().todo_list(&todos, None);
        assert_eq!(extract_todos(&rendered.text), todos);
    }

    #[test]
    fn error_render_has_no_controls() {
        let rendered = formatter().error("permission denied");
        assert_eq!(rendered.text, "**❌ Error**\n\npermission denied");
        assert!(!rendered.has_controls());
        assert_eq!(formatter().error("  ").text, "**❌ Error**\n\nAn error occurred");
    }

    #[test]
    fn plain_markup_drops_emphasis() {
        let options = RenderOptions {
            markup: Markup::Plain,
            ..RenderOptions::default()
        };
        let rendered = MessageFormatter::new(options).tool_batch(&["Read"], None);
        assert_eq!(rendered.text, "🛠 Using tool\n\n📖 Read");
        assert_eq!(rendered.markup, Markup::Plain);
    }
}
