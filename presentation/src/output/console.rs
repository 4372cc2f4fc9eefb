//! Console output formatter for finished relay sessions

use colored::Colorize;
use relay_application::SessionSummary;

/// Formats session summaries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the summary printed after a session is finalized
    pub fn format_summary(summary: &SessionSummary, cancelled: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Live Relay Session"));
        output.push('\n');

        let outcome = if cancelled {
            "cancelled".yellow().bold()
        } else {
            summary.phase.as_str().green().bold()
        };
        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), summary.session_id));
        output.push_str(&format!("{} {}\n", "Outcome:".cyan().bold(), outcome));
        output.push_str(&format!(
            "{} {} (user {})\n\n",
            "Chat:".cyan().bold(),
            summary.chat_id,
            summary.user_id
        ));

        output.push_str(&Self::row("Messages sent", summary.messages_sent));
        output.push_str(&Self::row("Tools invoked", summary.tools_invoked));
        output.push_str(&Self::row("Tasks tracked", summary.todo_count));
        output.push_str(&Self::row("Content chars", summary.content_chars));

        output.push_str(&Self::footer());
        output
    }

    fn row(label: &str, value: usize) -> String {
        format!("  {:<16}{}\n", format!("{label}:").dimmed(), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(40);
        format!("{}\n{:^40}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(40).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::{ChatId, SessionId, SessionPhase, UserId};

    fn summary() -> SessionSummary {
        SessionSummary {
            session_id: SessionId::new("p1"),
            user_id: UserId(7),
            chat_id: ChatId(42),
            phase: SessionPhase::Closed,
            tools_invoked: 2,
            messages_sent: 4,
            todo_count: 3,
            content_chars: 120,
        }
    }

    #[test]
    fn test_format_summary_lists_counters() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format_summary(&summary(), false);
        assert!(out.contains("Session: p1"));
        assert!(out.contains("Outcome: closed"));
        assert!(out.contains("Chat: 42 (user 7)"));
        assert!(out.contains("Messages sent:  4"));
        assert!(out.contains("Tools invoked:  2"));
    }

    #[test]
    fn test_format_summary_marks_cancelled() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format_summary(&summary(), true);
        assert!(out.contains("Outcome: cancelled"));
    }
}
