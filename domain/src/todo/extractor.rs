//! Todo extraction from free-form assistant text.
//!
//! The assistant announces its task list in one of three textual conventions,
//! sometimes mixing them in a single message:
//!
//! | Matcher | Example | Status source |
//! |---------|---------|---------------|
//! | Checkbox | `- [x] write tests` | `[x]` anywhere in the text, or ✅ in the description |
//! | Numbered | `2. run linter (in_progress)` | trailing status word |
//! | Emoji | `🔄 refactor parser` | leading glyph |
//!
//! Matchers run independently in that fixed order and their results are
//! concatenated, so the same line can be reported twice if it satisfies two
//! conventions. After capture every description goes through the glyph
//! override (✅ forces completed, else 🔄 forces in progress) and has all
//! status glyphs stripped.
//!
//! Checkbox items become completed when `[x]` appears *anywhere* in the
//! input, not only on their own line. This leaks a checked mark from one item
//! to its siblings; the behaviour is kept deliberately and covered by tests.

use super::entities::{COMPLETED_GLYPH, IN_PROGRESS_GLYPH, PENDING_GLYPH, TodoItem, TodoStatus};
use regex::Regex;
use std::sync::LazyLock;

static CHECKBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)[-*]\s*\[[ x]\]\s*(.+?)(?:\n|$)").expect("checkbox pattern is valid")
});

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\s*(.+?)\s*\((\w+)\)").expect("numbered pattern is valid")
});

static EMOJI_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(⏳|🔄|✅)\s*(.+?)(?:\n|$)").expect("emoji pattern is valid")
});

/// One of the independent todo conventions, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    Checkbox,
    Numbered,
    EmojiPrefixed,
}

const MATCHERS: [Matcher; 3] = [Matcher::Checkbox, Matcher::Numbered, Matcher::EmojiPrefixed];

/// A capture before the glyph override and cleanup are applied.
struct Candidate<'a> {
    raw: &'a str,
    status: TodoStatus,
    force_completed: bool,
}

impl Matcher {
    fn scan<'a>(&self, text: &'a str) -> Vec<Candidate<'a>> {
        match self {
            Matcher::Checkbox => {
                let checked_anywhere = text.to_lowercase().contains("[x]");
                CHECKBOX
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| Candidate {
                        raw: m.as_str(),
                        status: TodoStatus::Pending,
                        force_completed: checked_anywhere,
                    })
                    .collect()
            }
            Matcher::Numbered => NUMBERED
                .captures_iter(text)
                .filter_map(|caps| {
                    let description = caps.get(1)?;
                    let word = caps.get(2)?;
                    Some(Candidate {
                        raw: description.as_str(),
                        status: TodoStatus::from_word(word.as_str()),
                        force_completed: false,
                    })
                })
                .collect(),
            Matcher::EmojiPrefixed => EMOJI_PREFIXED
                .captures_iter(text)
                .filter_map(|caps| {
                    let glyph = caps.get(1)?;
                    let description = caps.get(2)?;
                    Some(Candidate {
                        raw: description.as_str(),
                        status: TodoStatus::from_glyph(glyph.as_str())
                            .unwrap_or(TodoStatus::Pending),
                        force_completed: false,
                    })
                })
                .collect(),
        }
    }
}

impl Candidate<'_> {
    fn into_item(self) -> TodoItem {
        let raw = self.raw.trim();
        let status = if self.force_completed || raw.contains(COMPLETED_GLYPH) {
            TodoStatus::Completed
        } else if raw.contains(IN_PROGRESS_GLYPH) {
            TodoStatus::InProgress
        } else {
            self.status
        };
        TodoItem::new(strip_status_glyphs(raw), status)
    }
}

/// Remove every status glyph from `text` and trim the result.
pub fn strip_status_glyphs(text: &str) -> String {
    text.replace(COMPLETED_GLYPH, "")
        .replace(IN_PROGRESS_GLYPH, "")
        .replace(PENDING_GLYPH, "")
        .trim()
        .to_string()
}

/// Extract the ordered todo list from `text`.
///
/// Returns an empty list when no convention matches.
pub fn extract_todos(text: &str) -> Vec<TodoItem> {
    MATCHERS
        .iter()
        .flat_map(|matcher| matcher.scan(text))
        .map(Candidate::into_item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_patterns_yields_empty() {
        assert!(extract_todos("Just some prose with no tasks.").is_empty());
        assert!(extract_todos("").is_empty());
    }

    #[test]
    fn checkbox_after_prose_on_same_line() {
        let todos = extract_todos("Step 1 done. - [x] write tests");
        assert_eq!(todos, vec![TodoItem::completed("write tests")]);
    }

    #[test]
    fn unchecked_boxes_are_pending() {
        let todos = extract_todos("- [ ] read code\n* [ ] fix bug\n");
        assert_eq!(
            todos,
            vec![TodoItem::pending("read code"), TodoItem::pending("fix bug")]
        );
    }

    #[test]
    fn checked_mark_leaks_to_sibling_checkboxes() {
        let todos = extract_todos("- [x] read code\n- [ ] fix bug");
        assert_eq!(
            todos,
            vec![
                TodoItem::completed("read code"),
                TodoItem::completed("fix bug"),
            ]
        );
    }

    #[test]
    fn checked_mark_detection_is_case_insensitive() {
        // `[X]` is not a checkbox itself, but still counts as a checked mark.
        let todos = extract_todos("- [ ] ship it\nprevious: [X]");
        assert_eq!(todos, vec![TodoItem::completed("ship it")]);
    }

    #[test]
    fn checkbox_with_completion_glyph_in_description() {
        let todos = extract_todos("- [ ] deploy ✅");
        assert_eq!(todos, vec![TodoItem::completed("deploy")]);
    }

    #[test]
    fn checked_mark_does_not_leak_into_numbered_items() {
        let todos = extract_todos("- [x] one\n1. two (pending)");
        assert_eq!(
            todos,
            vec![TodoItem::completed("one"), TodoItem::pending("two")]
        );
    }

    #[test]
    fn numbered_items_with_status_words() {
        let text = "1. Read the code (completed)\n2. Write the fix (in_progress)\n3. Ship (pending)";
        let todos = extract_todos(text);
        assert_eq!(
            todos,
            vec![
                TodoItem::completed("Read the code"),
                TodoItem::in_progress("Write the fix"),
                TodoItem::pending("Ship"),
            ]
        );
    }

    #[test]
    fn numbered_item_keeps_unknown_status_word() {
        let todos = extract_todos("4. Wait for review (blocked)");
        assert_eq!(
            todos,
            vec![TodoItem::new(
                "Wait for review",
                TodoStatus::Other("blocked".to_string())
            )]
        );
    }

    #[test]
    fn numbered_without_status_suffix_is_ignored() {
        assert!(extract_todos("1. Just a numbered line").is_empty());
    }

    #[test]
    fn emoji_prefixed_items_take_glyph_status() {
        let todos = extract_todos("⏳ plan\n🔄 build\n✅ test");
        assert_eq!(
            todos,
            vec![
                TodoItem::pending("plan"),
                TodoItem::in_progress("build"),
                TodoItem::completed("test"),
            ]
        );
    }

    #[test]
    fn glyph_in_description_overrides_status() {
        // The emoji matcher also fires on the tail after the glyph.
        let todos = extract_todos("1. migrate schema 🔄 (pending)");
        assert_eq!(
            todos,
            vec![
                TodoItem::in_progress("migrate schema"),
                TodoItem::in_progress("(pending)"),
            ]
        );
    }

    #[test]
    fn groups_are_concatenated_in_priority_order() {
        let text = "✅ emoji first in text\n1. numbered (pending)\n- [ ] checkbox last";
        let todos = extract_todos(text);
        let descriptions: Vec<_> = todos.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["checkbox last", "numbered", "emoji first in text"]
        );
    }

    #[test]
    fn extraction_is_idempotent_on_descriptions() {
        let text = "- [ ] write docs\n1. run tests (in_progress)\n🔄 refactor ✅";
        for item in extract_todos(text) {
            assert!(extract_todos(&item.description).is_empty());
            assert_eq!(strip_status_glyphs(&item.description), item.description);
        }
    }

    #[test]
    fn strip_removes_all_glyphs() {
        assert_eq!(strip_status_glyphs(" ⏳ a 🔄 b ✅ "), "a  b");
    }
}
