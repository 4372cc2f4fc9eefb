//! Shared utility functions.

/// Truncate to at most `max_chars` characters.
///
/// Chat platforms count message length in characters, not bytes.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Shorten `s` to `max_chars` characters, ending with `...` when cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", truncate_chars(s, keep))
}
