//! Transport-agnostic rendering of session state into chat messages.
//!
//! Every formatter returns a [`Rendered`] value: display text, the markup
//! dialect it is written in, and the control affordance (the cancel button)
//! that should accompany it. Sending it anywhere is the message sink's job.
//!
//! - [`MessageFormatter`]: status, content, tool, progress, todo and error renders
//! - [`CancelControl`]: the cancel button and its callback payload

mod controls;
mod formatter;

pub use controls::{CANCEL_CALLBACK_PREFIX, CancelControl, parse_cancel_callback};
pub use formatter::{
    CONTINUATION_MARKER, DEFAULT_MAX_MESSAGE_LEN, DEFAULT_STATUS_PREVIEW_LEN, MessageFormatter,
    PROGRESS_BAR_SEGMENTS, RenderOptions, progress_bar,
};

use serde::{Deserialize, Serialize};

/// Markup dialect of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Markup {
    /// Lightweight Markdown (`**bold**`, `_italic_`, `` `code` ``).
    #[default]
    Markdown,
    /// No markup; text is shown verbatim.
    Plain,
}

impl Markup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Markup::Markdown => "markdown",
            Markup::Plain => "plain",
        }
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Markup {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Markup::Markdown),
            "plain" | "text" | "none" => Ok(Markup::Plain),
            other => Err(crate::DomainError::invalid(
                "markup",
                format!("unknown markup dialect '{other}'"),
            )),
        }
    }
}

/// A message ready for a sink: text plus how to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub markup: Markup,
    /// Cancel button to attach, `None` for no controls.
    pub controls: Option<CancelControl>,
}

impl Rendered {
    pub fn new(text: impl Into<String>, markup: Markup) -> Self {
        Self {
            text: text.into(),
            markup,
            controls: None,
        }
    }

    pub fn with_controls(mut self, controls: Option<CancelControl>) -> Self {
        self.controls = controls;
        self
    }

    pub fn has_controls(&self) -> bool {
        self.controls.is_some()
    }

    /// The same message downgraded to plain text, for markup fallback.
    pub fn to_plain(&self) -> Self {
        Self {
            markup: Markup::Plain,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_plain_keeps_text_and_controls() {
        let rendered = Rendered::new("**hi**", Markup::Markdown)
            .with_controls(Some(CancelControl::new("s1", "Stop")));
        let plain = rendered.to_plain();
        assert_eq!(plain.markup, Markup::Plain);
        assert_eq!(plain.text, "**hi**");
        assert!(plain.has_controls());
    }

    #[test]
    fn markup_from_str() {
        assert_eq!("Markdown".parse::<Markup>().unwrap(), Markup::Markdown);
        assert_eq!("plain".parse::<Markup>().unwrap(), Markup::Plain);
        assert!("html".parse::<Markup>().is_err());
    }
}
