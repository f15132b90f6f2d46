//! Terminal colors for report lines.
//!
//! Painting happens on a whole formatted message, after indentation, and is
//! a no-op when colors are disabled.

use crossterm::style::{style, Attribute, Color, Stylize};

/// Semantic highlight applied to an emitted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Successful method calls
    Success,
    /// Failed or unsupported method calls
    Failure,
    /// Hints and warnings
    Warning,
    /// Bold, used for the hash of the transaction being sent
    Emphasis,
}

impl Paint {
    /// Paint `text`, or return it untouched when `enabled` is false
    pub fn apply(self, text: &str, enabled: bool) -> String {
        if !enabled {
            return text.to_string();
        }

        let content = style(text);
        let content = match self {
            Self::Success => content.with(Color::Green),
            Self::Failure => content.with(Color::Red),
            Self::Warning => content.with(Color::Yellow),
            Self::Emphasis => content.attribute(Attribute::Bold),
        };
        content.to_string()
    }
}
