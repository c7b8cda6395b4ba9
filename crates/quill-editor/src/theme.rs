//! Theme — token tags and UI elements to terminal styles.
//!
//! Sixteen-colour ANSI only, so the editor looks right in any terminal
//! palette. A theme is a plain value owned by the editor.

use quill_term::cell::{Attr, Style};
use quill_term::color::Color;

use crate::syntax::TokenTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub selection: Style,
    pub search_match: Style,
    pub gutter: Style,
    pub status: Style,
    pub message: Style,
}

impl Theme {
    /// The built-in theme.
    #[must_use]
    pub const fn terminal() -> Self {
        Self {
            selection: Style::new().fg(Color::BRIGHT_WHITE).bg(Color::BLUE),
            search_match: Style::new().fg(Color::BLACK).bg(Color::YELLOW),
            gutter: Style::new().fg(Color::GRAY),
            status: Style::new().attrs(Attr::INVERSE),
            message: Style::new(),
        }
    }

    /// Display style for a token.
    #[must_use]
    pub const fn style_for(&self, tag: TokenTag) -> Style {
        match tag {
            TokenTag::Keyword => Style::new().fg(Color::MAGENTA).bold(),
            TokenTag::String | TokenTag::Escape => Style::new().fg(Color::GREEN),
            TokenTag::Comment => Style::new().fg(Color::GRAY).italic(),
            TokenTag::Function => Style::new().fg(Color::BLUE),
            TokenTag::Macro | TokenTag::Constant | TokenTag::Number => {
                Style::new().fg(Color::CYAN)
            }
            TokenTag::Type | TokenTag::Attribute | TokenTag::Label => {
                Style::new().fg(Color::YELLOW)
            }
            TokenTag::Text
            | TokenTag::Variable
            | TokenTag::Property
            | TokenTag::Operator
            | TokenTag::Punctuation => Style::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_bold_comments_italic() {
        let theme = Theme::terminal();
        assert!(theme.style_for(TokenTag::Keyword).attrs.contains(Attr::BOLD));
        assert!(theme.style_for(TokenTag::Comment).attrs.contains(Attr::ITALIC));
        assert_eq!(theme.style_for(TokenTag::String).fg, Color::GREEN);
    }

    #[test]
    fn plain_tags_use_default_style() {
        let theme = Theme::default();
        assert!(theme.style_for(TokenTag::Text).is_plain());
        assert!(theme.style_for(TokenTag::Punctuation).is_plain());
    }

    #[test]
    fn selection_and_match_are_distinct() {
        let theme = Theme::terminal();
        assert_eq!(theme.selection.bg, Color::BLUE);
        assert_eq!(theme.search_match.bg, Color::YELLOW);
        assert_ne!(theme.selection, theme.search_match);
    }
}
