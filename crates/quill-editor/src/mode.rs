//! Interaction modes.
//!
//! The editor is always in exactly one [`Mode`]. Each mode has its own key
//! handler; the transitions between them are few and fixed:
//!
//! | From          | Key                          | To      |
//! |---------------|------------------------------|---------|
//! | Normal        | `Ctrl+E`                     | CommandLine |
//! | Normal        | `Ctrl+F`                     | SearchPrompt |
//! | CommandLine   | Enter, Escape, empty Backspace | Normal |
//! | SearchPrompt  | Enter, Escape, empty Backspace | Normal |

use std::fmt;

/// The current interaction mode.
///
/// Pure data: which handler gets the next key. Key dispatch lives in
/// [`crate::editor`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys edit and move in the active buffer.
    #[default]
    Normal,
    /// Keys edit the `:` command line.
    CommandLine,
    /// Keys edit the `/` search query.
    SearchPrompt,
}

impl Mode {
    /// Name used in log lines.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::CommandLine => "COMMAND",
            Self::SearchPrompt => "SEARCH",
        }
    }

    /// The character drawn before the prompt input, if this mode has one.
    #[must_use]
    pub const fn prompt_prefix(self) -> Option<char> {
        match self {
            Self::Normal => None,
            Self::CommandLine => Some(':'),
            Self::SearchPrompt => Some('/'),
        }
    }

    /// True while keys go to the prompt rather than the buffer.
    #[inline]
    #[must_use]
    pub const fn is_prompt(self) -> bool {
        matches!(self, Self::CommandLine | Self::SearchPrompt)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
