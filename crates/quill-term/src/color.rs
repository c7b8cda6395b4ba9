// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// quill paints with the 16-color ANSI palette the user's terminal theme
// already defines, plus the 256-color cube and truecolor for anything a
// config wants to pin exactly. `Default` means "whatever the terminal's
// own foreground/background is" and maps to SGR 39 / 49.

// ─── Color ──────────────────────────────────────────────────────────────────

/// A cell foreground or background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default color (SGR 39 / 49).
    #[default]
    Default,
    /// An entry of the 256-color palette. 0-15 are the themed ANSI colors.
    Ansi(u8),
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Self = Self::Ansi(0);
    pub const RED: Self = Self::Ansi(1);
    pub const GREEN: Self = Self::Ansi(2);
    pub const YELLOW: Self = Self::Ansi(3);
    pub const BLUE: Self = Self::Ansi(4);
    pub const MAGENTA: Self = Self::Ansi(5);
    pub const CYAN: Self = Self::Ansi(6);
    pub const WHITE: Self = Self::Ansi(7);
    /// Bright black. Most themes render it as a mid gray.
    pub const GRAY: Self = Self::Ansi(8);
    pub const BRIGHT_WHITE: Self = Self::Ansi(15);

    /// Whether this is the terminal's default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
