// SPDX-License-Identifier: MIT
//
// Cell — the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell: one codepoint plus the
// Style it is drawn with. The frame buffer is a grid of cells, and the
// differential renderer compares cells to decide what to send.
//
// quill maps one character to one column everywhere (tab expansion is
// done by the editor before cells are written), so there are no
// continuation cells. Characters that would not occupy exactly one
// terminal column are replaced when they enter the frame buffer, which
// keeps the grid and the terminal's idea of the cursor in agreement.

use crate::color::Color;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR parameters:
    ///
    /// ```
    /// use quill_term::cell::Attr;
    ///
    /// let attrs = Attr::BOLD | Attr::ITALIC;
    /// assert!(attrs.contains(Attr::BOLD));
    /// assert!(!attrs.contains(Attr::UNDERLINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2 — decreased intensity.
        const DIM       = 1 << 1;
        /// SGR 3 — italic.
        const ITALIC    = 1 << 2;
        /// SGR 4 — underline.
        const UNDERLINE = 1 << 3;
        /// SGR 7 — swap foreground and background.
        const INVERSE   = 1 << 4;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Foreground, background and attributes for a run of cells.
///
/// Built with const combinators so themes can be `const` tables:
///
/// ```
/// use quill_term::cell::Style;
/// use quill_term::color::Color;
///
/// const SELECTION: Style = Style::new().fg(Color::WHITE).bg(Color::BLUE);
/// assert_eq!(SELECTION.bg, Color::BLUE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Style {
    /// The terminal's default style: default colors, no attributes.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    #[inline]
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    #[inline]
    #[must_use]
    pub const fn attrs(mut self, attrs: Attr) -> Self {
        self.attrs = self.attrs.union(attrs);
        self
    }

    #[inline]
    #[must_use]
    pub const fn bold(self) -> Self {
        self.attrs(Attr::BOLD)
    }

    #[inline]
    #[must_use]
    pub const fn italic(self) -> Self {
        self.attrs(Attr::ITALIC)
    }

    /// Whether this style is indistinguishable from the terminal default.
    #[inline]
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_default() && self.bg.is_default() && self.attrs.is_empty()
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character drawn in this cell.
    pub ch: char,
    /// How it is drawn.
    pub style: Style,
}

impl Cell {
    /// A blank cell in the default style.
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: Style::new(),
    };

    /// A cell with the given character in the default style.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            style: Style::new(),
        }
    }

    /// A cell with the given character and style.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// Whether the cell is blank and unstyled.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_space_in_default_style() {
        assert_eq!(Cell::EMPTY.ch, ' ');
        assert!(Cell::EMPTY.style.is_plain());
        assert!(Cell::default().is_empty());
    }

    #[test]
    fn styled_cell_is_not_empty() {
        let cell = Cell::styled(' ', Style::new().bg(Color::BLUE));
        assert!(!cell.is_empty());
    }

    #[test]
    fn style_combinators_accumulate_attrs() {
        let style = Style::new().bold().italic().fg(Color::RED);
        assert!(style.attrs.contains(Attr::BOLD | Attr::ITALIC));
        assert_eq!(style.fg, Color::RED);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.is_plain());
    }

    #[test]
    fn new_style_is_plain() {
        assert!(Style::new().is_plain());
        assert_eq!(Style::new(), Style::default());
    }
}
