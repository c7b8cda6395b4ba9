// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D cell grid that everything paints to.
//
// Panes, the status bar and the prompt row all paint here. The diff
// renderer then compares this frame against the previous one and emits
// ANSI only for the cells that changed.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous, so the renderer's left-to-right scan is linear and a
//     whole row can be compared with one slice comparison.
//
//   - Writes outside the grid are silently dropped. Callers clip to
//     their own rectangles; the buffer only guards its own bounds.
//
//   - Every stored character occupies exactly one column. Control
//     characters, zero-width marks and wide glyphs are replaced on the
//     way in (see `one_column`).

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};
use crate::terminal::Size;

/// Stand-in for characters that cannot be shown in a single column.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Map `ch` to something that occupies exactly one terminal column.
#[must_use]
pub fn one_column(ch: char) -> char {
    match ch.width() {
        Some(1) => ch,
        _ => REPLACEMENT,
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// A grid of cells the size of the terminal.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A blank buffer of `width × height` cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Dimensions as a terminal [`Size`].
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size {
            cols: self.width,
            rows: self.height,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// One full row of cells, or `None` outside the grid.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// The characters of row `y` as a string, trailing blanks included.
    ///
    /// Mostly useful for asserting on painted output.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. All content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Copy another buffer of identical size into this one.
    ///
    /// Sizes that differ fall back to a clone.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    /// Write one character. Returns `false` if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: u16, y: u16, ch: char, style: Style) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = Cell::styled(one_column(ch), style);
                true
            }
            None => false,
        }
    }

    /// Write `s` starting at `(x, y)`, one character per column, never
    /// past `x + max_width` or the right edge. Returns the columns written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: Style, max_width: u16) -> u16 {
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for ch in s.chars() {
            if col >= limit {
                break;
            }
            self.set(col, y, ch, style);
            col += 1;
        }
        col.saturating_sub(x)
    }

    /// Fill `width` cells of row `y` from `x` with blanks in `style`.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, style: Style) {
        let end = x.saturating_add(width).min(self.width);
        for col in x..end {
            self.set(col, y, ' ', style);
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
