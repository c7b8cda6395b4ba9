//! Selection — an anchor/cursor pair over buffer coordinates.
//!
//! `start` is where the selection was anchored and `end` follows the
//! cursor, so `start` may come after `end`. Every consumer goes through
//! [`Selection::range`], which orders the two.
//!
//! An inactive selection is ignored by everything that reads it, but it
//! keeps its coordinates until the next [`anchor`](Selection::anchor)
//! overwrites them.

use crate::position::{Position, Range};

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub active: bool,
}

impl Selection {
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            active: true,
        }
    }

    /// The covered span, low endpoint first.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range {
        Range::ordered(self.start, self.end)
    }

    /// Whether `(line, col)` lies inside the span, ignoring `active`.
    ///
    /// Half-open: the low endpoint is included, the high endpoint is not.
    #[must_use]
    pub fn contains(&self, line: usize, col: usize) -> bool {
        let Range { start: lo, end: hi } = self.range();
        if line < lo.line || line > hi.line {
            return false;
        }
        if lo.line == hi.line {
            return lo.col <= col && col < hi.col;
        }
        if line == lo.line {
            return col >= lo.col;
        }
        if line == hi.line {
            return col < hi.col;
        }
        true
    }

    /// Whether the cell should render as selected.
    #[inline]
    #[must_use]
    pub fn is_selected(&self, line: usize, col: usize) -> bool {
        self.active && self.contains(line, col)
    }

    /// An active selection that covers at least one character.
    #[inline]
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.active && self.start != self.end
    }

    /// Start extending from `pos` unless already active.
    pub fn anchor(&mut self, pos: Position) {
        if !self.active {
            self.start = pos;
            self.end = pos;
            self.active = true;
        }
    }

    /// Move the cursor end.
    pub fn extend_to(&mut self, pos: Position) {
        self.end = pos;
    }

    /// Stop selecting; the coordinates stay.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Selection({:?}..{:?}", self.start, self.end)?;
        if !self.active {
            f.write_str(", inactive")?;
        }
        f.write_str(")")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
