//! Cursor coordinates and ordered ranges.
//!
//! Coordinates are 0-indexed `(line, col)` pairs where `col` counts chars
//! (Unicode scalar values) from the start of the line, never bytes. That is
//! the unit ropey indexes by, and the unit the cursor moves in.
//!
//! The status bar shows both as 1-based numbers; that conversion happens at
//! display time and never here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A `(line, col)` location in a buffer.
///
/// `col == line_len` is valid: it is the slot after the last character,
/// where typing appends.
///
/// Ordering is line first, then column, so a position on an earlier line
/// is always smaller regardless of columns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open span `[start, end)` with `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range from two positions in either order.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// True when the range covers no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `pos` falls in `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{}..{}:{})",
            self.start.line, self.start.col, self.end.line, self.end.col
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- ordering --

    #[test]
    fn earlier_line_wins_regardless_of_column() {
        assert!(Position::new(0, 99) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1).max(Position::new(0, 5)), Position::new(1, 1));
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Position::default(), Position::ZERO);
    }

    // -- ranges --

    #[test]
    fn ordered_swaps_backwards_input() {
        let r = Range::ordered(Position::new(3, 1), Position::new(1, 7));
        assert_eq!(r.start, Position::new(1, 7));
        assert_eq!(r.end, Position::new(3, 1));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Range::ordered(Position::new(0, 2), Position::new(1, 1));
        assert!(r.contains(Position::new(0, 2)));
        assert!(r.contains(Position::new(0, 50)));
        assert!(r.contains(Position::new(1, 0)));
        assert!(!r.contains(Position::new(1, 1)));
        assert!(!r.contains(Position::new(0, 1)));
    }

    #[test]
    fn empty_range() {
        let p = Position::new(4, 4);
        assert!(Range::ordered(p, p).is_empty());
        assert!(!Range::ordered(p, Position::new(4, 5)).is_empty());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Position::new(2, 5)), "Pos(2:5)");
        assert_eq!(
            format!("{:?}", Range::ordered(Position::ZERO, Position::new(1, 2))),
            "Range(0:0..1:2)"
        );
    }
}
