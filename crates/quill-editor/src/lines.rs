//! Line store — the ground truth of a buffer's text.
//!
//! A [`LineStore`] wraps a [`ropey::Rope`] and exposes it as an ordered
//! sequence of lines addressed by 0-based index, with columns counted in
//! chars. ropey gives O(log n) inserts and removals anywhere, so a
//! multi-line paste or a line merge never shifts a `Vec` of lines.
//!
//! # Invariants
//!
//! - There is always at least one line. An empty document is one empty
//!   line, and a document ending in `\n` has an empty last line.
//! - `\n` is the only line separator. Carriage returns never enter the
//!   store: [`normalize_newlines`] turns `\r\n` and lone `\r` into `\n`
//!   on the way in, for loaded files and inserted text alike.
//! - Line contents never include the separator. `text()` is exactly the
//!   lines joined with `\n`, which is also the on-disk format.
//!
//! Every method clamps out-of-range positions instead of panicking; the
//! buffer above relies on that to keep its cursor in bounds.

use std::borrow::Cow;

use ropey::{Rope, RopeSlice};

use crate::position::Position;

/// Replace `\r\n` and lone `\r` with `\n`.
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

// ---------------------------------------------------------------------------
// LineStore
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct LineStore {
    rope: Rope,
}

impl LineStore {
    /// One empty line.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build from text, stripping carriage returns.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_newlines(text)),
        }
    }

    // -- Reading ------------------------------------------------------------

    /// Number of lines, always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Line content without its separator, or `None` past the end.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        if line >= self.line_count() {
            return None;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            Some(slice.slice(..len - 1))
        } else {
            Some(slice)
        }
    }

    /// Char count of `line`, 0 past the end.
    #[must_use]
    pub fn line_len(&self, line: usize) -> usize {
        self.line(line).map_or(0, |l| l.len_chars())
    }

    /// Line content as an owned string (empty past the end).
    #[must_use]
    pub fn line_string(&self, line: usize) -> String {
        self.line(line).map(String::from).unwrap_or_default()
    }

    /// Line content as chars, for column-indexed scanning.
    #[must_use]
    pub fn line_chars(&self, line: usize) -> Vec<char> {
        self.line(line)
            .map(|l| l.chars().collect())
            .unwrap_or_default()
    }

    /// Lines `first..=last` joined with `\n`, no trailing separator.
    ///
    /// `last` is clamped to the document; an inverted range is empty.
    #[must_use]
    pub fn text_range(&self, first: usize, last: usize) -> String {
        let last = last.min(self.last_line());
        if first > last {
            return String::new();
        }
        let start = self.rope.line_to_char(first);
        let end = self.rope.line_to_char(last) + self.line_len(last);
        self.rope.slice(start..end).to_string()
    }

    /// The whole document, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text between two positions (clamped, either order).
    #[must_use]
    pub fn slice_text(&self, a: Position, b: Position) -> String {
        let (start, end) = self.char_span(a, b);
        self.rope.slice(start..end).to_string()
    }

    /// Clamp a position into the document: line to the last line, column
    /// to that line's length.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `pos` (clamped). `text` may contain newlines;
    /// carriage returns are stripped. Returns the position just past the
    /// inserted text.
    pub fn insert(&mut self, pos: Position, text: &str) -> Position {
        let text = normalize_newlines(text);
        let start = self.char_index(pos);
        self.rope.insert(start, &text);
        let end = start + text.chars().count();
        self.position_of(end)
    }

    /// Insert a single char at `pos` (clamped). A `\r` becomes a line
    /// break, as it does in [`insert`](Self::insert).
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Position {
        let ch = if ch == '\r' { '\n' } else { ch };
        let idx = self.char_index(pos);
        self.rope.insert_char(idx, ch);
        self.position_of(idx + 1)
    }

    /// Remove the text between two positions (clamped, either order).
    /// Removing across a line break joins the two lines.
    pub fn remove(&mut self, a: Position, b: Position) {
        let (start, end) = self.char_span(a, b);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    // -- Coordinates ----------------------------------------------------------

    fn char_index(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.rope.line_to_char(pos.line) + pos.col
    }

    fn char_span(&self, a: Position, b: Position) -> (usize, usize) {
        let (a, b) = (self.char_index(a), self.char_index(b));
        (a.min(b), a.max(b))
    }

    fn position_of(&self, char_idx: usize) -> Position {
        let idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        Position::new(line, idx - self.rope.line_to_char(line))
    }
}

impl std::fmt::Debug for LineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStore")
            .field("lines", &self.line_count())
            .field("chars", &self.rope.len_chars())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(store: &LineStore) -> Vec<String> {
        (0..store.line_count()).map(|i| store.line_string(i)).collect()
    }

    // -- construction --

    #[test]
    fn empty_store_has_one_empty_line() {
        let store = LineStore::new();
        assert_eq!(store.line_count(), 1);
        assert_eq!(store.line_len(0), 0);
        assert_eq!(store.text(), "");
    }

    #[test]
    fn trailing_newline_makes_empty_last_line() {
        let store = LineStore::from_text("a\nb\n");
        assert_eq!(lines(&store), vec!["a", "b", ""]);
        assert_eq!(store.text(), "a\nb\n");
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let store = LineStore::from_text("one\r\ntwo\rthree");
        assert_eq!(lines(&store), vec!["one", "two", "three"]);
        assert_eq!(normalize_newlines("plain"), Cow::Borrowed("plain"));
    }

    #[test]
    fn only_lf_separates_lines() {
        // U+2028 and form feed are ordinary characters here.
        let store = LineStore::from_text("a\u{2028}b\u{c}c");
        assert_eq!(store.line_count(), 1);
        assert_eq!(store.line_len(0), 5);
    }

    // -- reading --

    #[test]
    fn columns_count_chars_not_bytes() {
        let store = LineStore::from_text("café ☕\nx");
        assert_eq!(store.line_len(0), 6);
        assert_eq!(store.line_chars(0)[3], 'é');
        assert_eq!(store.line_len(5), 0);
        assert!(store.line(2).is_none());
    }

    #[test]
    fn text_range_joins_without_trailing_newline() {
        let store = LineStore::from_text("a\nbb\nccc\nd");
        assert_eq!(store.text_range(1, 2), "bb\nccc");
        assert_eq!(store.text_range(3, 99), "d");
        assert_eq!(store.text_range(2, 1), "");
    }

    #[test]
    fn clamp_keeps_positions_in_bounds() {
        let store = LineStore::from_text("abc\nde");
        assert_eq!(store.clamp(Position::new(0, 9)), Position::new(0, 3));
        assert_eq!(store.clamp(Position::new(7, 1)), Position::new(1, 1));
    }

    // -- editing --

    #[test]
    fn insert_multiline_splits_head_and_tail() {
        let mut store = LineStore::from_text("headTAIL");
        let end = store.insert(Position::new(0, 4), "1\n2\n3");
        assert_eq!(lines(&store), vec!["head1", "2", "3TAIL"]);
        assert_eq!(end, Position::new(2, 1));
    }

    #[test]
    fn insert_strips_carriage_returns() {
        let mut store = LineStore::new();
        let end = store.insert(Position::ZERO, "a\r\nb");
        assert_eq!(lines(&store), vec!["a", "b"]);
        assert_eq!(end, Position::new(1, 1));
    }

    #[test]
    fn insert_char_returns_next_column() {
        let mut store = LineStore::from_text("ac");
        assert_eq!(store.insert_char(Position::new(0, 1), 'b'), Position::new(0, 2));
        assert_eq!(store.text(), "abc");
    }

    #[test]
    fn lone_carriage_return_breaks_the_line_either_way() {
        let mut by_char = LineStore::from_text("ab");
        let mut by_str = by_char.clone();
        let a = by_char.insert_char(Position::new(0, 1), '\r');
        let b = by_str.insert(Position::new(0, 1), "\r");
        assert_eq!(a, Position::new(1, 0));
        assert_eq!(a, b);
        assert_eq!(lines(&by_char), vec!["a", "b"]);
        assert_eq!(by_char.text(), by_str.text());
    }

    #[test]
    fn remove_across_lines_joins_them() {
        let mut store = LineStore::from_text("one\ntwo\nthree");
        store.remove(Position::new(2, 2), Position::new(0, 1));
        assert_eq!(lines(&store), vec!["oree"]);
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let original = "fn main() {\n\tlet x = 1;\n}";
        let mut store = LineStore::from_text(original);
        let at = Position::new(1, 5);
        let end = store.insert(at, "mut y\nz ");
        store.remove(at, end);
        assert_eq!(store.text(), original);
    }

    #[test]
    fn slice_text_matches_positions() {
        let store = LineStore::from_text("hello\nworld");
        assert_eq!(store.slice_text(Position::new(0, 3), Position::new(1, 2)), "lo\nwo");
        assert_eq!(store.slice_text(Position::new(1, 2), Position::new(0, 3)), "lo\nwo");
    }
}
