//! Text buffer — one open document's full editable state.
//!
//! A `Buffer` composes the [`LineStore`] with a cursor, a [`Selection`],
//! the [`HighlightCache`] and its lexer, the scroll offsets of the pane
//! showing it, and file metadata (path, modified flag).
//!
//! # Invariants
//!
//! - The cursor is always inside the document: `line < line_count()` and
//!   `col <= line_len(line)`. Every mutation and motion clamps.
//! - Every mutation reports the lines it touched to the highlight cache.
//!   An edit that stays on one line marks that line; an edit that changes
//!   the line count splices the cache and marks from the edit line to the
//!   end of the document, since every line index below it moved.
//! - A failed save leaves text, path and modified flag untouched.
//!
//! There is no undo history; edits are applied in place.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quill_term::cell::Style;

use crate::error::{EditorError, Result};
use crate::highlight::{DEFAULT_MARGIN, HighlightCache};
use crate::lines::LineStore;
use crate::position::Position;
use crate::selection::Selection;
use crate::syntax::{self, Lexer};
use crate::theme::Theme;
use crate::word;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// A cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    /// Up by this many lines.
    PageUp(usize),
    /// Down by this many lines.
    PageDown(usize),
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

pub struct Buffer {
    lines: LineStore,
    cursor: Position,
    selection: Selection,
    highlight: HighlightCache,
    lexer: Box<dyn Lexer>,
    /// First visible line.
    top_line: usize,
    /// First visible visual column.
    left_col: usize,
    path: Option<PathBuf>,
    modified: bool,
}

impl Buffer {
    /// An empty, unnamed buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// An unnamed buffer holding `text`. Carriage returns are stripped.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lines = LineStore::from_text(text);
        let mut highlight = HighlightCache::new(DEFAULT_MARGIN);
        highlight.reset(lines.line_count());
        Self {
            lines,
            cursor: Position::ZERO,
            selection: Selection::default(),
            highlight,
            lexer: syntax::detect(None),
            top_line: 0,
            left_col: 0,
            path: None,
            modified: false,
        }
    }

    /// Open `path`. A missing file gives an empty buffer bound to that
    /// name; invalid UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Any read failure other than "not found".
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut buf = match fs::read(&path) {
            Ok(bytes) => Self::from_text(&String::from_utf8_lossy(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "new file");
                Self::new()
            }
            Err(e) => return Err(EditorError::io(path, e)),
        };
        tracing::debug!(path = %path.display(), lines = buf.line_count(), "opened");
        buf.lexer = syntax::detect(Some(&path));
        buf.path = Some(path);
        Ok(buf)
    }

    /// Use a different highlight context margin. Drops cached spans.
    #[must_use]
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.highlight = HighlightCache::new(margin);
        self.highlight.reset(self.lines.line_count());
        self
    }

    // -- Accessors ------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn lines(&self) -> &LineStore {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub const fn highlight(&self) -> &HighlightCache {
        &self.highlight
    }

    #[inline]
    #[must_use]
    pub fn lexer_name(&self) -> &'static str {
        self.lexer.name()
    }

    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    #[inline]
    #[must_use]
    pub const fn left_col(&self) -> usize {
        self.left_col
    }

    pub fn set_scroll(&mut self, top_line: usize, left_col: usize) {
        self.top_line = top_line.min(self.lines.last_line());
        self.left_col = left_col;
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// The path as given, or `[No Name]`.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        self.path
            .as_deref()
            .map_or(Cow::Borrowed("[No Name]"), |p| p.to_string_lossy())
    }

    // -- Insertion ------------------------------------------------------------

    /// Insert one char at the cursor and advance past it.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            self.insert_newline();
            return;
        }
        let at = self.cursor;
        self.cursor = self.lines.insert_char(at, ch);
        self.touched(at.line);
    }

    /// Insert `text` at the cursor; the cursor ends up after it.
    ///
    /// Multi-line text splits the cursor line: the head joins the first
    /// inserted line and the tail follows the last one.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = self.cursor;
        let before = self.lines.line_count();
        self.cursor = self.lines.insert(at, text);
        self.edited(at.line, before);
    }

    /// Split the line at the cursor; the cursor moves to the new line.
    pub fn insert_newline(&mut self) {
        self.insert_text("\n");
    }

    // -- Deletion -------------------------------------------------------------

    /// Backspace. At column 0 the line joins the previous one. Returns
    /// whether anything changed.
    pub fn delete_backward(&mut self) -> bool {
        let Position { line, col } = self.cursor;
        if col > 0 {
            let start = Position::new(line, col - 1);
            self.lines.remove(start, self.cursor);
            self.cursor = start;
            self.touched(line);
            true
        } else if line > 0 {
            let before = self.lines.line_count();
            let join = Position::new(line - 1, self.lines.line_len(line - 1));
            self.lines.remove(join, self.cursor);
            self.cursor = join;
            self.edited(join.line, before);
            true
        } else {
            false
        }
    }

    /// Delete. At the end of a line the next line joins this one. The
    /// cursor stays put. Returns whether anything changed.
    pub fn delete_forward(&mut self) -> bool {
        let Position { line, col } = self.cursor;
        if col < self.lines.line_len(line) {
            self.lines.remove(self.cursor, Position::new(line, col + 1));
            self.touched(line);
            true
        } else if line < self.lines.last_line() {
            let before = self.lines.line_count();
            self.lines.remove(self.cursor, Position::new(line + 1, 0));
            self.edited(line, before);
            true
        } else {
            false
        }
    }

    /// Delete the text `selection` covers (either direction, endpoints
    /// clamped). The cursor moves to the low endpoint and the buffer's
    /// selection is deactivated.
    pub fn delete_range(&mut self, selection: &Selection) {
        let range = selection.range();
        let (lo, hi) = (self.lines.clamp(range.start), self.lines.clamp(range.end));
        // Clamping can swap endpoints that both lie past the last line.
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.selection.deactivate();
        self.cursor = lo;
        if lo == hi {
            return;
        }
        let before = self.lines.line_count();
        self.lines.remove(lo, hi);
        self.edited(lo.line, before);
    }

    /// Delete the active selection, if it covers anything.
    pub fn delete_selection(&mut self) -> bool {
        if !self.selection.has_text() {
            self.selection.deactivate();
            return false;
        }
        let selection = self.selection;
        self.delete_range(&selection);
        true
    }

    /// The text `selection` covers, lines joined with `\n`.
    #[must_use]
    pub fn extract_text(&self, selection: &Selection) -> String {
        let range = selection.range();
        self.lines.slice_text(range.start, range.end)
    }

    /// Text of the active selection, or `None` if nothing is selected.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .has_text()
            .then(|| self.extract_text(&self.selection))
    }

    // -- Motion ---------------------------------------------------------------

    /// Move the cursor. With `select` the selection is anchored at the old
    /// cursor (unless already active) and extended to the new one;
    /// without it any selection is deactivated.
    pub fn apply_motion(&mut self, motion: Motion, select: bool) {
        if select {
            self.selection.anchor(self.cursor);
        } else {
            self.selection.deactivate();
        }
        self.cursor = self.motion_target(motion);
        if select {
            self.selection.extend_to(self.cursor);
        }
    }

    fn motion_target(&self, motion: Motion) -> Position {
        let Position { line, col } = self.cursor;
        let last = self.lines.last_line();
        match motion {
            Motion::Left if col > 0 => Position::new(line, col - 1),
            Motion::Left if line > 0 => Position::new(line - 1, self.lines.line_len(line - 1)),
            Motion::Right if col < self.lines.line_len(line) => Position::new(line, col + 1),
            Motion::Right if line < last => Position::new(line + 1, 0),
            Motion::Left | Motion::Right => self.cursor,
            Motion::Up => self.lines.clamp(Position::new(line.saturating_sub(1), col)),
            Motion::Down => self.lines.clamp(Position::new(line + 1, col)),
            Motion::PageUp(n) => self.lines.clamp(Position::new(line.saturating_sub(n), col)),
            Motion::PageDown(n) => self.lines.clamp(Position::new(line.saturating_add(n), col)),
            Motion::WordLeft => word::word_left(&self.lines, self.cursor),
            Motion::WordRight => word::word_right(&self.lines, self.cursor),
            Motion::LineStart => Position::new(line, 0),
            Motion::LineEnd => Position::new(line, self.lines.line_len(line)),
        }
    }

    /// Put the cursor at `pos` (clamped) and drop the selection.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.lines.clamp(pos);
        self.selection.deactivate();
    }

    /// Jump to the start of 1-based `line`, clamped to the document.
    /// Returns the 1-based line actually reached.
    pub fn goto_line(&mut self, line: usize) -> usize {
        let target = line.clamp(1, self.lines.line_count());
        self.set_cursor(Position::new(target - 1, 0));
        target
    }

    pub fn clear_selection(&mut self) {
        self.selection.deactivate();
    }

    // -- Highlighting -----------------------------------------------------------

    /// Re-tokenize whatever is dirty. Returns the lines re-tokenized.
    pub fn refresh_highlight(&mut self, theme: &Theme) -> usize {
        self.highlight
            .refresh(&self.lines, self.lexer.as_mut(), theme)
    }

    #[must_use]
    pub fn style_at(&self, line: usize, col: usize) -> Style {
        self.highlight.style_at(line, col)
    }

    // -- File I/O ---------------------------------------------------------------

    /// Write to the buffer's own path. Returns that path.
    ///
    /// # Errors
    ///
    /// [`EditorError::NoFileName`] for an unnamed buffer, or the write
    /// failure.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.path.clone().ok_or(EditorError::NoFileName)?;
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write to `path` and bind the buffer to it on success.
    ///
    /// # Errors
    ///
    /// The write failure; the buffer is left unchanged.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.write_to(&path)?;
        if self.path.as_deref() != Some(path.as_path()) {
            self.lexer = syntax::detect(Some(&path));
            self.highlight.mark_all_dirty(self.lines.line_count());
            self.path = Some(path);
        }
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        fs::write(path, self.lines.text()).map_err(|e| EditorError::io(path, e))?;
        tracing::debug!(path = %path.display(), lines = self.line_count(), "written");
        self.modified = false;
        Ok(())
    }

    // -- Bookkeeping ----------------------------------------------------------

    fn touched(&mut self, line: usize) {
        self.highlight.mark_dirty(line, line);
        self.modified = true;
    }

    /// Record an edit that started on `line` when the document had
    /// `before` lines.
    fn edited(&mut self, line: usize, before: usize) {
        let after = self.lines.line_count();
        if after == before {
            self.touched(line);
            return;
        }
        if after > before {
            self.highlight.lines_inserted(line + 1, after - before);
        } else {
            self.highlight.lines_removed(line + 1, before - after);
        }
        self.highlight.mark_dirty(line, after - 1);
        self.modified = true;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("path", &self.path)
            .field("lines", &self.line_count())
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(buf: &Buffer) -> Vec<String> {
        (0..buf.line_count())
            .map(|i| buf.lines().line_string(i))
            .collect()
    }

    fn at(buf: &mut Buffer, line: usize, col: usize) {
        buf.set_cursor(Position::new(line, col));
    }

    fn sel(a: (usize, usize), b: (usize, usize)) -> Selection {
        Selection::new(Position::new(a.0, a.1), Position::new(b.0, b.1))
    }

    fn assert_cursor_in_bounds(buf: &Buffer) {
        let c = buf.cursor();
        assert!(c.line < buf.line_count(), "{c:?} past last line");
        assert!(c.col <= buf.lines().line_len(c.line), "{c:?} past line end");
    }

    // -- typing --

    #[test]
    fn type_enter_backspace_scenario() {
        let mut buf = Buffer::new();
        for ch in "hi\tthere".chars() {
            buf.insert_char(ch);
        }
        buf.insert_newline();
        assert_eq!(lines(&buf), vec!["hi\tthere", ""]);
        assert_eq!(buf.cursor(), Position::new(1, 0));

        assert!(buf.delete_backward());
        assert_eq!(lines(&buf), vec!["hi\tthere"]);
        assert_eq!(buf.cursor(), Position::new(0, 8));
        assert!(buf.is_modified());
    }

    #[test]
    fn insert_char_counts_chars_not_bytes() {
        let mut buf = Buffer::from_text("cafe");
        at(&mut buf, 0, 3);
        buf.insert_char('é');
        assert_eq!(lines(&buf), vec!["cafée"]);
        assert_eq!(buf.cursor(), Position::new(0, 4));
    }

    #[test]
    fn insert_text_multi_line() {
        let mut buf = Buffer::from_text("headTAIL\nnext");
        at(&mut buf, 0, 4);
        buf.insert_text("one\ntwo\nthree");
        assert_eq!(lines(&buf), vec!["headone", "two", "threeTAIL", "next"]);
        assert_eq!(buf.cursor(), Position::new(2, 5));
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let original = "alpha\n\tbeta\ngamma";
        let mut buf = Buffer::from_text(original);
        at(&mut buf, 1, 2);
        let start = buf.cursor();
        buf.insert_text("x\ny z");
        let end = buf.cursor();
        buf.delete_range(&Selection::new(start, end));
        assert_eq!(buf.lines().text(), original);
        assert_eq!(buf.cursor(), start);
    }

    // -- deletion --

    #[test]
    fn backspace_at_document_start_does_nothing() {
        let mut buf = Buffer::from_text("abc");
        assert!(!buf.delete_backward());
        assert!(!buf.is_modified());
    }

    #[test]
    fn backspace_at_column_zero_joins_lines() {
        let mut buf = Buffer::from_text("foo\nbar");
        at(&mut buf, 1, 0);
        buf.delete_backward();
        assert_eq!(lines(&buf), vec!["foobar"]);
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    #[test]
    fn delete_forward_removes_under_cursor_and_joins() {
        let mut buf = Buffer::from_text("ab\ncd");
        at(&mut buf, 0, 1);
        buf.delete_forward();
        assert_eq!(lines(&buf), vec!["a", "cd"]);
        buf.delete_forward();
        assert_eq!(lines(&buf), vec!["acd"]);
        assert_eq!(buf.cursor(), Position::new(0, 1));
        at(&mut buf, 0, 3);
        assert!(!buf.delete_forward());
    }

    #[test]
    fn delete_range_backwards_and_clamped() {
        let mut buf = Buffer::from_text("one\ntwo\nthree\nfour");
        buf.delete_range(&sel((2, 99), (0, 1)));
        assert_eq!(lines(&buf), vec!["o", "four"]);
        assert_eq!(buf.cursor(), Position::new(0, 1));
        assert!(!buf.selection().active);
    }

    #[test]
    fn delete_range_with_both_ends_past_the_document() {
        let mut buf = Buffer::from_text("0 xa");
        buf.delete_range(&sel((5, 3), (2, 99)));
        assert_eq!(lines(&buf), vec!["0 x"]);
        assert_eq!(buf.cursor(), Position::new(0, 3));
        assert!(buf.cursor().col <= buf.lines().line_len(0));
    }

    #[test]
    fn carriage_return_splits_the_line_like_newline() {
        let mut buf = Buffer::from_text("ab");
        buf.set_cursor(Position::new(0, 1));
        buf.insert_char('\r');
        assert_eq!(lines(&buf), vec!["a", "b"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    #[test]
    fn extract_delete_insert_reproduces_document() {
        let original = "fn main() {\n    let x = 1;\n}\n";
        for (a, b) in [((0, 3), (1, 8)), ((1, 4), (1, 7)), ((2, 1), (0, 0)), ((0, 0), (3, 0))] {
            let mut buf = Buffer::from_text(original);
            let s = sel(a, b);
            let text = buf.extract_text(&s);
            buf.delete_range(&s);
            buf.insert_text(&text);
            assert_eq!(buf.lines().text(), original, "selection {a:?}..{b:?}");
        }
    }

    #[test]
    fn extract_text_has_no_trailing_newline() {
        let buf = Buffer::from_text("ab\ncd\nef");
        assert_eq!(buf.extract_text(&sel((0, 1), (2, 0))), "b\ncd\n");
        assert_eq!(buf.extract_text(&sel((0, 1), (1, 2))), "b\ncd");
    }

    #[test]
    fn delete_selection_needs_active_text() {
        let mut buf = Buffer::from_text("hello");
        assert!(!buf.delete_selection());
        buf.apply_motion(Motion::Right, true);
        buf.apply_motion(Motion::Right, true);
        assert_eq!(buf.selected_text().as_deref(), Some("he"));
        assert!(buf.delete_selection());
        assert_eq!(lines(&buf), vec!["llo"]);
    }

    // -- motion --

    #[test]
    fn vertical_motion_clamps_column() {
        let mut buf = Buffer::from_text("long line\nab\nlonger line");
        at(&mut buf, 0, 8);
        buf.apply_motion(Motion::Down, false);
        assert_eq!(buf.cursor(), Position::new(1, 2));
        buf.apply_motion(Motion::Down, false);
        assert_eq!(buf.cursor(), Position::new(2, 2));
        buf.apply_motion(Motion::Down, false);
        assert_eq!(buf.cursor(), Position::new(2, 2));
    }

    #[test]
    fn horizontal_motion_wraps_lines() {
        let mut buf = Buffer::from_text("ab\ncd");
        at(&mut buf, 1, 0);
        buf.apply_motion(Motion::Left, false);
        assert_eq!(buf.cursor(), Position::new(0, 2));
        buf.apply_motion(Motion::Right, false);
        assert_eq!(buf.cursor(), Position::new(1, 0));
        at(&mut buf, 0, 0);
        buf.apply_motion(Motion::Left, false);
        assert_eq!(buf.cursor(), Position::ZERO);
    }

    #[test]
    fn page_motion_clamps() {
        let text: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let mut buf = Buffer::from_text(&text.join("\n"));
        buf.apply_motion(Motion::PageDown(20), false);
        assert_eq!(buf.cursor().line, 20);
        buf.apply_motion(Motion::PageDown(20), false);
        assert_eq!(buf.cursor().line, 29);
        buf.apply_motion(Motion::PageUp(100), false);
        assert_eq!(buf.cursor(), Position::ZERO);
    }

    #[test]
    fn shift_motion_extends_and_plain_motion_deactivates() {
        let mut buf = Buffer::from_text("hello world");
        buf.apply_motion(Motion::WordRight, true);
        assert_eq!(buf.selected_text().as_deref(), Some("hello"));
        buf.apply_motion(Motion::LineEnd, true);
        assert_eq!(buf.selected_text().as_deref(), Some("hello world"));

        buf.apply_motion(Motion::Left, false);
        assert!(!buf.selection().active);
        assert_eq!(buf.selection().start, Position::ZERO);
        assert_eq!(buf.cursor(), Position::new(0, 10));
    }

    #[test]
    fn goto_line_clamps() {
        let mut buf = Buffer::from_text("foo\nbar\nbaz");
        assert_eq!(buf.goto_line(2), 2);
        assert_eq!(buf.cursor(), Position::new(1, 0));
        assert_eq!(buf.goto_line(99), 3);
        assert_eq!(buf.goto_line(0), 1);
    }

    #[test]
    fn cursor_stays_in_bounds_through_edits() {
        let mut buf = Buffer::from_text("abc\n\ndefgh\ni");
        let script: [fn(&mut Buffer); 9] = [
            |b| b.apply_motion(Motion::PageDown(10), false),
            |b| b.apply_motion(Motion::LineEnd, false),
            |b| {
                b.delete_backward();
            },
            |b| b.apply_motion(Motion::Up, true),
            |b| {
                b.delete_selection();
            },
            |b| b.insert_text("x\ny"),
            |b| {
                b.delete_forward();
            },
            |b| b.apply_motion(Motion::WordLeft, false),
            |b| {
                b.delete_backward();
            },
        ];
        for step in script {
            step(&mut buf);
            assert_cursor_in_bounds(&buf);
        }
    }

    // -- highlight bookkeeping --

    #[test]
    fn same_line_edit_marks_one_line() {
        let mut buf = Buffer::from_text("a\nb\nc\nd");
        buf.refresh_highlight(&Theme::terminal());
        at(&mut buf, 1, 1);
        buf.insert_char('x');
        assert_eq!(buf.highlight().dirty_range(), Some((1, 1)));
    }

    #[test]
    fn line_count_change_marks_to_end() {
        let mut buf = Buffer::from_text("a\nb\nc\nd");
        buf.refresh_highlight(&Theme::terminal());
        at(&mut buf, 1, 1);
        buf.insert_newline();
        assert_eq!(buf.highlight().dirty_range(), Some((1, 4)));

        buf.refresh_highlight(&Theme::terminal());
        buf.delete_backward();
        assert_eq!(buf.highlight().dirty_range(), Some((1, 3)));
    }

    #[test]
    fn fresh_buffer_is_fully_dirty() {
        let mut buf = Buffer::from_text("x\ny\nz");
        assert_eq!(buf.highlight().dirty_range(), Some((0, 2)));
        assert_eq!(buf.refresh_highlight(&Theme::terminal()), 3);
        assert_eq!(buf.refresh_highlight(&Theme::terminal()), 0);
    }

    // -- file I/O --

    #[test]
    fn open_missing_file_binds_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let buf = Buffer::open(&path).unwrap();
        assert_eq!(lines(&buf), vec![""]);
        assert_eq!(buf.path(), Some(path.as_path()));
        assert!(!buf.is_modified());
    }

    #[test]
    fn open_strips_carriage_returns_and_save_writes_lf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let mut buf = Buffer::open(&path).unwrap();
        assert_eq!(lines(&buf), vec!["one", "two", ""]);
        buf.insert_char('>');
        assert_eq!(buf.save().unwrap(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), ">one\ntwo\n");
        assert!(!buf.is_modified());
    }

    #[test]
    fn open_picks_lexer_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Buffer::open(dir.path().join("a.rs")).unwrap().lexer_name(), "rust");
        assert_eq!(Buffer::open(dir.path().join("a.py")).unwrap().lexer_name(), "python");
        assert_eq!(Buffer::open(dir.path().join("a.md")).unwrap().lexer_name(), "plain");
    }

    #[test]
    fn save_unnamed_needs_a_name() {
        let mut buf = Buffer::from_text("x");
        assert!(matches!(buf.save(), Err(EditorError::NoFileName)));
        assert_eq!(buf.display_name(), "[No Name]");
    }

    #[test]
    fn failed_save_as_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Buffer::from_text("data");
        buf.insert_char('!');
        let bad = dir.path().join("missing-dir").join("f.txt");
        assert!(matches!(buf.save_as(&bad), Err(EditorError::Io { .. })));
        assert_eq!(buf.path(), None);
        assert!(buf.is_modified());
        assert_eq!(buf.lines().text(), "!data");
    }

    #[test]
    fn save_as_binds_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut buf = Buffer::from_text("a\nb");
        buf.save_as(&path).unwrap();
        assert_eq!(buf.path(), Some(path.as_path()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    }
}
