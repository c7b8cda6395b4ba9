//! Word motions — Ctrl+Left / Ctrl+Right navigation.
//!
//! A **word** is a maximal run of letters, digits and underscores.
//! Everything else (blanks and punctuation alike) is a separator.
//!
//! Both motions skip separators first, then the word that follows, so
//! from the middle of `foo.bar` Ctrl+Right lands after `bar`.
//!
//! At the edge of a line the motion crosses to the neighbouring line and
//! stops there: Ctrl+Left at column 0 goes to the end of the previous
//! line, Ctrl+Right at the end of a line goes to column 0 of the next.
//! That step does not consume a word.

use crate::lines::LineStore;
use crate::position::Position;

/// Letters, digits and `_`.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ctrl+Left from `pos`.
#[must_use]
pub fn word_left(lines: &LineStore, pos: Position) -> Position {
    let pos = lines.clamp(pos);
    if pos.col == 0 {
        return if pos.line == 0 {
            pos
        } else {
            Position::new(pos.line - 1, lines.line_len(pos.line - 1))
        };
    }
    let chars = lines.line_chars(pos.line);
    Position::new(pos.line, skip_left(&chars, pos.col))
}

/// Ctrl+Right from `pos`.
#[must_use]
pub fn word_right(lines: &LineStore, pos: Position) -> Position {
    let pos = lines.clamp(pos);
    let chars = lines.line_chars(pos.line);
    if pos.col >= chars.len() {
        return if pos.line >= lines.last_line() {
            pos
        } else {
            Position::new(pos.line + 1, 0)
        };
    }
    Position::new(pos.line, skip_right(&chars, pos.col))
}

// ---------------------------------------------------------------------------
// Core scans
// ---------------------------------------------------------------------------

fn skip_left(chars: &[char], mut col: usize) -> usize {
    while col > 0 && !is_word_char(chars[col - 1]) {
        col -= 1;
    }
    while col > 0 && is_word_char(chars[col - 1]) {
        col -= 1;
    }
    col
}

fn skip_right(chars: &[char], mut col: usize) -> usize {
    while col < chars.len() && !is_word_char(chars[col]) {
        col += 1;
    }
    while col < chars.len() && is_word_char(chars[col]) {
        col += 1;
    }
    col
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
