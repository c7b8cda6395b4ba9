//! Search — literal substring matches over a line store.
//!
//! [`search`] scans every line in order and returns all matches,
//! overlapping ones included: after a match at column `c` the scan
//! resumes at `c + 1`, so `"ab"` in `"ababab"` matches at 0, 2 and 4,
//! and `"aa"` in `"aaa"` matches at 0 and 1.
//!
//! Match lists are snapshots. Any edit to the buffer makes them stale,
//! and the editor drops them rather than trying to shift them.

use crate::lines::LineStore;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One occurrence, in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub col: usize,
    pub len: usize,
}

impl Match {
    #[inline]
    #[must_use]
    pub const fn start(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Whether the char at `(line, col)` is part of this match.
    #[inline]
    #[must_use]
    pub const fn contains(&self, line: usize, col: usize) -> bool {
        self.line == line && self.col <= col && col < self.col + self.len
    }
}

/// Every occurrence of `query`, in document order. Empty for an empty
/// query.
#[must_use]
pub fn search(lines: &LineStore, query: &str) -> Vec<Match> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut matches = Vec::new();
    for line in 0..lines.line_count() {
        let hay = lines.line_chars(line);
        if hay.len() < needle.len() {
            continue;
        }
        for col in 0..=hay.len() - needle.len() {
            if hay[col..col + needle.len()] == needle[..] {
                matches.push(Match {
                    line,
                    col,
                    len: needle.len(),
                });
            }
        }
    }
    matches
}

// ---------------------------------------------------------------------------
// SearchResults
// ---------------------------------------------------------------------------

/// The last search and where the user is in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    query: String,
    matches: Vec<Match>,
    index: usize,
}

impl SearchResults {
    /// Results of `search(lines, query)`, positioned on the first match.
    #[must_use]
    pub fn run(lines: &LineStore, query: &str) -> Self {
        Self {
            query: query.to_owned(),
            matches: search(lines, query),
            index: 0,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The match the cursor was last sent to.
    #[must_use]
    pub fn current(&self) -> Option<Match> {
        self.matches.get(self.index).copied()
    }

    /// Advance cyclically.
    pub fn next(&mut self) -> Option<Match> {
        if self.matches.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.matches.len();
        self.current()
    }

    /// Step back cyclically.
    pub fn prev(&mut self) -> Option<Match> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.index = (self.index + n - 1) % n;
        self.current()
    }

    /// 1-based index of the current match and the total.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.matches.is_empty()).then(|| (self.index + 1, self.matches.len()))
    }

    /// Whether any match covers `(line, col)`.
    #[must_use]
    pub fn covers(&self, line: usize, col: usize) -> bool {
        // Matches are sorted by line; skip straight to the line.
        let from = self.matches.partition_point(|m| m.line < line);
        self.matches[from..]
            .iter()
            .take_while(|m| m.line == line)
            .any(|m| m.contains(line, col))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cols(matches: &[Match]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.line, m.col)).collect()
    }

    // -- search --

    #[test]
    fn overlapping_matches_are_all_found() {
        let store = LineStore::from_text("ababab");
        assert_eq!(cols(&search(&store, "ab")), vec![(0, 0), (0, 2), (0, 4)]);

        let store = LineStore::from_text("aaa");
        assert_eq!(cols(&search(&store, "aa")), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn matches_in_document_order_with_char_columns() {
        let store = LineStore::from_text("héllo lo\nno\nlo");
        let matches = search(&store, "lo");
        assert_eq!(cols(&matches), vec![(0, 3), (0, 6), (2, 0)]);
        assert!(matches.iter().all(|m| m.len == 2));
    }

    #[test]
    fn empty_query_and_no_match() {
        let store = LineStore::from_text("abc");
        assert!(search(&store, "").is_empty());
        assert!(search(&store, "zz").is_empty());
        assert!(search(&store, "abcd").is_empty());
    }

    // -- navigation --

    #[test]
    fn next_and_prev_wrap() {
        let store = LineStore::from_text("x x\nx");
        let mut results = SearchResults::run(&store, "x");
        assert_eq!(results.position(), Some((1, 3)));
        assert_eq!(results.next().map(|m| m.start()), Some(Position::new(0, 2)));
        assert_eq!(results.next().map(|m| m.start()), Some(Position::new(1, 0)));
        assert_eq!(results.next().map(|m| m.start()), Some(Position::new(0, 0)));
        assert_eq!(results.prev().map(|m| m.start()), Some(Position::new(1, 0)));
        assert_eq!(results.position(), Some((3, 3)));
    }

    #[test]
    fn empty_results_do_nothing() {
        let mut results = SearchResults::run(&LineStore::from_text("abc"), "q");
        assert!(results.is_empty());
        assert_eq!(results.next(), None);
        assert_eq!(results.prev(), None);
        assert_eq!(results.position(), None);
        assert_eq!(results.query(), "q");
    }

    #[test]
    fn covers_checks_spans() {
        let results = SearchResults::run(&LineStore::from_text("a foo\nfoo"), "foo");
        assert!(results.covers(0, 2));
        assert!(results.covers(0, 4));
        assert!(!results.covers(0, 5));
        assert!(!results.covers(0, 1));
        assert!(results.covers(1, 0));
        assert!(!results.covers(2, 0));
    }
}
