//! Highlight cache — styled spans per line, refreshed incrementally.
//!
//! Edits never re-tokenize anything themselves. They report the lines
//! they touched with [`HighlightCache::mark_dirty`], and the dirty range
//! grows to cover every report since the last refresh. Once per frame,
//! right before painting, [`HighlightCache::refresh`] re-tokenizes only
//! that range widened by a context margin, so a burst of keystrokes costs
//! one lexer call whose size does not depend on the document.
//!
//! # Margin
//!
//! Tokens can reach far past the edited line (a block comment opened 30
//! lines up). The margin gives the lexer enough surrounding text to get
//! those right in the common case. Constructs longer than the margin can
//! render stale until an edit closer to their start refreshes them.
//!
//! # Line-count changes
//!
//! The span vector always mirrors the line store's shape. When lines are
//! inserted or removed the buffer splices empty entries in or out at the
//! edit point, so lines below keep their old spans under their new index
//! until a refresh reaches them. The buffer also marks everything from
//! the edit to the end of the document dirty on such edits, which covers
//! any previously pending range that the splice shifted.

use quill_term::cell::Style;

use crate::lines::LineStore;
use crate::syntax::Lexer;
use crate::theme::Theme;

/// Lines of context on each side of the dirty range.
pub const DEFAULT_MARGIN: usize = 50;

/// A styled run within one line, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub col: usize,
    pub len: usize,
    pub style: Style,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn contains(&self, col: usize) -> bool {
        self.col <= col && col < self.col + self.len
    }
}

// ---------------------------------------------------------------------------
// HighlightCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HighlightCache {
    lines: Vec<Vec<Span>>,
    /// Inclusive line range awaiting re-tokenization.
    dirty: Option<(usize, usize)>,
    margin: usize,
}

impl HighlightCache {
    #[must_use]
    pub fn new(margin: usize) -> Self {
        Self {
            lines: vec![Vec::new()],
            dirty: None,
            margin,
        }
    }

    #[inline]
    #[must_use]
    pub const fn margin(&self) -> usize {
        self.margin
    }

    #[inline]
    #[must_use]
    pub const fn dirty_range(&self) -> Option<(usize, usize)> {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    // -- Dirty protocol -----------------------------------------------------

    /// Grow the dirty range to include `first..=last`.
    pub fn mark_dirty(&mut self, first: usize, last: usize) {
        let (first, last) = (first.min(last), first.max(last));
        self.dirty = Some(match self.dirty {
            Some((start, end)) => (start.min(first), end.max(last)),
            None => (first, last),
        });
    }

    /// Everything needs re-tokenizing (after a load).
    pub fn mark_all_dirty(&mut self, line_count: usize) {
        self.mark_dirty(0, line_count.saturating_sub(1));
    }

    /// Drop every cached span and start over at `line_count` lines.
    pub fn reset(&mut self, line_count: usize) {
        self.lines.clear();
        self.lines.resize_with(line_count.max(1), Vec::new);
        self.dirty = None;
        self.mark_all_dirty(line_count);
    }

    /// `count` new lines now start at index `at`.
    pub fn lines_inserted(&mut self, at: usize, count: usize) {
        let at = at.min(self.lines.len());
        self.lines
            .splice(at..at, std::iter::repeat_with(Vec::new).take(count));
    }

    /// `count` lines starting at `at` are gone.
    pub fn lines_removed(&mut self, at: usize, count: usize) {
        let start = at.min(self.lines.len());
        let end = at.saturating_add(count).min(self.lines.len());
        self.lines.drain(start..end);
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
    }

    // -- Queries --------------------------------------------------------------

    /// Cached spans for `line`, empty if none.
    #[must_use]
    pub fn spans(&self, line: usize) -> &[Span] {
        self.lines.get(line).map_or(&[], Vec::as_slice)
    }

    /// Style of the char at `(line, col)`; default when nothing covers it.
    #[must_use]
    pub fn style_at(&self, line: usize, col: usize) -> Style {
        self.spans(line)
            .iter()
            .find(|span| span.contains(col))
            .map_or_else(Style::new, |span| span.style)
    }

    // -- Refresh --------------------------------------------------------------

    /// Re-tokenize the pending range plus margin. Returns how many lines
    /// were re-tokenized, zero when nothing was dirty.
    pub fn refresh(&mut self, lines: &LineStore, lexer: &mut dyn Lexer, theme: &Theme) -> usize {
        let Some((start, end)) = self.dirty.take() else {
            return 0;
        };
        let last_line = lines.last_line();
        self.lines.resize_with(lines.line_count(), Vec::new);

        let first = start.saturating_sub(self.margin).min(last_line);
        let last = end.saturating_add(self.margin).min(last_line);
        for spans in &mut self.lines[first..=last] {
            spans.clear();
        }

        let text = lines.text_range(first, last);
        let mut line = first;
        let mut col = 0;
        for token in lexer.tokenize(&text) {
            let style = theme.style_for(token.tag);
            for (i, part) in token.text.split('\n').enumerate() {
                if i > 0 {
                    line += 1;
                    col = 0;
                }
                let len = part.chars().count();
                if len > 0 {
                    if let Some(spans) = self.lines.get_mut(line) {
                        spans.push(Span { col, len, style });
                    }
                }
                col += len;
            }
        }

        tracing::trace!(first, last, lexer = lexer.name(), "highlight refresh");
        last - first + 1
    }
}

impl Default for HighlightCache {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PlainLexer, Token, TokenTag};
    use pretty_assertions::assert_eq;

    /// Tags the whole input as one token and remembers what it was given.
    struct Recording {
        tag: TokenTag,
        calls: Vec<String>,
    }

    impl Recording {
        fn new(tag: TokenTag) -> Self {
            Self {
                tag,
                calls: Vec::new(),
            }
        }

        fn last_line_count(&self) -> usize {
            self.calls.last().map_or(0, |t| t.split('\n').count())
        }
    }

    impl Lexer for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn tokenize<'t>(&mut self, text: &'t str) -> Vec<Token<'t>> {
            self.calls.push(text.to_owned());
            vec![Token::new(self.tag, text)]
        }
    }

    /// Splits on spaces: words are keywords, spaces are text.
    struct Words;

    impl Lexer for Words {
        fn name(&self) -> &'static str {
            "words"
        }

        fn tokenize<'t>(&mut self, text: &'t str) -> Vec<Token<'t>> {
            let mut tokens = Vec::new();
            let mut start = 0;
            for (i, ch) in text.char_indices() {
                if ch == ' ' {
                    if start < i {
                        tokens.push(Token::new(TokenTag::Keyword, &text[start..i]));
                    }
                    tokens.push(Token::new(TokenTag::Text, &text[i..=i]));
                    start = i + 1;
                }
            }
            if start < text.len() {
                tokens.push(Token::new(TokenTag::Keyword, &text[start..]));
            }
            tokens
        }
    }

    fn numbered(count: usize) -> LineStore {
        let text: Vec<String> = (0..count).map(|i| format!("line {i}")).collect();
        LineStore::from_text(&text.join("\n"))
    }

    fn comment() -> Style {
        Theme::terminal().style_for(TokenTag::Comment)
    }

    // -- dirty range --

    #[test]
    fn mark_dirty_takes_the_union() {
        let mut cache = HighlightCache::new(0);
        assert_eq!(cache.dirty_range(), None);
        cache.mark_dirty(10, 12);
        cache.mark_dirty(3, 4);
        cache.mark_dirty(11, 20);
        assert_eq!(cache.dirty_range(), Some((3, 20)));
    }

    #[test]
    fn refresh_without_dirty_range_is_a_no_op() {
        let mut cache = HighlightCache::default();
        let mut lexer = Recording::new(TokenTag::Comment);
        let n = cache.refresh(&numbered(3), &mut lexer, &Theme::terminal());
        assert_eq!(n, 0);
        assert!(lexer.calls.is_empty());
    }

    // -- bounded work --

    #[test]
    fn refresh_covers_dirty_range_plus_margin() {
        let store = numbered(1000);
        let theme = Theme::terminal();
        let mut cache = HighlightCache::new(DEFAULT_MARGIN);
        let mut lexer = Recording::new(TokenTag::Comment);

        cache.mark_all_dirty(store.line_count());
        assert_eq!(cache.refresh(&store, &mut lexer, &theme), 1000);

        cache.mark_dirty(500, 500);
        assert_eq!(cache.refresh(&store, &mut lexer, &theme), 101);
        assert_eq!(lexer.last_line_count(), 101);
        assert!(lexer.calls[1].starts_with("line 450\n"));
        assert!(lexer.calls[1].ends_with("\nline 550"));
        assert!(!cache.is_dirty());
    }

    #[test]
    fn margin_is_clamped_to_document() {
        let store = numbered(1000);
        let mut cache = HighlightCache::new(DEFAULT_MARGIN);
        let mut lexer = Recording::new(TokenTag::Text);
        cache.mark_dirty(10, 10);
        assert_eq!(cache.refresh(&store, &mut lexer, &Theme::terminal()), 61);
        assert!(lexer.calls[0].starts_with("line 0\n"));
        assert!(lexer.calls[0].ends_with("\nline 60"));
    }

    #[test]
    fn lines_outside_window_keep_old_spans_until_refreshed() {
        let theme = Theme::terminal();
        let mut store = numbered(1000);
        let mut cache = HighlightCache::new(DEFAULT_MARGIN);
        cache.mark_all_dirty(store.line_count());
        cache.refresh(&store, &mut Recording::new(TokenTag::Comment), &theme);
        assert_eq!(cache.style_at(900, 0), comment());

        store.insert(crate::position::Position::new(10, 0), "x");
        cache.mark_dirty(10, 10);
        assert_eq!(cache.style_at(900, 0), comment());

        cache.refresh(&store, &mut Recording::new(TokenTag::Text), &theme);
        assert_eq!(cache.style_at(900, 0), comment());
        assert_eq!(cache.style_at(10, 0), Style::new());
        assert_eq!(cache.style_at(60, 0), Style::new());
        assert_eq!(cache.style_at(61, 0), comment());
    }

    // -- span attribution --

    #[test]
    fn multi_line_tokens_split_per_line() {
        let store = LineStore::from_text("/* a\n\nbc */");
        let mut cache = HighlightCache::new(DEFAULT_MARGIN);
        cache.mark_all_dirty(store.line_count());
        cache.refresh(&store, &mut Recording::new(TokenTag::Comment), &Theme::terminal());

        let style = comment();
        assert_eq!(cache.spans(0), &[Span { col: 0, len: 4, style }]);
        assert!(cache.spans(1).is_empty());
        assert_eq!(cache.spans(2), &[Span { col: 0, len: 5, style }]);
    }

    #[test]
    fn columns_are_chars() {
        let store = LineStore::from_text("é ab\nxy ü");
        let theme = Theme::terminal();
        let mut cache = HighlightCache::new(DEFAULT_MARGIN);
        cache.mark_all_dirty(store.line_count());
        cache.refresh(&store, &mut Words, &theme);

        let kw = theme.style_for(TokenTag::Keyword);
        assert_eq!(cache.style_at(0, 0), kw);
        assert_eq!(cache.style_at(0, 1), Style::new());
        assert_eq!(cache.spans(0)[2], Span { col: 2, len: 2, style: kw });
        assert_eq!(cache.spans(1)[2], Span { col: 3, len: 1, style: kw });
    }

    #[test]
    fn style_at_before_first_refresh_is_default() {
        let cache = HighlightCache::default();
        assert_eq!(cache.style_at(0, 0), Style::new());
        assert_eq!(cache.style_at(99, 3), Style::new());
    }

    // -- shape --

    #[test]
    fn inserted_lines_shift_spans_down() {
        let theme = Theme::terminal();
        let store = numbered(3);
        let mut cache = HighlightCache::new(0);
        cache.mark_all_dirty(3);
        cache.refresh(&store, &mut Recording::new(TokenTag::Comment), &theme);

        cache.lines_inserted(1, 2);
        assert!(cache.spans(1).is_empty());
        assert!(cache.spans(2).is_empty());
        assert_eq!(cache.style_at(3, 0), comment());
        assert_eq!(cache.style_at(4, 0), comment());

        cache.lines_removed(1, 3);
        assert_eq!(cache.style_at(1, 0), comment());
        assert!(cache.spans(2).is_empty());
    }

    #[test]
    fn reset_marks_everything() {
        let mut cache = HighlightCache::default();
        cache.reset(40);
        assert_eq!(cache.dirty_range(), Some((0, 39)));
        let n = cache.refresh(&numbered(40), &mut PlainLexer, &Theme::terminal());
        assert_eq!(n, 40);
    }
}
