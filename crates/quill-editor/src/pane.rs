//! Pane — a rectangular viewport onto one buffer.
//!
//! Maps buffer coordinates to screen cells:
//!
//! - **Scrolling** — keeps the cursor inside the visible rows and columns
//! - **Line numbers** — a right-aligned gutter, one separator column wide
//! - **Tab expansion** — a tab fills to the next multiple of the tab width
//!
//! Columns come in two kinds. A *char column* indexes the line's chars; a
//! *visual column* counts screen cells from the start of the line after
//! tab expansion. Every other char is one cell wide (the frame buffer
//! shows wider glyphs as a replacement char), so the two only differ
//! when a line contains tabs. The buffer's horizontal scroll offset is a
//! visual column.
//!
//! ```text
//! ┌───┬──────────────────────┐
//! │ 1 │fn main() {           │
//! │ 2 │    body              │ ← pane rect, text area right of the gutter
//! │   │                      │ ← rows past the end stay blank
//! └───┴──────────────────────┘
//! ```

use quill_term::buffer::FrameBuffer;

use crate::buffer::Buffer;
use crate::layout::Rect;
use crate::search::SearchResults;
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Screen cells a char occupies when it starts at `visual`.
#[inline]
fn cell_width(ch: char, visual: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        tab_width - visual % tab_width
    } else {
        1
    }
}

/// Visual column of `char_col`: the cells taken by every char before it.
///
/// Columns past the end of `chars` count as one cell each, so the result
/// keeps growing for positions after the last char.
#[must_use]
pub fn char_to_visual_col(chars: &[char], char_col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut visual = 0;
    for &ch in chars.iter().take(char_col) {
        visual += cell_width(ch, visual, tab_width);
    }
    visual + char_col.saturating_sub(chars.len())
}

/// Gutter width for `line_count` lines: the digits plus a separator, never
/// below `min_width`.
#[must_use]
pub fn gutter_width(line_count: usize, min_width: usize) -> usize {
    let digits = line_count.max(1).ilog10() as usize + 1;
    min_width.max(digits + 1)
}

/// Display settings shared by every pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub tab_width: usize,
    pub line_numbers: bool,
    pub min_gutter_width: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            line_numbers: true,
            min_gutter_width: 3,
        }
    }
}

impl ViewOptions {
    fn gutter(&self, line_count: usize) -> usize {
        if self.line_numbers {
            gutter_width(line_count, self.min_gutter_width)
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Pane
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Pane {
    buffer: Buffer,
    rect: Rect,
}

impl Pane {
    #[must_use]
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            rect: Rect::EMPTY,
        }
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Swap in another buffer, returning the old one.
    pub fn replace_buffer(&mut self, buffer: Buffer) -> Buffer {
        std::mem::replace(&mut self.buffer, buffer)
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Columns left for text once the gutter is drawn.
    #[must_use]
    pub fn text_width(&self, opts: &ViewOptions) -> usize {
        usize::from(self.rect.width).saturating_sub(opts.gutter(self.buffer.line_count()))
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll just far enough that the cursor is on screen. A cursor above
    /// or left of the view becomes the first row or column; one below or
    /// right of it becomes the last.
    pub fn scroll_to_cursor(&mut self, opts: &ViewOptions) {
        let height = usize::from(self.rect.height);
        let width = self.text_width(opts);
        if height == 0 || width == 0 {
            return;
        }

        let cursor = self.buffer.cursor();
        let mut top = self.buffer.top_line();
        if cursor.line < top {
            top = cursor.line;
        } else if cursor.line >= top + height {
            top = cursor.line + 1 - height;
        }

        let chars = self.buffer.lines().line_chars(cursor.line);
        let visual = char_to_visual_col(&chars, cursor.col, opts.tab_width);
        let mut left = self.buffer.left_col();
        if visual < left {
            left = visual;
        } else if visual >= left + width {
            left = visual + 1 - width;
        }

        self.buffer.set_scroll(top, left);
    }

    // -- Rendering ----------------------------------------------------------

    /// Paint the visible rows. Returns the cursor's screen cell when it is
    /// inside the text area.
    pub fn render(
        &self,
        frame: &mut FrameBuffer,
        opts: &ViewOptions,
        theme: &Theme,
        matches: Option<&SearchResults>,
    ) -> Option<(u16, u16)> {
        let Rect { x, y, width, height } = self.rect;
        if width == 0 || height == 0 {
            return None;
        }

        let buf = &self.buffer;
        let line_count = buf.line_count();
        let gutter = u16::try_from(opts.gutter(line_count)).unwrap_or(width).min(width);
        let text_x = x + gutter;
        let text_width = width - gutter;
        let cursor = buf.cursor();
        let mut cursor_screen = None;

        for row in 0..height {
            let line = buf.top_line() + usize::from(row);
            if line >= line_count {
                break;
            }
            let screen_y = y + row;
            if gutter > 0 {
                let number = format!("{:>w$} ", line + 1, w = usize::from(gutter - 1));
                frame.put_str(x, screen_y, &number, theme.gutter, gutter);
            }

            let chars = buf.lines().line_chars(line);
            self.render_row(frame, opts, theme, matches, line, &chars, (text_x, screen_y, text_width));

            if line == cursor.line {
                let visual = char_to_visual_col(&chars, cursor.col, opts.tab_width);
                if let Some(offset) = visual.checked_sub(buf.left_col()) {
                    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
                    if offset < text_width {
                        cursor_screen = Some((text_x + offset, screen_y));
                    }
                }
            }
        }

        cursor_screen
    }

    /// Paint one line's text starting at the buffer's horizontal offset.
    /// A tab straddling the offset shows only its visible part.
    #[allow(clippy::too_many_arguments)]
    fn render_row(
        &self,
        frame: &mut FrameBuffer,
        opts: &ViewOptions,
        theme: &Theme,
        matches: Option<&SearchResults>,
        line: usize,
        chars: &[char],
        (x, y, width): (u16, u16, u16),
    ) {
        let buf = &self.buffer;
        let tab_width = opts.tab_width.max(1);
        let left = buf.left_col();
        let selection = buf.selection();
        let mut visual = 0;
        let mut screen: u16 = 0;

        'chars: for (col, &ch) in chars.iter().enumerate() {
            let cells = cell_width(ch, visual, tab_width);
            if visual + cells <= left {
                visual += cells;
                continue;
            }

            let style = if selection.is_selected(line, col) {
                theme.selection
            } else if matches.is_some_and(|m| m.covers(line, col)) {
                theme.search_match
            } else {
                buf.style_at(line, col)
            };
            let glyph = if ch == '\t' { ' ' } else { ch };

            for _ in 0..cells {
                if visual >= left {
                    if screen >= width {
                        break 'chars;
                    }
                    frame.set(x + screen, y, glyph, style);
                    screen += 1;
                }
                visual += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
