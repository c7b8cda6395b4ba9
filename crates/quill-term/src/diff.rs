// SPDX-License-Identifier: MIT
//
// Differential renderer — only changed cells reach the terminal.
//
// Instead of redrawing the entire screen every frame, we compare the current
// FrameBuffer against the previous one and emit ANSI escape sequences only
// for cells that actually changed. A keystroke usually touches one text row,
// the status bar and the cursor, so most frames are a few dozen bytes.
//
// The pipeline per frame:
//
//   1. The editor paints a FrameBuffer (the "current" frame).
//   2. `render()` compares it against the stored previous frame.
//   3. Changed cells go through CellWriter, which skips redundant cursor
//      moves, colors and attributes.
//   4. Everything accumulates in one byte buffer; `flush()` issues a single
//      write to the terminal.
//
// Synchronized output (DEC 2026) wraps each frame so partial updates are
// never visible.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Attr, Cell};
use crate::color::Color;

/// Initial output capacity. Enough for a full redraw of a typical terminal.
const OUTPUT_CAPACITY: usize = 16_384;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were written.
    pub cells_rendered: usize,
    /// Cells that matched the previous frame and were skipped.
    pub cells_skipped: usize,
    /// Total bytes of ANSI output generated.
    pub bytes_written: usize,
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Tracks what the terminal currently has set so repeated escapes are skipped.
///
/// - Cursor moves are skipped when the next cell is directly right of the
///   last one; the terminal auto-advances after printing.
/// - An attribute change resets (SGR 0) and re-emits, which also forgets
///   the tracked colors.
/// - Colors are emitted only when they differ from the last emitted ones.
#[allow(clippy::struct_field_names)]
struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<Color>,
    last_bg: Option<Color>,
    last_attrs: Attr,
}

impl CellWriter {
    const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::empty(),
        }
    }

    fn render_cell(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        let style = cell.style;
        if style.attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_fg = None;
                self.last_bg = None;
            }
            self.last_attrs = style.attrs;
            ansi::attrs(out, style.attrs).ok();
        }
        if self.last_fg != Some(style.fg) {
            ansi::fg(out, style.fg).ok();
            self.last_fg = Some(style.fg);
        }
        if self.last_bg != Some(style.bg) {
            ansi::bg(out, style.bg).ok();
            self.last_bg = Some(style.bg);
        }

        let mut utf8 = [0u8; 4];
        out.extend_from_slice(cell.ch.encode_utf8(&mut utf8).as_bytes());

        self.last_x = xi;
        self.last_y = yi;
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Differential renderer that emits ANSI only for changed cells.
///
/// ```
/// use quill_term::buffer::FrameBuffer;
/// use quill_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
/// let first = renderer.render(&frame);
/// assert_eq!(first.cells_rendered, 80 * 24);
/// let second = renderer.render(&frame);
/// assert_eq!(second.cells_rendered, 0);
/// ```
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// Create a renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: Vec::with_capacity(OUTPUT_CAPACITY),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame and generate ANSI output.
    ///
    /// The output stays buffered until [`flush`](Self::flush) or
    /// [`flush_to`](Self::flush_to). The cursor is left hidden; call
    /// [`place_cursor`](Self::place_cursor) afterwards to show it.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        let mut writer = CellWriter::new();
        let mut stats = RenderStats::default();

        let width = current.width();
        let height = current.height();
        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();
        ansi::cursor_hide(&mut self.output).ok();

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);
        if previous.is_none() {
            ansi::reset(&mut self.output).ok();
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { continue };
            let prev_row = previous.and_then(|p| p.row(y));
            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0..width).zip(row) {
                if prev_row.is_some_and(|p| p[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();
        stats.bytes_written = self.output.len();

        self.store_frame(current);
        stats
    }

    /// Append a cursor move (and show) for `(x, y)`, or keep it hidden for `None`.
    pub fn place_cursor(&mut self, position: Option<(u16, u16)>) {
        if let Some((x, y)) = position {
            ansi::cursor_to(&mut self.output, x, y).ok();
            ansi::cursor_show(&mut self.output).ok();
        }
    }

    /// The raw ANSI bytes accumulated since the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write accumulated output to `w` and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        w.write_all(&self.output)?;
        w.flush()?;
        self.output.clear();
        Ok(())
    }

    /// Discard the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
