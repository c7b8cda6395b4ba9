//! Layout — one pane, or two side by side or stacked.
//!
//! ```text
//! None            Horizontal        Vertical
//! ┌──────────┐    ┌──────────┐      ┌────┬─────┐
//! │          │    │  h / 2   │      │    │     │
//! │    0     │    ├──────────┤      │ 0  │  1  │
//! │          │    │ h - h/2  │      │    │     │
//! └──────────┘    └──────────┘      └────┴─────┘
//! ```
//!
//! Geometry is never stored between frames: [`Layout::arrange`] recomputes
//! every pane rectangle from the current text area, so a resize needs no
//! special handling. Vertical splits have no separator column.

use crate::buffer::Buffer;
use crate::pane::Pane;

/// Most panes the layout will hold.
pub const MAX_PANES: usize = 2;

/// A rectangle on screen: origin and size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How two panes share the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitKind {
    /// A single pane.
    #[default]
    None,
    /// Stacked top and bottom.
    Horizontal,
    /// Side by side.
    Vertical,
}

#[derive(Debug)]
pub struct Layout {
    panes: Vec<Pane>,
    active: usize,
    kind: SplitKind,
}

impl Layout {
    /// A single pane showing `buffer`.
    #[must_use]
    pub fn new(buffer: Buffer) -> Self {
        Self {
            panes: vec![Pane::new(buffer)],
            active: 0,
            kind: SplitKind::None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SplitKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn panes_mut(&mut self) -> &mut [Pane] {
        &mut self.panes
    }

    #[inline]
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> &Pane {
        &self.panes[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Pane {
        &mut self.panes[self.active]
    }

    /// Add a second pane showing `buffer`. The active pane does not
    /// change. Returns `false` (and drops `buffer`) if there are already
    /// two panes or `kind` is [`SplitKind::None`].
    pub fn split(&mut self, kind: SplitKind, buffer: Buffer) -> bool {
        if self.panes.len() >= MAX_PANES || kind == SplitKind::None {
            return false;
        }
        self.panes.push(Pane::new(buffer));
        self.kind = kind;
        true
    }

    /// Close the active pane, dropping its buffer. The remaining pane
    /// takes the whole area. Returns `false` when only one pane is left.
    pub fn close_active(&mut self) -> bool {
        if self.panes.len() < 2 {
            return false;
        }
        self.panes.remove(self.active);
        self.active = self.active.min(self.panes.len() - 1);
        self.kind = SplitKind::None;
        true
    }

    /// Make the next pane active, wrapping around.
    pub fn cycle_active(&mut self) {
        self.active = (self.active + 1) % self.panes.len();
    }

    /// Give every pane its rectangle inside `area`.
    pub fn arrange(&mut self, area: Rect) {
        let Rect {
            x,
            y,
            width,
            height,
        } = area;
        match (self.kind, self.panes.as_mut_slice()) {
            (SplitKind::Horizontal, [top, bottom]) => {
                let half = height / 2;
                top.set_rect(Rect::new(x, y, width, half));
                bottom.set_rect(Rect::new(x, y + half, width, height - half));
            }
            (SplitKind::Vertical, [left, right]) => {
                let half = width / 2;
                left.set_rect(Rect::new(x, y, half, height));
                right.set_rect(Rect::new(x + half, y, width - half, height));
            }
            (_, panes) => {
                for pane in panes {
                    pane.set_rect(area);
                }
            }
        }
    }
}
