// SPDX-License-Identifier: MIT
//
// quill-term — terminal backend for quill.
//
// Raw mode and the alternate screen, a byte-level key decoder, a cell
// grid to paint into, and a differential renderer that sends only the
// cells that changed. Resizes arrive through the same event stream as
// keys, so the application sees one closed `Event` type.
//
// Direct termios and ANSI escape sequences, no TUI framework: the editor
// decides every byte that reaches the terminal.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
