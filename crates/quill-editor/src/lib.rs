//! # quill-editor — Editor core for quill
//!
//! Everything between the terminal and the file system:
//!
//! - **[`lines`]** — `LineStore`, a rope indexed by (line, char column)
//! - **[`buffer`]** — `Buffer`: text, cursor, selection, highlight cache and file I/O
//! - **[`selection`]** — anchor/end selection with normalized ranges
//! - **[`highlight`]** — per-line styled spans, refreshed lazily over a dirty range
//! - **[`syntax`]** — the `Lexer` trait, tree-sitter lexers per language, plain fallback
//! - **[`search`]** — literal, overlap-permissive search with cyclic navigation
//! - **[`pane`]** — a viewport onto one buffer: scrolling, gutter, tab expansion
//! - **[`layout`]** — one pane, or two split horizontally or vertically
//! - **[`editor`]** — the controller: modes, key bindings, commands, painting
//!
//! Supporting pieces: [`position`], [`word`], [`mode`], [`command`],
//! [`clipboard`], [`config`], [`theme`] and [`error`].

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod lines;
pub mod mode;
pub mod pane;
pub mod position;
pub mod search;
pub mod selection;
pub mod syntax;
pub mod theme;
pub mod word;
