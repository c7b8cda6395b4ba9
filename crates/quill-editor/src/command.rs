//! The prompt row: `:` commands and `/` search input.
//!
//! [`PromptLine`] is the one-line input shared by both prompt modes. When
//! the user presses Enter in command-line mode the text is handed to
//! [`parse`], which yields a [`Command`] for the editor to execute.
//!
//! # Commands
//!
//! | Command                                   | Action                          |
//! |-------------------------------------------|---------------------------------|
//! | `quit`, `q`                               | Quit without saving             |
//! | `write`, `w` `[path]`                     | Save (to `path` if given)       |
//! | `write-quit`, `wq`                        | Save and quit                   |
//! | `edit`, `e` `<path>`                      | Load a file into the pane       |
//! | `horizontal-split`, `hsplit`, `sp` `[path]` | Stack a second pane below     |
//! | `vertical-split`, `vsplit`, `vsp` `[path]`  | Put a second pane alongside   |
//! | `close`                                   | Close the active pane           |
//! | `goto`, `g` `<line>`                      | Jump to a 1-based line          |
//!
//! Tab completes a unique command-name prefix, or the path argument of
//! the commands that take one (see [`complete`]).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};
use crate::layout::SplitKind;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed command-line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Save to the given path, or the buffer's own.
    Write(Option<PathBuf>),
    WriteQuit,
    Edit(PathBuf),
    /// Open a second pane, optionally loading `path` into it.
    Split {
        kind: SplitKind,
        path: Option<PathBuf>,
    },
    Close,
    /// 1-based target line. Zero and negative input parse as `0` and are
    /// clamped by the buffer.
    Goto(usize),
}

/// Names offered by Tab completion.
pub const COMMAND_NAMES: &[&str] = &[
    "quit", "write", "wq", "edit", "hsplit", "vsplit", "close", "goto",
];

/// Commands whose argument is a path worth completing.
const PATH_COMMANDS: &[&str] = &[
    "e",
    "edit",
    "hsplit",
    "sp",
    "horizontal-split",
    "vsplit",
    "vsp",
    "vertical-split",
];

/// Parse command-line input (without the leading `:`). Blank input is
/// `Ok(None)`.
///
/// # Errors
///
/// [`EditorError::UnknownCommand`] for an unrecognised name,
/// [`EditorError::MissingArgument`] when `edit` or `goto` lacks its
/// argument, [`EditorError::InvalidLine`] for a non-numeric line.
pub fn parse(input: &str) -> Result<Option<Command>> {
    let mut words = input.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let path = arg.map(PathBuf::from);

    let command = match name {
        "quit" | "q" => Command::Quit,
        "write" | "w" => Command::Write(path),
        "write-quit" | "wq" => Command::WriteQuit,
        "edit" | "e" => Command::Edit(path.ok_or(EditorError::MissingArgument("edit <path>"))?),
        "horizontal-split" | "hsplit" | "sp" => Command::Split {
            kind: SplitKind::Horizontal,
            path,
        },
        "vertical-split" | "vsplit" | "vsp" => Command::Split {
            kind: SplitKind::Vertical,
            path,
        },
        "close" => Command::Close,
        "goto" | "g" => {
            let arg = arg.ok_or(EditorError::MissingArgument("goto <line>"))?;
            let line: i64 = arg
                .parse()
                .map_err(|_| EditorError::InvalidLine(arg.to_owned()))?;
            Command::Goto(usize::try_from(line).unwrap_or(0))
        }
        other => return Err(EditorError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Tab completion against the current directory.
#[must_use]
pub fn complete(input: &str) -> Option<String> {
    complete_in(input, Path::new("."))
}

/// Tab completion with relative paths resolved against `base`.
///
/// A lone word completes to the unique [`COMMAND_NAMES`] entry it
/// prefixes. For the path-taking commands the last word (possibly empty)
/// completes to the unique directory entry it prefixes, with `/` appended
/// to directories. Returns the whole new input, or `None` when there is
/// nothing unique to complete.
#[must_use]
pub fn complete_in(input: &str, base: &Path) -> Option<String> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let (&cmd, rest) = words.split_first()?;

    if rest.is_empty() && !input.ends_with(char::is_whitespace) {
        return unique(COMMAND_NAMES.iter().copied().filter(|c| c.starts_with(cmd)))
            .map(str::to_owned);
    }
    if !PATH_COMMANDS.contains(&cmd) {
        return None;
    }

    let prefix = rest.last().copied().unwrap_or("");
    let (dir, stem) = prefix
        .rfind('/')
        .map_or(("", prefix), |i| (&prefix[..=i], &prefix[i + 1..]));
    let search_dir = if dir.is_empty() {
        base.to_path_buf()
    } else {
        base.join(dir)
    };

    let entries = fs::read_dir(search_dir).ok()?;
    let candidates = entries.filter_map(|entry| {
        let entry = entry.ok()?;
        let name = entry.file_name().into_string().ok()?;
        if !name.starts_with(stem) {
            return None;
        }
        let slash = if entry.file_type().is_ok_and(|t| t.is_dir()) { "/" } else { "" };
        Some(format!("{dir}{name}{slash}"))
    });
    unique(candidates).map(|path| format!("{cmd} {path}"))
}

fn unique<T>(mut items: impl Iterator<Item = T>) -> Option<T> {
    let first = items.next()?;
    items.next().is_none().then_some(first)
}

// ---------------------------------------------------------------------------
// PromptLine
// ---------------------------------------------------------------------------

/// The prompt input buffer.
///
/// Tracks the text being typed and the cursor within it. The leading `:`
/// or `/` is not stored; it's drawn from the mode.
#[derive(Debug, Clone, Default)]
pub struct PromptLine {
    input: String,
    /// Char offset into `input`.
    cursor: usize,
}

impl PromptLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the char before the cursor. Returns `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Replace the whole input, cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.move_end();
    }

    /// Empty the input and hand back what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
