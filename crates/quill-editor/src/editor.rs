//! Editor — the controller that ties panes, modes and the prompt together.
//!
//! [`Editor`] implements the terminal crate's [`App`]: every key goes to
//! the handler of the current [`Mode`], and every frame is painted from
//! scratch out of editor state.
//!
//! ```text
//!   ┌──────────────────────────────┐
//!   │ panes (layout)               │  ← h - 2 rows
//!   ├──────────────────────────────┤
//!   │ status bar                   │  ← row h - 2
//!   ├──────────────────────────────┤
//!   │ prompt / message             │  ← row h - 1
//!   └──────────────────────────────┘
//! ```
//!
//! Highlight refresh and scrolling happen at the top of [`App::paint`], so
//! a burst of keys between two frames costs one re-tokenization.

use std::fmt;
use std::path::PathBuf;

use quill_term::buffer::FrameBuffer;
use quill_term::event_loop::{Action, App};
use quill_term::input::{Event, KeyCode, KeyEvent, Modifiers};

use crate::buffer::{Buffer, Motion};
use crate::clipboard::Clipboard;
use crate::command::{self, Command, PromptLine};
use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::layout::{Layout, Rect, SplitKind};
use crate::mode::Mode;
use crate::pane::ViewOptions;
use crate::search::SearchResults;
use crate::theme::Theme;

/// Rows below the panes: status bar and prompt.
const RESERVED_ROWS: u16 = 2;

pub struct Editor {
    layout: Layout,
    mode: Mode,
    prompt: PromptLine,
    /// Matches of the last search in the active buffer. Dropped on any
    /// edit or pane switch.
    search: SearchResults,
    /// One-line message for the bottom row. Stays until Escape or the
    /// next message.
    status: Option<String>,
    clipboard: Box<dyn Clipboard>,
    theme: Theme,
    config: Config,
    view: ViewOptions,
    /// Where the last paint put the terminal cursor.
    cursor_screen: Option<(u16, u16)>,
}

impl Editor {
    #[must_use]
    pub fn new(buffer: Buffer, config: Config, clipboard: Box<dyn Clipboard>) -> Self {
        let buffer = buffer.with_margin(config.highlight_margin);
        Self {
            layout: Layout::new(buffer),
            mode: Mode::Normal,
            prompt: PromptLine::new(),
            search: SearchResults::default(),
            status: None,
            clipboard,
            theme: Theme::terminal(),
            view: config.view_options(),
            config,
            cursor_screen: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.prompt.input()
    }

    #[inline]
    #[must_use]
    pub const fn search(&self) -> &SearchResults {
        &self.search
    }

    /// The buffer in the active pane.
    #[must_use]
    pub fn buffer(&self) -> &Buffer {
        self.layout.active().buffer()
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        self.layout.active_mut().buffer_mut()
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    fn set_error(&mut self, err: &EditorError) {
        tracing::warn!(error = ?err, "command failed");
        self.status = Some(err.status_message());
    }

    /// An empty buffer, or `path` opened, with this editor's settings.
    fn new_buffer(&self, path: Option<PathBuf>) -> Result<Buffer> {
        let buffer = match path {
            Some(path) => Buffer::open(path)?,
            None => Buffer::new(),
        };
        Ok(buffer.with_margin(self.config.highlight_margin))
    }

    // -- Normal mode ----------------------------------------------------------

    fn handle_normal(&mut self, key: &KeyEvent) -> Action {
        let mods = key.modifiers;
        let select = mods.contains(Modifiers::SHIFT);
        let word = mods.intersects(Modifiers::CTRL | Modifiers::ALT);

        if mods.contains(Modifiers::CTRL) {
            if let KeyCode::Char(ch) = key.code {
                return self.handle_ctrl(ch.to_ascii_lowercase());
            }
        }

        match key.code {
            KeyCode::Escape => {
                self.buffer_mut().clear_selection();
                self.search.clear();
                self.status = None;
            }
            KeyCode::Char(ch) if !mods.contains(Modifiers::ALT) => self.edit(|b| {
                b.delete_selection();
                b.insert_char(ch);
            }),
            KeyCode::Tab => self.edit(|b| {
                b.delete_selection();
                b.insert_char('\t');
            }),
            KeyCode::Enter => self.edit(|b| {
                b.delete_selection();
                b.insert_newline();
            }),
            KeyCode::Backspace => self.edit(|b| {
                if !b.delete_selection() {
                    b.delete_backward();
                }
            }),
            KeyCode::Delete => self.edit(|b| {
                if !b.delete_selection() {
                    b.delete_forward();
                }
            }),
            KeyCode::Left if word => self.motion(Motion::WordLeft, select),
            KeyCode::Right if word => self.motion(Motion::WordRight, select),
            KeyCode::Left => self.motion(Motion::Left, select),
            KeyCode::Right => self.motion(Motion::Right, select),
            KeyCode::Up => self.motion(Motion::Up, select),
            KeyCode::Down => self.motion(Motion::Down, select),
            KeyCode::Home => self.motion(Motion::LineStart, select),
            KeyCode::End => self.motion(Motion::LineEnd, select),
            KeyCode::PageUp => self.motion(Motion::PageUp(self.page_height()), select),
            KeyCode::PageDown => self.motion(Motion::PageDown(self.page_height()), select),
            KeyCode::F(3) => self.step_match(!select),
            _ => {}
        }
        Action::Continue
    }

    fn handle_ctrl(&mut self, ch: char) -> Action {
        match ch {
            'q' => {
                tracing::info!("quit");
                return Action::Quit;
            }
            's' => self.save(),
            'e' => self.enter_prompt(Mode::CommandLine),
            'f' => {
                self.search.clear();
                self.enter_prompt(Mode::SearchPrompt);
            }
            'n' => self.step_match(true),
            'p' => self.step_match(false),
            'w' => {
                if self.layout.panes().len() > 1 {
                    self.layout.cycle_active();
                    self.search.clear();
                }
            }
            'c' => self.copy(),
            'x' => self.cut(),
            'v' => self.paste(),
            _ => {}
        }
        Action::Continue
    }

    /// Run an edit on the active buffer. Any edit invalidates the match
    /// list.
    fn edit(&mut self, f: impl FnOnce(&mut Buffer)) {
        f(self.buffer_mut());
        self.search.clear();
    }

    fn motion(&mut self, motion: Motion, select: bool) {
        self.buffer_mut().apply_motion(motion, select);
    }

    fn page_height(&self) -> usize {
        usize::from(self.layout.active().rect().height).max(1)
    }

    fn save(&mut self) {
        match self.buffer_mut().save() {
            Ok(path) => self.set_status(format!("Written: {}", path.display())),
            Err(e) => self.set_error(&e),
        }
    }

    // -- Clipboard ------------------------------------------------------------

    fn copy(&mut self) {
        let Some(text) = self.buffer().selected_text() else {
            return;
        };
        match self.clipboard.write(&text) {
            Ok(()) => self.set_status("Copied to clipboard"),
            Err(e) => self.set_error(&e),
        }
    }

    fn cut(&mut self) {
        let Some(text) = self.buffer().selected_text() else {
            return;
        };
        match self.clipboard.write(&text) {
            Ok(()) => {
                self.edit(|b| {
                    b.delete_selection();
                });
                self.set_status("Cut to clipboard");
            }
            Err(e) => self.set_error(&e),
        }
    }

    fn paste(&mut self) {
        match self.clipboard.read() {
            Ok(text) if text.is_empty() => {}
            Ok(text) => {
                self.edit(|b| {
                    b.delete_selection();
                    b.insert_text(&text);
                });
                self.set_status("Pasted from clipboard");
            }
            Err(e) => self.set_error(&e),
        }
    }

    // -- Search ---------------------------------------------------------------

    /// Search the active buffer. An empty query keeps the previous results.
    fn run_search(&mut self, query: &str) {
        if query.is_empty() {
            return;
        }
        self.search = SearchResults::run(self.buffer().lines(), query);
        tracing::debug!(query, matches = self.search.matches().len(), "search");
        match self.search.current() {
            Some(m) => {
                self.buffer_mut().set_cursor(m.start());
                let total = self.search.matches().len();
                self.set_status(format!("Found {total} matches"));
            }
            None => self.set_status("No matches found"),
        }
    }

    /// Jump to the next (or previous) match, cyclically.
    fn step_match(&mut self, forward: bool) {
        let next = if forward {
            self.search.next()
        } else {
            self.search.prev()
        };
        let Some(m) = next else {
            return;
        };
        self.buffer_mut().set_cursor(m.start());
        if let Some((index, total)) = self.search.position() {
            self.set_status(format!("Match {index}/{total}"));
        }
    }

    // -- Prompt modes -----------------------------------------------------------

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode change");
            self.mode = mode;
        }
    }

    fn enter_prompt(&mut self, mode: Mode) {
        self.prompt.clear();
        self.set_mode(mode);
    }

    fn leave_prompt(&mut self) {
        self.prompt.clear();
        self.set_mode(Mode::Normal);
    }

    fn handle_command_line(&mut self, key: &KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                let input = self.prompt.take();
                self.set_mode(Mode::Normal);
                return self.run_command_line(&input);
            }
            KeyCode::Tab => {
                if let Some(completed) = command::complete(self.prompt.input()) {
                    self.prompt.set(completed);
                }
            }
            _ => self.edit_prompt(key),
        }
        Action::Continue
    }

    fn handle_search_prompt(&mut self, key: &KeyEvent) -> Action {
        if key.code == KeyCode::Enter {
            let query = self.prompt.take();
            self.set_mode(Mode::Normal);
            self.run_search(&query);
        } else {
            self.edit_prompt(key);
        }
        Action::Continue
    }

    /// Keys both prompts share.
    fn edit_prompt(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Escape => self.leave_prompt(),
            KeyCode::Backspace if self.prompt.is_empty() => self.leave_prompt(),
            KeyCode::Backspace => {
                self.prompt.backspace();
            }
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.prompt.insert_char(ch);
            }
            KeyCode::Left => self.prompt.move_left(),
            KeyCode::Right => self.prompt.move_right(),
            KeyCode::Home => self.prompt.move_home(),
            KeyCode::End => self.prompt.move_end(),
            _ => {}
        }
    }

    // -- Commands -------------------------------------------------------------

    fn run_command_line(&mut self, input: &str) -> Action {
        match command::parse(input) {
            Ok(Some(cmd)) => {
                tracing::debug!(?cmd, "command");
                self.execute(cmd)
            }
            Ok(None) => Action::Continue,
            Err(e) => {
                self.set_error(&e);
                Action::Continue
            }
        }
    }

    fn execute(&mut self, cmd: Command) -> Action {
        match cmd {
            Command::Quit => return Action::Quit,
            Command::Write(None) => self.save(),
            Command::Write(Some(path)) => match self.buffer_mut().save_as(&path) {
                Ok(()) => self.set_status(format!("Written: {}", path.display())),
                Err(e) => self.set_error(&e),
            },
            Command::WriteQuit => match self.buffer_mut().save() {
                Ok(_) => return Action::Quit,
                Err(e) => self.set_error(&e),
            },
            Command::Edit(path) => match self.new_buffer(Some(path.clone())) {
                Ok(buffer) => {
                    self.layout.active_mut().replace_buffer(buffer);
                    self.search.clear();
                    self.set_status(format!("Loaded: {}", path.display()));
                }
                Err(e) => self.set_error(&e),
            },
            Command::Split { kind, path } => self.split(kind, path),
            Command::Close => {
                if self.layout.close_active() {
                    self.search.clear();
                }
            }
            Command::Goto(line) => {
                let reached = self.buffer_mut().goto_line(line);
                self.set_status(format!("Line {reached}"));
            }
        }
        Action::Continue
    }

    fn split(&mut self, kind: SplitKind, path: Option<PathBuf>) {
        if self.layout.panes().len() >= crate::layout::MAX_PANES {
            return;
        }
        let buffer = match self.new_buffer(path.clone()) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.set_error(&e);
                return;
            }
        };
        if !self.layout.split(kind, buffer) {
            return;
        }
        let name = match kind {
            SplitKind::Vertical => "Vertical split",
            SplitKind::Horizontal | SplitKind::None => "Horizontal split",
        };
        match path {
            Some(path) => self.set_status(format!("{name}: {}", path.display())),
            None => self.set_status(name),
        }
    }

    // -- Painting -------------------------------------------------------------

    fn paint_status_bar(&self, frame: &mut FrameBuffer, y: u16) {
        let buf = self.buffer();
        let cursor = buf.cursor();
        let text = format!(
            " {}{} | Line {}/{}, Col {} ",
            buf.display_name(),
            if buf.is_modified() { "+" } else { "" },
            cursor.line + 1,
            buf.line_count(),
            cursor.col + 1,
        );
        let width = frame.width();
        frame.fill(0, y, width, self.theme.status);
        frame.put_str(0, y, &text, self.theme.status, width);
    }

    /// The bottom row. Returns the cursor cell when a prompt is open.
    fn paint_prompt_row(&self, frame: &mut FrameBuffer, y: u16) -> Option<(u16, u16)> {
        let width = frame.width();
        if let Some(prefix) = self.mode.prompt_prefix() {
            let text = format!("{prefix}{}", self.prompt.input());
            frame.put_str(0, y, &text, self.theme.message, width);
            let x = u16::try_from(self.prompt.cursor() + 1).unwrap_or(u16::MAX);
            return Some((x.min(width.saturating_sub(1)), y));
        }
        if let Some(msg) = &self.status {
            frame.put_str(0, y, msg, self.theme.message, width);
        }
        None
    }
}

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => match self.mode {
                Mode::Normal => self.handle_normal(key),
                Mode::CommandLine => self.handle_command_line(key),
                Mode::SearchPrompt => self.handle_search_prompt(key),
            },
            // Geometry is recomputed on every paint.
            Event::Resize(_) => Action::Continue,
        }
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let width = frame.width();
        let height = frame.height();
        let text_height = height.saturating_sub(RESERVED_ROWS);

        self.layout.arrange(Rect::new(0, 0, width, text_height));
        let active = self.layout.active_index();
        let mut pane_cursor = None;
        for (i, pane) in self.layout.panes_mut().iter_mut().enumerate() {
            pane.buffer_mut().refresh_highlight(&self.theme);
            pane.scroll_to_cursor(&self.view);
            let matches = (i == active && !self.search.is_empty()).then_some(&self.search);
            let cursor = pane.render(frame, &self.view, &self.theme, matches);
            if i == active {
                pane_cursor = cursor;
            }
        }

        if height >= RESERVED_ROWS {
            self.paint_status_bar(frame, height - 2);
        }
        let prompt_cursor = if height >= 1 {
            self.paint_prompt_row(frame, height - 1)
        } else {
            None
        };

        self.cursor_screen = if self.mode.is_prompt() {
            prompt_cursor
        } else {
            pane_cursor
        };
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("mode", &self.mode)
            .field("layout", &self.layout)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
