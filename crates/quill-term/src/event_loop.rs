// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the terminal application.
//
// Wires everything together: stdin bytes flow in from the background
// reader, get parsed into key events, the application handles them,
// paints a frame buffer, and the diff renderer writes only what changed.
//
// # Blocking model
//
// The loop blocks on the reader channel with no timeout while nothing is
// pending, so an idle editor costs no CPU. Only when the parser holds an
// incomplete sequence (typically a lone ESC) does it wait with the escape
// timeout; if nothing follows, the pending bytes are flushed as keys.
//
// # Resize
//
// The reader thread turns SIGWINCH into `Input::Resize`. The loop
// re-queries the size, resizes the frame, forces a full redraw and hands
// the application an `Event::Resize`.
//
// # Frames
//
// Every batch of events is followed by exactly one paint and render, so
// the application can do per-frame work (highlight refresh) at the top
// of `paint`.

use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::{Input, StdinReader};
use crate::terminal::{Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the event loop.
    Quit,
}

/// Application interface for the event loop.
///
/// Per frame the loop calls [`on_event`](App::on_event) for each parsed
/// event, then [`paint`](App::paint) once, then [`cursor`](App::cursor).
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to exit.
    fn on_event(&mut self, event: &Event) -> Action;

    /// Paint the current state. The buffer has been cleared and already
    /// has the terminal's current size.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Screen position of the hardware cursor after painting, or `None`
    /// to keep it hidden.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// How long a lone ESC waits for the rest of a sequence (milliseconds).
    pub escape_timeout_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout_ms: 25,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal, parser and renderer. [`run`](Self::run) returns
/// when the application answers [`Action::Quit`] or stdin closes.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop for the controlling terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal.
    pub fn new(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until quit, and restore the terminal even
    /// when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, output or teardown fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });
        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Input>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let escape_timeout = Duration::from_millis(self.config.escape_timeout_ms);
        let stdout = io::stdout();

        self.draw(app, &mut frame, &mut stdout.lock())?;

        loop {
            let received = if self.parser.has_pending() {
                rx.recv_timeout(escape_timeout)
            } else {
                rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
            };

            let events = match received {
                Ok(Input::Bytes(bytes)) => self.parser.advance(&bytes),
                Ok(Input::Resize) => {
                    let size = self.terminal.refresh_size();
                    frame.resize(size.cols, size.rows);
                    self.renderer.force_redraw();
                    vec![Event::Resize(size)]
                }
                Err(RecvTimeoutError::Timeout) => self.parser.flush(),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };

            if dispatch(app, &events) == Action::Quit {
                return Ok(());
            }
            if !events.is_empty() {
                self.draw(app, &mut frame, &mut stdout.lock())?;
            }
        }
    }

    fn draw(
        &mut self,
        app: &mut impl App,
        frame: &mut FrameBuffer,
        out: &mut impl Write,
    ) -> io::Result<()> {
        render_frame(&mut self.renderer, app, frame);
        self.renderer.flush_to(out)
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("terminal", &self.terminal)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Feed events to the app in order, stopping at the first quit.
fn dispatch(app: &mut impl App, events: &[Event]) -> Action {
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

/// Clear, paint, diff and place the cursor. Output stays in the renderer.
fn render_frame(renderer: &mut DiffRenderer, app: &mut impl App, frame: &mut FrameBuffer) {
    frame.clear();
    app.paint(frame);
    renderer.render(frame);
    renderer.place_cursor(app.cursor());
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;
    use crate::input::{KeyCode, KeyEvent};

    /// Records events, quits on `q`, paints the event count.
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        paints: usize,
    }

    impl App for Recorder {
        fn on_event(&mut self, event: &Event) -> Action {
            self.events.push(*event);
            match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('q'),
                    ..
                }) => Action::Quit,
                _ => Action::Continue,
            }
        }

        fn paint(&mut self, buf: &mut FrameBuffer) {
            self.paints += 1;
            buf.put_str(0, 0, &self.events.len().to_string(), Style::new(), 4);
        }

        fn cursor(&self) -> Option<(u16, u16)> {
            Some((1, 0))
        }
    }

    fn key(ch: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(ch)))
    }

    #[test]
    fn default_escape_timeout() {
        assert_eq!(LoopConfig::default().escape_timeout_ms, 25);
    }

    #[test]
    fn dispatch_delivers_in_order() {
        let mut app = Recorder::default();
        assert_eq!(dispatch(&mut app, &[key('a'), key('b')]), Action::Continue);
        assert_eq!(app.events, vec![key('a'), key('b')]);
    }

    #[test]
    fn dispatch_stops_at_quit() {
        let mut app = Recorder::default();
        assert_eq!(dispatch(&mut app, &[key('a'), key('q'), key('b')]), Action::Quit);
        assert_eq!(app.events.len(), 2);
    }

    #[test]
    fn resize_reaches_the_app() {
        let mut app = Recorder::default();
        let size = Size::new(100, 30);
        dispatch(&mut app, &[Event::Resize(size)]);
        assert_eq!(app.events, vec![Event::Resize(size)]);
    }

    #[test]
    fn render_frame_paints_and_places_cursor() {
        let mut app = Recorder::default();
        app.events.push(key('x'));
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(5, 2);
        frame.put_str(0, 1, "stale", Style::new(), 5);

        render_frame(&mut renderer, &mut app, &mut frame);

        assert_eq!(app.paints, 1);
        assert_eq!(frame.row_text(0), "1    ");
        assert_eq!(frame.row_text(1), "     ");
        let out = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        assert!(out.ends_with("\x1b[1;2H\x1b[?25h"));
    }
}
