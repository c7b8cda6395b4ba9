// SPDX-License-Identifier: MIT
//
// Terminal ownership for the editor session.
//
// The editor binds Ctrl+S, Ctrl+Q, Ctrl+C and Ctrl+V, so the line
// discipline must pass every control byte through untouched. The shell's
// screen and attributes come back however the session ends.
//
// `RawMode` is the termios half. It is a guard: dropping it puts the saved
// attributes back. `Terminal` adds the alternate screen on top and undoes
// both on `leave` or drop. A panic can strike while the renderer holds the
// stdout lock, so the panic hook skips `std::io::stdout` and writes the
// restore bytes straight to fd 1 before restoring termios from a global
// copy.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the tty does not report a size.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Ask the kernel for the window size of stdout.
#[cfg(unix)]
fn query_size() -> Option<Size> {
    // SAFETY: TIOCGWINSZ fills a plain-old-data winsize; zeroed is valid.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
    (ok && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

#[cfg(not(unix))]
fn query_size() -> Option<Size> {
    None
}

#[cfg(unix)]
fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
fn stdin_is_tty() -> bool {
    false
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Attributes to put back if the process panics while raw.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Turn cooked attributes into the ones the editor runs with.
///
/// Beyond the usual no-echo, byte-at-a-time setup:
/// - `ISIG` off: Ctrl+C and Ctrl+Z arrive as keys instead of signals.
/// - `IXON` off: Ctrl+S and Ctrl+Q arrive as keys instead of flow control.
/// - `IEXTEN` off: Ctrl+V arrives as a key instead of literal-next.
/// - `ICRNL` off: Enter arrives as `\r`, distinct from Ctrl+J.
/// - `OPOST` off: the renderer positions the cursor itself.
#[cfg(unix)]
fn make_raw(t: &mut libc::termios) {
    t.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON);
    t.c_oflag &= !libc::OPOST;
    t.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    t.c_cflag = (t.c_cflag & !(libc::CSIZE | libc::PARENB)) | libc::CS8;
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
}

/// Raw mode on stdin for as long as the guard lives.
pub struct RawMode {
    #[cfg(unix)]
    original: libc::termios,
}

impl RawMode {
    /// Switch stdin to raw mode.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be read or set.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        let fd = libc::STDIN_FILENO;
        // SAFETY: termios is plain-old-data, filled in by tcgetattr.
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut attrs = original;
        make_raw(&mut attrs);
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(original);
        }
        Ok(Self { original })
    }

    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        Ok(Self {})
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            unsafe {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original);
            }
            if let Ok(mut saved) = SAVED_TERMIOS.lock() {
                *saved = None;
            }
        }
    }
}

impl std::fmt::Debug for RawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMode").finish_non_exhaustive()
    }
}

// ─── Screen sequences ───────────────────────────────────────────────────────

/// Alternate screen, hidden cursor, blank page.
fn write_enter(w: &mut impl Write) -> io::Result<()> {
    ansi::enter_alt_screen(w)?;
    ansi::cursor_hide(w)?;
    ansi::clear_screen(w)
}

/// Close any half-written synchronized frame, reset colours, show the
/// cursor, then drop back to the shell's screen.
fn write_leave(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::reset(w)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)
}

/// `write_leave` as bytes, for the panic hook.
const PANIC_RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            unsafe {
                libc::write(
                    libc::STDOUT_FILENO,
                    PANIC_RESTORE.as_ptr().cast::<libc::c_void>(),
                    PANIC_RESTORE.len(),
                );
                if let Ok(saved) = SAVED_TERMIOS.lock() {
                    if let Some(original) = saved.as_ref() {
                        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                    }
                }
            }
            #[cfg(not(unix))]
            {
                let _ = io::stdout().write_all(PANIC_RESTORE);
                let _ = io::stdout().flush();
            }
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The editor's hold on the controlling terminal.
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
}

impl Terminal {
    /// Claim the controlling terminal. Nothing changes until
    /// [`enter`](Self::enter).
    ///
    /// # Errors
    ///
    /// Fails when stdin is not a terminal.
    pub fn new() -> io::Result<Self> {
        if !stdin_is_tty() {
            return Err(io::Error::other("stdin is not a terminal"));
        }
        Ok(Self {
            raw: None,
            size: query_size().unwrap_or(Size::FALLBACK),
        })
    }

    /// Size as of the last query.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, keeping the old one if the tty will not say.
    pub fn refresh_size(&mut self) -> Size {
        self.size = query_size().unwrap_or(self.size);
        self.size
    }

    /// Raw mode plus the alternate screen. Calling it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.raw.is_some() {
            return Ok(());
        }
        install_panic_hook();
        let raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        write_enter(&mut out)?;
        out.flush()?;
        self.raw = Some(raw);
        Ok(())
    }

    /// Give the screen and the line discipline back to the shell.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output fails. Raw mode is restored
    /// either way.
    pub fn leave(&mut self) -> io::Result<()> {
        let Some(raw) = self.raw.take() else {
            return Ok(());
        };
        let mut out = io::stdout().lock();
        let written = write_leave(&mut out).and_then(|()| out.flush());
        drop(out);
        drop(raw);
        written
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("size", &self.size)
            .field("raw", &self.raw.is_some())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_size() {
        assert_eq!(Size::new(80, 24), Size::FALLBACK);
    }

    #[test]
    fn size_query_does_not_panic() {
        let _ = query_size();
        let _ = stdin_is_tty();
    }

    #[test]
    fn panic_restore_matches_leave() {
        let mut bytes = Vec::new();
        write_leave(&mut bytes).unwrap();
        assert_eq!(bytes, PANIC_RESTORE);
        assert!(PANIC_RESTORE.ends_with(b"\x1b[?1049l"));
    }

    #[test]
    fn enter_switches_screen_before_drawing() {
        let mut bytes = Vec::new();
        write_enter(&mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("\x1b[?1049h"));
        assert!(text.contains("\x1b[?25l"));
    }

    #[cfg(unix)]
    #[test]
    fn raw_mode_frees_editor_control_keys() {
        // SAFETY: termios is plain-old-data.
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = libc::ICRNL | libc::IXON | libc::ISTRIP;
        t.c_oflag = libc::OPOST;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN;
        t.c_cflag = libc::PARENB;
        make_raw(&mut t);

        assert_eq!(t.c_iflag & (libc::IXON | libc::ICRNL | libc::ISTRIP), 0);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
        assert_eq!(t.c_lflag & (libc::ISIG | libc::IEXTEN | libc::ICANON | libc::ECHO), 0);
        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(t.c_cflag & libc::PARENB, 0);
        assert_eq!(t.c_cc[libc::VMIN], 1);
        assert_eq!(t.c_cc[libc::VTIME], 0);
    }
}
