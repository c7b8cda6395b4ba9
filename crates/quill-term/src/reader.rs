// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background input reader — stdin bytes and resize notifications.
//
// A dedicated thread polls stdin and sends what it reads through a
// channel, so the event loop can block on one receiver and still honor
// the escape-sequence timeout with `recv_timeout`.
//
// Resizes arrive as SIGWINCH. The handler only sets an `AtomicBool`
// (one of the few things a signal handler may do); the reader thread
// checks that flag between polls and forwards it as `Input::Resize`.
// `poll()` is interrupted by the signal on the thread that receives it
// and otherwise times out every POLL_TIMEOUT_MS, so a resize is never
// noticed late by more than that.
//
// Shutdown: the thread checks a stop flag between polls, so it never
// sits in a blocking `read()` when the loop wants to exit.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Byte chunk read from stdin. A keypress is 1-6 bytes, a paste can be
/// kilobytes; 4 KB covers both.
const READ_BUF_SIZE: usize = 4096;

/// How often the reader thread wakes to check its flags (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── Input ───────────────────────────────────────────────────────────────────

/// What the reader thread delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A non-empty chunk of raw stdin bytes.
    Bytes(Vec<u8>),
    /// SIGWINCH fired; re-query the terminal size.
    Resize,
}

// ─── StdinReader ─────────────────────────────────────────────────────────────

/// Background stdin reader thread.
///
/// The channel closes when stdin hits EOF, the reader is stopped, or
/// the receiver is dropped.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Install the SIGWINCH handler and spawn the reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS cannot spawn the thread.
    pub fn spawn() -> std::io::Result<(Self, Receiver<Input>)> {
        install_sigwinch_handler();

        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || reader_loop(&tx, &stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread to stop and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Forward a pending SIGWINCH. Returns `false` once the receiver is gone.
fn forward_resize(tx: &Sender<Input>) -> bool {
    if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
        return tx.send(Input::Resize).is_ok();
    }
    true
}

#[cfg(unix)]
fn reader_loop(tx: &Sender<Input>, stop: &AtomicBool) {
    let stdin_fd = libc::STDIN_FILENO;
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        if !forward_resize(tx) {
            break;
        }

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: stdin_fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };
        if ready < 0 {
            if io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }
            break;
        }
        if ready == 0 {
            continue;
        }

        let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }

        #[allow(clippy::cast_sign_loss)]
        let chunk = buf[..n as usize].to_vec();
        if tx.send(Input::Bytes(chunk)).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
fn reader_loop(tx: &Sender<Input>, stop: &AtomicBool) {
    use std::io::Read;

    let stdin = std::io::stdin();
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(Input::Bytes(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
