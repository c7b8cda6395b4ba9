//! Clipboard capability.
//!
//! The editor copies and pastes through `dyn Clipboard`. The real one is
//! the system clipboard via `arboard`; where that is unavailable
//! (headless sessions, no display server) an in-process clipboard stands
//! in so copy and paste still work inside the editor.

use std::fmt;

use crate::error::{EditorError, Result};

pub trait Clipboard {
    /// Replace the clipboard contents.
    ///
    /// # Errors
    ///
    /// [`EditorError::Clipboard`] when the backend refuses.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Current clipboard text.
    ///
    /// # Errors
    ///
    /// [`EditorError::Clipboard`] when the backend has no text for us.
    fn read(&mut self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// MemoryClipboard
// ---------------------------------------------------------------------------

/// A clipboard that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        text.clone_into(&mut self.text);
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }
}

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    ///
    /// # Errors
    ///
    /// [`EditorError::Clipboard`] if no clipboard is reachable.
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| EditorError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| EditorError::Clipboard(e.to_string()))
    }

    fn read(&mut self) -> Result<String> {
        self.inner
            .get_text()
            .map_err(|e| EditorError::Clipboard(e.to_string()))
    }
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

/// The system clipboard if there is one, else a [`MemoryClipboard`].
#[must_use]
pub fn system_or_memory() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            tracing::warn!(error = %e, "system clipboard unavailable, using in-process clipboard");
            Box::new(MemoryClipboard::new())
        }
    }
}
