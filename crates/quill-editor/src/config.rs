//! User configuration, read from TOML.
//!
//! ```toml
//! tab_width = 8
//! highlight_margin = 100
//! line_numbers = false
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface at
//! start-up instead of being silently ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EditorError, Result};
use crate::highlight::DEFAULT_MARGIN;
use crate::pane::ViewOptions;

/// Default values.
pub mod defaults {
    pub const TAB_WIDTH: usize = 4;
    pub const LINE_NUMBERS: bool = true;
    pub const MIN_GUTTER_WIDTH: usize = 3;
    pub const ESCAPE_TIMEOUT_MS: u64 = 25;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Visual tab stop. Values below 1 are treated as 1.
    pub tab_width: usize,
    /// Lines re-tokenized above and below an edit.
    pub highlight_margin: usize,
    pub line_numbers: bool,
    pub min_gutter_width: usize,
    /// How long a lone ESC byte waits for the rest of a sequence.
    pub escape_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: defaults::TAB_WIDTH,
            highlight_margin: DEFAULT_MARGIN,
            line_numbers: defaults::LINE_NUMBERS,
            min_gutter_width: defaults::MIN_GUTTER_WIDTH,
            escape_timeout_ms: defaults::ESCAPE_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load `path`. A missing file gives the defaults.
    ///
    /// # Errors
    ///
    /// [`EditorError::Config`] if the file exists but can't be read or
    /// isn't valid config TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(EditorError::Config {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };
        let config = Self::from_toml(&text).map_err(|message| EditorError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Parse config text.
    ///
    /// # Errors
    ///
    /// The TOML parser's message.
    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string().trim_end().to_owned())
    }

    /// `<config dir>/quill/config.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quill").join("config.toml"))
    }

    /// The pane display settings this config asks for.
    #[must_use]
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            tab_width: self.tab_width.max(1),
            line_numbers: self.line_numbers,
            min_gutter_width: self.min_gutter_width,
        }
    }
}
