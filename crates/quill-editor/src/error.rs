//! Editor errors.
//!
//! Everything here is recoverable: the editor turns it into a one-line
//! status message with [`EditorError::status_message`] and keeps running.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    /// A file read or write failed.
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Save requested on a buffer with no path.
    #[error("No file name")]
    NoFileName,

    /// `goto` argument that is not a number. The input is kept for logs.
    #[error("Invalid line number")]
    InvalidLine(String),

    /// A command was given without its required argument.
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("clipboard: {0}")]
    Clipboard(String),

    /// Config file exists but could not be read or parsed.
    #[error("{}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The text shown on the message row.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Io { .. } | Self::Clipboard(_) | Self::Config { .. } => format!("Error: {self}"),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_read_as_is() {
        assert_eq!(
            EditorError::UnknownCommand("frob".into()).status_message(),
            "Unknown command: frob"
        );
        assert_eq!(
            EditorError::MissingArgument("edit <path>").status_message(),
            "Usage: edit <path>"
        );
        assert_eq!(
            EditorError::InvalidLine("x".into()).status_message(),
            "Invalid line number"
        );
    }

    #[test]
    fn io_errors_carry_path_and_prefix() {
        let err = EditorError::io(
            "/nope/file.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status_message(), "Error: /nope/file.txt: denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
