// SPDX-License-Identifier: MIT
//
// Logging — tracing to a daily log file, never to the terminal.
//
// The editor owns the screen, so log lines go to
// `<cache dir>/quill/quill.log.YYYY-MM-DD` (or the temp dir when there is
// no cache dir). `QUILL_LOG` takes an `EnvFilter` directive; the default
// keeps info and above from the editor crates.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_VAR: &str = "QUILL_LOG";
const DEFAULT_FILTER: &str = "quill=info,quill_editor=info";

fn log_dir() -> io::Result<PathBuf> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quill");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Install the global subscriber. Returns the guard that flushes the
/// background writer on drop, or `None` if logging could not be set up;
/// the editor runs either way.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir()
        .or_else(|_| -> io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("quill");
            fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let appender = tracing_appender::rolling::daily(&dir, "quill.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    tracing::info!(log_dir = %dir.display(), "tracing initialized");
    Some(guard)
}
