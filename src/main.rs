// SPDX-License-Identifier: MIT
//
// quill — a small terminal text editor with incremental syntax highlighting.
//
// This is the binary that wires the crates together:
//
//   quill-term   → terminal control, input parsing, event loop, rendering
//   quill-editor → line store, buffers, panes, modes, commands
//
// Start-up order: arguments, logging, configuration, the first buffer,
// then the terminal. Anything that fails before the event loop starts is
// printed to stderr and exits with status 1.

mod logging;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};

use quill_editor::buffer::Buffer;
use quill_editor::clipboard;
use quill_editor::config::Config;
use quill_editor::editor::Editor;
use quill_term::event_loop::{EventLoop, LoopConfig};

const USAGE: &str = "\
usage: quill [--config <path>] [file]

  -c, --config <path>   read settings from <path> (default: $QUILL_CONFIG,
                        then <config dir>/quill/config.toml)
  -h, --help            print this help
  -V, --version         print the version

keys: Ctrl+E command line, Ctrl+F search, Ctrl+S save, Ctrl+Q quit";

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    file: Option<PathBuf>,
    help: bool,
    version: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option: {flag}"),
            file => {
                if parsed.file.is_some() {
                    bail!("only one file can be opened at start-up");
                }
                parsed.file = Some(PathBuf::from(file));
            }
        }
    }
    Ok(parsed)
}

/// `--config`, else `$QUILL_CONFIG`, else the platform default.
fn config_path(args: &Args) -> Option<PathBuf> {
    args.config
        .clone()
        .or_else(|| env::var_os("QUILL_CONFIG").map(PathBuf::from))
        .or_else(Config::default_path)
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<()> {
    let config = match config_path(args) {
        Some(path) => Config::load(&path).context("failed to load config")?,
        None => Config::default(),
    };

    let buffer = match &args.file {
        Some(path) => Buffer::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        None => Buffer::new(),
    };

    let loop_config = LoopConfig {
        escape_timeout_ms: config.escape_timeout_ms,
    };
    let mut editor = Editor::new(buffer, config, clipboard::system_or_memory());
    let mut event_loop =
        EventLoop::new(loop_config).context("failed to initialize terminal")?;

    tracing::info!(file = ?args.file, "editor started");
    event_loop.run(&mut editor).context("terminal error")?;
    tracing::info!("editor stopped");
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("quill: {e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }
    if args.version {
        println!("quill {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let _guard = logging::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            eprintln!("quill: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
