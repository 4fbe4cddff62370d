// SPDX-License-Identifier: MIT
//
// kilo — a small terminal text editor.
//
// This binary wires the two crates together:
//
//   kilo-term   → raw mode, window size, byte input, key decoding, ANSI output
//   kilo-editor → document, cursor, viewport, screen composition, the session
//
// Startup order matters: the file is read before the terminal enters raw
// mode, so an unreadable file is reported on a normal screen. Once the
// `Terminal` guard exists, every exit path (quit, error, panic) restores the
// terminal before anything is printed.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row
//   └──────────────────────────────┘

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kilo_editor::config::{Config, SaveMode};
use kilo_editor::document::Document;
use kilo_editor::error::{Error, Result};
use kilo_editor::session::Editor;
use kilo_term::reader::StdinSource;
use kilo_term::terminal::Terminal;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliSaveMode {
    /// Write a temporary file, then rename it over the target.
    Atomic,
    /// Truncate the target and write it in place.
    Truncate,
}

impl From<CliSaveMode> for SaveMode {
    fn from(value: CliSaveMode) -> Self {
        match value {
            CliSaveMode::Atomic => Self::Atomic,
            CliSaveMode::Truncate => Self::Truncate,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kilo", version, about = "A small terminal text editor")]
struct Cli {
    /// File to edit. Without one the editor starts on an empty, unnamed
    /// document.
    file: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        env = "KILO_SAVE_MODE",
        default_value_t = CliSaveMode::Atomic,
        help = "How saves reach the disk"
    )]
    save_mode: CliSaveMode,

    #[arg(
        long,
        env = "KILO_LOG_FILE",
        help = "Append log lines to this file (filtered by RUST_LOG, default info)"
    )]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            save_mode: self.save_mode.into(),
            ..Config::default()
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send `tracing` output to `path`. Stdout is the editor screen, so without
/// a log file nothing is installed and events are dropped.
fn init_tracing(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

// ─── Entry ──────────────────────────────────────────────────────────────────

fn run(cli: &Cli) -> Result<()> {
    let doc = match &cli.file {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    let mut terminal = Terminal::new();
    terminal.enter()?;

    let mut input = StdinSource::new();
    let size = terminal
        .window_size(&mut input)
        .map_err(Error::WindowSize)?;
    info!(cols = size.cols, rows = size.rows, "terminal ready");

    let mut editor = Editor::new(input, io::stdout().lock(), doc, size, cli.config());
    editor.run()
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(e) = init_tracing(path) {
            eprintln!("kilo: {}: {e}", path.display());
            process::exit(1);
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // `run` owns the terminal guard, so raw mode is already off here.
    if let Err(e) = run(&cli) {
        error!(error = %e, "fatal");
        eprintln!("kilo: {e}");
        process::exit(1);
    }
    info!("exiting");
}

// ─── Tests ──────────────────────────────────────────────────────────────────
