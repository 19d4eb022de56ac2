//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins. Without it, the verbosity flag picks the level for
//! this crate and everything else stays at `warn`.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::error::AppError;

fn crate_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut filter = EnvFilter::new("warn");
    if let Ok(directive) = format!("toxiscan={}", crate_level(verbose)).parse() {
        filter = filter.add_directive(directive);
    }
    filter
}

/// Log to stderr. Used by the one-shot subcommands.
pub fn init_stderr(verbose: u8) {
    // Ignore the error if a global subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file. The TUI owns the terminal, so it never logs to stderr.
pub fn init_file(path: &Path, verbose: u8) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create log file '{}': {e}", path.display()))
    })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
