//! Logging setup.
//!
//! The terminal is the render surface, so logs never go to stdout/stderr.
//! They go to the file named by `TETRIS_LOG_PATH`, filtered by `RUST_LOG`
//! (default `info`). Without a path no subscriber is installed.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_ENV: &str = "TETRIS_LOG_PATH";

/// Log file path from the environment; blank values count as unset.
pub fn log_path_from_env() -> Option<String> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Install the global subscriber writing to `path`. Returns false when no
/// path was given or a subscriber was already installed.
pub fn init_tracing(path: Option<&str>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;

    // RUST_LOG=tetris_loop_core=debug,tetris_loop_input=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Log panics through `tracing` after putting the terminal back, then defer
/// to the previous hook.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::cursor::Show,
            crossterm::terminal::LeaveAlternateScreen
        );
        let _ = crossterm::terminal::disable_raw_mode();

        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(%location, %payload, "panic");
        previous(info);
    }));
}
