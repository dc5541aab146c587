//! Terminal runner (default binary).
//!
//! The rules engine is external to this workspace. This binary drives the
//! game loop against the probe engine, which renders a running tally of the
//! commands it receives, so gravity, throttled soft drop and key handling can
//! be checked live. Quit with `q` or Ctrl-C.

use anyhow::Result;

use tetris_loop::core::{run, Bootstrap, LoopConfig};
use tetris_loop::engine::ProbeEngine;
use tetris_loop::logging::{init_tracing, install_panic_hook, log_path_from_env};
use tetris_loop::term::{TermConfig, TerminalHost};

fn main() -> Result<()> {
    init_tracing(log_path_from_env().as_deref())?;
    install_panic_hook();

    let mut host = TerminalHost::new(TermConfig::from_env());
    let mut bootstrap = Bootstrap::new(ProbeEngine::new(), LoopConfig::from_env());

    host.enter()?;
    let result = run(&mut host, &mut bootstrap);

    // Always try to restore terminal state.
    let _ = host.exit();
    if let Err(e) = &result {
        tracing::error!(error = %e, "game loop stopped");
    }
    result
}
