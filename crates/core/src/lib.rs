//! Game loop core - controller, bootstrap and the host boundary
//!
//! This crate coordinates three event sources against an external engine:
//! frame callbacks (render cadence), a fixed gravity timer, and key events
//! (which may install a throttled drop timer). It owns no game state.
//!
//! Everything is single-threaded and cooperative: a [`Host`] hands out one
//! [`HostEvent`] at a time and [`run`] dispatches each to completion.
//!
//! # Module Structure
//!
//! - [`host`]: the `Host` trait, host events and surface references
//! - [`game_loop`]: render and gravity cadences, input routing
//! - [`bootstrap`]: waits for host readiness and starts the loop once
//! - [`config`]: environment-driven periods and surface id
//! - [`sim`]: deterministic virtual-clock host
//!
//! # Example
//!
//! ```
//! use tetris_loop_core::{run, Bootstrap, LoopConfig, SimHost};
//! use tetris_loop_engine::ProbeEngine;
//! use tetris_loop_types::Key;
//!
//! let mut host = SimHost::ready().with_surface("tetris");
//! host.key_down(1500, Key::Left).run_until(2000);
//!
//! let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());
//! run(&mut host, &mut boot).unwrap();
//!
//! let game = boot.game_loop().unwrap();
//! assert_eq!(game.engine().advances(), 2); // gravity at 1000ms and 2000ms
//! ```

pub mod bootstrap;
pub mod config;
pub mod game_loop;
pub mod host;
pub mod sim;

pub use tetris_loop_engine as engine;
pub use tetris_loop_input as input;
pub use tetris_loop_types as types;

pub use bootstrap::Bootstrap;
pub use config::LoopConfig;
pub use game_loop::GameLoop;
pub use host::{Host, HostEvent, SurfaceRef};
pub use sim::SimHost;

use anyhow::Result;

use crate::engine::Engine;

/// Start (or arm) the bootstrap and pump host events until the host shuts down.
pub fn run<H, E>(host: &mut H, bootstrap: &mut Bootstrap<E>) -> Result<()>
where
    H: Host + ?Sized,
    E: Engine,
{
    bootstrap.begin(host)?;
    while let Some(event) = host.next_event()? {
        bootstrap.handle_event(event, host)?;
    }
    Ok(())
}
