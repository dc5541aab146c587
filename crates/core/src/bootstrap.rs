//! Start-once wiring of the game loop.
//!
//! The loop may only start after the host is ready. If readiness already fired
//! when [`Bootstrap::begin`] runs, the loop starts right there; otherwise it
//! starts on the first [`HostEvent::Ready`]. The pending engine and config are
//! taken out on start, so there is nothing left to start a second time.

use anyhow::{anyhow, Result};
use tracing::{debug, trace};

use crate::config::LoopConfig;
use crate::engine::Engine;
use crate::game_loop::GameLoop;
use crate::host::{Host, HostEvent};
use crate::input::InputTranslator;

struct Pending<E> {
    engine: E,
    config: LoopConfig,
}

pub struct Bootstrap<E> {
    pending: Option<Pending<E>>,
    running: Option<GameLoop<E>>,
}

impl<E: Engine> Bootstrap<E> {
    pub fn new(engine: E, config: LoopConfig) -> Self {
        Self {
            pending: Some(Pending { engine, config }),
            running: None,
        }
    }

    /// Start now if the host is already ready, otherwise wait for `Ready`.
    pub fn begin<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.pending.is_none() {
            return Ok(());
        }
        if host.is_ready() {
            self.start(host)
        } else {
            debug!("host not ready; waiting for readiness signal");
            Ok(())
        }
    }

    pub fn handle_event<H: Host + ?Sized>(&mut self, event: HostEvent, host: &mut H) -> Result<()> {
        if let Some(game) = self.running.as_mut() {
            return game.handle_event(event, host);
        }
        match event {
            HostEvent::Ready => self.start(host),
            other => {
                trace!(?other, "event before start dropped");
                Ok(())
            }
        }
    }

    fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let Some(Pending { engine, config }) = self.pending.take() else {
            return Ok(());
        };

        let surface = host
            .resolve_surface(&config.surface_id)
            .ok_or_else(|| anyhow!("render surface `{}` not found", config.surface_id))?;
        let input = InputTranslator::with_config(config.bindings, config.drop_throttle);

        self.running = Some(GameLoop::start(
            engine,
            input,
            surface,
            config.gravity_period,
            host,
        )?);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn game_loop(&self) -> Option<&GameLoop<E>> {
        self.running.as_ref()
    }

    pub fn game_loop_mut(&mut self) -> Option<&mut GameLoop<E>> {
        self.running.as_mut()
    }
}
