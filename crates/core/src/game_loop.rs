//! Game loop controller: render cadence, gravity cadence and input routing.
//!
//! Two cadences run side by side for the whole session:
//!
//! - **Render**: every frame callback renders the engine into the surface and
//!   requests the next frame. Nothing fixes its period, so when the host
//!   throttles frames the cadence slows down with it.
//! - **Gravity**: a repeating timer that advances the engine, except while the
//!   soft-drop key is held. The check is made on every tick.
//!
//! Neither cadence is ever stopped, including after the engine reaches a
//! terminal state; the rendered text is what conveys game over.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::engine::{apply, Engine};
use crate::host::{Host, HostEvent, SurfaceRef};
use crate::input::InputTranslator;
use crate::types::{Command, LoopHandle};

pub struct GameLoop<E> {
    engine: E,
    input: InputTranslator,
    surface: SurfaceRef,
    gravity_timer: LoopHandle,
    gravity_period: Duration,
    frames: u64,
}

impl<E: Engine> GameLoop<E> {
    /// Show the initial state and start both cadences.
    pub fn start<H: Host + ?Sized>(
        engine: E,
        input: InputTranslator,
        surface: SurfaceRef,
        gravity_period: Duration,
        host: &mut H,
    ) -> Result<Self> {
        host.write_surface(surface, &engine.render_frame())?;
        host.request_frame();
        let gravity_timer = host.set_interval(gravity_period);

        info!(
            gravity_ms = gravity_period.as_millis() as u64,
            drop_ms = input.drop_period().as_millis() as u64,
            %gravity_timer,
            "game loop started"
        );

        Ok(Self {
            engine,
            input,
            surface,
            gravity_timer,
            gravity_period,
            frames: 0,
        })
    }

    pub fn handle_event<H: Host + ?Sized>(&mut self, event: HostEvent, host: &mut H) -> Result<()> {
        match event {
            HostEvent::Frame => self.on_frame(host)?,
            HostEvent::Interval(handle) => self.on_interval(handle),
            HostEvent::KeyDown(key) => {
                if let Some(command) = self.input.key_down(key, &mut self.engine, host) {
                    trace!(?key, %command, "key down");
                }
            }
            HostEvent::KeyUp(key) => {
                self.input.key_up(key, host);
            }
            HostEvent::Ready => debug!("readiness signal after start ignored"),
        }
        Ok(())
    }

    /// Render one frame verbatim and chain the next frame request.
    pub fn on_frame<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let text = self.engine.render_frame();
        host.write_surface(self.surface, &text)?;
        self.frames += 1;
        host.request_frame();
        Ok(())
    }

    /// Gravity tick. Returns true if the engine was advanced.
    pub fn on_gravity(&mut self) -> bool {
        if self.input.soft_drop_active() {
            trace!("gravity skipped while soft drop is held");
            return false;
        }
        apply(&mut self.engine, Command::Advance);
        true
    }

    fn on_interval(&mut self, handle: LoopHandle) {
        if handle == self.gravity_timer {
            self.on_gravity();
        } else if !self.input.on_interval(handle, &mut self.engine) {
            debug!(%handle, "tick from unknown timer ignored");
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn input(&self) -> &InputTranslator {
        &self.input
    }

    pub fn surface(&self) -> SurfaceRef {
        self.surface
    }

    pub fn gravity_timer(&self) -> LoopHandle {
        self.gravity_timer
    }

    pub fn gravity_period(&self) -> Duration {
        self.gravity_period
    }

    /// Frames rendered through the frame cadence (the initial write excluded).
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}
