//! Key-down / key-up translation with a throttled soft drop.
//!
//! Moves and rotations fire once per key-down. The soft drop fires once on
//! key-down and then keeps firing from a repeating timer until key-up. The
//! timer handle is the only record of "soft drop held": it is present exactly
//! while the key is down, and host auto-repeat never creates a second one.

use std::time::Duration;

use tracing::debug;

use crate::engine::{apply, Engine};
use crate::types::{Command, Key, KeyBindings, LoopHandle, Scheduler, DROP_THROTTLE_MS};

#[derive(Debug, Clone)]
pub struct InputTranslator {
    bindings: KeyBindings,
    drop_period: Duration,
    drop_timer: Option<LoopHandle>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::with_config(
            KeyBindings::default(),
            Duration::from_millis(DROP_THROTTLE_MS as u64),
        )
    }

    pub fn with_config(bindings: KeyBindings, drop_period: Duration) -> Self {
        Self {
            bindings,
            drop_period,
            drop_timer: None,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn drop_period(&self) -> Duration {
        self.drop_period
    }

    /// Whether the accelerated-drop timer is running (soft-drop key held).
    pub fn soft_drop_active(&self) -> bool {
        self.drop_timer.is_some()
    }

    pub fn drop_timer(&self) -> Option<LoopHandle> {
        self.drop_timer
    }

    /// Handle a key-down. Returns the command issued, if any.
    pub fn key_down<E, S>(&mut self, key: Key, engine: &mut E, sched: &mut S) -> Option<Command>
    where
        E: Engine + ?Sized,
        S: Scheduler + ?Sized,
    {
        let command = self.bindings.command_for(key)?;
        apply(engine, command);

        if command.is_repeatable() && self.drop_timer.is_none() {
            let handle = sched.set_interval(self.drop_period);
            debug!(%handle, period_ms = self.drop_period.as_millis() as u64, "soft drop timer started");
            self.drop_timer = Some(handle);
        }

        Some(command)
    }

    /// Handle a key-up. Returns true if the accelerated-drop timer was cancelled.
    pub fn key_up<S: Scheduler + ?Sized>(&mut self, key: Key, sched: &mut S) -> bool {
        if !self.bindings.is_soft_drop(key) {
            return false;
        }

        match self.drop_timer.take() {
            Some(handle) => {
                sched.clear_interval(handle);
                debug!(%handle, "soft drop timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Route an interval tick. Returns false if `handle` is not the drop timer.
    pub fn on_interval<E: Engine + ?Sized>(&mut self, handle: LoopHandle, engine: &mut E) -> bool {
        if self.drop_timer != Some(handle) {
            return false;
        }
        apply(engine, Command::SoftDrop);
        true
    }
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new()
    }
}
