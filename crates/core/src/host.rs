//! Host boundary: what the loop needs from the environment it runs in.
//!
//! A host delivers work as [`HostEvent`]s, one at a time, and offers the
//! scheduling primitives from [`Scheduler`] plus a text output surface.
//! Everything runs on one logical event loop; an event is handled to
//! completion before the next one is pulled.

use anyhow::Result;

use crate::types::{Key, LoopHandle, Scheduler};

/// Non-owning reference to an output surface, handed out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceRef(u32);

impl SurfaceRef {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A unit of work delivered by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished constructing its UI. Fires once, but consumers must
    /// tolerate repeats.
    Ready,
    /// Frame callback requested through [`Scheduler::request_frame`].
    Frame,
    /// Tick of a repeating timer.
    Interval(LoopHandle),
    KeyDown(Key),
    KeyUp(Key),
}

pub trait Host: Scheduler {
    /// Whether the readiness signal has already fired.
    fn is_ready(&self) -> bool;

    /// Look up an output surface by its stable identifier.
    fn resolve_surface(&mut self, id: &str) -> Option<SurfaceRef>;

    /// Replace the surface's text content.
    fn write_surface(&mut self, surface: SurfaceRef, text: &str) -> Result<()>;

    /// Block until the next event is due. `None` means the host shut down.
    fn next_event(&mut self) -> Result<Option<HostEvent>>;
}
