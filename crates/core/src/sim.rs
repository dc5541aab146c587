//! Deterministic host with a virtual millisecond clock.
//!
//! `SimHost` runs the loop without a terminal or wall clock: key events and
//! readiness signals are scripted at absolute times, intervals fire at
//! `start + k * period`, and a requested frame fires one frame interval later.
//! Changing the frame interval mid-run models a host that throttles frames.
//!
//! When several things are due at the same millisecond, scripted events go
//! first, then intervals (earliest due, then lowest handle), then the frame.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use anyhow::{bail, Result};

use crate::host::{Host, HostEvent, SurfaceRef};
use crate::types::{Key, LoopHandle, Scheduler, FRAME_INTERVAL_MS};

#[derive(Debug, Clone)]
struct SimInterval {
    period_ms: u64,
    next_due: u64,
}

#[derive(Debug, Clone)]
struct SimSurface {
    id: String,
    text: Option<String>,
    writes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Script,
    Interval(LoopHandle),
    Frame,
}

#[derive(Debug, Clone)]
pub struct SimHost {
    now_ms: u64,
    horizon_ms: u64,
    ready: bool,
    frame_interval_ms: u64,
    frame_due: Option<u64>,
    next_handle: u64,
    intervals: BTreeMap<LoopHandle, SimInterval>,
    script: VecDeque<(u64, HostEvent)>,
    surfaces: Vec<SimSurface>,
    intervals_created: u64,
    clear_calls: u64,
    frames_delivered: u64,
}

impl SimHost {
    /// A host whose readiness signal has not fired yet.
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            horizon_ms: 0,
            ready: false,
            frame_interval_ms: FRAME_INTERVAL_MS as u64,
            frame_due: None,
            next_handle: 0,
            intervals: BTreeMap::new(),
            script: VecDeque::new(),
            surfaces: Vec::new(),
            intervals_created: 0,
            clear_calls: 0,
            frames_delivered: 0,
        }
    }

    /// A host that is already ready.
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::new()
        }
    }

    pub fn with_surface(mut self, id: &str) -> Self {
        self.surfaces.push(SimSurface {
            id: id.to_string(),
            text: None,
            writes: 0,
        });
        self
    }

    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.set_frame_interval_ms(ms);
        self
    }

    /// Change frame pacing. Applies from the next frame request.
    pub fn set_frame_interval_ms(&mut self, ms: u64) {
        self.frame_interval_ms = ms.max(1);
    }

    /// Deliver `event` at `at_ms`. Events scheduled for the same time keep
    /// their scheduling order.
    pub fn schedule(&mut self, at_ms: u64, event: HostEvent) -> &mut Self {
        let idx = self.script.partition_point(|(t, _)| *t <= at_ms);
        self.script.insert(idx, (at_ms, event));
        self
    }

    pub fn key_down(&mut self, at_ms: u64, key: Key) -> &mut Self {
        self.schedule(at_ms, HostEvent::KeyDown(key))
    }

    pub fn key_up(&mut self, at_ms: u64, key: Key) -> &mut Self {
        self.schedule(at_ms, HostEvent::KeyUp(key))
    }

    pub fn signal_ready(&mut self, at_ms: u64) -> &mut Self {
        self.schedule(at_ms, HostEvent::Ready)
    }

    /// Let the clock run up to and including `horizon_ms`.
    pub fn run_until(&mut self, horizon_ms: u64) -> &mut Self {
        self.horizon_ms = horizon_ms;
        self
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn surface_text(&self, id: &str) -> Option<&str> {
        self.surfaces
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.text.as_deref())
    }

    pub fn surface_writes(&self, id: &str) -> u64 {
        self.surfaces
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.writes)
            .unwrap_or(0)
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_due.is_some()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_interval_active(&self, handle: LoopHandle) -> bool {
        self.intervals.contains_key(&handle)
    }

    pub fn intervals_created(&self) -> u64 {
        self.intervals_created
    }

    /// Every `clear_interval` call, including ones for unknown handles.
    pub fn clear_calls(&self) -> u64 {
        self.clear_calls
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    fn next_due(&self) -> Option<(u64, Source)> {
        let scripted = self.script.front().map(|(at, _)| (*at, Source::Script));
        let interval = self
            .intervals
            .iter()
            .map(|(handle, t)| (t.next_due, Source::Interval(*handle)))
            .min();
        let frame = self.frame_due.map(|at| (at, Source::Frame));

        [scripted, interval, frame].into_iter().flatten().min()
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SimHost {
    fn request_frame(&mut self) {
        if self.frame_due.is_none() {
            self.frame_due = Some(self.now_ms + self.frame_interval_ms);
        }
    }

    fn set_interval(&mut self, period: Duration) -> LoopHandle {
        self.next_handle += 1;
        self.intervals_created += 1;
        let handle = LoopHandle::new(self.next_handle);
        let period_ms = (period.as_millis() as u64).max(1);
        self.intervals.insert(
            handle,
            SimInterval {
                period_ms,
                next_due: self.now_ms + period_ms,
            },
        );
        handle
    }

    fn clear_interval(&mut self, handle: LoopHandle) {
        self.clear_calls += 1;
        self.intervals.remove(&handle);
    }
}

impl Host for SimHost {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn resolve_surface(&mut self, id: &str) -> Option<SurfaceRef> {
        self.surfaces
            .iter()
            .position(|s| s.id == id)
            .map(|idx| SurfaceRef::new(idx as u32))
    }

    fn write_surface(&mut self, surface: SurfaceRef, text: &str) -> Result<()> {
        let Some(target) = self.surfaces.get_mut(surface.raw() as usize) else {
            bail!("sim: no surface for {:?}", surface);
        };
        target.text = Some(text.to_string());
        target.writes += 1;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Option<HostEvent>> {
        let Some((at, source)) = self.next_due().filter(|(at, _)| *at <= self.horizon_ms) else {
            self.now_ms = self.now_ms.max(self.horizon_ms);
            return Ok(None);
        };
        self.now_ms = self.now_ms.max(at);

        let event = match source {
            Source::Script => {
                let Some((_, event)) = self.script.pop_front() else {
                    bail!("sim: script drained while an event was due");
                };
                if event == HostEvent::Ready {
                    self.ready = true;
                }
                event
            }
            Source::Interval(handle) => {
                if let Some(t) = self.intervals.get_mut(&handle) {
                    t.next_due += t.period_ms;
                }
                HostEvent::Interval(handle)
            }
            Source::Frame => {
                self.frame_due = None;
                self.frames_delivered += 1;
                HostEvent::Frame
            }
        };
        Ok(Some(event))
    }
}
