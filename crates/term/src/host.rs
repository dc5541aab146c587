//! TerminalHost: the game loop host backed by a real terminal.
//!
//! - Frames are paced at a fixed interval (terminals have no refresh signal).
//! - Intervals are tracked against `Instant`s and polled between key events.
//! - The whole screen is the single render surface.
//! - Key press and auto-repeat become `KeyDown`, release becomes `KeyUp`.
//!
//! Many terminals never report key releases. There, a held key counts as
//! released once no press/repeat for it arrived within the release timeout,
//! and a `KeyUp` is synthesized.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use arrayvec::ArrayVec;
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use tracing::{debug, info};

use crate::core::config::millis_var;
use crate::core::{Host, HostEvent, SurfaceRef};
use crate::input::{key_from_code, should_quit};
use crate::renderer::TerminalRenderer;
use crate::types::{
    Key, LoopHandle, Scheduler, DEFAULT_SURFACE_ID, FRAME_INTERVAL_MS, KEY_RELEASE_TIMEOUT_MS,
};

// Upper bound on a poll when nothing is scheduled yet (before the loop starts).
const IDLE_POLL: Duration = Duration::from_millis(250);

const MAX_HELD_KEYS: usize = 8;

/// Terminal host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermConfig {
    pub surface_id: String,
    pub frame_interval: Duration,
    pub key_release_timeout: Duration,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            frame_interval: Duration::from_millis(FRAME_INTERVAL_MS as u64),
            key_release_timeout: Duration::from_millis(KEY_RELEASE_TIMEOUT_MS as u64),
        }
    }
}

impl TermConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_SURFACE_ID`: surface identifier (default "tetris")
    /// - `TETRIS_FRAME_MS`: frame pacing (default 16)
    /// - `TETRIS_KEY_RELEASE_MS`: synthesized release timeout (default 150)
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let surface_id = lookup("TETRIS_SURFACE_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SURFACE_ID.to_string());

        Self {
            surface_id,
            frame_interval: millis_var(&lookup, "TETRIS_FRAME_MS", FRAME_INTERVAL_MS),
            key_release_timeout: millis_var(&lookup, "TETRIS_KEY_RELEASE_MS", KEY_RELEASE_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone)]
struct Interval {
    handle: LoopHandle,
    period: Duration,
    next_due: Instant,
}

pub struct TerminalHost {
    renderer: TerminalRenderer,
    config: TermConfig,
    entered: bool,
    ready: bool,
    release_events: bool,
    queue: VecDeque<HostEvent>,
    frame_due: Option<Instant>,
    last_frame: Option<Instant>,
    next_handle: u64,
    intervals: Vec<Interval>,
    held: ArrayVec<(Key, Instant), MAX_HELD_KEYS>,
}

impl TerminalHost {
    pub fn new(config: TermConfig) -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            config,
            entered: false,
            ready: false,
            release_events: false,
            queue: VecDeque::new(),
            frame_due: None,
            last_frame: None,
            next_handle: 0,
            intervals: Vec::new(),
            held: ArrayVec::new(),
        }
    }

    /// Take over the terminal and queue the readiness signal.
    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()?;
        self.entered = true;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!(release_events = self.release_events, "terminal entered");

        self.queue.push_back(HostEvent::Ready);
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        if self.release_events {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        self.renderer.exit()
    }

    pub fn config(&self) -> &TermConfig {
        &self.config
    }

    fn translate_key(&mut self, key: KeyEvent, now: Instant) -> HostEvent {
        let k = key_from_code(key.code);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !self.release_events {
                    self.touch_held(k, now);
                }
                HostEvent::KeyDown(k)
            }
            KeyEventKind::Release => {
                self.held.retain(|(h, _)| *h != k);
                HostEvent::KeyUp(k)
            }
        }
    }

    fn touch_held(&mut self, key: Key, now: Instant) {
        if let Some(entry) = self.held.iter_mut().find(|(h, _)| *h == key) {
            entry.1 = now;
            return;
        }
        if self.held.is_full() {
            self.held.remove(0);
        }
        self.held.push((key, now));
    }

    /// Pop whatever is due at `now`: synthesized releases, then intervals, then the frame.
    fn take_due(&mut self, now: Instant) -> Option<HostEvent> {
        let timeout = self.config.key_release_timeout;
        if let Some(idx) = self
            .held
            .iter()
            .position(|(_, seen)| now.saturating_duration_since(*seen) >= timeout)
        {
            let (key, _) = self.held.remove(idx);
            debug!(?key, "synthesized key release");
            return Some(HostEvent::KeyUp(key));
        }

        if let Some(timer) = self
            .intervals
            .iter_mut()
            .filter(|t| t.next_due <= now)
            .min_by_key(|t| t.next_due)
        {
            // Late ticks are not replayed in a burst.
            timer.next_due += timer.period;
            if timer.next_due <= now {
                timer.next_due = now + timer.period;
            }
            return Some(HostEvent::Interval(timer.handle));
        }

        if self.frame_due.is_some_and(|due| due <= now) {
            self.frame_due = None;
            self.last_frame = Some(now);
            return Some(HostEvent::Frame);
        }

        None
    }

    fn next_deadline(&self) -> Option<Instant> {
        let release = self
            .held
            .iter()
            .map(|(_, seen)| *seen + self.config.key_release_timeout);
        let timers = self.intervals.iter().map(|t| t.next_due);
        release.chain(timers).chain(self.frame_due).min()
    }
}

impl Scheduler for TerminalHost {
    fn request_frame(&mut self) {
        if self.frame_due.is_some() {
            return;
        }
        let now = Instant::now();
        let due = match self.last_frame {
            Some(last) => (last + self.config.frame_interval).max(now),
            None => now,
        };
        self.frame_due = Some(due);
    }

    fn set_interval(&mut self, period: Duration) -> LoopHandle {
        self.next_handle += 1;
        let handle = LoopHandle::new(self.next_handle);
        let period = period.max(Duration::from_millis(1));
        self.intervals.push(Interval {
            handle,
            period,
            next_due: Instant::now() + period,
        });
        handle
    }

    fn clear_interval(&mut self, handle: LoopHandle) {
        self.intervals.retain(|t| t.handle != handle);
    }
}

impl Host for TerminalHost {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn resolve_surface(&mut self, id: &str) -> Option<SurfaceRef> {
        (id == self.config.surface_id).then(|| SurfaceRef::new(0))
    }

    fn write_surface(&mut self, surface: SurfaceRef, text: &str) -> Result<()> {
        if surface.raw() != 0 {
            bail!("terminal: no surface for {:?}", surface);
        }
        self.renderer.draw_text(text)
    }

    fn next_event(&mut self) -> Result<Option<HostEvent>> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                if event == HostEvent::Ready {
                    self.ready = true;
                }
                return Ok(Some(event));
            }

            let now = Instant::now();
            if let Some(event) = self.take_due(now) {
                return Ok(Some(event));
            }

            let timeout = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now))
                .unwrap_or(IDLE_POLL);

            if !event::poll(timeout)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && should_quit(key) {
                        info!("quit requested");
                        return Ok(None);
                    }
                    let event = self.translate_key(key, Instant::now());
                    return Ok(Some(event));
                }
                Event::Resize(_, _) => self.renderer.invalidate(),
                _ => {}
            }
        }
    }
}
