//! Loop configuration (environment driven).

use std::time::Duration;

use crate::types::{KeyBindings, DEFAULT_SURFACE_ID, DROP_THROTTLE_MS, GRAVITY_PERIOD_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    pub gravity_period: Duration,
    pub drop_throttle: Duration,
    pub surface_id: String,
    pub bindings: KeyBindings,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            gravity_period: Duration::from_millis(GRAVITY_PERIOD_MS as u64),
            drop_throttle: Duration::from_millis(DROP_THROTTLE_MS as u64),
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            bindings: KeyBindings::default(),
        }
    }
}

impl LoopConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_GRAVITY_MS`: gravity period (default 1000)
    /// - `TETRIS_DROP_THROTTLE_MS`: accelerated drop period (default 200)
    /// - `TETRIS_SURFACE_ID`: render surface identifier (default "tetris")
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`LoopConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let surface_id = lookup("TETRIS_SURFACE_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SURFACE_ID.to_string());

        Self {
            gravity_period: millis_var(&lookup, "TETRIS_GRAVITY_MS", GRAVITY_PERIOD_MS),
            drop_throttle: millis_var(&lookup, "TETRIS_DROP_THROTTLE_MS", DROP_THROTTLE_MS),
            surface_id,
            bindings: KeyBindings::default(),
        }
    }
}

/// Read a millisecond period, falling back to `default` when missing or
/// unparsable. Zero is clamped to 1ms.
pub fn millis_var(lookup: impl Fn(&str) -> Option<String>, name: &str, default: u32) -> Duration {
    let ms = lookup(name)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default)
        .max(1);
    Duration::from_millis(ms as u64)
}
