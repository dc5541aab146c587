//! Shared types - commands, keys, timer handles and timing constants
//!
//! Everything here is plain data with no external dependencies, so the
//! engine facade, the input translator and every host implementation can agree
//! on the same vocabulary.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_PERIOD_MS` | 1000 | Automatic gravity cadence |
//! | `DROP_THROTTLE_MS` | 200 | Accelerated drop cadence while the soft-drop key is held |
//! | `FRAME_INTERVAL_MS` | 16 | Frame pacing for hosts without a display refresh signal (~60 FPS) |
//! | `KEY_RELEASE_TIMEOUT_MS` | 150 | Synthesized key-up for terminals without release events |
//!
//! # Examples
//!
//! ```
//! use tetris_loop_types::{Command, Key, KeyBindings};
//!
//! let bindings = KeyBindings::default();
//! assert_eq!(bindings.command_for(Key::Down), Some(Command::SoftDrop));
//! assert_eq!(bindings.command_for(Key::from_name("z")), Some(Command::RotateLeft));
//! assert_eq!(bindings.command_for(Key::from_name("q")), None);
//!
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//! ```

use std::fmt;
use std::time::Duration;

/// Gravity period (1000ms = one row per second)
pub const GRAVITY_PERIOD_MS: u32 = 1000;

/// Accelerated drop period while the soft-drop key is held
pub const DROP_THROTTLE_MS: u32 = 200;

/// Frame interval used by hosts that pace frames themselves (16ms ≈ 60 FPS)
pub const FRAME_INTERVAL_MS: u32 = 16;

/// Time without a repeat before a held key counts as released (terminals only).
pub const KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Identifier of the surface the render cadence writes into.
pub const DEFAULT_SURFACE_ID: &str = "tetris";

/// A single engine invocation request.
///
/// `SoftDrop` comes from the keyboard and `Advance` from the gravity cadence;
/// both end up as one `advance` call on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Manual one-row drop
    SoftDrop,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece counter-clockwise
    RotateLeft,
    /// Rotate piece clockwise
    RotateRight,
    /// Gravity step
    Advance,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::SoftDrop,
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateLeft,
        Command::RotateRight,
        Command::Advance,
    ];

    /// Parse command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_loop_types::Command;
    ///
    /// assert_eq!(Command::from_str("softDrop"), Some(Command::SoftDrop));
    /// assert_eq!(Command::from_str("ROTATERIGHT"), Some(Command::RotateRight));
    /// assert_eq!(Command::from_str("hardDrop"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "softdrop" => Some(Command::SoftDrop),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotateleft" => Some(Command::RotateLeft),
            "rotateright" => Some(Command::RotateRight),
            "advance" => Some(Command::Advance),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::SoftDrop => "softDrop",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::Advance => "advance",
        }
    }

    /// Whether holding the bound key keeps issuing this command on a timer.
    ///
    /// Only the soft drop repeats; moves and rotations fire once per key-down.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Command::SoftDrop)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-neutral key identifier carried by key-down / key-up events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Char(char),
    /// Any key this layer has no name for
    Other,
}

impl Key {
    /// Parse a DOM-style key name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_loop_types::Key;
    ///
    /// assert_eq!(Key::from_name("ArrowDown"), Key::Down);
    /// assert_eq!(Key::from_name("x"), Key::Char('x'));
    /// assert_eq!(Key::from_name("F13"), Key::Other);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Key to command table used by the input translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    table: Vec<(Key, Command)>,
}

impl KeyBindings {
    /// A table with no bindings at all.
    pub fn empty() -> Self {
        Self { table: Vec::new() }
    }

    /// Bind `key` to `command`, replacing any previous binding of that key.
    pub fn bind(mut self, key: Key, command: Command) -> Self {
        self.table.retain(|(k, _)| *k != key);
        self.table.push((key, command));
        self
    }

    pub fn command_for(&self, key: Key) -> Option<Command> {
        self.table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, command)| *command)
    }

    /// Whether `key` is bound to the soft drop.
    pub fn is_soft_drop(&self, key: Key) -> bool {
        self.command_for(key) == Some(Command::SoftDrop)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty()
            .bind(Key::Down, Command::SoftDrop)
            .bind(Key::Left, Command::MoveLeft)
            .bind(Key::Right, Command::MoveRight)
            .bind(Key::Char('z'), Command::RotateLeft)
            .bind(Key::Char('Z'), Command::RotateLeft)
            .bind(Key::Char('x'), Command::RotateRight)
            .bind(Key::Char('X'), Command::RotateRight)
    }
}

/// Opaque identifier for a repeating timer scheduled on a host.
///
/// Handles are minted by the host in `Scheduler::set_interval` and are only
/// meaningful to the host that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopHandle(u64);

impl LoopHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host scheduling primitives.
///
/// Frame requests are one-shot: the host delivers exactly one frame callback
/// per request, before its next repaint. Intervals repeat every `period` until
/// cleared.
pub trait Scheduler {
    fn request_frame(&mut self);

    fn set_interval(&mut self, period: Duration) -> LoopHandle;

    fn clear_interval(&mut self, handle: LoopHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn request_frame(&mut self) {
        (**self).request_frame()
    }

    fn set_interval(&mut self, period: Duration) -> LoopHandle {
        (**self).set_interval(period)
    }

    fn clear_interval(&mut self, handle: LoopHandle) {
        (**self).clear_interval(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(GRAVITY_PERIOD_MS, 1000);
        assert_eq!(DROP_THROTTLE_MS, 200);
        assert_eq!(FRAME_INTERVAL_MS, 16);
        assert!(KEY_RELEASE_TIMEOUT_MS > 0);
    }

    #[test]
    fn command_names_parse_back() {
        for command in Command::ALL {
            assert_eq!(Command::from_str(command.as_str()), Some(command));
        }
    }

    #[test]
    fn only_soft_drop_repeats() {
        let repeatable: Vec<_> = Command::ALL
            .iter()
            .filter(|c| c.is_repeatable())
            .collect();
        assert_eq!(repeatable, vec![&Command::SoftDrop]);
    }

    #[test]
    fn default_bindings_cover_every_key_command() {
        let b = KeyBindings::default();
        assert_eq!(b.command_for(Key::from_name("ArrowDown")), Some(Command::SoftDrop));
        assert_eq!(b.command_for(Key::from_name("ArrowLeft")), Some(Command::MoveLeft));
        assert_eq!(b.command_for(Key::from_name("ArrowRight")), Some(Command::MoveRight));
        assert_eq!(b.command_for(Key::from_name("z")), Some(Command::RotateLeft));
        assert_eq!(b.command_for(Key::from_name("x")), Some(Command::RotateRight));
        assert_eq!(b.command_for(Key::Up), None);
        assert_eq!(b.command_for(Key::Other), None);
    }

    #[test]
    fn rebinding_replaces_previous_command() {
        let b = KeyBindings::default().bind(Key::Down, Command::MoveLeft);
        assert_eq!(b.command_for(Key::Down), Some(Command::MoveLeft));
        assert!(!b.is_soft_drop(Key::Down));

        let b = b.bind(Key::Char('s'), Command::SoftDrop);
        assert!(b.is_soft_drop(Key::Char('s')));
    }

    #[test]
    fn multi_char_names_are_other() {
        assert_eq!(Key::from_name("Shift"), Key::Other);
        assert_eq!(Key::from_name(""), Key::Other);
        assert_eq!(Key::from_name(" "), Key::Space);
    }
}
