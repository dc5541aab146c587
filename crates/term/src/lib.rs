//! Terminal host module.
//!
//! Runs the game loop on a real terminal through `crossterm`: raw mode and
//! alternate screen, paced frame callbacks, `Instant`-based intervals and key
//! press/repeat/release events. The screen is the single text surface.

pub mod host;
pub mod renderer;

pub use tetris_loop_core as core;
pub use tetris_loop_input as input;
pub use tetris_loop_types as types;

pub use host::{TermConfig, TerminalHost};
pub use renderer::{encode_text_diff_into, encode_text_full_into, TerminalRenderer};
