//! Input module - key events in, engine commands out.
//!
//! [`InputTranslator`] turns host-neutral key-down / key-up events into engine
//! commands and owns the accelerated-drop timer. [`map`] converts `crossterm`
//! key codes into [`Key`](crate::types::Key)s for terminal hosts.

pub mod map;
pub mod translator;

pub use tetris_loop_engine as engine;
pub use tetris_loop_types as types;

pub use map::{key_from_code, should_quit};
pub use translator::InputTranslator;
