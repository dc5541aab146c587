//! Tetris loop (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof as
//! `tetris_loop::{core,engine,input,term,types}` and hosts the logging setup
//! shared by the binaries.

pub mod logging;

pub use tetris_loop_core as core;
pub use tetris_loop_engine as engine;
pub use tetris_loop_input as input;
pub use tetris_loop_term as term;
pub use tetris_loop_types as types;
