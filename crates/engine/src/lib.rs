//! Engine facade - the command/query surface of the external rules engine
//!
//! Piece generation, collision, rotation, line clears and scoring all live in
//! the engine. This layer only needs five commands and one query, so the
//! engine is modelled as a capability trait. Any concrete engine (a compiled
//! module, an in-process simulation, a test double) implements [`Engine`].
//!
//! Commands are trusted to succeed: a rejected move or rotation is absorbed by
//! the engine and shows up only in the next rendered snapshot.
//!
//! # Example
//!
//! ```
//! use tetris_loop_engine::{apply, Engine, ProbeEngine};
//! use tetris_loop_types::Command;
//!
//! let mut engine = ProbeEngine::new();
//! apply(&mut engine, Command::MoveLeft);
//! apply(&mut engine, Command::SoftDrop);
//! apply(&mut engine, Command::Advance);
//!
//! assert_eq!(engine.count(Command::MoveLeft), 1);
//! assert_eq!(engine.advances(), 2);
//! assert!(engine.render_frame().contains("moveLeft"));
//! ```

pub mod probe;

pub use tetris_loop_types as types;

pub use probe::ProbeEngine;

use crate::types::Command;

/// The five commands and one query the orchestration layer needs.
pub trait Engine {
    /// Textual snapshot of the current game state, ready for direct display.
    fn render_frame(&self) -> String;

    /// Advance gravity/lock state by one step.
    fn advance(&mut self);

    fn move_left(&mut self);

    fn move_right(&mut self);

    fn rotate_left(&mut self);

    fn rotate_right(&mut self);
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn render_frame(&self) -> String {
        (**self).render_frame()
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn move_left(&mut self) {
        (**self).move_left()
    }

    fn move_right(&mut self) {
        (**self).move_right()
    }

    fn rotate_left(&mut self) {
        (**self).rotate_left()
    }

    fn rotate_right(&mut self) {
        (**self).rotate_right()
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn render_frame(&self) -> String {
        (**self).render_frame()
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn move_left(&mut self) {
        (**self).move_left()
    }

    fn move_right(&mut self) {
        (**self).move_right()
    }

    fn rotate_left(&mut self) {
        (**self).rotate_left()
    }

    fn rotate_right(&mut self) {
        (**self).rotate_right()
    }
}

/// Issue `command` against `engine`.
///
/// `SoftDrop` and `Advance` both map to a single `advance` call.
pub fn apply<E: Engine + ?Sized>(engine: &mut E, command: Command) {
    match command {
        Command::SoftDrop | Command::Advance => engine.advance(),
        Command::MoveLeft => engine.move_left(),
        Command::MoveRight => engine.move_right(),
        Command::RotateLeft => engine.rotate_left(),
        Command::RotateRight => engine.rotate_right(),
    }
}
