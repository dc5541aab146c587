//! Diagnostic engine that records what it is asked to do.
//!
//! The real rules engine is external. `ProbeEngine` stands in for it when the
//! loop is driven on its own: it counts every call and renders the counts plus
//! the most recent calls, so gravity, throttled drops and key handling can be
//! watched live in the terminal or asserted on in tests.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::types::Command;
use crate::Engine;

const RECENT_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Advance,
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
}

impl Op {
    const ALL: [Op; 5] = [
        Op::Advance,
        Op::MoveLeft,
        Op::MoveRight,
        Op::RotateLeft,
        Op::RotateRight,
    ];

    fn of(command: Command) -> Self {
        match command {
            Command::SoftDrop | Command::Advance => Op::Advance,
            Command::MoveLeft => Op::MoveLeft,
            Command::MoveRight => Op::MoveRight,
            Command::RotateLeft => Op::RotateLeft,
            Command::RotateRight => Op::RotateRight,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Op::Advance => "advance",
            Op::MoveLeft => "moveLeft",
            Op::MoveRight => "moveRight",
            Op::RotateLeft => "rotateLeft",
            Op::RotateRight => "rotateRight",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProbeEngine {
    counts: [u64; 5],
    recent: VecDeque<Op>,
}

impl ProbeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of engine calls `command` would have produced so far.
    ///
    /// `SoftDrop` and `Advance` share the `advance` counter.
    pub fn count(&self, command: Command) -> u64 {
        self.counts[Op::of(command).index()]
    }

    pub fn advances(&self) -> u64 {
        self.counts[Op::Advance.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn record(&mut self, op: Op) {
        self.counts[op.index()] += 1;
        if self.recent.len() == RECENT_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(op);
    }
}

impl Engine for ProbeEngine {
    fn render_frame(&self) -> String {
        let mut out = String::with_capacity(160);
        for op in Op::ALL {
            let _ = writeln!(out, "{:<12}{:>8}", op.name(), self.counts[op.index()]);
        }
        out.push_str("recent:");
        for op in &self.recent {
            out.push(' ');
            out.push_str(op.name());
        }
        out
    }

    fn advance(&mut self) {
        self.record(Op::Advance);
    }

    fn move_left(&mut self) {
        self.record(Op::MoveLeft);
    }

    fn move_right(&mut self) {
        self.record(Op::MoveRight);
    }

    fn rotate_left(&mut self) {
        self.record(Op::RotateLeft);
    }

    fn rotate_right(&mut self) {
        self.record(Op::RotateRight);
    }
}
