//! # Senses
//!
//! Classifies what is perceptible from a cell. Every function here is a pure
//! read of the board.

use crate::game::{Board, CellKind, Direction, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Warnings perceptible from one cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Senses {
    /// The Wumpus is adjacent
    pub smell: bool,
    /// A pit is adjacent
    pub breeze: bool,
    /// A bat is adjacent
    pub flapping: bool,
    /// The gold is adjacent
    pub glow: bool,
    /// A wall is adjacent
    pub wall: bool,
    /// In-bounds neighbours, in the order they were examined
    pub neighbors: Vec<Position>,
}

impl Senses {
    /// Whether any hazard warning is perceptible.
    pub fn any_danger(&self) -> bool {
        self.smell || self.breeze || self.flapping
    }

    /// Human-readable log lines, one per positive sense.
    pub fn messages(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if self.smell {
            lines.push("You smell something terrible");
        }
        if self.breeze {
            lines.push("You feel a breeze");
        }
        if self.flapping {
            lines.push("You hear flapping");
        }
        if self.glow {
            lines.push("You see a lucky glow");
        }
        lines
    }
}

/// In-bounds orthogonal neighbours, shuffled with the supplied RNG.
pub fn shuffled_neighbors<R: Rng + ?Sized>(board: &Board, pos: Position, rng: &mut R) -> Vec<Position> {
    let mut directions = Direction::all();
    directions.shuffle(rng);
    directions
        .into_iter()
        .map(|d| pos.step(d))
        .filter(|p| board.contains(*p))
        .collect()
}

/// Senses at `pos`, examining neighbours in fixed north, east, south, west order.
pub fn sense(board: &Board, pos: Position) -> Senses {
    classify(board, board.neighbors(pos))
}

/// Senses at `pos`, examining neighbours in a random order.
pub fn sense_shuffled<R: Rng + ?Sized>(board: &Board, pos: Position, rng: &mut R) -> Senses {
    classify(board, shuffled_neighbors(board, pos, rng))
}

fn classify(board: &Board, neighbors: Vec<Position>) -> Senses {
    let mut senses = Senses::default();
    for &neighbor in &neighbors {
        match board.kind(neighbor) {
            Some(CellKind::Wumpus) => senses.smell = true,
            Some(CellKind::Pit) => senses.breeze = true,
            Some(CellKind::Bat) => senses.flapping = true,
            Some(CellKind::Gold) => senses.glow = true,
            Some(CellKind::Wall) => senses.wall = true,
            Some(CellKind::Empty) | None => {}
        }
    }
    senses.neighbors = neighbors;
    senses
}
