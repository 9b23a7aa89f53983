//! # Hunt the Wumpus
//!
//! A simulation of the classic "Hunt the Wumpus" exploration game played on a
//! 20x20 cave, driven by an autonomous agent or by a human.
//!
//! ## Architecture Overview
//!
//! - **Grid Model**: cell kinds, coordinates and orthogonal adjacency
//! - **Generation System**: wall clusters and hazard placement under
//!   separation constraints
//! - **Senses**: what the agent can smell, feel and hear from a cell
//! - **Agent Engine**: one discrete step of the agent, exploring by
//!   backtracking depth-first search or chasing the gold with A*
//! - **Game State**: the authoritative `playing` / `won` / `lost` machine and
//!   its append-only action log
//!
//! Rendering is not part of the core. Presentation code reads a
//! [`GameSnapshot`] and never mutates agent internals directly.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Wumpus engine.
#[derive(thiserror::Error, Debug)]
pub enum WumpusError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Wumpus codebase.
pub type WumpusResult<T> = Result<T, WumpusError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Width and height of the cave in cells
    pub const BOARD_SIZE: usize = 20;

    /// Arrows the agent starts with
    pub const STARTING_ARROWS: u32 = 3;

    /// A shot kills the Wumpus with probability 1 / SHOT_HIT_ODDS
    pub const SHOT_HIT_ODDS: u32 = 8;

    /// Default number of bats on a normal difficulty board
    pub const DEFAULT_BATS: usize = 8;

    /// Default number of pits on a normal difficulty board
    pub const DEFAULT_PITS: usize = 4;

    /// Cells kept hazard-free in every direction around the agent's start
    pub const AGENT_SAFE_RADIUS: i32 = 3;

    /// Spacing kept around each placed hazard
    pub const HAZARD_RADIUS: i32 = 1;

    /// Fraction of the board wall growth aims to cover
    pub const WALL_COVERAGE: f64 = 0.10;

    /// Wall growth gives up once attempted coverage passes this fraction
    pub const WALL_ABORT_COVERAGE: f64 = 0.50;
}
