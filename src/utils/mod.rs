//! # Utilities Module
//!
//! Pathfinding helpers shared by the agent engine.

pub mod pathfinding;

pub use self::pathfinding::*;
