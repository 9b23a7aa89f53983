//! # Generation Module
//!
//! Procedural cave generation: wall clusters first, then the agent, the
//! Wumpus, the gold, bats and pits, each kept apart by forbidden zones.

pub mod cave;

pub use cave::*;

use crate::game::{Board, CellKind, Position};
use crate::{config, WumpusError, WumpusResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How crowded the cave is with bats and pits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Number of bats and pits placed at this difficulty.
    pub fn hazard_counts(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (config::DEFAULT_BATS / 2, config::DEFAULT_PITS / 2),
            Difficulty::Normal => (config::DEFAULT_BATS, config::DEFAULT_PITS),
            Difficulty::Hard => (config::DEFAULT_BATS * 3 / 2, config::DEFAULT_PITS * 3 / 2),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = WumpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(WumpusError::InvalidAction(format!(
                "Unknown difficulty '{}', expected easy, normal or hard",
                other
            ))),
        }
    }
}

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Board width in cells
    pub width: usize,
    /// Board height in cells
    pub height: usize,
    /// Number of bats to place
    pub num_bats: usize,
    /// Number of pits to place
    pub num_pits: usize,
    /// Hazard-free radius around the agent's start
    pub agent_safe_radius: i32,
    /// Forbidden radius around the Wumpus, each bat and each pit
    pub hazard_radius: i32,
    /// Smallest wall cluster kept
    pub min_wall_cluster: usize,
    /// Largest wall cluster grown
    pub max_wall_cluster: usize,
    /// Chance that one growth step claims the chosen neighbour (0.0 to 1.0)
    pub wall_growth_chance: f64,
    /// Fraction of the board wall growth aims to cover (0.0 disables walls)
    pub wall_coverage: f64,
    /// Wall growth stops once attempted coverage passes this fraction
    pub wall_abort_coverage: f64,
    /// Samples tried per entity before generation fails
    pub max_placement_attempts: u32,
}

impl GenerationConfig {
    /// Creates a normal difficulty configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use wumpus::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.width, 20);
    /// assert!(config.max_wall_cluster >= config.min_wall_cluster);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::BOARD_SIZE,
            height: config::BOARD_SIZE,
            num_bats: config::DEFAULT_BATS,
            num_pits: config::DEFAULT_PITS,
            agent_safe_radius: config::AGENT_SAFE_RADIUS,
            hazard_radius: config::HAZARD_RADIUS,
            min_wall_cluster: 5,
            max_wall_cluster: 15,
            wall_growth_chance: 0.6,
            wall_coverage: config::WALL_COVERAGE,
            wall_abort_coverage: config::WALL_ABORT_COVERAGE,
            max_placement_attempts: 10_000,
        }
    }

    /// Creates a configuration for testing: no walls and few hazards.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            num_bats: 2,
            num_pits: 2,
            wall_coverage: 0.0,
            ..Self::new(seed)
        }
    }

    /// Creates a configuration scaled to the given difficulty.
    pub fn for_difficulty(seed: u64, difficulty: Difficulty) -> Self {
        let (num_bats, num_pits) = difficulty.hazard_counts();
        Self {
            num_bats,
            num_pits,
            ..Self::new(seed)
        }
    }

    /// Rejects configurations the generator can't work with.
    pub fn check(&self) -> WumpusResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WumpusError::GenerationFailed(
                "Board must have at least one cell".to_string(),
            ));
        }
        if self.min_wall_cluster == 0 || self.min_wall_cluster > self.max_wall_cluster {
            return Err(WumpusError::GenerationFailed(format!(
                "Wall cluster range {}..={} is empty",
                self.min_wall_cluster, self.max_wall_cluster
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_growth_chance) || !(0.0..=1.0).contains(&self.wall_coverage) {
            return Err(WumpusError::GenerationFailed(
                "Wall probabilities must lie in 0.0..=1.0".to_string(),
            ));
        }
        if self.agent_safe_radius < 0 || self.hazard_radius < 0 {
            return Err(WumpusError::GenerationFailed(
                "Forbidden radii cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A complete cave: board plus the authoritative entity positions.
///
/// Produced by [`CaveGenerator`], or built by hand for tests and puzzles.
///
/// # Examples
///
/// ```
/// use wumpus::{CaveLayout, Position};
///
/// let layout = CaveLayout::new(20, 20, Position::new(1, 1), Position::new(2, 1))
///     .with_pit(Position::new(10, 10));
/// assert!(layout.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveLayout {
    pub board: Board,
    pub agent_start: Position,
    pub wumpus: Option<Position>,
    pub gold: Position,
    pub bats: Vec<Position>,
    pub pits: Vec<Position>,
}

impl CaveLayout {
    /// Creates an open cave holding only the agent and the gold.
    pub fn new(width: usize, height: usize, agent_start: Position, gold: Position) -> Self {
        let mut board = Board::new(width, height);
        // Out-of-bounds gold is reported by validate().
        let _ = board.set_kind(gold, CellKind::Gold);
        Self {
            board,
            agent_start,
            wumpus: None,
            gold,
            bats: Vec::new(),
            pits: Vec::new(),
        }
    }

    pub fn with_wumpus(mut self, pos: Position) -> Self {
        if let Some(old) = self.wumpus.replace(pos) {
            let _ = self.board.set_kind(old, CellKind::Empty);
        }
        let _ = self.board.set_kind(pos, CellKind::Wumpus);
        self
    }

    pub fn with_bat(mut self, pos: Position) -> Self {
        self.bats.push(pos);
        let _ = self.board.set_kind(pos, CellKind::Bat);
        self
    }

    pub fn with_pit(mut self, pos: Position) -> Self {
        self.pits.push(pos);
        let _ = self.board.set_kind(pos, CellKind::Pit);
        self
    }

    pub fn with_wall(mut self, pos: Position) -> Self {
        let _ = self.board.set_kind(pos, CellKind::Wall);
        self
    }

    /// Checks that the board and the position lists agree and nothing overlaps.
    pub fn validate(&self) -> WumpusResult<()> {
        let board = &self.board;
        let mut seen = HashSet::new();
        let mut entities: Vec<(Position, CellKind)> = vec![(self.gold, CellKind::Gold)];
        entities.extend(self.wumpus.map(|w| (w, CellKind::Wumpus)));
        entities.extend(self.bats.iter().map(|b| (*b, CellKind::Bat)));
        entities.extend(self.pits.iter().map(|p| (*p, CellKind::Pit)));

        if !board.contains(self.agent_start) {
            return Err(WumpusError::InvalidState(format!(
                "Agent start {} is outside the cave",
                self.agent_start
            )));
        }
        if board.kind(self.agent_start) != Some(CellKind::Empty) {
            return Err(WumpusError::InvalidState(format!(
                "Agent start {} is not an empty cell",
                self.agent_start
            )));
        }
        seen.insert(self.agent_start);

        for (pos, kind) in entities {
            if board.kind(pos) != Some(kind) {
                return Err(WumpusError::InvalidState(format!(
                    "Board disagrees with {:?} at {}",
                    kind, pos
                )));
            }
            if !seen.insert(pos) {
                return Err(WumpusError::InvalidState(format!(
                    "Two entities share {}",
                    pos
                )));
            }
        }

        let expected = [
            (CellKind::Gold, 1),
            (CellKind::Wumpus, usize::from(self.wumpus.is_some())),
            (CellKind::Bat, self.bats.len()),
            (CellKind::Pit, self.pits.len()),
        ];
        for (kind, count) in expected {
            if board.count(kind) != count {
                return Err(WumpusError::InvalidState(format!(
                    "Board holds {} {:?} cells, expected {}",
                    board.count(kind),
                    kind,
                    count
                )));
            }
        }
        Ok(())
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WumpusResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> WumpusResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// In-bounds cells within `radius` of `center` in every direction.
    pub fn square_zone(board: &Board, center: Position, radius: i32) -> Vec<Position> {
        let mut zone = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = Position::new(center.x + dx, center.y + dy);
                if board.contains(pos) {
                    zone.push(pos);
                }
            }
        }
        zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.num_bats, 8);
        assert_eq!(config.num_pits, 4);
        assert!(config.check().is_ok());
        assert!(GenerationConfig::for_testing(1).check().is_ok());
    }

    #[test]
    fn test_difficulty_scales_hazards() {
        assert_eq!(Difficulty::Easy.hazard_counts(), (4, 2));
        assert_eq!(Difficulty::Normal.hazard_counts(), (8, 4));
        assert_eq!(Difficulty::Hard.hazard_counts(), (12, 6));
        let hard = GenerationConfig::for_difficulty(9, Difficulty::Hard);
        assert_eq!((hard.num_bats, hard.num_pits), (12, 6));

        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_bad_configs_rejected() {
        let mut config = GenerationConfig::new(1);
        config.min_wall_cluster = 20;
        assert!(config.check().is_err());

        let mut config = GenerationConfig::new(1);
        config.wall_growth_chance = 1.5;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_layout_validation() {
        let layout = CaveLayout::new(5, 5, Position::new(0, 0), Position::new(4, 4))
            .with_wumpus(Position::new(2, 2))
            .with_bat(Position::new(3, 3));
        assert!(layout.validate().is_ok());

        let on_gold = CaveLayout::new(5, 5, Position::new(4, 4), Position::new(4, 4));
        assert!(on_gold.validate().is_err());

        let overlapping = CaveLayout::new(5, 5, Position::new(0, 0), Position::new(4, 4))
            .with_bat(Position::new(2, 2))
            .with_pit(Position::new(2, 2));
        assert!(overlapping.validate().is_err());

        let pit_in_wall = CaveLayout::new(5, 5, Position::new(0, 0), Position::new(4, 4))
            .with_wall(Position::new(1, 1))
            .with_pit(Position::new(1, 1));
        assert!(pit_in_wall.validate().is_err());
    }

    #[test]
    fn test_square_zone_clips_to_board() {
        let board = Board::new(10, 10);
        assert_eq!(utils::square_zone(&board, Position::new(5, 5), 1).len(), 9);
        assert_eq!(utils::square_zone(&board, Position::new(0, 0), 3).len(), 16);
        assert_eq!(utils::square_zone(&board, Position::new(5, 5), 0).len(), 1);
    }
}
