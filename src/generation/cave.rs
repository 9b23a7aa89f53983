//! # Cave Generation
//!
//! Grows wall clusters with a randomized flood fill, then places the agent,
//! the Wumpus, the gold, bats and pits in that order. Each placement must
//! avoid every occupied cell and every forbidden zone laid down before it.

use crate::game::{Board, CellKind, Position};
use crate::generation::{utils, CaveLayout, GenerationConfig, Generator};
use crate::{WumpusError, WumpusResult};
use log::{debug, warn};
use rand::{rngs::StdRng, Rng};
use std::collections::HashSet;

/// Primary cave generator.
///
/// Generation runs in a fixed order:
/// 1. Walls are grown from random seed cells until the target coverage is met
/// 2. The agent is placed and a safe zone is forbidden around it
/// 3. The Wumpus, the gold, the bats and the pits follow, each extending the
///    forbidden set before the next placement
/// 4. The gold is written to the board last
#[derive(Debug, Clone)]
pub struct CaveGenerator {
    /// Growth steps tried per wall cell before a cluster stops growing
    pub growth_steps_per_cell: usize,
}

/// Occupied and forbidden cells during placement.
#[derive(Debug, Default)]
struct Placement {
    occupied: HashSet<Position>,
    forbidden: HashSet<Position>,
}

impl Placement {
    fn is_free(&self, pos: Position) -> bool {
        !self.occupied.contains(&pos) && !self.forbidden.contains(&pos)
    }

    fn forbid_around(&mut self, board: &Board, center: Position, radius: i32) {
        self.forbidden
            .extend(utils::square_zone(board, center, radius));
    }
}

impl CaveGenerator {
    /// Creates a new cave generator with default settings.
    pub fn new() -> Self {
        Self {
            growth_steps_per_cell: 8,
        }
    }

    /// Grows wall clusters until the target coverage is reached.
    ///
    /// Clusters smaller than the configured minimum are discarded. Growth
    /// stops early once the attempted coverage passes the abort fraction.
    /// Returns the number of wall cells placed.
    fn grow_walls(&self, board: &mut Board, config: &GenerationConfig, rng: &mut StdRng) -> WumpusResult<usize> {
        let area = board.area() as f64;
        let target = (area * config.wall_coverage).round() as usize;
        let abort_at = (area * config.wall_abort_coverage) as usize;
        let mut placed = 0;
        let mut attempted = 0;

        while placed < target {
            if attempted > abort_at {
                warn!(
                    "wall growth aborted after attempting {} cells ({} placed)",
                    attempted, placed
                );
                break;
            }

            let cluster_target = rng.gen_range(config.min_wall_cluster..=config.max_wall_cluster);
            attempted += cluster_target;

            let seed = random_position(board, rng);
            if board.is_wall(seed) {
                continue;
            }

            let cluster = self.grow_cluster(board, seed, cluster_target, config.wall_growth_chance, rng);
            if cluster.len() < config.min_wall_cluster {
                debug!("discarding wall cluster of {} cells at {}", cluster.len(), seed);
                continue;
            }

            for pos in &cluster {
                board.set_kind(*pos, CellKind::Wall)?;
            }
            placed += cluster.len();
        }

        Ok(placed)
    }

    /// Randomized flood fill from `seed` over non-wall cells.
    fn grow_cluster(
        &self,
        board: &Board,
        seed: Position,
        target: usize,
        growth_chance: f64,
        rng: &mut StdRng,
    ) -> Vec<Position> {
        let mut cluster = vec![seed];
        let mut claimed: HashSet<Position> = HashSet::from([seed]);

        for _ in 0..target * self.growth_steps_per_cell {
            if cluster.len() >= target {
                break;
            }
            let from = cluster[rng.gen_range(0..cluster.len())];
            let neighbors = board.neighbors(from);
            if neighbors.is_empty() {
                break;
            }
            let candidate = neighbors[rng.gen_range(0..neighbors.len())];

            if board.is_wall(candidate) || claimed.contains(&candidate) {
                continue;
            }
            if rng.gen_bool(growth_chance) {
                claimed.insert(candidate);
                cluster.push(candidate);
            }
        }

        cluster
    }

    /// Samples uniformly until a free cell is found, giving up after the
    /// configured number of attempts.
    fn place(
        &self,
        board: &Board,
        placement: &mut Placement,
        config: &GenerationConfig,
        rng: &mut StdRng,
        what: &str,
    ) -> WumpusResult<Position> {
        for _ in 0..config.max_placement_attempts {
            let pos = random_position(board, rng);
            if placement.is_free(pos) {
                placement.occupied.insert(pos);
                return Ok(pos);
            }
        }
        Err(WumpusError::GenerationFailed(format!(
            "Could not place {} after {} attempts",
            what, config.max_placement_attempts
        )))
    }
}

fn random_position(board: &Board, rng: &mut StdRng) -> Position {
    Position::new(
        rng.gen_range(0..board.width) as i32,
        rng.gen_range(0..board.height) as i32,
    )
}

impl Generator<CaveLayout> for CaveGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WumpusResult<CaveLayout> {
        config.check()?;
        let mut board = Board::new(config.width, config.height);

        let walls = self.grow_walls(&mut board, config, rng)?;
        debug!("grew {} wall cells", walls);

        let mut placement = Placement::default();
        placement.occupied.extend(board.positions_of(CellKind::Wall));

        let agent_start = self.place(&board, &mut placement, config, rng, "the agent")?;
        placement.forbid_around(&board, agent_start, config.agent_safe_radius);

        let wumpus = self.place(&board, &mut placement, config, rng, "the Wumpus")?;
        placement.forbid_around(&board, wumpus, config.hazard_radius);

        // The gold only occupies its own cell; hazards may sit next to it.
        let gold = self.place(&board, &mut placement, config, rng, "the gold")?;

        let mut bats = Vec::with_capacity(config.num_bats);
        for _ in 0..config.num_bats {
            let bat = self.place(&board, &mut placement, config, rng, "a bat")?;
            placement.forbid_around(&board, bat, config.hazard_radius);
            bats.push(bat);
        }

        let mut pits = Vec::with_capacity(config.num_pits);
        for _ in 0..config.num_pits {
            let pit = self.place(&board, &mut placement, config, rng, "a pit")?;
            placement.forbid_around(&board, pit, config.hazard_radius);
            pits.push(pit);
        }

        board.set_kind(wumpus, CellKind::Wumpus)?;
        for bat in &bats {
            board.set_kind(*bat, CellKind::Bat)?;
        }
        for pit in &pits {
            board.set_kind(*pit, CellKind::Pit)?;
        }
        board.set_kind(gold, CellKind::Gold)?;

        let layout = CaveLayout {
            board,
            agent_start,
            wumpus: Some(wumpus),
            gold,
            bats,
            pits,
        };
        self.validate(&layout, config)?;
        Ok(layout)
    }

    fn validate(&self, layout: &CaveLayout, config: &GenerationConfig) -> WumpusResult<()> {
        layout.validate()?;

        if layout.wumpus.is_none()
            || layout.bats.len() != config.num_bats
            || layout.pits.len() != config.num_pits
        {
            return Err(WumpusError::GenerationFailed(
                "Cave is missing hazards".to_string(),
            ));
        }

        let radius = config.agent_safe_radius as u32;
        let hazards = layout
            .wumpus
            .iter()
            .chain(layout.bats.iter())
            .chain(layout.pits.iter());
        for hazard in hazards {
            if hazard.chebyshev_distance(layout.agent_start) <= radius {
                return Err(WumpusError::GenerationFailed(format!(
                    "Hazard at {} is inside the agent's safe zone",
                    hazard
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "CaveGenerator"
    }
}

impl Default for CaveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cave_generator_creation() {
        let generator = CaveGenerator::new();
        assert_eq!(generator.generator_type(), "CaveGenerator");
        assert_eq!(generator.growth_steps_per_cell, 8);
    }

    #[test]
    fn test_generation_places_every_entity() {
        let generator = CaveGenerator::new();
        let config = GenerationConfig::new(12345);
        let mut rng = utils::create_rng(&config);

        let layout = generator.generate(&config, &mut rng).unwrap();
        let board = &layout.board;
        assert_eq!(board.count(CellKind::Gold), 1);
        assert_eq!(board.count(CellKind::Wumpus), 1);
        assert_eq!(board.count(CellKind::Bat), 8);
        assert_eq!(board.count(CellKind::Pit), 4);
        assert_eq!(board.kind(layout.agent_start), Some(CellKind::Empty));
    }

    #[test]
    fn test_wall_growth_reaches_target() {
        let generator = CaveGenerator::new();
        let config = GenerationConfig::new(777);
        let mut rng = utils::create_rng(&config);
        let mut board = Board::standard();

        let placed = generator.grow_walls(&mut board, &config, &mut rng).unwrap();
        assert_eq!(placed, board.count(CellKind::Wall));
        assert!(placed >= 40, "only {} walls grown", placed);
        assert!(placed <= 200);
    }

    #[test]
    fn test_wall_growth_disabled() {
        let generator = CaveGenerator::new();
        let config = GenerationConfig::for_testing(5);
        let mut rng = utils::create_rng(&config);
        let mut board = Board::standard();
        assert_eq!(generator.grow_walls(&mut board, &config, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_wall_growth_aborts_when_clusters_cannot_fit() {
        // Clusters of 50 never fit on a 4x4 board; growth must give up.
        let generator = CaveGenerator::new();
        let mut config = GenerationConfig::for_testing(5);
        config.width = 4;
        config.height = 4;
        config.wall_coverage = 0.5;
        config.min_wall_cluster = 50;
        config.max_wall_cluster = 60;
        let mut rng = utils::create_rng(&config);
        let mut board = Board::new(4, 4);
        assert_eq!(generator.grow_walls(&mut board, &config, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_clusters_are_connected() {
        let generator = CaveGenerator::new();
        let mut rng = utils::create_rng(&GenerationConfig::new(3));
        let board = Board::standard();
        let cluster = generator.grow_cluster(&board, Position::new(10, 10), 12, 0.6, &mut rng);
        assert!(cluster.len() <= 12);
        for pos in &cluster[1..] {
            assert!(cluster.iter().any(|other| other.is_adjacent(*pos)));
        }
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let generator = CaveGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.width = 5;
        config.height = 5;
        config.num_bats = 10;
        config.max_placement_attempts = 200;
        let mut rng = utils::create_rng(&config);

        // A radius 3 safe zone leaves at most 9 of 25 cells for 14 entities.
        let result = generator.generate(&config, &mut rng);
        assert!(matches!(result, Err(WumpusError::GenerationFailed(_))));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = CaveGenerator::new();
        let config = GenerationConfig::new(2024);
        let a = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        let b = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        assert_eq!(a, b);
    }
}
