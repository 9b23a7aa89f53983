//! # Game State Module
//!
//! Central game state management.
//!
//! [`GameState`] owns the board, the entity positions, the fog-of-war overlay,
//! the `playing` / `won` / `lost` status and the append-only action log. All
//! status and log changes go through it so a terminal status is never
//! overwritten.

use crate::game::{new_game_id, AgentState, Board, CellKind, GameId, Overlay, Position};
use crate::generation::CaveLayout;
use crate::{WumpusError, WumpusResult};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Overall status of one game. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// What the agent found on the cell it now stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Nothing happened; the game continues
    Safe,
    /// A bat grabbed the agent; the caller decides how to teleport
    Bat,
    /// The game ended on this cell
    Ended,
}

/// Authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Identifier used to correlate diagnostics
    pub game_id: GameId,
    /// The cave
    pub board: Board,
    /// Where the agent is now
    pub agent_pos: Position,
    /// None once the Wumpus has been killed
    pub wumpus_pos: Option<Position>,
    pub gold_pos: Position,
    pub bat_positions: Vec<Position>,
    pub pit_positions: Vec<Position>,
    /// Cells the agent has physically visited
    pub explored: Overlay,
    pub status: GameStatus,
    /// Human-readable events, oldest first
    pub action_log: Vec<String>,
}

impl GameState {
    /// Builds a playing state from a generated or hand-made layout.
    ///
    /// The three opening log lines name the agent, Wumpus and gold positions.
    pub fn from_layout(layout: CaveLayout) -> WumpusResult<Self> {
        layout.validate()?;
        let CaveLayout {
            mut board,
            agent_start,
            wumpus,
            gold,
            bats,
            pits,
        } = layout;

        let mut explored = Overlay::for_board(&board);
        explored.set(agent_start);
        board.mark_explored(agent_start);

        let mut state = Self {
            game_id: new_game_id(),
            board,
            agent_pos: agent_start,
            wumpus_pos: wumpus,
            gold_pos: gold,
            bat_positions: bats,
            pit_positions: pits,
            explored,
            status: GameStatus::Playing,
            action_log: Vec::new(),
        };

        state.log(format!("Game started. Agent at {}", agent_start));
        match wumpus {
            Some(pos) => state.log(format!("The Wumpus lurks at {}", pos)),
            None => state.log("There is no Wumpus in this cave"),
        }
        state.log(format!("The gold is at {}", gold));
        info!("game {} started with agent at {}", state.game_id, agent_start);

        Ok(state)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Appends a line to the action log.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("game {}: {}", self.game_id, message);
        self.action_log.push(message);
    }

    /// Transitions to `Won`. No-op once the game has ended.
    pub fn win(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.log(message);
        self.status = GameStatus::Won;
        info!("game {} won", self.game_id);
    }

    /// Transitions to `Lost`. No-op once the game has ended.
    pub fn lose(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.log(message);
        self.status = GameStatus::Lost;
        info!("game {} lost", self.game_id);
    }

    /// Whether the living Wumpus is orthogonally adjacent to `pos`.
    pub fn wumpus_adjacent(&self, pos: Position) -> bool {
        self.wumpus_pos.map_or(false, |w| w.is_adjacent(pos))
    }

    /// Removes the Wumpus from the board and the entity list together.
    pub fn kill_wumpus(&mut self) -> WumpusResult<()> {
        let pos = self
            .wumpus_pos
            .take()
            .ok_or_else(|| WumpusError::InvalidState("The Wumpus is already dead".to_string()))?;
        self.board.set_kind(pos, CellKind::Empty)
    }

    /// Moves the agent marker and reveals the destination.
    pub fn relocate_agent(&mut self, pos: Position) {
        self.agent_pos = pos;
        self.explored.set(pos);
        self.board.mark_explored(pos);
    }

    /// Resolves whatever occupies the agent's cell, in priority order
    /// gold, pit, Wumpus, bat.
    ///
    /// Standing on a wall or off the board is a defect and ends the game.
    pub fn check_arrival(&mut self) -> Arrival {
        if !self.is_playing() {
            return Arrival::Ended;
        }
        let pos = self.agent_pos;
        if pos == self.gold_pos {
            self.win(format!("Found the gold at {}! The agent wins", pos));
            return Arrival::Ended;
        }
        match self.board.kind(pos) {
            Some(CellKind::Pit) => {
                self.lose(format!("Fell into a pit at {}", pos));
                Arrival::Ended
            }
            Some(CellKind::Wumpus) => {
                self.lose(format!("The Wumpus at {} ate the agent", pos));
                Arrival::Ended
            }
            Some(CellKind::Bat) => Arrival::Bat,
            Some(CellKind::Wall) => {
                log::warn!("game {}: agent entered wall at {}", self.game_id, pos);
                self.lose(format!("The agent walked into the wall at {}", pos));
                Arrival::Ended
            }
            None => {
                log::warn!("game {}: agent left the board at {}", self.game_id, pos);
                self.lose(format!("The agent wandered off the cave at {}", pos));
                Arrival::Ended
            }
            Some(CellKind::Empty) | Some(CellKind::Gold) => Arrival::Safe,
        }
    }

    /// Picks a uniformly random empty cell that is neither a wall nor visited.
    pub fn teleport_destination<R: Rng + ?Sized>(
        &self,
        visited: &Overlay,
        rng: &mut R,
    ) -> Option<Position> {
        let candidates: Vec<Position> = self
            .board
            .positions()
            .filter(|p| self.board.kind(*p) == Some(CellKind::Empty))
            .filter(|p| !visited.get(*p) && *p != self.agent_pos)
            .collect();
        candidates.choose(rng).copied()
    }

    /// Number of cells the agent has physically visited.
    pub fn explored_count(&self) -> usize {
        self.explored.count()
    }

    /// Serializes the state to pretty-printed JSON.
    pub fn save_to_json(&self) -> WumpusResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a state saved with [`GameState::save_to_json`].
    pub fn load_from_json(json: &str) -> WumpusResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Aggregate results across many games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Games finished
    pub games: u32,
    /// Games won
    pub victories: u32,
    /// Wins that ended on the gold rather than with an arrow
    #[serde(default)]
    pub gold_found: u32,
    /// Times bats teleported the agent
    pub bat_resets: u64,
    /// Cells visited, summed over games
    pub cells_explored: u64,
    /// Agent steps, summed over games
    pub steps_taken: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished game. Games still in progress are ignored.
    pub fn record(&mut self, state: &GameState, agent: &AgentState) {
        if !state.status.is_terminal() {
            return;
        }
        self.games += 1;
        if state.status == GameStatus::Won {
            self.victories += 1;
            if agent.has_gold {
                self.gold_found += 1;
            }
        }
        self.bat_resets += u64::from(agent.bat_resets);
        self.cells_explored += state.explored_count() as u64;
        self.steps_taken += agent.steps;
    }

    /// Share of games won, in percent.
    pub fn win_percentage(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.victories) / f64::from(self.games) * 100.0
    }

    pub fn save_to_path(&self, path: &Path) -> WumpusResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Loads statistics, starting fresh when the file doesn't exist yet.
    pub fn load_from_path(path: &Path) -> WumpusResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_state() -> GameState {
        let layout = CaveLayout::new(6, 6, Position::new(0, 0), Position::new(5, 5))
            .with_wumpus(Position::new(3, 0))
            .with_pit(Position::new(0, 3))
            .with_bat(Position::new(2, 2))
            .with_wall(Position::new(1, 1));
        GameState::from_layout(layout).unwrap()
    }

    #[test]
    fn test_game_state_creation() {
        let state = small_state();
        assert!(state.is_playing());
        assert_eq!(state.action_log.len(), 3);
        assert!(state.action_log[0].contains("(1, 1)"));
        assert!(state.action_log[1].contains("(4, 1)"));
        assert!(state.action_log[2].contains("(6, 6)"));
        assert!(state.explored.get(Position::new(0, 0)));
        assert!(state.board.get(Position::new(0, 0)).unwrap().explored);
    }

    #[test]
    fn test_terminal_status_is_sticky() {
        let mut state = small_state();
        state.lose("test loss");
        assert_eq!(state.status, GameStatus::Lost);
        let log_len = state.action_log.len();

        state.win("too late");
        assert_eq!(state.status, GameStatus::Lost);
        assert_eq!(state.action_log.len(), log_len);
        assert_eq!(state.check_arrival(), Arrival::Ended);
    }

    #[test]
    fn test_arrival_priorities() {
        let mut state = small_state();
        state.relocate_agent(Position::new(2, 2));
        assert_eq!(state.check_arrival(), Arrival::Bat);
        assert!(state.is_playing());

        state.relocate_agent(Position::new(0, 3));
        assert_eq!(state.check_arrival(), Arrival::Ended);
        assert_eq!(state.status, GameStatus::Lost);
    }

    #[test]
    fn test_arrival_on_wall_is_defensive_loss() {
        let mut state = small_state();
        state.relocate_agent(Position::new(1, 1));
        assert_eq!(state.check_arrival(), Arrival::Ended);
        assert_eq!(state.status, GameStatus::Lost);
    }

    #[test]
    fn test_kill_wumpus_keeps_board_in_lockstep() {
        let mut state = small_state();
        assert!(state.wumpus_adjacent(Position::new(2, 0)));
        state.kill_wumpus().unwrap();
        assert_eq!(state.wumpus_pos, None);
        assert_eq!(state.board.count(CellKind::Wumpus), 0);
        assert!(!state.wumpus_adjacent(Position::new(2, 0)));
        assert!(state.kill_wumpus().is_err());
    }

    #[test]
    fn test_teleport_destination_avoids_walls_and_visited() {
        let state = small_state();
        let mut visited = Overlay::for_board(&state.board);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let dest = state.teleport_destination(&visited, &mut rng).unwrap();
            assert_eq!(state.board.kind(dest), Some(CellKind::Empty));
            assert_ne!(dest, state.agent_pos);
        }

        for pos in state.board.positions().collect::<Vec<_>>() {
            visited.set(pos);
        }
        assert_eq!(state.teleport_destination(&visited, &mut rng), None);
    }

    #[test]
    fn test_game_state_serialization() {
        let state = small_state();
        let json = state.save_to_json().unwrap();
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();
        let loaded = GameState::load_from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_statistics_win_percentage() {
        let mut stats = GameStatistics::new();
        assert_eq!(stats.win_percentage(), 0.0);

        let agent = AgentState::new(Position::new(0, 0), 6, 6);
        let mut won = small_state();
        won.win("gold");
        let mut lost = small_state();
        lost.lose("pit");
        let playing = small_state();

        stats.record(&won, &agent);
        stats.record(&lost, &agent);
        stats.record(&playing, &agent);
        assert_eq!(stats.games, 2);
        assert_eq!(stats.victories, 1);
        assert_eq!(stats.win_percentage(), 50.0);
        assert_eq!(stats.cells_explored, 2);
        assert_eq!(stats.gold_found, 0);
    }

    #[test]
    fn test_statistics_separate_gold_from_arrow_wins() {
        let mut stats = GameStatistics::new();
        let mut won = small_state();
        won.win("done");

        let shooter = AgentState::new(Position::new(0, 0), 6, 6);
        let mut carrier = shooter.clone();
        carrier.has_gold = true;

        stats.record(&won, &shooter);
        stats.record(&won, &carrier);
        assert_eq!(stats.victories, 2);
        assert_eq!(stats.gold_found, 1);

        let old_file = r#"{"games":1,"victories":1,"bat_resets":0,"cells_explored":3,"steps_taken":4}"#;
        let loaded: GameStatistics = serde_json::from_str(old_file).unwrap();
        assert_eq!(loaded.gold_found, 0);
    }
}
