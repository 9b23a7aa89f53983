//! # Agent Module
//!
//! The autonomous agent's decision engine. One call to [`step`] shoots if the
//! Wumpus is in range, resolves the current cell, reports what the agent
//! senses, picks the next cell and resolves that cell too.

use crate::game::{
    senses, Arrival, CellKind, GameState, Overlay, Position,
};
use crate::utils::astar_path;
use crate::{config, WumpusError};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy used to choose the next cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Backtracking depth-first exploration
    #[default]
    Dfs,
    /// Shortest-path pursuit of the gold
    Astar,
}

impl FromStr for SearchMode {
    type Err = WumpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(SearchMode::Dfs),
            "astar" | "a*" => Ok(SearchMode::Astar),
            other => Err(WumpusError::InvalidAction(format!(
                "Unknown search mode '{}', expected dfs or astar",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Dfs => write!(f, "dfs"),
            SearchMode::Astar => write!(f, "astar"),
        }
    }
}

/// Everything the agent remembers between steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Current search path; the top is the agent's position
    pub stack: Vec<Position>,
    /// Cells the agent has committed to visiting
    pub visited: Overlay,
    /// Cells identified as pits, bats or the Wumpus; survives teleports
    pub known_hazards: Overlay,
    /// Arrows left
    pub arrows: u32,
    /// Latched once the gold is picked up; separates gold wins from arrow wins
    pub has_gold: bool,
    /// Every position the agent has stood on since the last teleport
    pub path: Vec<Position>,
    /// Times a bat carried the agent away
    pub bat_resets: u32,
    /// Completed step calls
    pub steps: u64,
}

impl AgentState {
    /// Creates an agent standing on `start` with a full quiver.
    pub fn new(start: Position, width: usize, height: usize) -> Self {
        Self {
            stack: vec![start],
            visited: Overlay::new(width, height),
            known_hazards: Overlay::new(width, height),
            arrows: config::STARTING_ARROWS,
            has_gold: false,
            path: vec![start],
            bat_resets: 0,
            steps: 0,
        }
    }

    /// Creates the agent paired with a freshly built game state.
    pub fn for_state(state: &GameState) -> Self {
        Self::new(state.agent_pos, state.board.width, state.board.height)
    }

    /// Top of the stack.
    pub fn current(&self) -> Option<Position> {
        self.stack.last().copied()
    }

    /// Drops search progress and restarts from `pos`.
    ///
    /// Visited cells and known hazards are kept.
    pub fn restart_from(&mut self, pos: Position) {
        self.stack = vec![pos];
        self.path = vec![pos];
    }
}

/// Advances the game by one discrete step.
///
/// Does nothing once the game has ended.
pub fn step<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, mode: SearchMode, rng: &mut R) {
    if !state.is_playing() {
        return;
    }
    agent.steps += 1;

    let current = match agent.current() {
        Some(pos) => pos,
        None => {
            agent.stack.push(state.agent_pos);
            state.agent_pos
        }
    };
    state.agent_pos = current;
    agent.visited.set(current);

    if state.wumpus_adjacent(current) && agent.arrows > 0 && shoot(state, agent, rng) {
        return;
    }

    // Bats were already resolved on arrival; one still underfoot had nowhere to go.
    match state.check_arrival() {
        Arrival::Ended => {
            agent.has_gold |= state.agent_pos == state.gold_pos;
            return;
        }
        Arrival::Safe | Arrival::Bat => {}
    }

    report_senses(state, current);

    match mode {
        SearchMode::Dfs => choose_dfs(state, agent, current, rng),
        SearchMode::Astar => choose_astar(state, agent, current),
    }

    let next = match agent.current() {
        Some(pos) => pos,
        None => {
            state.lose(format!(
                "Nowhere left to explore from {}; the agent is stuck",
                current
            ));
            return;
        }
    };

    if next == current {
        return;
    }
    if !state.board.contains(next) || state.board.is_wall(next) {
        warn!("game {}: search chose blocked cell {}", state.game_id, next);
        state.lose(format!("The agent tried to walk into {}", next));
        return;
    }

    state.relocate_agent(next);
    agent.visited.set(next);
    agent.path.push(next);
    resolve_arrival(state, agent, rng);
}

/// Fires one arrow. Returns true when the Wumpus dies.
pub fn shoot<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, rng: &mut R) -> bool {
    if agent.arrows == 0 {
        state.log("No arrows left");
        return false;
    }
    agent.arrows -= 1;
    state.log(format!("The agent shoots an arrow ({} left)", agent.arrows));

    let pos = state.agent_pos;
    match state.wumpus_pos.filter(|w| w.is_adjacent(pos)) {
        Some(wumpus) if rng.gen_range(0..config::SHOT_HIT_ODDS) == 0 => {
            if let Err(e) = state.kill_wumpus() {
                warn!("game {}: {}", state.game_id, e);
                return false;
            }
            state.win(format!("The arrow hits! The Wumpus at {} is dead", wumpus));
            true
        }
        Some(_) => {
            state.log("The arrow misses; the Wumpus is still out there");
            false
        }
        None => {
            state.log("The arrow flies off into the darkness");
            false
        }
    }
}

/// Resolves the cell the agent just entered, teleporting on bats.
///
/// Senses are left to the caller; the engine reports them at the start of
/// the next step.
///
/// Returns true while the game is still being played.
pub fn resolve_arrival<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, rng: &mut R) -> bool {
    match state.check_arrival() {
        Arrival::Safe => {}
        Arrival::Ended => agent.has_gold |= state.agent_pos == state.gold_pos,
        Arrival::Bat => teleport(state, agent, rng),
    }
    state.is_playing()
}

/// Lets the bat under the agent carry it to a random unvisited empty cell.
fn teleport<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, rng: &mut R) {
    let from = state.agent_pos;
    agent.visited.set(from);
    agent.known_hazards.set(from);

    match state.teleport_destination(&agent.visited, rng) {
        Some(dest) => {
            state.log(format!("A bat at {} carries the agent off to {}", from, dest));
            state.relocate_agent(dest);
            agent.restart_from(dest);
            agent.visited.set(dest);
            agent.bat_resets += 1;
        }
        None => {
            state.log(format!(
                "A bat at {} flutters about but finds nowhere to take the agent",
                from
            ));
            agent.restart_from(from);
        }
    }
}

/// Logs one line per positive sense at `pos`.
pub fn report_senses(state: &mut GameState, pos: Position) {
    let lines = senses::sense(&state.board, pos).messages();
    for line in lines {
        state.log(format!("At {}: {}", pos, line));
    }
}

/// Outcome of the depth-first decision for one step.
enum DfsChoice {
    Gold(Position),
    Explore(Position),
    Backtrack,
    Risk(Position),
    Stuck,
}

/// Depth-first choice: gold, then a safe unvisited cell, then backtrack.
///
/// Hazards are only risked from the bottom of the stack, bats before pits
/// and the Wumpus.
fn choose_dfs<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, current: Position, rng: &mut R) {
    let board = &state.board;
    let neighbors = senses::sense_shuffled(board, current, rng).neighbors;
    for &pos in &neighbors {
        if board.kind(pos).map_or(false, CellKind::is_hazard) {
            agent.known_hazards.set(pos);
        }
    }

    let unvisited_of = |kinds: &[CellKind]| {
        neighbors.iter().copied().find(|pos| {
            !agent.visited.get(*pos)
                && board.kind(*pos).map_or(false, |kind| kinds.contains(&kind))
        })
    };

    let gold = neighbors
        .iter()
        .copied()
        .find(|pos| *pos == state.gold_pos && !board.is_wall(*pos));
    let choice = if let Some(gold) = gold {
        DfsChoice::Gold(gold)
    } else if let Some(next) = unvisited_of(&[CellKind::Empty]) {
        DfsChoice::Explore(next)
    } else if agent.stack.len() > 1 {
        DfsChoice::Backtrack
    } else if let Some(next) =
        unvisited_of(&[CellKind::Bat]).or_else(|| unvisited_of(&[CellKind::Pit, CellKind::Wumpus]))
    {
        DfsChoice::Risk(next)
    } else {
        DfsChoice::Stuck
    };

    match choice {
        DfsChoice::Gold(gold) => {
            debug!("gold spotted next door at {}", gold);
            agent.stack.push(gold);
        }
        DfsChoice::Explore(next) => {
            state.log(format!("Moving to {}", next));
            agent.stack.push(next);
        }
        DfsChoice::Backtrack => {
            agent.stack.pop();
            if let Some(back) = agent.current() {
                state.log(format!("Backtracking to {}", back));
            }
        }
        DfsChoice::Risk(next) => {
            state.log(format!("Nothing safe left; the agent risks {}", next));
            agent.stack.push(next);
        }
        DfsChoice::Stuck => {
            agent.stack.pop();
        }
    }
}

/// A* choice: the next cell on a shortest path to the gold, else backtrack.
fn choose_astar(state: &mut GameState, agent: &mut AgentState, current: Position) {
    let path = astar_path(&state.board, current, state.gold_pos);
    if let Some(&next) = path.get(1) {
        state.log(format!(
            "Heading for the gold: {} ({} steps away)",
            next,
            path.len() - 1
        ));
        agent.stack.push(next);
        return;
    }

    agent.stack.pop();
    if let Some(back) = agent.current() {
        state.log(format!("No path to the gold; backtracking to {}", back));
    }
}
