//! # Session Module
//!
//! [`Game`] bundles the game state, the agent, the RNG and the active search
//! mode behind one handle. Presentation code drives it and reads
//! [`GameSnapshot`]s; it never touches agent internals.

use crate::game::{
    manual_move, manual_move_by, manual_shoot, step, AgentState, CellKind, Direction, GameId,
    GameState, GameStatus, Position, SearchMode,
};
use crate::generation::{utils, CaveGenerator, CaveLayout, GenerationConfig, Generator};
use crate::WumpusResult;
use log::info;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generates a cave and returns the fresh game state with its agent.
pub fn create_new_game(config: &GenerationConfig, rng: &mut StdRng) -> WumpusResult<(GameState, AgentState)> {
    let layout = CaveGenerator::new().generate(config, rng)?;
    let state = GameState::from_layout(layout)?;
    let agent = AgentState::for_state(&state);
    Ok((state, agent))
}

/// One running game.
#[derive(Debug, Clone)]
pub struct Game<R: Rng = StdRng> {
    state: GameState,
    agent: AgentState,
    mode: SearchMode,
    rng: R,
}

impl Game<StdRng> {
    /// Generates a new cave from `config`, seeding the RNG from its seed.
    pub fn new(config: &GenerationConfig) -> WumpusResult<Self> {
        let mut rng = utils::create_rng(config);
        let (state, agent) = create_new_game(config, &mut rng)?;
        info!(
            "new game {} (seed {}, {} bats, {} pits)",
            state.game_id, config.seed, config.num_bats, config.num_pits
        );
        Ok(Self {
            state,
            agent,
            mode: SearchMode::default(),
            rng,
        })
    }
}

impl<R: Rng> Game<R> {
    /// Generates the cave from `config`'s seed and plays with `rng`.
    pub fn with_rng(config: &GenerationConfig, rng: R) -> WumpusResult<Self> {
        let mut cave_rng = utils::create_rng(config);
        let (state, agent) = create_new_game(config, &mut cave_rng)?;
        Ok(Self {
            state,
            agent,
            mode: SearchMode::default(),
            rng,
        })
    }

    /// Starts a game on a hand-made layout.
    pub fn from_layout(layout: CaveLayout, rng: R) -> WumpusResult<Self> {
        let state = GameState::from_layout(layout)?;
        let agent = AgentState::for_state(&state);
        Ok(Self {
            state,
            agent,
            mode: SearchMode::default(),
            rng,
        })
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Switches strategy; takes effect on the next step.
    ///
    /// A finished game only records the new mode; its log stays frozen.
    pub fn set_mode(&mut self, mode: SearchMode) {
        if self.mode != mode && self.state.is_playing() {
            self.state.log(format!("Switching to {} search", mode));
        }
        self.mode = mode;
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_terminal()
    }

    /// Runs one agent step.
    pub fn step(&mut self) -> GameStatus {
        step(&mut self.state, &mut self.agent, self.mode, &mut self.rng);
        self.state.status
    }

    /// Steps until the game ends or `max_steps` further steps have run.
    pub fn run(&mut self, max_steps: u64) -> GameStatus {
        let mut taken = 0;
        while !self.is_over() && taken < max_steps {
            self.step();
            taken += 1;
        }
        self.state.status
    }

    pub fn manual_move(&mut self, direction: Direction) -> bool {
        manual_move(&mut self.state, &mut self.agent, direction, &mut self.rng)
    }

    pub fn manual_move_by(&mut self, dx: i32, dy: i32) -> WumpusResult<bool> {
        manual_move_by(&mut self.state, &mut self.agent, dx, dy, &mut self.rng)
    }

    pub fn manual_shoot(&mut self) -> bool {
        manual_shoot(&mut self.state, &mut self.agent, &mut self.rng)
    }

    /// Read-only view of everything a front end needs to draw.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, &self.agent, self.mode)
    }

    /// Hands back the state and agent, ending the session.
    pub fn into_parts(self) -> (GameState, AgentState) {
        (self.state, self.agent)
    }
}

/// Serializable picture of a game at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub width: usize,
    pub height: usize,
    /// Cell kinds, row by row
    pub cells: Vec<Vec<CellKind>>,
    /// Fog of war, row by row
    pub explored: Vec<Vec<bool>>,
    pub agent: Position,
    pub wumpus: Option<Position>,
    pub gold: Position,
    pub bats: Vec<Position>,
    pub pits: Vec<Position>,
    pub arrows: u32,
    pub status: GameStatus,
    pub mode: SearchMode,
    pub steps: u64,
    pub bat_resets: u32,
    pub log: Vec<String>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, agent: &AgentState, mode: SearchMode) -> Self {
        let board = &state.board;
        let cells = (0..board.height as i32)
            .map(|y| {
                (0..board.width as i32)
                    .map(|x| board.kind(Position::new(x, y)).unwrap_or(CellKind::Wall))
                    .collect()
            })
            .collect();

        Self {
            game_id: state.game_id,
            width: board.width,
            height: board.height,
            cells,
            explored: state.explored.rows().to_vec(),
            agent: state.agent_pos,
            wumpus: state.wumpus_pos,
            gold: state.gold_pos,
            bats: state.bat_positions.clone(),
            pits: state.pit_positions.clone(),
            arrows: agent.arrows,
            status: state.status,
            mode,
            steps: agent.steps,
            bat_resets: agent.bat_resets,
            log: state.action_log.clone(),
        }
    }

    pub fn to_json(&self) -> WumpusResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
