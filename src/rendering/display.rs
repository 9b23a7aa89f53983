//! # Display Management
//!
//! Plain-text rendering of the cave for terminals and logs.

use crate::game::{AgentState, CellKind, GameState, GameStatus, Position};

/// Character drawn for the agent.
pub const AGENT_SYMBOL: char = '@';
/// Character drawn for cells still under fog of war.
pub const FOG_SYMBOL: char = '?';

/// Draws the board one row per line.
///
/// With `reveal_all` false, only cells the agent has explored show their
/// contents. The agent is always drawn.
///
/// # Examples
///
/// ```
/// use wumpus::{render_board, CaveLayout, GameState, Position};
///
/// let layout = CaveLayout::new(3, 1, Position::new(0, 0), Position::new(2, 0));
/// let state = GameState::from_layout(layout).unwrap();
/// assert_eq!(render_board(&state, true), "@.G\n");
/// assert_eq!(render_board(&state, false), "@??\n");
/// ```
pub fn render_board(state: &GameState, reveal_all: bool) -> String {
    let board = &state.board;
    let mut out = String::with_capacity((board.width + 1) * board.height);
    for y in 0..board.height as i32 {
        for x in 0..board.width as i32 {
            let pos = Position::new(x, y);
            let symbol = if pos == state.agent_pos {
                AGENT_SYMBOL
            } else if reveal_all || state.explored.get(pos) {
                board.kind(pos).map_or(FOG_SYMBOL, CellKind::symbol)
            } else {
                FOG_SYMBOL
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// Text display for interactive play.
///
/// Keeps a short history of log lines so each frame shows what just happened.
pub struct TextDisplay {
    /// Draw the whole cave instead of the explored part
    pub reveal_all: bool,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Messages shown under the map
    pub visible_messages: usize,
    /// Log lines already pulled from the game
    seen: usize,
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TextDisplay {
    pub fn new(reveal_all: bool) -> Self {
        Self {
            reveal_all,
            messages: Vec::new(),
            max_messages: 100,
            visible_messages: 6,
            seen: 0,
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Pulls log lines the display hasn't seen yet. Returns how many.
    pub fn sync_log(&mut self, state: &GameState) -> usize {
        // A shorter log means a new game started.
        if state.action_log.len() < self.seen {
            self.seen = 0;
        }
        let fresh: Vec<String> = state.action_log[self.seen..].to_vec();
        self.seen = state.action_log.len();
        let count = fresh.len();
        for line in fresh {
            self.add_message(line);
        }
        count
    }

    /// Forgets everything; call when a new game starts.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.seen = 0;
    }

    /// Renders the map, the status panel and the latest messages.
    pub fn render_game(&mut self, state: &GameState, agent: &AgentState) -> String {
        self.sync_log(state);

        let mut out = render_board(state, self.reveal_all);
        out.push('\n');
        out.push_str(&status_line(state, agent));
        out.push('\n');

        let start = self.messages.len().saturating_sub(self.visible_messages);
        for message in &self.messages[start..] {
            out.push_str("  ");
            out.push_str(message);
            out.push('\n');
        }
        out
    }
}

fn status_line(state: &GameState, agent: &AgentState) -> String {
    let status = match state.status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "WON",
        GameStatus::Lost => "LOST",
    };
    format!(
        "Agent {} | arrows {} | explored {} | steps {} | bat rides {} | {}",
        state.agent_pos,
        agent.arrows,
        state.explored_count(),
        agent.steps,
        agent.bat_resets,
        status
    )
}
