//! # Input Module
//!
//! Command parsing for manual play. Lines typed at the prompt become
//! [`PlayerInput`]s, which [`InputHandler::apply`] carries out on a [`Game`].

use crate::game::{Direction, Game, GameStatus, SearchMode};
use crate::{WumpusError, WumpusResult};
use rand::Rng;

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move one cell in a direction
    Move(Direction),
    /// Fire an arrow from the current cell
    Shoot,
    /// Let the agent take one step
    Step,
    /// Let the agent play until the game ends
    Auto,
    /// Switch the agent's search strategy
    Mode(SearchMode),
    /// Start a new game
    NewGame,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

/// What the caller should do after an input was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Keep reading input
    Continue,
    /// The caller should print the help text
    ShowHelp,
    /// The caller should build a fresh game
    NewGame,
    /// Stop the session
    Quit,
}

/// Parses typed lines into player inputs.
pub struct InputHandler {
    /// Whether to accept Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
    /// Step cap for [`PlayerInput::Auto`]
    pub auto_step_limit: u64,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use wumpus::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// let input = input_handler.parse_line("w").unwrap();
    /// assert_eq!(input, Some(PlayerInput::Move(Direction::North)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
            auto_step_limit: 10_000,
        }
    }

    /// Parses one line of input.
    ///
    /// Blank lines yield `None`; unknown commands are an error.
    pub fn parse_line(&self, line: &str) -> WumpusResult<Option<PlayerInput>> {
        let command = line.trim().to_ascii_lowercase();
        if command.is_empty() {
            return Ok(None);
        }

        let input = match command.as_str() {
            "w" | "up" | "north" => PlayerInput::Move(Direction::North),
            "s" | "down" | "south" => PlayerInput::Move(Direction::South),
            "a" | "left" | "west" => PlayerInput::Move(Direction::West),
            "d" | "right" | "east" => PlayerInput::Move(Direction::East),
            "f" | "shoot" | "fire" => PlayerInput::Shoot,
            "n" | "step" | "next" => PlayerInput::Step,
            "auto" | "run" => PlayerInput::Auto,
            "dfs" => PlayerInput::Mode(SearchMode::Dfs),
            "astar" | "a*" => PlayerInput::Mode(SearchMode::Astar),
            "new" | "restart" => PlayerInput::NewGame,
            "?" | "help" => PlayerInput::Help,
            "q" | "quit" | "exit" => PlayerInput::Quit,
            other => match self.vi_key(other) {
                Some(direction) => PlayerInput::Move(direction),
                None => {
                    return Err(WumpusError::InvalidAction(format!(
                        "Unknown command '{}' (type help for a list)",
                        other
                    )))
                }
            },
        };
        Ok(Some(input))
    }

    fn vi_key(&self, command: &str) -> Option<Direction> {
        if !self.vi_keys_enabled {
            return None;
        }
        match command {
            "h" => Some(Direction::West),
            "j" => Some(Direction::South),
            "k" => Some(Direction::North),
            "l" => Some(Direction::East),
            _ => None,
        }
    }

    /// Carries out an input on a running game.
    ///
    /// Game actions are ignored once the game has ended; new game, help and
    /// quit are always honoured.
    pub fn apply<R: Rng>(&self, input: PlayerInput, game: &mut Game<R>) -> InputOutcome {
        match input {
            PlayerInput::Move(direction) => {
                game.manual_move(direction);
            }
            PlayerInput::Shoot => {
                game.manual_shoot();
            }
            PlayerInput::Step => {
                game.step();
            }
            PlayerInput::Auto => {
                if game.run(self.auto_step_limit) == GameStatus::Playing {
                    log::warn!(
                        "game {} still running after {} steps",
                        game.state().game_id,
                        self.auto_step_limit
                    );
                }
            }
            PlayerInput::Mode(mode) => game.set_mode(mode),
            PlayerInput::NewGame => return InputOutcome::NewGame,
            PlayerInput::Help => return InputOutcome::ShowHelp,
            PlayerInput::Quit => return InputOutcome::Quit,
        }
        InputOutcome::Continue
    }

    /// Help text listing every command.
    pub fn help_text(&self) -> String {
        let mut text = String::from(
            "Commands:\n\
             \x20 w/a/s/d, up/down/left/right   move one cell\n",
        );
        if self.vi_keys_enabled {
            text.push_str("  h/j/k/l                       move one cell (vi keys)\n");
        }
        text.push_str(
            "  f, shoot                      fire an arrow\n\
             \x20 n, step                       let the agent take one step\n\
             \x20 auto                          let the agent finish the game\n\
             \x20 dfs, astar                    switch the agent's strategy\n\
             \x20 new                           start a new cave\n\
             \x20 help                          show this list\n\
             \x20 q, quit                       leave\n",
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crate::generation::CaveLayout;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corridor() -> Game<StdRng> {
        let layout = CaveLayout::new(5, 1, Position::new(0, 0), Position::new(4, 0));
        Game::from_layout(layout, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_parse_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line("w").unwrap(), Some(PlayerInput::Move(Direction::North)));
        assert_eq!(handler.parse_line(" D \n").unwrap(), Some(PlayerInput::Move(Direction::East)));
        assert_eq!(handler.parse_line("down").unwrap(), Some(PlayerInput::Move(Direction::South)));
        assert_eq!(handler.parse_line("h").unwrap(), Some(PlayerInput::Move(Direction::West)));
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let handler = InputHandler {
            vi_keys_enabled: false,
            ..InputHandler::new()
        };
        assert!(handler.parse_line("j").is_err());
        assert!(!handler.help_text().contains("vi keys"));
    }

    #[test]
    fn test_parse_commands() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line("").unwrap(), None);
        assert_eq!(handler.parse_line("f").unwrap(), Some(PlayerInput::Shoot));
        assert_eq!(handler.parse_line("n").unwrap(), Some(PlayerInput::Step));
        assert_eq!(handler.parse_line("auto").unwrap(), Some(PlayerInput::Auto));
        assert_eq!(handler.parse_line("A*").unwrap(), Some(PlayerInput::Mode(SearchMode::Astar)));
        assert_eq!(handler.parse_line("new").unwrap(), Some(PlayerInput::NewGame));
        assert_eq!(handler.parse_line("q").unwrap(), Some(PlayerInput::Quit));
        assert!(matches!(
            handler.parse_line("xyzzy"),
            Err(WumpusError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_apply_drives_the_game() {
        let handler = InputHandler::new();
        let mut game = corridor();

        assert_eq!(handler.apply(PlayerInput::Move(Direction::East), &mut game), InputOutcome::Continue);
        assert_eq!(game.state().agent_pos, Position::new(1, 0));

        assert_eq!(handler.apply(PlayerInput::Step, &mut game), InputOutcome::Continue);
        assert_eq!(game.agent().steps, 1);

        handler.apply(PlayerInput::Auto, &mut game);
        assert_eq!(game.status(), GameStatus::Won);

        assert_eq!(handler.apply(PlayerInput::Help, &mut game), InputOutcome::ShowHelp);
        assert_eq!(handler.apply(PlayerInput::NewGame, &mut game), InputOutcome::NewGame);
        assert_eq!(handler.apply(PlayerInput::Quit, &mut game), InputOutcome::Quit);
    }

    #[test]
    fn test_apply_switches_mode() {
        let handler = InputHandler::new();
        let mut game = corridor();
        handler.apply(PlayerInput::Mode(SearchMode::Astar), &mut game);
        assert_eq!(game.mode(), SearchMode::Astar);
    }
}
