//! Integration test for manual play through the text front end.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wumpus::{
    render_board, CaveLayout, Game, GameStatus, InputHandler, InputOutcome, Position, TextDisplay,
    WumpusResult,
};

fn scripted_cave() -> WumpusResult<Game<StdRng>> {
    // . . . . .
    // . @ # P .
    // . . . . G
    let layout = CaveLayout::new(5, 3, Position::new(1, 1), Position::new(4, 2))
        .with_wall(Position::new(2, 1))
        .with_pit(Position::new(3, 1))
        .with_wumpus(Position::new(0, 0));
    Game::from_layout(layout, StdRng::seed_from_u64(12345))
}

#[test]
fn test_scripted_manual_game() -> WumpusResult<()> {
    let handler = InputHandler::new();
    let mut game = scripted_cave()?;

    for line in ["d", "s", "d", "d", "l"] {
        let input = handler.parse_line(line)?.expect("command");
        assert_eq!(handler.apply(input, &mut game), InputOutcome::Continue);
    }

    // The wall stopped the first move; the rest walked along the bottom row.
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.state().agent_pos, Position::new(4, 2));
    assert!(game.state().action_log.iter().any(|l| l.contains("wall")));
    assert!(game.state().action_log.iter().any(|l| l.contains("breeze")));
    Ok(())
}

#[test]
fn test_fog_lifts_as_the_agent_moves() -> WumpusResult<()> {
    let mut game = scripted_cave()?;
    assert_eq!(render_board(game.state(), false), "?????\n?@???\n?????\n");
    assert_eq!(render_board(game.state(), true), "W....\n.@#P.\n....G\n");

    game.manual_move_by(0, 1)?;
    assert_eq!(render_board(game.state(), false), "?????\n?.???\n?@???\n");
    Ok(())
}

#[test]
fn test_display_frames_follow_the_log() -> WumpusResult<()> {
    let mut game = scripted_cave()?;
    let mut display = TextDisplay::new(false);

    let first = display.render_game(game.state(), game.agent());
    assert!(first.contains("Game started"));

    game.manual_move_by(-1, 0)?;
    let second = display.render_game(game.state(), game.agent());
    assert!(second.contains("Moved to (1, 2)"));
    assert!(second.contains("You smell something terrible"));
    Ok(())
}
