//! # Manual Actions
//!
//! Moves and shots issued by a human player. They bypass the search logic
//! but keep the agent's stack, path and visited set in step with the board.

use crate::game::{report_senses, resolve_arrival, shoot, AgentState, Direction, GameState, Position};
use crate::{WumpusError, WumpusResult};
use log::debug;
use rand::Rng;

/// Moves the agent one cell. Walls and the cave edge block the move.
///
/// Returns true when the agent actually moved.
pub fn manual_move<R: Rng + ?Sized>(
    state: &mut GameState,
    agent: &mut AgentState,
    direction: Direction,
    rng: &mut R,
) -> bool {
    if !state.is_playing() {
        return false;
    }

    let target = state.agent_pos.step(direction);
    if !state.board.contains(target) {
        state.log("The cave ends there");
        return false;
    }
    if state.board.is_wall(target) {
        state.log(format!("A wall blocks the way at {}", target));
        return false;
    }

    debug!("manual move {:?} to {}", direction, target);
    state.log(format!("Moved to {}", target));
    state.relocate_agent(target);
    agent.visited.set(target);
    agent.stack.push(target);
    agent.path.push(target);
    if resolve_arrival(state, agent, rng) {
        let pos = state.agent_pos;
        report_senses(state, pos);
    }
    true
}

/// Moves by a raw delta, rejecting anything but a single orthogonal step.
pub fn manual_move_by<R: Rng + ?Sized>(
    state: &mut GameState,
    agent: &mut AgentState,
    dx: i32,
    dy: i32,
    rng: &mut R,
) -> WumpusResult<bool> {
    let direction = Direction::from_delta(Position::new(dx, dy)).ok_or_else(|| {
        WumpusError::InvalidAction(format!("({}, {}) is not a single orthogonal step", dx, dy))
    })?;
    Ok(manual_move(state, agent, direction, rng))
}

/// Fires an arrow from the agent's cell.
///
/// Returns true when the Wumpus dies.
pub fn manual_shoot<R: Rng + ?Sized>(state: &mut GameState, agent: &mut AgentState, rng: &mut R) -> bool {
    if !state.is_playing() {
        return false;
    }
    shoot(state, agent, rng)
}
