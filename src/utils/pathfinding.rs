//! # Pathfinding Algorithms
//!
//! Shortest paths over the cave for the A* pursuit strategy.

use crate::game::{Board, Position};
use ::pathfinding::prelude::astar;

/// Finds a shortest orthogonal path from `start` to `goal`.
///
/// Only empty, gold and bat cells are passable; walls, pits and the Wumpus
/// block. Steps cost 1 and the heuristic is the Manhattan distance. The
/// returned path includes both endpoints; it's empty when no path exists or
/// either endpoint is off the board.
///
/// # Examples
///
/// ```
/// use wumpus::{astar_path, Board, Position};
///
/// let board = Board::new(5, 5);
/// let path = astar_path(&board, Position::new(0, 0), Position::new(2, 2));
/// assert_eq!(path.len(), 5);
/// ```
pub fn astar_path(board: &Board, start: Position, goal: Position) -> Vec<Position> {
    if !board.contains(start) || !board.contains(goal) {
        return Vec::new();
    }

    let successors = |pos: &Position| -> Vec<(Position, u32)> {
        board
            .neighbors(*pos)
            .into_iter()
            .filter(|next| board.kind(*next).map_or(false, |kind| kind.is_passable()))
            .map(|next| (next, 1))
            .collect()
    };

    astar(
        &start,
        successors,
        |pos| pos.manhattan_distance(goal),
        |pos| *pos == goal,
    )
    .map(|(path, _cost)| path)
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CellKind;

    #[test]
    fn test_straight_corridor() {
        let board = Board::new(10, 1);
        let path = astar_path(&board, Position::new(1, 0), Position::new(8, 0));
        assert_eq!(path.len(), 8);
        assert_eq!(path[0], Position::new(1, 0));
        assert_eq!(path[path.len() - 1], Position::new(8, 0));
    }

    #[test]
    fn test_path_detours_around_obstacles() {
        let mut board = Board::new(5, 5);
        board.set_kind(Position::new(2, 0), CellKind::Wall).unwrap();
        board.set_kind(Position::new(2, 1), CellKind::Pit).unwrap();
        board.set_kind(Position::new(2, 2), CellKind::Wumpus).unwrap();
        board.set_kind(Position::new(2, 3), CellKind::Bat).unwrap();

        let path = astar_path(&board, Position::new(0, 0), Position::new(4, 0));
        // Down to row 3, through the bat, and back up.
        assert_eq!(path.len(), 11);
        assert!(path.contains(&Position::new(2, 3)));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_no_path() {
        let mut board = Board::new(3, 3);
        board.set_kind(Position::new(1, 0), CellKind::Wall).unwrap();
        board.set_kind(Position::new(0, 1), CellKind::Pit).unwrap();
        assert!(astar_path(&board, Position::new(0, 0), Position::new(2, 2)).is_empty());
    }

    #[test]
    fn test_start_is_goal() {
        let board = Board::new(3, 3);
        let path = astar_path(&board, Position::new(1, 1), Position::new(1, 1));
        assert_eq!(path, vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_off_board_endpoints() {
        let board = Board::new(3, 3);
        assert!(astar_path(&board, Position::new(-1, 0), Position::new(1, 1)).is_empty());
        assert!(astar_path(&board, Position::new(0, 0), Position::new(3, 3)).is_empty());
    }
}
