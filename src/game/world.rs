//! # Cave Representation
//!
//! The fixed-size board of cells and the boolean overlays laid over it.

use crate::game::Position;
use crate::{config, WumpusError, WumpusResult};
use serde::{Deserialize, Serialize};

/// The mutually exclusive contents of a cave cell.
///
/// The agent is not a cell kind; its location is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Wall,
    Wumpus,
    Bat,
    Pit,
    Gold,
}

impl CellKind {
    /// Pits, bats and the Wumpus.
    pub fn is_hazard(self) -> bool {
        matches!(self, CellKind::Wumpus | CellKind::Bat | CellKind::Pit)
    }

    /// Cells that end the game when entered.
    pub fn is_lethal(self) -> bool {
        matches!(self, CellKind::Wumpus | CellKind::Pit)
    }

    /// Cells the A* pursuit is allowed to route through.
    pub fn is_passable(self) -> bool {
        matches!(self, CellKind::Empty | CellKind::Gold | CellKind::Bat)
    }

    /// Single-character map symbol.
    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Wumpus => 'W',
            CellKind::Bat => 'B',
            CellKind::Pit => 'P',
            CellKind::Gold => 'G',
        }
    }
}

/// A single cave cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Set the first time a visit or a reveal uncovers the cell
    pub explored: bool,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            explored: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(CellKind::Empty)
    }
}

/// Row-major matrix of cells, constant size for the lifetime of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates a board of empty, unexplored cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Cell::empty(); width]; height],
        }
    }

    /// Creates the standard 20x20 board.
    pub fn standard() -> Self {
        Self::new(config::BOARD_SIZE, config::BOARD_SIZE)
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether the position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if !self.contains(pos) {
            return None;
        }
        Some(&self.tiles[pos.y as usize][pos.x as usize])
    }

    fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.contains(pos) {
            return None;
        }
        Some(&mut self.tiles[pos.y as usize][pos.x as usize])
    }

    /// Kind of the cell at `pos`, or None when off the board.
    pub fn kind(&self, pos: Position) -> Option<CellKind> {
        self.get(pos).map(|cell| cell.kind)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.kind(pos) == Some(CellKind::Wall)
    }

    /// Changes the kind of a cell.
    ///
    /// Walls are immovable: once a cell is a wall it can't be rewritten.
    pub fn set_kind(&mut self, pos: Position, kind: CellKind) -> WumpusResult<()> {
        let cell = self.get_mut(pos).ok_or_else(|| {
            WumpusError::InvalidAction(format!("Position {} is outside the cave", pos))
        })?;
        if cell.kind == CellKind::Wall && kind != CellKind::Wall {
            return Err(WumpusError::InvalidAction(format!(
                "Wall at {} cannot be replaced",
                pos
            )));
        }
        cell.kind = kind;
        Ok(())
    }

    /// Marks a cell explored. Returns false when the position is off the board.
    pub fn mark_explored(&mut self, pos: Position) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                cell.explored = true;
                true
            }
            None => false,
        }
    }

    /// In-bounds orthogonal neighbours in north, east, south, west order.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// Every position on the board, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Position::new(x as i32, y as i32)))
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.kind == kind)
            .count()
    }

    /// Positions of every cell of the given kind.
    pub fn positions_of(&self, kind: CellKind) -> Vec<Position> {
        self.positions()
            .filter(|p| self.kind(*p) == Some(kind))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// A boolean matrix laid over the board (visited cells, fog of war, known hazards).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub width: usize,
    pub height: usize,
    cells: Vec<Vec<bool>>,
}

impl Overlay {
    /// Creates an all-false overlay.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![false; width]; height],
        }
    }

    /// Creates an all-false overlay matching the board's size.
    pub fn for_board(board: &Board) -> Self {
        Self::new(board.width, board.height)
    }

    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Off-board positions read as false.
    pub fn get(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[pos.y as usize][pos.x as usize]
    }

    /// Sets a flag. Returns true when the flag was newly set.
    pub fn set(&mut self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let cell = &mut self.cells[pos.y as usize][pos.x as usize];
        let newly = !*cell;
        *cell = true;
        newly
    }

    /// Number of set flags.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|flag| **flag).count()
    }

    /// Whether every flag set in `other` is also set here.
    pub fn is_superset_of(&self, other: &Overlay) -> bool {
        self.cells
            .iter()
            .flatten()
            .zip(other.cells.iter().flatten())
            .all(|(mine, theirs)| *mine || !*theirs)
    }

    /// Rows of flags, for rendering.
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board.width, 20);
        assert_eq!(board.height, 20);
        assert_eq!(board.area(), 400);
        assert_eq!(board.count(CellKind::Empty), 400);
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(5, 4);
        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(4, 3)));
        assert!(!board.contains(Position::new(5, 0)));
        assert!(!board.contains(Position::new(0, 4)));
        assert!(!board.contains(Position::new(-1, 2)));
        assert!(board.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_corner_and_edge_neighbors() {
        let board = Board::standard();
        assert_eq!(board.neighbors(Position::new(0, 0)).len(), 2);
        assert_eq!(board.neighbors(Position::new(10, 0)).len(), 3);
        assert_eq!(board.neighbors(Position::new(10, 10)).len(), 4);
    }

    #[test]
    fn test_walls_are_immovable() {
        let mut board = Board::new(3, 3);
        let pos = Position::new(1, 1);
        board.set_kind(pos, CellKind::Wall).unwrap();
        assert!(board.is_wall(pos));
        assert!(board.set_kind(pos, CellKind::Empty).is_err());
        assert!(board.set_kind(Position::new(3, 3), CellKind::Pit).is_err());
    }

    #[test]
    fn test_cell_kind_classes() {
        assert!(CellKind::Bat.is_hazard());
        assert!(!CellKind::Bat.is_lethal());
        assert!(CellKind::Bat.is_passable());
        assert!(CellKind::Pit.is_lethal());
        assert!(!CellKind::Wumpus.is_passable());
        assert!(!CellKind::Wall.is_passable());
        assert!(CellKind::Gold.is_passable());
    }

    #[test]
    fn test_overlay_set_and_superset() {
        let mut small = Overlay::new(4, 4);
        assert!(small.set(Position::new(1, 1)));
        assert!(!small.set(Position::new(1, 1)));
        assert!(!small.set(Position::new(9, 9)));
        assert_eq!(small.count(), 1);

        let mut big = small.clone();
        big.set(Position::new(2, 3));
        assert!(big.is_superset_of(&small));
        assert!(!small.is_superset_of(&big));
        assert!(!big.get(Position::new(-1, 0)));
    }
}
