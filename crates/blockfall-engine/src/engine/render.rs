use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Board, ShapeKind};

use super::{ActivePiece, GameStatus, PieceSeed};

/// One cell of the composed board shown to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    /// A cell locked into the board.
    Locked,
    /// A cell of the falling piece.
    Active(ShapeKind),
}

impl Cell {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Locked => '#',
            Cell::Active(kind) => kind.as_char(),
        }
    }
}

/// Board and falling piece composed into a single grid.
///
/// The engine never writes the falling piece into its [`Board`]; this grid is
/// built on demand for hosts that draw cell by cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderGrid {
    width: usize,
    cells: Vec<Cell>,
}

impl RenderGrid {
    pub(crate) fn new(board: &Board, active_piece: Option<&ActivePiece>) -> Self {
        let (width, height) = (board.width(), board.height());
        let mut cells = board
            .rows()
            .flat_map(|row| row.cells(width))
            .map(|cell| if cell == 0 { Cell::Empty } else { Cell::Locked })
            .collect::<Vec<_>>();
        if let Some(piece) = active_piece {
            let kind = piece.shape().kind();
            for (x, y) in piece.occupied_positions(width, height) {
                cells[y * width + x] = Cell::Active(kind);
            }
        }
        Self { width, cells }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Returns the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width)
    }
}

impl fmt::Display for RenderGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

/// Everything a host can query from an [`Engine`](crate::Engine), as one
/// serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineSnapshot {
    pub status: GameStatus,
    pub seed: PieceSeed,
    pub board: Board,
    pub active_piece: Option<ActivePiece>,
    pub score: u64,
    pub level: u64,
    pub cleared_lines: usize,
    pub completed_pieces: usize,
    pub soft_drop: bool,
    pub tick_interval: u64,
}

#[cfg(test)]
mod tests {
    use crate::core::Position;

    use super::*;

    #[test]
    fn test_grid_overlays_active_piece() {
        let board = Board::from_ascii(
            "
            ....
            ....
            #..#
            ",
        );
        let piece = ActivePiece::new(ShapeKind::O.spawn_shape(), Position::new(1, 1));
        let grid = RenderGrid::new(&board, Some(&piece));

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.to_string(), "....\n.OO.\n#OO#");
        assert_eq!(grid.get(1, 2), Some(Cell::Active(ShapeKind::O)));
        assert_eq!(grid.get(0, 2), Some(Cell::Locked));
        assert_eq!(grid.get(4, 0), None);
    }

    #[test]
    fn test_grid_clips_piece_above_board() {
        let board = Board::new(4, 2).unwrap();
        let vertical_i = ShapeKind::I.spawn_shape().rotated_clockwise();
        let piece = ActivePiece::new(vertical_i, Position::new(0, -3));
        let grid = RenderGrid::new(&board, Some(&piece));
        assert_eq!(grid.to_string(), "I...\n....");
    }

    #[test]
    fn test_grid_without_piece_matches_board() {
        let board = Board::from_ascii("#.\n.#");
        let grid = RenderGrid::new(&board, None);
        let rows = grid.rows().map(<[Cell]>::to_vec).collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                vec![Cell::Locked, Cell::Empty],
                vec![Cell::Empty, Cell::Locked]
            ]
        );
    }
}
