use serde::{Deserialize, Serialize};

use crate::core::{Board, Position, Shape};

/// The falling piece: a shape and the board position of its bounding box.
///
/// Kept apart from the [`Board`]; it is only merged into the board when it
/// locks. Movement and rotation return new values, leaving `self` untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, Position, ShapeKind};
///
/// let board = Board::new(10, 20).unwrap();
/// let piece = ActivePiece::spawn(ShapeKind::T.spawn_shape(), &board);
/// assert_eq!(piece.position(), Position::new(4, 0));
///
/// let moved = piece.left();
/// assert_eq!(moved.position(), Position::new(3, 0));
/// assert_eq!(piece.position(), Position::new(4, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ActivePiece {
    shape: Shape,
    position: Position,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(shape: Shape, position: Position) -> Self {
        Self { shape, position }
    }

    /// Places `shape` at the top-center spawn position of `board`.
    ///
    /// The column is `width / 2 - shape_width / 2` (integer division), the row
    /// is 0. The placement is not checked.
    #[must_use]
    pub fn spawn(shape: Shape, board: &Board) -> Self {
        let x = board.width() / 2 - shape.width() / 2;
        let x = i32::try_from(x).unwrap_or(i32::MAX);
        Self::new(shape, Position::new(x, 0))
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn left(&self) -> Self {
        Self::new(self.shape, self.position.left())
    }

    #[must_use]
    pub fn right(&self) -> Self {
        Self::new(self.shape, self.position.right())
    }

    #[must_use]
    pub fn down(&self) -> Self {
        Self::new(self.shape, self.position.down())
    }

    /// Rotates the shape clockwise about the same anchor position.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self::new(self.shape.rotated_clockwise(), self.position)
    }

    /// Checks if this piece fits on `board`.
    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid_placement(&self.shape, self.position)
    }

    /// Board coordinates of the filled cells that lie on a board of the given size.
    pub fn occupied_positions(
        &self,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape.filled_cells().into_iter().filter_map(move |(dx, dy)| {
            let x = usize::try_from(self.position.x() + i32::from(dx)).ok()?;
            let y = usize::try_from(self.position.y() + i32::from(dy)).ok()?;
            (x < width && y < height).then_some((x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::ShapeKind;

    use super::*;

    #[test]
    fn test_spawn_column_for_each_kind() {
        let board = Board::new(10, 20).unwrap();
        let expected = [
            (ShapeKind::I, 3),
            (ShapeKind::O, 4),
            (ShapeKind::T, 4),
            (ShapeKind::S, 4),
            (ShapeKind::Z, 4),
            (ShapeKind::J, 4),
            (ShapeKind::L, 4),
        ];
        for (kind, x) in expected {
            let piece = ActivePiece::spawn(kind.spawn_shape(), &board);
            assert_eq!(piece.position(), Position::new(x, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_on_wide_board() {
        let board = Board::new(12, 20).unwrap();
        let piece = ActivePiece::spawn(ShapeKind::O.spawn_shape(), &board);
        assert_eq!(piece.position(), Position::new(5, 0));
    }

    #[test]
    fn test_rotation_keeps_anchor() {
        let piece = ActivePiece::new(ShapeKind::I.spawn_shape(), Position::new(3, 5));
        let rotated = piece.rotated_clockwise();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(rotated.shape().height(), 4);
    }

    #[test]
    fn test_occupied_positions_clips_to_board() {
        let vertical_i = ShapeKind::I.spawn_shape().rotated_clockwise();
        let piece = ActivePiece::new(vertical_i, Position::new(2, -2));
        let cells = piece.occupied_positions(10, 20).collect::<Vec<_>>();
        assert_eq!(cells, vec![(2, 0), (2, 1)]);
    }
}
