use std::fmt;

use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Anchor of a shape on the board: the top-left of its bounding box.
///
/// Coordinates are signed because a candidate position may lie outside the
/// board; [`Board::is_valid_placement`] decides whether it is usable.
///
/// - X increases rightward (columns)
/// - Y increases downward (rows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.offset(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.offset(1, 0)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.offset(0, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardDimensionError {
    #[display("board width must be between 1 and {}, got {width}", Board::MAX_WIDTH)]
    InvalidWidth { width: usize },
    #[display("board height must be at least 1")]
    ZeroHeight,
    #[display("board rows must all be {expected} cells wide, row {row} has {actual}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid cell {cell:?} at row {row}")]
    InvalidCell { row: usize, cell: char },
}

/// Where a shape cell lands relative to the board.
enum CellLocation {
    /// Left of, right of, or below the board.
    Outside,
    /// Above the top row, in a valid column.
    Above,
    Inside(usize, usize),
}

/// Single row of the board.
///
/// Stored as a 64-bit mask where bit `x` marks column `x` as occupied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardRow {
    bits: u64,
}

impl BoardRow {
    pub const EMPTY: Self = Self { bits: 0 };

    #[inline]
    #[must_use]
    pub const fn is_cell_occupied(self, x: usize) -> bool {
        (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    #[inline]
    fn is_filled(self, full_mask: u64) -> bool {
        self.bits & full_mask == full_mask
    }

    /// Iterates over the first `width` cells as `0` (empty) or `1` (filled).
    #[inline]
    pub fn cells(self, width: usize) -> impl Iterator<Item = u8> {
        (0..width).map(move |x| u8::from(self.is_cell_occupied(x)))
    }
}

/// The settled grid: `height` rows of `width` occupancy cells.
///
/// Dimensions are fixed at construction. The grid changes only through
/// [`Board::merge`] (locking a piece) and [`Board::clear_full_rows`]; the
/// falling piece is never stored here.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Position, ShapeKind};
///
/// let mut board = Board::new(10, 20).unwrap();
/// let o = ShapeKind::O.spawn_shape();
///
/// assert!(board.is_valid_placement(&o, Position::new(4, 18)));
/// assert!(!board.is_valid_placement(&o, Position::new(4, 19)));
///
/// board.merge(&o, Position::new(4, 18));
/// assert!(board.is_occupied(5, 19));
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    width: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Widest supported board (one bit per column in a `u64` row).
    pub const MAX_WIDTH: usize = u64::BITS as usize;

    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardDimensionError> {
        if width == 0 || width > Self::MAX_WIDTH {
            return Err(BoardDimensionError::InvalidWidth { width });
        }
        if height == 0 {
            return Err(BoardDimensionError::ZeroHeight);
        }
        Ok(Self {
            width,
            rows: vec![BoardRow::EMPTY; height],
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    fn full_mask(&self) -> u64 {
        u64::MAX >> (Self::MAX_WIDTH - self.width)
    }

    /// Checks if the cell at column `x`, row `y` is occupied.
    ///
    /// Cells outside the board are reported as empty.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && self.rows.get(y).is_some_and(|row| row.is_cell_occupied(x))
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    /// Returns the grid as rows of `0`/`1` cells.
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.cells(self.width).collect())
            .collect()
    }

    /// Number of occupied cells on the whole board.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.bits.count_ones() as usize)
            .sum()
    }

    /// Empties every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        self.rows.fill(BoardRow::EMPTY);
    }

    fn locate(&self, position: Position, dx: u8, dy: u8) -> CellLocation {
        let x = i64::from(position.x()) + i64::from(dx);
        let y = i64::from(position.y()) + i64::from(dy);
        let Some(x) = usize::try_from(x).ok().filter(|x| *x < self.width) else {
            return CellLocation::Outside;
        };
        let Ok(y) = usize::try_from(y) else {
            return CellLocation::Above;
        };
        if y >= self.height() {
            return CellLocation::Outside;
        }
        CellLocation::Inside(x, y)
    }

    /// Checks if `shape` may occupy the board with its bounding box at `position`.
    ///
    /// Every filled cell must lie within the columns `[0, width)` and above the
    /// floor, and must not overlap an occupied cell. Cells above the top row
    /// are permitted, so a piece may sit partially off the top of the board.
    #[must_use]
    pub fn is_valid_placement(&self, shape: &Shape, position: Position) -> bool {
        shape
            .filled_cells()
            .into_iter()
            .all(|(dx, dy)| match self.locate(position, dx, dy) {
                CellLocation::Outside => false,
                CellLocation::Above => true,
                CellLocation::Inside(x, y) => !self.rows[y].is_cell_occupied(x),
            })
    }

    /// Locks `shape` into the board by occupying its in-bounds cells.
    ///
    /// Cells outside the board are dropped.
    pub fn merge(&mut self, shape: &Shape, position: Position) {
        for (dx, dy) in shape.filled_cells() {
            if let CellLocation::Inside(x, y) = self.locate(position, dx, dy) {
                self.rows[y].occupy_cell(x);
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// All full rows are found in one pass against the same grid. Remaining
    /// rows shift down by the number of rows cleared below them and the same
    /// number of empty rows is inserted at the top, so the dimensions never
    /// change.
    pub fn clear_full_rows(&mut self) -> usize {
        let full_mask = self.full_mask();
        let mut count = 0;

        for y in (0..self.height()).rev() {
            if self.rows[y].is_filled(full_mask) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Creates a board from ASCII art, for tests and puzzle setups.
    ///
    /// `#` is an occupied cell and `.` an empty one; other characters
    /// (indentation) are ignored, as are blank lines. Rows are listed top to
    /// bottom and the width is taken from the first row.
    ///
    /// # Panics
    ///
    /// Panics if the art is not a valid board.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows = art
            .lines()
            .map(|line| line.chars().filter(|c| *c == '#' || *c == '.').collect())
            .filter(|row: &String| !row.is_empty())
            .collect::<Vec<_>>();
        match Self::try_from(rows) {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{} [", self.width, self.height())?;
        for row in self.to_lines() {
            writeln!(f, "  {row}")?;
        }
        write!(f, "]")
    }
}

impl Board {
    fn to_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.cells(self.width)
                    .map(|cell| if cell == 0 { '.' } else { '#' })
                    .collect()
            })
            .collect()
    }
}

// Serialized as one string per row, e.g. `["..........", "##.#######"]`.
impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board.to_lines()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardDimensionError;

    fn try_from(lines: Vec<String>) -> Result<Self, Self::Error> {
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut board = Board::new(width, lines.len())?;
        for (y, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(BoardDimensionError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, cell) in line.chars().enumerate() {
                match cell {
                    '#' => board.rows[y].occupy_cell(x),
                    '.' => {}
                    cell => return Err(BoardDimensionError::InvalidCell { row: y, cell }),
                }
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use crate::ShapeKind;

    use super::*;

    const EMPTY_10X4: &str = r"
        ..........
        ..........
        ..........
        ..........
    ";

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20).unwrap();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.occupied_count(), 0);
        let grid = board.to_grid();
        assert_eq!(grid.len(), 20);
        assert!(grid.iter().all(|row| row.len() == 10 && row.iter().all(|c| *c == 0)));
    }

    #[test]
    fn test_new_board_rejects_bad_dimensions() {
        assert_eq!(
            Board::new(0, 20),
            Err(BoardDimensionError::InvalidWidth { width: 0 })
        );
        assert_eq!(
            Board::new(65, 20),
            Err(BoardDimensionError::InvalidWidth { width: 65 })
        );
        assert_eq!(Board::new(10, 0), Err(BoardDimensionError::ZeroHeight));
        assert!(Board::new(64, 1).is_ok());
    }

    #[test]
    fn test_valid_placement_walls_and_floor() {
        let board = Board::from_ascii(EMPTY_10X4);
        let i = ShapeKind::I.spawn_shape();

        // 4 wide: touching either wall is fine
        assert!(board.is_valid_placement(&i, Position::new(0, 0)));
        assert!(board.is_valid_placement(&i, Position::new(6, 0)));
        assert!(!board.is_valid_placement(&i, Position::new(-1, 0)));
        assert!(!board.is_valid_placement(&i, Position::new(7, 0)));

        // floor
        assert!(board.is_valid_placement(&i, Position::new(3, 3)));
        assert!(!board.is_valid_placement(&i, Position::new(3, 4)));
    }

    #[test]
    fn test_valid_placement_allows_rows_above_top() {
        let board = Board::from_ascii(EMPTY_10X4);
        let vertical_i = ShapeKind::I.spawn_shape().rotated_clockwise();
        assert!(board.is_valid_placement(&vertical_i, Position::new(0, -3)));
        assert!(board.is_valid_placement(&vertical_i, Position::new(0, -10)));
        // still rejected when off the side, even above the board
        assert!(!board.is_valid_placement(&vertical_i, Position::new(10, -3)));
    }

    #[test]
    fn test_valid_placement_collision() {
        let board = Board::from_ascii(
            r"
            ..........
            ..........
            .....#....
            ..........
            ",
        );
        let t = ShapeKind::T.spawn_shape();
        // T occupies (x+1, y) and (x..x+3, y+1)
        assert!(!board.is_valid_placement(&t, Position::new(4, 1)));
        assert!(!board.is_valid_placement(&t, Position::new(4, 2)));
        assert!(board.is_valid_placement(&t, Position::new(4, 0)));
        // the empty corners of the bounding box may overlap occupied cells
        assert!(board.is_valid_placement(&t, Position::new(5, 2)));
    }

    #[test]
    fn test_merge_occupies_filled_cells_only() {
        let mut board = Board::from_ascii(EMPTY_10X4);
        board.merge(&ShapeKind::S.spawn_shape(), Position::new(2, 2));
        assert_eq!(
            board,
            Board::from_ascii(
                r"
                ..........
                ..........
                ...##.....
                ..##......
                "
            )
        );
    }

    #[test]
    fn test_merge_drops_cells_above_board() {
        let mut board = Board::from_ascii(EMPTY_10X4);
        let vertical_i = ShapeKind::I.spawn_shape().rotated_clockwise();
        board.merge(&vertical_i, Position::new(9, -2));
        assert_eq!(board.occupied_count(), 2);
        assert!(board.is_occupied(9, 0));
        assert!(board.is_occupied(9, 1));
    }

    #[test]
    fn test_clear_full_rows_single_bottom() {
        let mut board = Board::from_ascii(
            r"
            ..........
            ..#.......
            .###......
            ##########
            ",
        );
        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(
            board,
            Board::from_ascii(
                r"
                ..........
                ..........
                ..#.......
                .###......
                "
            )
        );
    }

    #[test]
    fn test_clear_full_rows_non_adjacent() {
        let mut board = Board::from_ascii(
            r"
            #.........
            ##########
            .#........
            ##########
            ..#.......
            ",
        );
        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                r"
                ..........
                ..........
                #.........
                .#........
                ..#.......
                "
            )
        );
    }

    #[test]
    fn test_clear_full_rows_none() {
        let art = r"
            #########.
            .#########
        ";
        let mut board = Board::from_ascii(art);
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, Board::from_ascii(art));
    }

    #[test]
    fn test_clear_full_rows_all() {
        let mut board = Board::from_ascii(
            r"
            ##########
            ##########
            ##########
            ",
        );
        assert_eq!(board.clear_full_rows(), 3);
        assert_eq!(board.height(), 3);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_clear_full_rows_full_width_board() {
        let mut board = Board::new(Board::MAX_WIDTH, 2).unwrap();
        for x in 0..Board::MAX_WIDTH {
            board.rows[1].occupy_cell(x);
        }
        board.rows[0].occupy_cell(3);
        assert_eq!(board.clear_full_rows(), 1);
        assert!(board.is_occupied(3, 1));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            r"
            ..#.
            ####
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#####"["..#.","####"]"#####);

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);

        assert!(serde_json::from_str::<Board>(r####"["..#.","###"]"####).is_err());
        assert!(serde_json::from_str::<Board>(r#"["..x."]"#).is_err());
        assert!(serde_json::from_str::<Board>("[]").is_err());
    }
}
