use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest bounding-box extent (in either direction) a shape may have.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Filled cells of a shape, as `(dx, dy)` offsets from the bounding box's top-left.
pub type ShapeCells = ArrayVec<(u8, u8), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// Enum representing the canonical tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform choice among the seven kinds; one draw per piece.
impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Returns the shape in its spawn orientation.
    #[must_use]
    pub const fn spawn_shape(self) -> Shape {
        SPAWN_SHAPES[self as usize]
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape has no rows")]
    Empty,
    #[display("shape is {width}x{height}, larger than the 4x4 maximum")]
    TooLarge { width: usize, height: usize },
    #[display("shape row {row} has {len} cells, expected {width}")]
    Ragged { row: usize, len: usize, width: usize },
    #[display("invalid cell {cell:?} at row {row}")]
    InvalidCell { row: usize, cell: char },
}

/// A rectangular 0/1 cell matrix: one tetromino in one rotation state.
///
/// Shapes are values. [`Shape::rotated_clockwise`] returns a new shape and never
/// mutates the receiver.
///
/// Each row is stored as a bitmask where bit `dx` marks column `dx` as filled.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeKind;
///
/// let t = ShapeKind::T.spawn_shape();
/// assert_eq!((t.width(), t.height()), (3, 2));
///
/// let rotated = t.rotated_clockwise();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated.to_string(), "#.\n##\n#.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "ShapeRepr", into = "ShapeRepr")]
pub struct Shape {
    kind: ShapeKind,
    width: u8,
    height: u8,
    rows: [u8; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` cells.
    ///
    /// All rows must have the same non-zero length, and the matrix must fit in
    /// a `MAX_SHAPE_SIZE` square.
    pub fn from_rows(kind: ShapeKind, rows: &[&[u8]]) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if width > MAX_SHAPE_SIZE || height > MAX_SHAPE_SIZE {
            return Err(ShapeError::TooLarge { width, height });
        }

        let mut bits = [0; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: y,
                    len: row.len(),
                    width,
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    bits[y] |= 1 << x;
                }
            }
        }

        #[expect(clippy::cast_possible_truncation)]
        let (width, height) = (width as u8, height as u8);
        Ok(Self {
            kind,
            width,
            height,
            rows: bits,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of columns in the bounding box.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Number of rows in the bounding box.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Checks if the cell at column `x`, row `y` of the bounding box is filled.
    #[must_use]
    pub const fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && (self.rows[y] & (1 << x)) != 0
    }

    /// Returns the offsets of all filled cells, row by row.
    #[must_use]
    pub fn filled_cells(&self) -> ShapeCells {
        let mut cells = ShapeCells::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_filled(usize::from(x), usize::from(y)) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// The result is the transpose of the matrix with each row reversed, so a
    /// `w`×`h` shape becomes `h`×`w`. Board bounds are not checked.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut rows = [0; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter_mut().enumerate().take(width) {
            for x in 0..height {
                if self.is_filled(y, height - 1 - x) {
                    *row |= 1 << x;
                }
            }
        }
        Self {
            kind: self.kind,
            width: self.height,
            height: self.width,
            rows,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for x in 0..self.width() {
                f.write_str(if self.is_filled(x, y) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Serialized form of a [`Shape`]: `{"kind": "T", "rows": [".#.", "###"]}`.
#[derive(Debug, Deserialize, Serialize)]
struct ShapeRepr {
    kind: ShapeKind,
    rows: Vec<String>,
}

impl From<Shape> for ShapeRepr {
    fn from(shape: Shape) -> Self {
        Self {
            kind: shape.kind,
            rows: shape.to_string().lines().map(str::to_owned).collect(),
        }
    }
}

impl TryFrom<ShapeRepr> for Shape {
    type Error = ShapeError;

    fn try_from(repr: ShapeRepr) -> Result<Self, Self::Error> {
        let mut rows = Vec::with_capacity(repr.rows.len());
        for (y, line) in repr.rows.iter().enumerate() {
            let row = line
                .chars()
                .map(|c| match c {
                    '#' => Ok(1),
                    '.' => Ok(0),
                    cell => Err(ShapeError::InvalidCell { row: y, cell }),
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }
        let rows = rows.iter().map(Vec::as_slice).collect::<Vec<_>>();
        Shape::from_rows(repr.kind, &rows)
    }
}

const fn spawn_shape(kind: ShapeKind, width: u8, height: u8, rows: [u8; MAX_SHAPE_SIZE]) -> Shape {
    Shape {
        kind,
        width,
        height,
        rows,
    }
}

// Bit `dx` of each row is column `dx`, so the literals read mirrored.
const SPAWN_SHAPES: [Shape; ShapeKind::LEN] = [
    // [[1, 1, 1, 1]]
    spawn_shape(ShapeKind::I, 4, 1, [0b1111, 0, 0, 0]),
    // [[1, 1], [1, 1]]
    spawn_shape(ShapeKind::O, 2, 2, [0b11, 0b11, 0, 0]),
    // [[0, 1, 0], [1, 1, 1]]
    spawn_shape(ShapeKind::T, 3, 2, [0b010, 0b111, 0, 0]),
    // [[0, 1, 1], [1, 1, 0]]
    spawn_shape(ShapeKind::S, 3, 2, [0b110, 0b011, 0, 0]),
    // [[1, 1, 0], [0, 1, 1]]
    spawn_shape(ShapeKind::Z, 3, 2, [0b011, 0b110, 0, 0]),
    // [[1, 0, 0], [1, 1, 1]]
    spawn_shape(ShapeKind::J, 3, 2, [0b001, 0b111, 0, 0]),
    // [[0, 0, 1], [1, 1, 1]]
    spawn_shape(ShapeKind::L, 3, 2, [0b100, 0b111, 0, 0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, rows: &[&[u8]]) -> Shape {
        Shape::from_rows(kind, rows).unwrap()
    }

    #[test]
    fn test_spawn_shapes_match_matrices() {
        let expected: [(ShapeKind, &[&[u8]]); ShapeKind::LEN] = [
            (ShapeKind::I, &[&[1, 1, 1, 1]]),
            (ShapeKind::O, &[&[1, 1], &[1, 1]]),
            (ShapeKind::T, &[&[0, 1, 0], &[1, 1, 1]]),
            (ShapeKind::S, &[&[0, 1, 1], &[1, 1, 0]]),
            (ShapeKind::Z, &[&[1, 1, 0], &[0, 1, 1]]),
            (ShapeKind::J, &[&[1, 0, 0], &[1, 1, 1]]),
            (ShapeKind::L, &[&[0, 0, 1], &[1, 1, 1]]),
        ];
        for (kind, rows) in expected {
            assert_eq!(kind.spawn_shape(), shape(kind, rows), "{kind:?}");
        }
    }

    #[test]
    fn test_every_spawn_shape_has_four_cells() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.spawn_shape().filled_cells().len(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_i_piece() {
        let i = ShapeKind::I.spawn_shape();
        let vertical = i.rotated_clockwise();
        assert_eq!((vertical.width(), vertical.height()), (1, 4));
        assert_eq!(vertical.to_string(), "#\n#\n#\n#");
        assert_eq!(vertical.rotated_clockwise(), i);
    }

    #[test]
    fn test_rotate_is_transpose_then_reverse_rows() {
        let l = ShapeKind::L.spawn_shape();
        // transpose of [[0,0,1],[1,1,1]] is [[0,1],[0,1],[1,1]]; reversing rows
        // gives [[1,0],[1,0],[1,1]]
        assert_eq!(
            l.rotated_clockwise(),
            shape(ShapeKind::L, &[&[1, 0], &[1, 0], &[1, 1]])
        );

        let s = ShapeKind::S.spawn_shape();
        assert_eq!(
            s.rotated_clockwise(),
            shape(ShapeKind::S, &[&[1, 0], &[1, 1], &[0, 1]])
        );
    }

    #[test]
    fn test_four_rotations_return_to_original() {
        for kind in ShapeKind::ALL {
            let original = kind.spawn_shape();
            let mut rotated = original;
            for _ in 0..4 {
                rotated = rotated.rotated_clockwise();
            }
            assert_eq!(rotated, original, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_does_not_mutate_original() {
        let t = ShapeKind::T.spawn_shape();
        let before = t;
        let _ = t.rotated_clockwise();
        assert_eq!(t, before);
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(Shape::from_rows(ShapeKind::I, &[]), Err(ShapeError::Empty));
        assert_eq!(
            Shape::from_rows(ShapeKind::I, &[&[1, 1, 1, 1, 1]]),
            Err(ShapeError::TooLarge {
                width: 5,
                height: 1
            })
        );
        assert_eq!(
            Shape::from_rows(ShapeKind::T, &[&[1, 1, 1], &[1, 1]]),
            Err(ShapeError::Ragged {
                row: 1,
                len: 2,
                width: 3
            })
        );
    }

    #[test]
    fn test_shape_serialization() {
        let t = ShapeKind::T.spawn_shape();
        let serialized = serde_json::to_string(&t).unwrap();
        assert_eq!(serialized, r####"{"kind":"T","rows":[".#.","###"]}"####);

        let deserialized: Shape = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, t);

        assert!(serde_json::from_str::<Shape>(r#"{"kind":"T","rows":[".x."]}"#).is_err());
        assert!(serde_json::from_str::<Shape>(r#"{"kind":"T","rows":[]}"#).is_err());
    }

    #[test]
    fn test_shape_kind_chars() {
        let chars = ShapeKind::ALL.map(ShapeKind::as_char);
        assert_eq!(chars, ['I', 'O', 'T', 'S', 'Z', 'J', 'L']);
    }
}
