use std::fmt;

use crate::error::{Error, Result};

/// Top-left pixel corner of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board geometry, measured in pixels. Both dimensions are exact multiples
/// of the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self> {
        if cell_size <= 0 {
            return Err(Error::InvalidConfig("cell size must be positive"));
        }
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidConfig("board dimensions must be positive"));
        }
        if width % cell_size != 0 {
            return Err(Error::Misaligned { dimension: "width", value: width, cell_size });
        }
        if height % cell_size != 0 {
            return Err(Error::Misaligned { dimension: "height", value: height, cell_size });
        }

        Ok(Grid { width, height, cell_size })
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// The cell the snake starts from, snapped down onto the grid when the
    /// column or row count is odd.
    pub fn center(&self) -> Position {
        Position::new(
            self.columns() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && pos.x % self.cell_size == 0
            && pos.y % self.cell_size == 0
    }

    /// Moves `pos` one cell along `delta`, re-entering on the opposite edge
    /// when it leaves the board.
    pub fn wrap(&self, pos: Position, delta: (i32, i32)) -> Position {
        Position::new(
            (pos.x + delta.0 * self.cell_size).rem_euclid(self.width),
            (pos.y + delta.1 * self.cell_size).rem_euclid(self.height),
        )
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (columns, rows, size) = (self.columns(), self.rows(), self.cell_size);
        (0..rows).flat_map(move |row| (0..columns).map(move |col| Position::new(col * size, row * size)))
    }

    /// Column and row of the cell at `pos`.
    pub fn cell_index(&self, pos: Position) -> (i32, i32) {
        (pos.x / self.cell_size, pos.y / self.cell_size)
    }
}
