//! Axial hex coordinates and the fixed board shape.
//!
//! Tiles live on a hexagon of radius 5 (91 cells). Internally every cell is
//! addressed by axial coordinates `(p, q)`; input and output use the
//! on-screen "row + offset" form, where row 0 is the top line and offset 0
//! is the leftmost tile of that row.

use std::ops::Add;

/// Distance from the center cell to any corner of the board.
pub const RADIUS: i32 = 5;

/// Number of rows on the board.
pub const ROWS: usize = (2 * RADIUS + 1) as usize;

/// An axial lattice coordinate.
///
/// Ordering is lexicographic on `(p, q)` and fixes the iteration order of
/// per-element indices, which makes move generation reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub p: i32,
    pub q: i32,
}

/// Unit vectors to the six neighbors, clockwise from north.
///
/// The first two directions are repeated at the end so a run of empty
/// neighbors can be counted across the wraparound without modular indexing.
pub const ADJACENT: [Coord; 8] = [
    Coord::new(0, -1),
    Coord::new(1, -1),
    Coord::new(1, 0),
    Coord::new(0, 1),
    Coord::new(-1, 1),
    Coord::new(-1, 0),
    Coord::new(0, -1),
    Coord::new(1, -1),
];

impl Coord {
    pub const fn new(p: i32, q: i32) -> Self {
        Self { p, q }
    }

    /// Converts on-screen row coordinates to axial coordinates.
    pub const fn from_row(row: usize, offset: usize) -> Self {
        let q = row as i32;
        Self::new(row_shift(q) + offset as i32, q)
    }

    /// Converts back to `(row, offset)`.
    ///
    /// Coordinates above the top row or left of a row's first cell have no
    /// row form, so the result is signed.
    pub const fn to_row(self) -> (i32, i32) {
        (self.q, self.p - row_shift(self.q))
    }

    /// The six distinct neighbors, clockwise from north.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        ADJACENT.into_iter().take(6).map(move |vector| self + vector)
    }

    /// Whether this coordinate lies on the hexagonal board.
    pub const fn on_board(self) -> bool {
        let (row, offset) = self.to_row();
        row >= 0 && row < ROWS as i32 && offset >= 0 && offset < row_len(row as usize) as i32
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.p + rhs.p, self.q + rhs.q)
    }
}

/// Number of cells in the given row.
pub const fn row_len(row: usize) -> usize {
    ROWS - (RADIUS - row as i32).unsigned_abs() as usize
}

/// Axial `p` of the first cell in row `q`.
const fn row_shift(q: i32) -> i32 {
    let shift = RADIUS - q;
    if shift > 0 {
        shift
    } else {
        0
    }
}

/// Iterates every cell of the board in row order.
pub fn all_cells() -> impl Iterator<Item = Coord> {
    (0..ROWS).flat_map(|row| (0..row_len(row)).map(move |offset| Coord::from_row(row, offset)))
}
