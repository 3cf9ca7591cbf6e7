//! Grid geometry: positions, directions, and the static maze layout.

use rand::Rng;

/// Side length of the square maze.
pub const GRID_SIZE: usize = 11;

/// Largest valid row or column index.
pub const MAX_INDEX: i8 = 10;

/// A movement direction on the 4-connected grid.
///
/// The numeric encoding is shared with token programs and snapshots:
/// 0 = up (row-1), 1 = down (row+1), 2 = left (col-1), 3 = right (col+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Row decreases.
    Up = 0,
    /// Row increases.
    Down = 1,
    /// Column decreases.
    Left = 2,
    /// Column increases.
    Right = 3,
}

impl Direction {
    /// All four directions in priority order (up, down, left, right).
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Numeric encoding of this direction.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a direction from its numeric encoding.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// The reverse of this direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Row and column deltas for one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// A uniformly random direction.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

/// A cell position as signed `(row, col)`.
///
/// Signed coordinates let the collected-item sentinel `(-1, -1)` live in the
/// same type as regular cells; anything outside `[0, 10]` is off-grid and
/// never movable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    /// Row index, top to bottom.
    pub row: i8,
    /// Column index, left to right.
    pub col: i8,
}

impl Pos {
    /// Sentinel for a collected item.
    pub const COLLECTED: Pos = Pos::new(-1, -1);

    /// Create a position.
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Whether this position lies on the grid.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.row >= 0 && self.row <= MAX_INDEX && self.col >= 0 && self.col <= MAX_INDEX
    }

    /// The position one step away, without bounds checking.
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Self {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }

    /// Row-major array indices for this position, if it lies on the grid.
    #[must_use]
    pub fn indices(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < GRID_SIZE && col < GRID_SIZE).then_some((row, col))
    }
}

/// A boolean cell mask, row-major.
pub type CellMask = [[bool; GRID_SIZE]; GRID_SIZE];

/// The static maze layout: walls, junctions, and deadends.
///
/// Fixed at construction; everything mutable lives in
/// [`GameState`](crate::game::GameState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    wall: CellMask,
    junction: CellMask,
    deadend: CellMask,
}

impl Grid {
    /// Build a grid from 0/1 row tables (the layout format levels are
    /// written in).
    #[must_use]
    pub fn from_rows(
        wall: [[u8; GRID_SIZE]; GRID_SIZE],
        junction: [[u8; GRID_SIZE]; GRID_SIZE],
        deadend: [[u8; GRID_SIZE]; GRID_SIZE],
    ) -> Self {
        Self {
            wall: mask_from_rows(wall),
            junction: mask_from_rows(junction),
            deadend: mask_from_rows(deadend),
        }
    }

    /// Whether the cell is a wall. Off-grid positions count as walls.
    #[must_use]
    pub fn is_wall(&self, pos: Pos) -> bool {
        pos.indices().is_none_or(|(r, c)| self.wall[r][c])
    }

    /// Whether the cell is a junction. Off-grid positions are not.
    #[must_use]
    pub fn is_junction(&self, pos: Pos) -> bool {
        pos.indices().is_some_and(|(r, c)| self.junction[r][c])
    }

    /// Whether the cell is a deadend. Off-grid positions are not.
    #[must_use]
    pub fn is_deadend(&self, pos: Pos) -> bool {
        pos.indices().is_some_and(|(r, c)| self.deadend[r][c])
    }

    /// Whether an entity at `pos` can take one step in `dir`.
    ///
    /// False when `pos` is off-grid, the step leaves the grid, or the
    /// destination is a wall.
    #[must_use]
    pub fn movable(&self, pos: Pos, dir: Direction) -> bool {
        if !pos.is_valid() {
            return false;
        }
        let next = pos.step(dir);
        next.is_valid() && !self.is_wall(next)
    }

    /// The wall mask, row-major.
    #[must_use]
    pub const fn wall_mask(&self) -> &CellMask {
        &self.wall
    }
}

/// Convert a 0/1 row table into a boolean mask.
#[must_use]
pub fn mask_from_rows(rows: [[u8; GRID_SIZE]; GRID_SIZE]) -> CellMask {
    let mut mask = [[false; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            mask[r][c] = v != 0;
        }
    }
    mask
}
