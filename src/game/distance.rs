//! Breadth-first distance fields from a source cell, with per-level caching.

use std::collections::VecDeque;

use crate::game::grid::{Direction, GRID_SIZE, Grid, Pos};
use crate::game::state::GameState;

/// Field value carried by wall cells.
pub const WALL_SENTINEL: i16 = -1;

/// Hop-count field from one source cell.
///
/// Walls carry [`WALL_SENTINEL`], the source carries 1, every other cell
/// reachable from the source carries one more than its BFS predecessor.
/// Open cells the source cannot reach stay 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceField {
    cells: [[i16; GRID_SIZE]; GRID_SIZE],
}

impl DistanceField {
    /// Compute the field for `source` by breadth-first traversal.
    #[must_use]
    pub fn compute(grid: &Grid, source: Pos) -> Self {
        let mut cells = [[0i16; GRID_SIZE]; GRID_SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let pos = Pos::new(r as i8, c as i8);
                if grid.is_wall(pos) {
                    *cell = WALL_SENTINEL;
                }
            }
        }

        let mut queue = VecDeque::new();
        if let Some((r, c)) = source.indices() {
            cells[r][c] = 1;
            queue.push_back(source);
        }

        while let Some(curr) = queue.pop_front() {
            let here = match curr.indices() {
                Some((r, c)) => cells[r][c],
                None => continue,
            };
            for dir in Direction::ALL {
                let next = curr.step(dir);
                if let Some((r, c)) = next.indices()
                    && cells[r][c] == 0
                {
                    cells[r][c] = here + 1;
                    queue.push_back(next);
                }
            }
        }

        Self { cells }
    }

    /// Field value at `pos`; off-grid cells read as the wall sentinel.
    #[must_use]
    pub fn get(&self, pos: Pos) -> i16 {
        pos.indices()
            .map_or(WALL_SENTINEL, |(r, c)| self.cells[r][c])
    }
}

/// Caller-owned cache of distance fields for one level.
///
/// One lazily-filled slot per source cell. The cache is never shared
/// between concurrent evaluations; each worker owns its own.
#[derive(Debug, Clone)]
pub struct FieldCache {
    level_id: u32,
    grid: Grid,
    slots: Vec<Option<DistanceField>>,
}

impl FieldCache {
    /// An empty cache for the given level.
    #[must_use]
    pub fn new(level_id: u32, grid: Grid) -> Self {
        Self {
            level_id,
            grid,
            slots: vec![None; GRID_SIZE * GRID_SIZE],
        }
    }

    /// An empty cache for the level `state` plays on.
    #[must_use]
    pub fn for_state(state: &GameState) -> Self {
        Self::new(state.level_id, state.grid)
    }

    /// Re-point the cache at a level.
    ///
    /// A level change drops every cached field; pointing at the current
    /// level is free.
    pub fn ensure_level(&mut self, level_id: u32, grid: &Grid) {
        if self.level_id != level_id {
            self.level_id = level_id;
            self.grid = *grid;
            for slot in &mut self.slots {
                *slot = None;
            }
        }
    }

    /// The field from `source`, computing and caching it on first use.
    ///
    /// An off-grid source yields an uncached field with no reachable cells.
    pub fn field(&mut self, source: Pos) -> DistanceField {
        let Some((r, c)) = source.indices() else {
            return DistanceField::compute(&self.grid, source);
        };
        let idx = r * GRID_SIZE + c;
        if let Some(field) = self.slots[idx] {
            field
        } else {
            let field = DistanceField::compute(&self.grid, source);
            self.slots[idx] = Some(field);
            field
        }
    }

    /// The level this cache currently serves.
    #[must_use]
    pub const fn level_id(&self) -> u32 {
        self.level_id
    }
}
