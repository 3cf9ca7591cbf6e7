//! Level definitions: static layout, cheese placement, and spawn data.

use crate::game::grid::{CellMask, Grid, Pos, mask_from_rows};

/// A playable level: static geometry plus everything needed to spawn a game.
///
/// Levels are plain data. [`GameState::new`](crate::game::GameState::new)
/// consumes one together with an RNG for the randomized spawn parts
/// (cat facings, roamer rows).
#[derive(Debug, Clone)]
pub struct Level {
    /// Level identifier, used for distance-cache keying and snapshots.
    pub id: u32,
    /// Wall, junction, and deadend geometry.
    pub grid: Grid,
    /// Initial small-cheese cells.
    pub small_cheese: CellMask,
    /// Mouse start cell, also the respawn cell after a catch.
    pub mouse_spawn: Pos,
    /// Start cells for the passive (index 0) and aggressive (index 1) cat.
    pub cat_spawns: [Pos; 2],
    /// Stationary big-cheese cells.
    pub stationary_spawns: Vec<Pos>,
    /// Entry columns for roaming big cheese; one roamer spawns per column.
    pub roamer_columns: Vec<i8>,
    /// Exclusive upper bound for the roamers' random spawn rows.
    pub roamer_row_limit: i8,
}

impl Level {
    /// The standard built-in maze (level id 3).
    #[must_use]
    pub fn three() -> Self {
        let wall = [
            [0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0],
            [0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 1, 0, 1, 1, 0, 1, 1, 0, 1, 0],
            [0, 1, 0, 1, 1, 0, 1, 1, 0, 1, 0],
            [0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0],
            [0, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1],
            [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
            [0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0],
        ];
        let cheese = [
            [1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1],
            [1, 0, 0, 1, 0, 1, 0, 1, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 0, 1, 0, 0, 1, 0, 0, 1, 0, 1],
            [1, 0, 1, 0, 0, 1, 0, 0, 1, 0, 1],
            [1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1],
            [1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
            [1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1],
            [1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0],
        ];
        let junction = [
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 1, 0, 1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        let deadend = [
            [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        ];

        Self {
            id: 3,
            grid: Grid::from_rows(wall, junction, deadend),
            small_cheese: mask_from_rows(cheese),
            mouse_spawn: Pos::new(10, 10),
            cat_spawns: [Pos::new(2, 2), Pos::new(5, 5)],
            stationary_spawns: vec![Pos::new(1, 5), Pos::new(7, 5)],
            roamer_columns: vec![0, 10],
            roamer_row_limit: 8,
        }
    }

    /// Number of small-cheese cells still marked in the initial layout.
    #[must_use]
    pub fn cheese_count(&self) -> usize {
        self.small_cheese
            .iter()
            .flatten()
            .filter(|&&cell| cell)
            .count()
    }
}
