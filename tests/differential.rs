//! Differential testing of the BFS distance field.
//!
//! The field engine is checked against an independent fixpoint-relaxation
//! implementation: walls stay at the sentinel, the source reads 1, every
//! reachable open cell reads one more than its closest open neighbor, and
//! unreachable open cells stay 0.
//!
//! Run with: cargo test --release differential

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use proptest::prelude::*;

use scurry::game::{DistanceField, GRID_SIZE, Grid, Level, Pos, WALL_SENTINEL};

/// Shortest-hop field by repeated relaxation to a fixpoint. Deliberately
/// shares no code with the BFS engine.
fn reference_field(wall: &[[u8; GRID_SIZE]; GRID_SIZE], source: (usize, usize)) -> [[i16; GRID_SIZE]; GRID_SIZE] {
    let mut cells = [[0i16; GRID_SIZE]; GRID_SIZE];
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            if wall[r][c] != 0 {
                cells[r][c] = WALL_SENTINEL;
            }
        }
    }
    cells[source.0][source.1] = 1;

    let mut changed = true;
    while changed {
        changed = false;
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if (r, c) == source || cells[r][c] == WALL_SENTINEL {
                    continue;
                }
                let mut best: Option<i16> = None;
                let mut consider = |value: i16| {
                    if value > 0 && best.is_none_or(|b| value < b) {
                        best = Some(value);
                    }
                };
                if r > 0 {
                    consider(cells[r - 1][c]);
                }
                if r + 1 < GRID_SIZE {
                    consider(cells[r + 1][c]);
                }
                if c > 0 {
                    consider(cells[r][c - 1]);
                }
                if c + 1 < GRID_SIZE {
                    consider(cells[r][c + 1]);
                }
                if let Some(best) = best {
                    let desired = best + 1;
                    if cells[r][c] == 0 || cells[r][c] > desired {
                        cells[r][c] = desired;
                        changed = true;
                    }
                }
            }
        }
    }
    cells
}

fn wall_rows(grid: &Grid) -> [[u8; GRID_SIZE]; GRID_SIZE] {
    let mut rows = [[0u8; GRID_SIZE]; GRID_SIZE];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = u8::from(grid.is_wall(Pos::new(r as i8, c as i8)));
        }
    }
    rows
}

fn assert_fields_match(grid: &Grid, wall: &[[u8; GRID_SIZE]; GRID_SIZE], source: (usize, usize)) {
    let field = DistanceField::compute(grid, Pos::new(source.0 as i8, source.1 as i8));
    let expected = reference_field(wall, source);
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            assert_eq!(
                field.get(Pos::new(r as i8, c as i8)),
                expected[r][c],
                "mismatch at ({r},{c}) from source {source:?}"
            );
        }
    }
}

#[test]
fn test_level_three_every_open_source() {
    let level = Level::three();
    let wall = wall_rows(&level.grid);
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            if wall[r][c] == 0 {
                assert_fields_match(&level.grid, &wall, (r, c));
            }
        }
    }
}

#[test]
fn test_off_grid_reads_as_wall() {
    let level = Level::three();
    let field = DistanceField::compute(&level.grid, level.mouse_spawn);
    assert_eq!(field.get(Pos::new(-1, 0)), WALL_SENTINEL);
    assert_eq!(field.get(Pos::new(0, 11)), WALL_SENTINEL);
    assert_eq!(field.get(Pos::COLLECTED), WALL_SENTINEL);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Random mazes agree with the reference for a random open source.
    #[test]
    fn prop_random_maze_matches_reference(
        rows in prop::collection::vec(prop::collection::vec(0u8..2, GRID_SIZE), GRID_SIZE),
        pick in any::<usize>()
    ) {
        let mut wall = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                wall[r][c] = cell;
            }
        }

        let open: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| wall[r][c] == 0)
            .collect();
        prop_assume!(!open.is_empty());
        let source = open[pick % open.len()];

        let zeros = [[0u8; GRID_SIZE]; GRID_SIZE];
        let grid = Grid::from_rows(wall, zeros, zeros);
        assert_fields_match(&grid, &wall, source);
    }
}
