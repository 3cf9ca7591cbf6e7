//! NPC motion policies: cat flee/patrol and roaming-item patrol.
//!
//! Motion is planned once per program from the pre-move state. The planner
//! walks the mouse's compiled path, reads the distance field for each
//! tick's mouse cell, and runs the full cat policy against virtual cat
//! positions. NPC-NPC blocking is not simulated here; the step engine
//! enforces it when the plan is applied.

use rand::Rng;

use crate::game::distance::{DistanceField, FieldCache, WALL_SENTINEL};
use crate::game::grid::{Direction, Grid, Pos};
use crate::game::state::GameState;

/// Retry cap for the randomized patrol branches.
pub const MAX_DIRECTION_TRIES: usize = 100;

/// Pre-computed NPC actions for one program execution.
#[derive(Debug, Clone, Default)]
pub struct NpcPlan {
    /// One action per mouse action, per cat.
    pub cats: [Vec<Direction>; 2],
    /// Patrol actions per roamer; empty for collected roamers.
    pub roamers: Vec<Vec<Direction>>,
}

impl NpcPlan {
    /// Plan cat and roamer motion for one program.
    ///
    /// Cats receive one action per mouse action; roamers receive
    /// `command_len` actions (their motion horizon is the canonical
    /// command length, not the expanded action count).
    pub fn compute<R: Rng>(
        state: &GameState,
        mouse_actions: &[Direction],
        command_len: usize,
        cache: &mut FieldCache,
        rng: &mut R,
    ) -> Self {
        let grid = &state.grid;
        let mut cats = [
            Vec::with_capacity(mouse_actions.len()),
            Vec::with_capacity(mouse_actions.len()),
        ];
        let mut cat_pos = [state.cats[0].pos, state.cats[1].pos];
        let mut cat_facing = [state.cats[0].facing, state.cats[1].facing];
        let mut mouse = state.mouse.pos;

        for &action in mouse_actions {
            if grid.movable(mouse, action) {
                mouse = mouse.step(action);
            }
            let field = cache.field(mouse);
            for i in 0..2 {
                let dir =
                    cat_action(grid, cat_pos[i], cat_facing[i], &field, state.flee_radius, rng);
                if grid.movable(cat_pos[i], dir) {
                    cat_pos[i] = cat_pos[i].step(dir);
                    cat_facing[i] = dir;
                }
                cats[i].push(dir);
            }
        }

        let mut roamers = Vec::with_capacity(state.roamers.len());
        for roamer in &state.roamers {
            if !roamer.active {
                roamers.push(Vec::new());
                continue;
            }
            let mut pos = roamer.pos;
            let mut facing = roamer.facing;
            let mut actions = Vec::with_capacity(command_len);
            for _ in 0..command_len {
                let dir = patrol_action(grid, pos, facing, rng);
                if grid.movable(pos, dir) {
                    pos = pos.step(dir);
                    facing = dir;
                }
                actions.push(dir);
            }
            roamers.push(actions);
        }

        Self { cats, roamers }
    }
}

/// One cat action for the current tick.
///
/// Unless the cat stands on a deadend, a field value in `1..=flee_radius`
/// at its cell triggers the flee branch: head for the neighbor with the
/// largest field value. Otherwise the cat patrols.
pub fn cat_action<R: Rng>(
    grid: &Grid,
    pos: Pos,
    facing: Direction,
    field: &DistanceField,
    flee_radius: i16,
    rng: &mut R,
) -> Direction {
    if !grid.is_deadend(pos) {
        let here = field.get(pos);
        if here >= 1 && here <= flee_radius {
            return flee_direction(grid, pos, field);
        }
    }
    patrol_action(grid, pos, facing, rng)
}

/// The direction whose neighbor carries the largest field value.
///
/// Blocked neighbors count as the wall sentinel; the first maximum in
/// direction order (up, down, left, right) wins. With all four neighbors
/// blocked this yields "up", which the engine then rejects as unmovable,
/// so the cat holds.
fn flee_direction(grid: &Grid, pos: Pos, field: &DistanceField) -> Direction {
    let mut best = Direction::Up;
    let mut best_value = i16::MIN;
    for dir in Direction::ALL {
        let value = if grid.movable(pos, dir) {
            field.get(pos.step(dir))
        } else {
            WALL_SENTINEL
        };
        if value > best_value {
            best_value = value;
            best = dir;
        }
    }
    best
}

/// Patrol policy shared by cats and roamers.
///
/// At a junction: a random movable direction that does not reverse the
/// facing, up to [`MAX_DIRECTION_TRIES`] draws. On a straight: continue
/// the facing if movable. Blocked: up to [`MAX_DIRECTION_TRIES`] random
/// movable directions. Every fallback emits the current facing, which the
/// engine treats as a hold when unmovable.
pub fn patrol_action<R: Rng>(grid: &Grid, pos: Pos, facing: Direction, rng: &mut R) -> Direction {
    if grid.is_junction(pos) {
        for _ in 0..MAX_DIRECTION_TRIES {
            let dir = Direction::random(rng);
            if dir == facing.opposite() {
                continue;
            }
            if grid.movable(pos, dir) {
                return dir;
            }
        }
        return facing;
    }

    if grid.movable(pos, facing) {
        return facing;
    }

    for _ in 0..MAX_DIRECTION_TRIES {
        let dir = Direction::random(rng);
        if grid.movable(pos, dir) {
            return dir;
        }
    }
    facing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::GRID_SIZE;
    use crate::game::level::Level;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn open_rows() -> [[u8; GRID_SIZE]; GRID_SIZE] {
        [[0; GRID_SIZE]; GRID_SIZE]
    }

    fn open_grid() -> Grid {
        Grid::from_rows(open_rows(), open_rows(), open_rows())
    }

    #[test]
    fn test_flee_picks_farthest_neighbor() {
        let grid = open_grid();
        let field = DistanceField::compute(&grid, Pos::new(5, 5));
        let mut rng = SmallRng::seed_from_u64(0);
        // Cat two cells right of the mouse: up/down/right all increase the
        // field value equally, so direction priority picks "up".
        let dir = cat_action(&grid, Pos::new(5, 7), Direction::Left, &field, 5, &mut rng);
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn test_flee_respects_walls() {
        // Wall above the cat removes "up" from the flee choices.
        let mut wall = open_rows();
        wall[4][7] = 1;
        let grid = Grid::from_rows(wall, open_rows(), open_rows());
        let field = DistanceField::compute(&grid, Pos::new(5, 5));
        let mut rng = SmallRng::seed_from_u64(0);
        let dir = cat_action(&grid, Pos::new(5, 7), Direction::Left, &field, 5, &mut rng);
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_flee_suppressed_on_deadend() {
        let mut deadend = open_rows();
        deadend[5][7] = 1;
        let grid = Grid::from_rows(open_rows(), open_rows(), deadend);
        let field = DistanceField::compute(&grid, Pos::new(5, 5));
        let mut rng = SmallRng::seed_from_u64(0);
        // No flee: the straight-line patrol continues the facing, even
        // though it heads toward the mouse.
        let dir = cat_action(&grid, Pos::new(5, 7), Direction::Left, &field, 5, &mut rng);
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_patrol_outside_radius() {
        let grid = open_grid();
        let field = DistanceField::compute(&grid, Pos::new(0, 0));
        let mut rng = SmallRng::seed_from_u64(0);
        // Field value at (10, 10) is 21, far outside the radius.
        let dir = cat_action(&grid, Pos::new(10, 10), Direction::Up, &field, 5, &mut rng);
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn test_junction_never_reverses() {
        let mut junction = open_rows();
        junction[5][5] = 1;
        let grid = Grid::from_rows(open_rows(), junction, open_rows());
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let dir = patrol_action(&grid, Pos::new(5, 5), Direction::Up, &mut rng);
            assert_ne!(dir, Direction::Down, "seed {seed} reversed at a junction");
            assert!(grid.movable(Pos::new(5, 5), dir));
        }
    }

    #[test]
    fn test_blocked_turns_around() {
        // Corridor cell where only the reverse direction is open.
        let mut wall = open_rows();
        wall[4][5] = 1;
        wall[5][4] = 1;
        wall[5][6] = 1;
        let grid = Grid::from_rows(wall, open_rows(), open_rows());
        let mut rng = SmallRng::seed_from_u64(9);
        let dir = patrol_action(&grid, Pos::new(5, 5), Direction::Up, &mut rng);
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_fully_walled_holds_facing() {
        let mut wall = open_rows();
        wall[4][5] = 1;
        wall[6][5] = 1;
        wall[5][4] = 1;
        wall[5][6] = 1;
        let grid = Grid::from_rows(wall, open_rows(), open_rows());
        let mut rng = SmallRng::seed_from_u64(9);
        let dir = patrol_action(&grid, Pos::new(5, 5), Direction::Left, &mut rng);
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_plan_lengths() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut state = GameState::new(&Level::three(), &mut rng);
        state.roamers[0].retire();
        let mut cache = FieldCache::for_state(&state);

        let actions = vec![Direction::Up, Direction::Up, Direction::Left];
        let plan = NpcPlan::compute(&state, &actions, 5, &mut cache, &mut rng);
        assert_eq!(plan.cats[0].len(), 3);
        assert_eq!(plan.cats[1].len(), 3);
        assert_eq!(plan.roamers.len(), 2);
        assert!(plan.roamers[0].is_empty());
        assert_eq!(plan.roamers[1].len(), 5);
    }

    #[test]
    fn test_plan_deterministic_per_seed() {
        let mut seed_rng = SmallRng::seed_from_u64(4);
        let state = GameState::new(&Level::three(), &mut seed_rng);
        let actions = vec![Direction::Up; 10];

        let run = |seed: u64| {
            let mut cache = FieldCache::for_state(&state);
            let mut rng = SmallRng::seed_from_u64(seed);
            NpcPlan::compute(&state, &actions, 11, &mut cache, &mut rng)
        };
        let a = run(77);
        let b = run(77);
        assert_eq!(a.cats, b.cats);
        assert_eq!(a.roamers, b.roamers);
    }
}
