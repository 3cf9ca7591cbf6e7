//! Game layer for Scurry.
//!
//! Implements the maze-pursuit rules:
//! - Grid geometry (walls, junctions, deadends) on the fixed 11x11 board
//! - Levels and the aggregate game state with snapshot transport
//! - BFS distance fields with per-level caching
//! - Cat flee/patrol and roamer patrol policies
//! - The step simulator that applies compiled programs tick by tick

mod distance;
mod engine;
mod grid;
mod level;
mod npc;
mod state;

pub use distance::{DistanceField, FieldCache, WALL_SENTINEL};
pub use engine::{
    execute, execute_with_plan, BIG_CHEESE_SCORE, CATCH_PENALTY, SMALL_CHEESE_SCORE, WALL_PENALTY,
};
pub use grid::{mask_from_rows, CellMask, Direction, Grid, Pos, GRID_SIZE, MAX_INDEX};
pub use level::Level;
pub use npc::{cat_action, patrol_action, NpcPlan, MAX_DIRECTION_TRIES};
pub use state::{
    Entity, GameState, Mouse, Phase, Snapshot, DEFAULT_CALL_BUDGET, DEFAULT_FLEE_RADIUS, RUN_LIMIT,
    STARTING_LIVES, STEP_LIMIT,
};
