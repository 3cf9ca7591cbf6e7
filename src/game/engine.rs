//! Per-tick application of a compiled program to a game state.
//!
//! The tick order is fixed: wall penalty, mouse move, aggressive cat,
//! passive cat, roamers, catch check, pickups, terminal checks. The
//! passive cat and the roamers only move while the tick index is below
//! the canonical command length; the aggressive cat moves every tick.

use rand::Rng;

use crate::game::distance::FieldCache;
use crate::game::grid::{Direction, Pos};
use crate::game::npc::NpcPlan;
use crate::game::state::GameState;
use crate::program::CompiledProgram;

/// Score delta for walking into a wall.
pub const WALL_PENALTY: i32 = -10;
/// Score delta per cat contact.
pub const CATCH_PENALTY: i32 = -500;
/// Score delta for a big cheese item, stationary or roaming.
pub const BIG_CHEESE_SCORE: i32 = 500;
/// Score delta per small cheese cell.
pub const SMALL_CHEESE_SCORE: i32 = 10;

/// Run a compiled program against `state`, mutating it in place.
///
/// NPC motion is planned once up front from the pre-move state, then the
/// tick loop replays it. Execution stops at a terminal state, or after a
/// catch once the respawn has been applied (remaining actions are
/// discarded). A state that is already terminal is left untouched.
pub fn execute<R: Rng>(
    state: &mut GameState,
    program: &CompiledProgram,
    cache: &mut FieldCache,
    rng: &mut R,
) {
    if state.is_terminal() {
        return;
    }
    let plan = NpcPlan::compute(state, &program.actions, program.command_len, cache, rng);
    execute_with_plan(state, program, &plan, rng);
}

/// Run a compiled program against an externally computed NPC plan.
///
/// [`execute`] is the usual entry point; this exists for replaying a
/// recorded plan deterministically.
pub fn execute_with_plan<R: Rng>(
    state: &mut GameState,
    program: &CompiledProgram,
    plan: &NpcPlan,
    rng: &mut R,
) {
    if state.is_terminal() {
        return;
    }

    // Collectibles already under the mouse (left by a previous respawn or
    // restore) are picked up before any action runs, so an end-only
    // program still collects and can win.
    arrival_sweep(state);
    if state.is_terminal() {
        return;
    }

    for (tick, &action) in program.actions.iter().enumerate() {
        if program.wall_hits.get(tick).copied().unwrap_or(false) {
            state.score += WALL_PENALTY;
        }

        state.mouse.last_pos = state.mouse.pos;
        if state.grid.movable(state.mouse.pos, action) {
            state.mouse.pos = state.mouse.pos.step(action);
            state.step += 1;
        }

        move_cat(state, 1, plan.cats[1].get(tick).copied());
        if tick < program.command_len {
            move_cat(state, 0, plan.cats[0].get(tick).copied());
            move_roamers(state, plan, tick);
        }

        let cats = state.cats;
        for cat in cats {
            if cat.pos == state.mouse.pos
                || crossing(cat.pos, cat.last_pos, state.mouse.pos, state.mouse.last_pos)
            {
                state.score += CATCH_PENALTY;
                state.life -= 1;
                state.caught = true;
            }
        }

        collect_big_cheese(state);
        collect_small_cheese(state);

        if check_terminal(state) {
            return;
        }
        if state.caught {
            state.respawn_after_catch(rng);
            return;
        }
    }
}

/// True when two entities swapped cells along one edge this tick without
/// ever sharing a cell.
fn crossing(a_pos: Pos, a_last: Pos, b_pos: Pos, b_last: Pos) -> bool {
    a_pos == b_last && b_pos == a_last
}

fn move_cat(state: &mut GameState, idx: usize, action: Option<Direction>) {
    let Some(dir) = action else {
        return;
    };
    let cat = state.cats[idx];
    if !state.grid.movable(cat.pos, dir) {
        return;
    }
    let dest = cat.pos.step(dir);
    // Cats never share a cell; the other cat's position is already
    // updated when the passive cat moves.
    if dest == state.cats[1 - idx].pos {
        return;
    }
    state.cats[idx].advance(dest, dir);
}

fn move_roamers(state: &mut GameState, plan: &NpcPlan, tick: usize) {
    for idx in 0..state.roamers.len() {
        let roamer = state.roamers[idx];
        if !roamer.active {
            continue;
        }
        let Some(&dir) = plan.roamers.get(idx).and_then(|actions| actions.get(tick)) else {
            continue;
        };
        if !state.grid.movable(roamer.pos, dir) {
            continue;
        }
        let dest = roamer.pos.step(dir);
        let blocked = state.cats.iter().any(|cat| cat.pos == dest)
            || state
                .roamers
                .iter()
                .enumerate()
                .any(|(other, r)| other != idx && r.pos == dest);
        if !blocked {
            state.roamers[idx].advance(dest, dir);
        }
    }
}

/// Big cheese pickup, stationary items before roamers. Both kinds use the
/// direct-or-crossing contact test; a collected item is retired to the
/// sentinel and can never match again.
fn collect_big_cheese(state: &mut GameState) {
    let mouse = state.mouse;
    for item in state.stationary.iter_mut().chain(state.roamers.iter_mut()) {
        if !item.active {
            continue;
        }
        if item.pos == mouse.pos || crossing(item.pos, item.last_pos, mouse.pos, mouse.last_pos) {
            item.retire();
            state.score += BIG_CHEESE_SCORE;
        }
    }
}

fn collect_small_cheese(state: &mut GameState) {
    if let Some((row, col)) = state.mouse.pos.indices()
        && state.small_cheese[row][col]
    {
        state.small_cheese[row][col] = false;
        state.score += SMALL_CHEESE_SCORE;
    }
}

fn arrival_sweep(state: &mut GameState) {
    let mouse_pos = state.mouse.pos;
    for item in state.stationary.iter_mut().chain(state.roamers.iter_mut()) {
        if item.active && item.pos == mouse_pos {
            item.retire();
            state.score += BIG_CHEESE_SCORE;
        }
    }
    collect_small_cheese(state);
    check_terminal(state);
}

/// Terminal checks in priority order: out of lives, board cleared, step
/// limit (a zero limit disables the cap). Returns true when the state
/// became terminal.
fn check_terminal(state: &mut GameState) -> bool {
    if state.life <= 0 {
        state.lost = true;
        return true;
    }
    if state.cheese_remaining() == 0 {
        state.won = true;
        // Bounded counters, far below i32::MAX.
        #[allow(clippy::cast_possible_wrap)]
        let bonus = (state.run * 10 + state.step) as i32;
        state.score += bonus;
        return true;
    }
    if state.step_limit > 0 && state.step >= state.step_limit {
        state.lost = true;
        return true;
    }
    false
}
