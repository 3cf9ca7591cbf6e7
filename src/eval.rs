//! Program evaluation: single scoring, live application, and batched
//! parallel scoring against one snapshot.
//!
//! Scoring and application run the same engine with pre-planned NPC
//! motion, so search-time scores are statistically identical to what the
//! chosen program does to the live game.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::game::{FieldCache, GameState, RUN_LIMIT, Snapshot, execute};
use crate::program::{SubroutineLibrary, compile};

/// Fixed score for programs rejected before simulation (over the
/// subroutine-call budget). Dominated by any playable program.
pub const REJECTION_PENALTY: f64 = -1000.0;

/// Score a candidate program against `base` without touching it.
///
/// The candidate is compiled and simulated against a private clone;
/// returns the cumulative game score the clone ended with, or
/// [`REJECTION_PENALTY`] when the program exceeds the call budget. NPC
/// randomness is drawn from `rng`, so seeding makes the result
/// reproducible.
pub fn score<R: Rng>(
    tokens: &[i32],
    base: &GameState,
    library: &dyn SubroutineLibrary,
    cache: &mut FieldCache,
    rng: &mut R,
) -> f64 {
    let Ok(program) = compile(tokens, library, &base.grid, base.mouse.pos, base.call_budget)
    else {
        return REJECTION_PENALTY;
    };
    let mut scratch = base.clone();
    execute(&mut scratch, &program, cache, rng);
    f64::from(scratch.score)
}

/// Apply a program to the live state, advancing it by one run.
///
/// Returns the new cumulative score. The run counter increments after
/// execution; hitting the run cap without a win forces `Lost`. A program
/// over the call budget leaves the state untouched and returns
/// [`REJECTION_PENALTY`] (a rejected program is never executed and does
/// not consume a run).
pub fn apply<R: Rng>(
    tokens: &[i32],
    state: &mut GameState,
    library: &dyn SubroutineLibrary,
    cache: &mut FieldCache,
    rng: &mut R,
) -> f64 {
    let Ok(program) = compile(tokens, library, &state.grid, state.mouse.pos, state.call_budget)
    else {
        return REJECTION_PENALTY;
    };
    execute(state, &program, cache, rng);
    state.run += 1;
    if state.run >= RUN_LIMIT && !state.won {
        state.lost = true;
    }
    f64::from(state.score)
}

/// Build a scoped worker pool for batch scoring.
///
/// `None` (or a zero count, or a pool that cannot be built) means "use
/// the global pool". Callers that score many batches in a row build the
/// pool once and hand it to [`batch_score_in`] instead of paying the
/// pool construction per batch.
#[must_use]
pub fn worker_pool(threads: Option<usize>) -> Option<rayon::ThreadPool> {
    let n = threads?;
    if n == 0 {
        return None;
    }
    rayon::ThreadPoolBuilder::new().num_threads(n).build().ok()
}

/// Score many candidate programs against one base snapshot in parallel.
///
/// Candidate `i` is simulated against a fresh restore of the snapshot
/// with its own RNG stream seeded `seed + i` and its own distance cache;
/// no candidate observes another's effects. The output is positional:
/// `result[i]` belongs to `programs[i]` regardless of which worker ran
/// it. `threads` bounds the worker count through a scoped pool; `None`
/// (or a pool that cannot be built) uses the global pool.
#[must_use]
pub fn batch_score(
    programs: &[Vec<i32>],
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    seed: u64,
    threads: Option<usize>,
) -> Vec<f64> {
    batch_score_in(worker_pool(threads).as_ref(), programs, base, library, seed)
}

/// [`batch_score`] against a pre-built worker pool.
///
/// `None` runs on the global pool. The pool only affects scheduling;
/// results are identical either way.
#[must_use]
pub fn batch_score_in(
    pool: Option<&rayon::ThreadPool>,
    programs: &[Vec<i32>],
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    seed: u64,
) -> Vec<f64> {
    match pool {
        Some(pool) => pool.install(|| fan_out(programs, base, library, seed)),
        None => fan_out(programs, base, library, seed),
    }
}

fn fan_out(
    programs: &[Vec<i32>],
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    seed: u64,
) -> Vec<f64> {
    programs
        .par_iter()
        .enumerate()
        .map(|(idx, tokens)| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(idx as u64));
            let state = GameState::from_snapshot(base);
            let mut cache = FieldCache::for_state(&state);
            score(tokens, &state, library, &mut cache, &mut rng)
        })
        .collect()
}
