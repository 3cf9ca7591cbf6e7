//! Running Max: greedy program synthesis over batched evaluation.
//!
//! Starting from an empty program, each iteration scores a candidate set
//! of short continuations (the four directions plus a batch of random
//! bounded repeats) as prefix-plus-suffix against one base snapshot,
//! appends the best suffix, and stops at the token budget. Every
//! iteration scores against the same snapshot, so a prefix is never
//! re-applied to an already-advanced state.

use rand::Rng;
use rayon::ThreadPool;

use crate::eval::{batch_score_in, worker_pool};
use crate::game::Snapshot;
use crate::program::{token, SubroutineLibrary};

/// Repeat-count literals offered to structured candidates, four through
/// ten repeats.
const LOOP_COUNT_POOL: [i32; 7] = [104, 105, 106, 107, 108, 109, 100];

/// External reward shaping over finished programs, consumed as an opaque
/// additive ranking term. It never affects the simulator itself.
pub trait StructureScorer {
    /// Shape value for a finished token program.
    fn score(&self, program: &[i32]) -> f64;
}

/// Tunables for one Running Max search.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Token budget; the search stops extending once the program reaches
    /// it (the final terminator may exceed it by one).
    pub max_tokens: usize,
    /// Prefix length from which structured candidates are banned, so a
    /// finished program always ends in plain moves.
    pub structure_ban_threshold: usize,
    /// Structured candidates drawn per iteration.
    pub structure_candidates: usize,
    /// Weight on a direction candidate's score delta.
    pub direction_weight: f64,
    /// Weight on a structured candidate's score delta.
    pub structure_weight: f64,
    /// Flat bonus added to direction candidates after weighting, keeping
    /// the four atomic moves competitive against structure.
    pub direction_bonus: f64,
    /// Worker threads for batch scoring; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_tokens: 10,
            structure_ban_threshold: 8,
            structure_candidates: 96,
            direction_weight: 1.0,
            structure_weight: 0.5,
            direction_bonus: 15.0,
            threads: None,
        }
    }
}

/// A finished program with its evaluation against the base snapshot.
#[derive(Debug, Clone)]
pub struct RankedProgram {
    /// Finished token program, terminator included.
    pub tokens: Vec<i32>,
    /// Simulated score contribution relative to the base snapshot.
    pub delta: f64,
    /// Ranking total: `delta` plus the structural term (zero when no
    /// scorer is supplied).
    pub total: f64,
}

struct Candidate {
    suffix: Vec<i32>,
    weight: f64,
    is_direction: bool,
}

/// Grow one program greedily against `base`.
///
/// Candidate suffixes are ranked by `(score - base score) * weight`,
/// plus the direction bonus for single moves; ties break uniformly at
/// random. The returned program always ends with the terminator.
pub fn running_max<R: Rng>(
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<i32> {
    let workers = worker_pool(config.threads);
    running_max_in(workers.as_ref(), base, library, config, rng)
}

/// [`running_max`] against a pre-built worker pool, so a caller growing
/// many programs pays for pool construction once.
fn running_max_in<R: Rng>(
    workers: Option<&ThreadPool>,
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    config: &SearchConfig,
    rng: &mut R,
) -> Vec<i32> {
    let base_score = f64::from(base.score);
    let mut program: Vec<i32> = Vec::new();

    while program.len() < config.max_tokens {
        let allow_structure = program.len() < config.structure_ban_threshold;
        let mut candidates: Vec<Candidate> = Vec::with_capacity(
            4 + if allow_structure { config.structure_candidates } else { 0 },
        );
        for dir in 0..4_i32 {
            candidates.push(Candidate {
                suffix: vec![dir],
                weight: config.direction_weight,
                is_direction: true,
            });
        }
        if allow_structure {
            for _ in 0..config.structure_candidates {
                let count = LOOP_COUNT_POOL[rng.gen_range(0..LOOP_COUNT_POOL.len())];
                let dir = rng.gen_range(0..4_i32);
                candidates.push(Candidate {
                    suffix: vec![token::LOOP, count, dir],
                    weight: config.structure_weight,
                    is_direction: false,
                });
            }
        }

        let programs: Vec<Vec<i32>> = candidates
            .iter()
            .map(|candidate| {
                let mut extended = program.clone();
                extended.extend_from_slice(&candidate.suffix);
                extended
            })
            .collect();
        let scores = batch_score_in(workers, &programs, base, library, rng.r#gen());

        let ranks: Vec<f64> = candidates
            .iter()
            .zip(&scores)
            .map(|(candidate, &scored)| {
                let mut rank = (scored - base_score) * candidate.weight;
                if candidate.is_direction {
                    rank += config.direction_bonus;
                }
                rank
            })
            .collect();

        let best = ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<usize> = ranks
            .iter()
            .enumerate()
            .filter(|&(_, &rank)| (rank - best).abs() < f64::EPSILON)
            .map(|(idx, _)| idx)
            .collect();
        let choice = &candidates[tied[rng.gen_range(0..tied.len())]];

        program.extend_from_slice(&choice.suffix);
        if choice.suffix.last() == Some(&token::END) {
            break;
        }
    }

    if program.last() != Some(&token::END) {
        program.push(token::END);
    }
    program
}

/// Run `pool` independent searches and return the best finished program.
///
/// Finished programs are re-scored once against the snapshot; the winner
/// maximizes score delta plus the optional structural term, with ties
/// going to the shorter effective length.
pub fn best_of<R: Rng>(
    pool: usize,
    base: &Snapshot,
    library: &(dyn SubroutineLibrary + Sync),
    config: &SearchConfig,
    shaper: Option<&dyn StructureScorer>,
    rng: &mut R,
) -> RankedProgram {
    let base_score = f64::from(base.score);
    let workers = worker_pool(config.threads);
    let programs: Vec<Vec<i32>> = (0..pool.max(1))
        .map(|_| running_max_in(workers.as_ref(), base, library, config, rng))
        .collect();
    let scores = batch_score_in(workers.as_ref(), &programs, base, library, rng.r#gen());

    let mut winner: Option<RankedProgram> = None;
    let mut winner_length = f64::INFINITY;
    for (tokens, &scored) in programs.iter().zip(&scores) {
        let delta = scored - base_score;
        let total = delta + shaper.map_or(0.0, |shaper| shaper.score(tokens));
        let length = effective_length(tokens);
        let better = winner.as_ref().is_none_or(|current| {
            total > current.total
                || ((total - current.total).abs() < f64::EPSILON && length < winner_length)
        });
        if better {
            winner = Some(RankedProgram { tokens: tokens.clone(), delta, total });
            winner_length = length;
        }
    }
    winner.unwrap_or_else(|| RankedProgram { tokens: vec![token::END], delta: 0.0, total: 0.0 })
}

/// Length of a program with structure discounted: a bounded repeat
/// counts 1.5 for its three tokens, everything else 1.0, stopping at the
/// terminator.
#[must_use]
pub fn effective_length(program: &[i32]) -> f64 {
    let mut length = 0.0;
    let mut i = 0;
    while i < program.len() {
        match program[i] {
            token::END => break,
            token::LOOP => {
                length += 1.5;
                i += 3;
            }
            _ => {
                length += 1.0;
                i += 1;
            }
        }
    }
    length
}
