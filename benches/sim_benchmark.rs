//! Benchmarks for the simulation hot path.
//!
//! Batch scoring dominates a search turn, so the batch and single-score
//! numbers here are the ones to watch.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use scurry::eval::{batch_score, score};
use scurry::game::{DistanceField, FieldCache, GameState, Level, Snapshot};
use scurry::program::{InMemoryLibrary, compile};
use scurry::search::{SearchConfig, running_max};

fn fresh_snapshot(seed: u64) -> Snapshot {
    let mut rng = SmallRng::seed_from_u64(seed);
    GameState::new(&Level::three(), &mut rng).snapshot()
}

/// Candidate programs shaped like the search emits them: direction walks
/// peppered with bounded repeats.
fn candidate_programs(count: usize, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut tokens = Vec::new();
            while tokens.len() < 9 {
                if rng.gen_bool(0.3) {
                    tokens.push(110);
                    tokens.push(rng.gen_range(100..110));
                    tokens.push(rng.gen_range(0..4));
                } else {
                    tokens.push(rng.gen_range(0..4));
                }
            }
            tokens.push(112);
            tokens
        })
        .collect()
}

fn bench_distance_field(c: &mut Criterion) {
    let level = Level::three();

    c.bench_function("distance_field", |b| {
        b.iter(|| black_box(DistanceField::compute(black_box(&level.grid), level.mouse_spawn)));
    });
}

fn bench_compile(c: &mut Criterion) {
    let level = Level::three();
    let mut library = InMemoryLibrary::new();
    library.insert(113, vec![110, 104, 0, 2, 2]);
    library.insert(114, vec![5, 103, 3]);
    let tokens = [113, 110, 106, 0, 114, 113, 112];

    c.bench_function("compile_structural", |b| {
        b.iter(|| {
            black_box(compile(
                black_box(&tokens),
                &library,
                &level.grid,
                level.mouse_spawn,
                4,
            ))
        });
    });
}

fn bench_single_score(c: &mut Criterion) {
    let base = GameState::from_snapshot(&fresh_snapshot(42));
    let library = InMemoryLibrary::new();
    let tokens = [110, 100, 0, 2, 2, 110, 105, 2, 0, 112];

    c.bench_function("single_score", |b| {
        b.iter(|| {
            let mut cache = FieldCache::for_state(&base);
            let mut rng = SmallRng::seed_from_u64(7);
            black_box(score(black_box(&tokens), &base, &library, &mut cache, &mut rng))
        });
    });
}

fn bench_batch_100(c: &mut Criterion) {
    let base = fresh_snapshot(42);
    let library = InMemoryLibrary::new();
    let programs = candidate_programs(100, 11);

    c.bench_function("batch_score_100", |b| {
        b.iter(|| black_box(batch_score(black_box(&programs), &base, &library, 7, None)));
    });
}

fn bench_search_turn(c: &mut Criterion) {
    let base = fresh_snapshot(42);
    let library = InMemoryLibrary::new();
    let config = SearchConfig::default();

    c.bench_function("running_max_turn", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(7);
            black_box(running_max(black_box(&base), &library, &config, &mut rng))
        });
    });
}

criterion_group!(
    benches,
    bench_distance_field,
    bench_compile,
    bench_single_score,
    bench_batch_100,
    bench_search_turn
);
criterion_main!(benches);
