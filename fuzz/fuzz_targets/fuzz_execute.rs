#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use scurry::eval;
use scurry::game::{FieldCache, GameState, Level};
use scurry::program::InMemoryLibrary;

/// Structured input for end-to-end execution fuzzing.
#[derive(Arbitrary, Debug)]
struct ExecuteInput {
    /// Raw token program.
    tokens: Vec<i32>,
    /// Subroutine bodies keyed by library id.
    bodies: Vec<(i32, Vec<i32>)>,
    /// Spawn and evaluation RNG seed.
    seed: u64,
    /// Slot-call budget.
    budget: u8,
}

fuzz_target!(|input: ExecuteInput| {
    let len = input.tokens.len().min(48);
    let tokens = &input.tokens[..len];

    let mut library = InMemoryLibrary::new();
    for (id, body) in input.bodies.iter().take(8) {
        let mut body = body.clone();
        body.truncate(16);
        library.insert(*id, body);
    }

    let mut setup = SmallRng::seed_from_u64(input.seed);
    let mut state = GameState::new(&Level::three(), &mut setup);
    state.call_budget = u32::from(input.budget);
    let mut cache = FieldCache::for_state(&state);
    let mut rng = SmallRng::seed_from_u64(input.seed);

    // Must not panic for any program
    let total = eval::apply(tokens, &mut state, &library, &mut cache, &mut rng);
    assert!(total.is_finite());

    // Entities never leave the board or merge
    assert!(state.mouse.pos.is_valid());
    assert!(!state.grid.is_wall(state.mouse.pos));
    for cat in &state.cats {
        assert!(cat.pos.is_valid());
        assert!(!state.grid.is_wall(cat.pos));
    }
    assert_ne!(state.cats[0].pos, state.cats[1].pos);

    // Counters respect their caps; double catches can overdraw one life
    assert!(state.step <= state.step_limit);
    assert!(state.life >= -1 && state.life <= 3);
    if state.won {
        assert_eq!(state.cheese_remaining(), 0);
    }
    if state.life <= 0 {
        assert!(state.lost);
    }
});
