#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scurry::game::Level;
use scurry::program::{CompileError, InMemoryLibrary, compile};

/// Structured input for compiler fuzzing.
#[derive(Arbitrary, Debug)]
struct CompileInput {
    /// Raw token program.
    tokens: Vec<i32>,
    /// Subroutine bodies keyed by library id.
    bodies: Vec<(i32, Vec<i32>)>,
    /// Slot-call budget.
    budget: u8,
}

fuzz_target!(|input: CompileInput| {
    // Cap sizes to keep a single case fast
    let len = input.tokens.len().min(64);
    let tokens = &input.tokens[..len];

    let mut library = InMemoryLibrary::new();
    for (id, body) in input.bodies.iter().take(8) {
        let mut body = body.clone();
        body.truncate(16);
        library.insert(*id, body);
    }

    let level = Level::three();
    let budget = u32::from(input.budget);

    // Must not panic for any input
    match compile(tokens, &library, &level.grid, level.mouse_spawn, budget) {
        Ok(program) => {
            assert_eq!(
                program.actions.len(),
                program.wall_hits.len(),
                "wall flags must stay parallel to actions"
            );
            assert!(program.command_len <= tokens.len());
            assert!(program.call_count <= budget);
        }
        Err(CompileError::CallBudgetExceeded { calls, budget: reported }) => {
            assert_eq!(reported, budget);
            assert!(calls > budget, "rejection requires a real violation");
        }
    }
});
