// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Scurry: a deterministic grid-pursuit simulator with a searchable
//! token program language.
//!
//! A mouse collects cheese on an 11x11 grid while two cats chase it by
//! BFS distance. Mouse behavior is written in a small token language
//! (moves, bounded repeats, conditional repeats, two-slot subroutine
//! calls) that compiles to a canonical action sequence before
//! simulation. The crate provides:
//! - Bit-exact deterministic simulation from a seed
//! - Two-pass program compilation with a call budget
//! - Batched parallel scoring of candidate programs
//! - A greedy Running Max search over token suffixes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Search (Running Max)           │
//! ├─────────────────────────────────────┤
//! │    Batched Evaluation (rayon)       │
//! ├─────────────────────────────────────┤
//! │  Simulator (grid, NPCs, scoring)    │
//! ├─────────────────────────────────────┤
//! │     Program Compiler (tokens)       │
//! └─────────────────────────────────────┘
//! ```

pub mod eval;
pub mod game;
pub mod program;
pub mod search;

// Re-export key types at crate root for convenience
pub use game::{Direction, GameState, Grid, Level, Pos, Snapshot};
pub use program::{compile, CompiledProgram, InMemoryLibrary, SubroutineLibrary};
pub use search::{running_max, SearchConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_root_reexports_cover_the_pipeline() {
        let mut rng = SmallRng::seed_from_u64(9);
        let state = GameState::new(&Level::three(), &mut rng);
        let library = InMemoryLibrary::new();

        let program = compile(&[0, 112], &library, &state.grid, state.mouse.pos, state.call_budget)
            .unwrap();
        assert_eq!(program.actions, vec![Direction::Up]);

        let snapshot = state.snapshot();
        assert_eq!(GameState::from_snapshot(&snapshot), state);
    }
}
