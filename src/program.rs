//! Instruction language for mouse programs.
//!
//! - Token vocabulary and classifiers
//! - Subroutine library trait with a hash-map implementation
//! - Two-pass compiler from token programs to flat action lists

mod compiler;
mod library;
pub mod token;

pub use compiler::{compile, CompileError, CompiledProgram, MAX_CALL_DEPTH};
pub use library::{InMemoryLibrary, SubroutineLibrary};
