//! Subroutine library consumed by pass-1 binding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// External provider of subroutine bodies.
///
/// Ids live in the library-reference token range; an unknown id resolves
/// to an empty body, which binds a slot that expands to nothing.
pub trait SubroutineLibrary {
    /// The token body for `id`, or an empty slice when unknown.
    fn lookup(&self, id: i32) -> &[i32];
}

/// Hash-map backed library, loadable from JSON for the CLI and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryLibrary {
    bodies: HashMap<i32, Vec<i32>>,
}

impl InMemoryLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subroutine body under `id`, replacing any previous one.
    pub fn insert(&mut self, id: i32, body: Vec<i32>) {
        self.bodies.insert(id, body);
    }

    /// Number of registered subroutines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when no subroutines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SubroutineLibrary for InMemoryLibrary {
    fn lookup(&self, id: i32) -> &[i32] {
        self.bodies.get(&id).map_or(&[], Vec::as_slice)
    }
}
