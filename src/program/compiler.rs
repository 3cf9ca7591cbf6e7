//! Two-pass instruction compiler: token program to flat action list.
//!
//! Pass 1 binds up to two library subroutines to the call slots and
//! produces the canonical command. Pass 2 expands the canonical command
//! into queued mouse actions with per-action wall-collision flags,
//! tracking a virtual mouse so structural opcodes can evaluate movability
//! and junction predicates without touching live state.

use crate::game::{Direction, Grid, Pos};
use crate::program::library::SubroutineLibrary;
use crate::program::token;

/// Recursion cap for slot calls; a call at the cap expands to nothing.
/// Guards library bodies that call a slot themselves.
pub const MAX_CALL_DEPTH: u32 = 16;

/// Error type for program compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
    /// The canonical command contains more slot calls than the game's
    /// subroutine-call budget allows. The program must be rejected
    /// without being stepped.
    CallBudgetExceeded {
        /// Slot calls found in the canonical command.
        calls: u32,
        /// The budget they were checked against.
        budget: u32,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallBudgetExceeded { calls, budget } => {
                write!(f, "program uses {calls} subroutine calls, budget is {budget}")
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Flat, steppable output of [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    /// Queued mouse actions, one simulator tick each.
    pub actions: Vec<Direction>,
    /// Parallel to `actions`; true where the destination was blocked at
    /// compile time (the simulator charges the wall penalty but the
    /// direction intent is preserved).
    pub wall_hits: Vec<bool>,
    /// Canonical command length, end token included. The simulator gates
    /// passive-cat and roamer motion on this horizon.
    pub command_len: usize,
    /// Slot calls in the canonical command.
    pub call_count: u32,
}

/// Output of pass 1: the canonical command and the two bound bodies.
struct Canonical {
    command: Vec<i32>,
    bodies: [Vec<i32>; 2],
}

/// Compile a token program against a grid and a starting cell.
///
/// # Arguments
///
/// * `program` - Raw token sequence
/// * `library` - Resolver for library-subroutine references
/// * `grid` - Static level geometry for movability and junction checks
/// * `start` - The mouse cell compilation starts from
/// * `call_budget` - Maximum slot calls allowed in the canonical command
///
/// # Errors
///
/// Returns [`CompileError::CallBudgetExceeded`] when the canonical
/// command uses more slot calls than `call_budget`; callers score such
/// programs with the fixed rejection penalty instead of stepping them.
pub fn compile(
    program: &[i32],
    library: &dyn SubroutineLibrary,
    grid: &Grid,
    start: Pos,
    call_budget: u32,
) -> Result<CompiledProgram, CompileError> {
    let canonical = bind_subroutines(program, library);
    let call_count = slot_call_count(&canonical.command);
    if call_count > call_budget {
        return Err(CompileError::CallBudgetExceeded { calls: call_count, budget: call_budget });
    }

    let mut expansion = Expansion::default();
    let mut cursor = start;
    expand(grid, &canonical.command, &canonical.bodies, &mut cursor, &mut expansion, 0);

    Ok(CompiledProgram {
        actions: expansion.actions,
        wall_hits: expansion.wall_hits,
        command_len: canonical.command.len(),
        call_count,
    })
}

/// Pass 1: bind library references to the two call slots.
///
/// The first reference id binds slot 1 and every repeat of it emits a
/// slot-1 call; the first different id binds slot 2 analogously; a third
/// distinct id is dropped. Filler tokens are dropped here too, so they
/// never pad the canonical command. Other tokens pass through. Scanning
/// stops at the first end token, which is retained.
fn bind_subroutines(program: &[i32], library: &dyn SubroutineLibrary) -> Canonical {
    let mut command = Vec::with_capacity(program.len());
    let mut slot_ids: [Option<i32>; 2] = [None, None];
    let mut bodies: [Vec<i32>; 2] = [Vec::new(), Vec::new()];

    for &tok in program {
        if tok == token::FILLER {
            continue;
        }
        if token::is_library_ref(tok) {
            if slot_ids[0] == Some(tok) {
                command.push(token::CALL_SLOT_1);
            } else if slot_ids[1] == Some(tok) {
                command.push(token::CALL_SLOT_2);
            } else if slot_ids[0].is_none() {
                slot_ids[0] = Some(tok);
                bodies[0] = library.lookup(tok).to_vec();
                command.push(token::CALL_SLOT_1);
            } else if slot_ids[1].is_none() {
                slot_ids[1] = Some(tok);
                bodies[1] = library.lookup(tok).to_vec();
                command.push(token::CALL_SLOT_2);
            }
        } else {
            command.push(tok);
            if tok == token::END {
                break;
            }
        }
    }

    Canonical { command, bodies }
}

fn slot_call_count(command: &[i32]) -> u32 {
    let count = command
        .iter()
        .filter(|&&tok| token::call_slot(tok).is_some())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[derive(Default)]
struct Expansion {
    actions: Vec<Direction>,
    wall_hits: Vec<bool>,
}

impl Expansion {
    /// Queue one action, advancing the cursor when the move is legal and
    /// flagging a wall hit when it is not.
    fn step(&mut self, grid: &Grid, cursor: &mut Pos, dir: Direction) {
        if grid.movable(*cursor, dir) {
            *cursor = cursor.step(dir);
            self.actions.push(dir);
            self.wall_hits.push(false);
        } else {
            self.actions.push(dir);
            self.wall_hits.push(true);
        }
    }
}

/// Pass 2: expand one token sequence, recursing into slot calls.
///
/// A malformed structural opcode (count or direction out of range, or a
/// truncated tail) stops expansion of the current sequence at that point;
/// actions queued so far stand.
fn expand(
    grid: &Grid,
    tokens: &[i32],
    bodies: &[Vec<i32>; 2],
    cursor: &mut Pos,
    out: &mut Expansion,
    depth: u32,
) {
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];
        if let Some(dir) = token::direction(tok) {
            out.step(grid, cursor, dir);
            i += 1;
        } else if tok == token::LOOP {
            let Some(count) = tokens.get(i + 1).copied().and_then(token::repeat_count) else {
                return;
            };
            let Some(dir) = tokens.get(i + 2).copied().and_then(token::direction) else {
                return;
            };
            for _ in 0..count {
                out.step(grid, cursor, dir);
            }
            i += 3;
        } else if tok == token::IF {
            let Some(count) = tokens.get(i + 1).copied().and_then(token::conditional_count) else {
                return;
            };
            let Some(dir) = tokens.get(i + 2).copied().and_then(token::direction) else {
                return;
            };
            let mut remaining = count;
            while remaining > 0 && grid.movable(*cursor, dir) {
                *cursor = cursor.step(dir);
                out.actions.push(dir);
                out.wall_hits.push(false);
                if grid.is_junction(*cursor) {
                    remaining -= 1;
                }
            }
            i += 3;
        } else if let Some(slot) = token::call_slot(tok) {
            if depth < MAX_CALL_DEPTH && !bodies[slot].is_empty() {
                expand(grid, &bodies[slot], bodies, cursor, out, depth + 1);
            }
            i += 1;
        } else {
            // End and stray count literals: nothing to queue. Filler in
            // a library body lands here too.
            i += 1;
        }
    }
}
