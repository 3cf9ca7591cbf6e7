//! Token vocabulary of the instruction language.
//!
//! A program is a flat sequence of integers. Tokens 0 through 3 are
//! directions, a handful of opcodes introduce structure, and the range
//! 113 through 998 references subroutines resolved through a library.

use crate::game::Direction;

/// Conditional-repeat opcode: `5 count dir` walks `dir` until blocked or
/// `count` junctions crossed.
pub const IF: i32 = 5;
/// Call the subroutine bound to slot 1.
pub const CALL_SLOT_1: i32 = 10;
/// Call the subroutine bound to slot 2.
pub const CALL_SLOT_2: i32 = 11;
/// Bounded-repeat opcode: `110 count dir` queues `count` moves in `dir`.
pub const LOOP: i32 = 110;
/// End of program; pass-1 scanning stops here.
pub const END: i32 = 112;
/// No-op filler, skipped at expansion time.
pub const FILLER: i32 = 999;
/// Lowest library-subroutine reference.
pub const LIBRARY_MIN: i32 = 113;
/// Highest library-subroutine reference.
pub const LIBRARY_MAX: i32 = 998;

/// Decode a direction token.
#[must_use]
pub const fn direction(token: i32) -> Option<Direction> {
    match token {
        0 => Some(Direction::Up),
        1 => Some(Direction::Down),
        2 => Some(Direction::Left),
        3 => Some(Direction::Right),
        _ => None,
    }
}

/// Decode a slot-call token to its slot index.
#[must_use]
pub const fn call_slot(token: i32) -> Option<usize> {
    match token {
        CALL_SLOT_1 => Some(0),
        CALL_SLOT_2 => Some(1),
        _ => None,
    }
}

/// True for a library-subroutine reference.
#[must_use]
pub const fn is_library_ref(token: i32) -> bool {
    token >= LIBRARY_MIN && token <= LIBRARY_MAX
}

/// Decode a bounded-repeat count literal; `100` means ten repeats.
#[must_use]
pub const fn repeat_count(token: i32) -> Option<u32> {
    match token {
        100 => Some(10),
        101 => Some(1),
        102 => Some(2),
        103 => Some(3),
        104 => Some(4),
        105 => Some(5),
        106 => Some(6),
        107 => Some(7),
        108 => Some(8),
        109 => Some(9),
        _ => None,
    }
}

/// Decode a conditional-repeat count literal (junctions to cross).
#[must_use]
pub const fn conditional_count(token: i32) -> Option<u32> {
    match token {
        101..=107 => repeat_count(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_tokens() {
        assert_eq!(direction(0), Some(Direction::Up));
        assert_eq!(direction(3), Some(Direction::Right));
        assert_eq!(direction(4), None);
        assert_eq!(direction(-1), None);
        assert_eq!(direction(112), None);
    }

    #[test]
    fn test_repeat_counts() {
        assert_eq!(repeat_count(100), Some(10));
        assert_eq!(repeat_count(101), Some(1));
        assert_eq!(repeat_count(109), Some(9));
        assert_eq!(repeat_count(110), None);
        assert_eq!(repeat_count(99), None);
    }

    #[test]
    fn test_conditional_counts_are_narrower() {
        assert_eq!(conditional_count(101), Some(1));
        assert_eq!(conditional_count(107), Some(7));
        assert_eq!(conditional_count(100), None);
        assert_eq!(conditional_count(108), None);
        assert_eq!(conditional_count(109), None);
    }

    #[test]
    fn test_library_range() {
        assert!(!is_library_ref(112));
        assert!(is_library_ref(113));
        assert!(is_library_ref(998));
        assert!(!is_library_ref(999));
    }

    #[test]
    fn test_call_slots() {
        assert_eq!(call_slot(CALL_SLOT_1), Some(0));
        assert_eq!(call_slot(CALL_SLOT_2), Some(1));
        assert_eq!(call_slot(12), None);
    }
}
