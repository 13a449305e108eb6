//! Absolute execution positions
//!
//! Test items can claim one of sixteen absolute positions: eight ranks from
//! the start of the run and eight from the end. The name-to-rank tables are
//! the single immutable configuration shared by the solver and any host
//! integration; they are `const` and never change at runtime.

use super::error::SolverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of absolute slots on each end of the run
pub const SLOT_COUNT: usize = 8;

/// Head position names, indexed by rank: rank 0 runs first
pub const HEAD_NAMES: [&str; SLOT_COUNT] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth",
];

/// Tail position names, indexed by rank: the highest rank runs last
pub const TAIL_NAMES: [&str; SLOT_COUNT] = [
    "eighth_to_last",
    "seventh_to_last",
    "sixth_to_last",
    "fifth_to_last",
    "fourth_to_last",
    "third_to_last",
    "second_to_last",
    "last",
];

/// One of the sixteen recognized absolute positions
///
/// The rank is an index into [`HEAD_NAMES`] or [`TAIL_NAMES`]; both tables
/// are ordered by execution order, so `Head(0)` is the very first item and
/// `Tail(SLOT_COUNT - 1)` the very last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// A rank counted from the start of the run
    Head(usize),
    /// A rank counted towards the end of the run
    Tail(usize),
}

impl Position {
    /// Returns the rank within the head or tail run
    pub fn rank(&self) -> usize {
        match *self {
            Position::Head(rank) | Position::Tail(rank) => rank,
        }
    }

    /// Returns the position name, if the rank is within the slot tables
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Position::Head(rank) => HEAD_NAMES.get(rank).copied(),
            Position::Tail(rank) => TAIL_NAMES.get(rank).copied(),
        }
    }
}

impl FromStr for Position {
    type Err = SolverError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(rank) = HEAD_NAMES.iter().position(|&n| n == name) {
            return Ok(Position::Head(rank));
        }
        if let Some(rank) = TAIL_NAMES.iter().position(|&n| n == name) {
            return Ok(Position::Tail(rank));
        }
        Err(SolverError::UnknownPosition(name.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => match *self {
                Position::Head(rank) => write!(f, "head+{rank}"),
                Position::Tail(rank) => write!(f, "tail+{rank}"),
            },
        }
    }
}
