//! Error types for ordering resolution
//!
//! Every failure is fatal to the current sort attempt; nothing is retried.
//! Graph-level errors never cross this boundary: the solver translates them
//! into one of the variants below before returning.

use thiserror::Error;

/// Result type for ordering resolution
pub type SolverResult<T> = Result<T, SolverError>;

/// Errors that can occur while resolving an execution order
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SolverError {
    /// The declared relations and positions form a cycle
    #[error("test items contain a relation cycle: {}", closed_walk(.cycle))]
    RelationCycle {
        /// The cycle as an ordered token sequence, each token once
        cycle: Vec<String>,
    },

    /// An explicit relation pulls an item out of the declared start run
    #[error(
        "start items cannot run in the declared order: {} point to a start item; \
         remove these relations to run the tests in the declared order",
        .items.join(", ")
    )]
    HeadOrderConflict {
        /// The offending tokens
        items: Vec<String>,
    },

    /// An explicit relation pulls an item out of the declared end run
    #[error(
        "end items cannot run in the declared order: end items point to {}; \
         remove these relations to run the tests in the declared order",
        .items.join(", ")
    )]
    TailOrderConflict {
        /// The offending tokens
        items: Vec<String>,
    },

    /// An absolute-position name outside the recognized set
    #[error("unrecognized position name: {0}")]
    UnknownPosition(String),
}

impl SolverError {
    /// Creates a relation cycle error from an ordered token sequence
    pub fn relation_cycle(cycle: Vec<String>) -> Self {
        Self::RelationCycle { cycle }
    }

    /// Creates a start-run conflict error
    pub fn head_conflict(items: Vec<String>) -> Self {
        Self::HeadOrderConflict { items }
    }

    /// Creates an end-run conflict error
    pub fn tail_conflict(items: Vec<String>) -> Self {
        Self::TailOrderConflict { items }
    }
}

/// Joins a cycle arrow-wise, repeating the first token to close the walk
fn closed_walk(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {}", cycle.join(" -> "), first),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_cycle_display_closes_the_walk() {
        let err = SolverError::relation_cycle(vec![
            "t1".to_string(),
            "t2".to_string(),
            "t3".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "test items contain a relation cycle: t1 -> t2 -> t3 -> t1"
        );
    }

    #[test]
    fn test_head_conflict_display_names_items() {
        let err = SolverError::head_conflict(vec!["x".to_string(), "y".to_string()]);
        let message = err.to_string();
        assert!(message.contains("x, y"));
        assert!(message.contains("start item"));
    }
}
