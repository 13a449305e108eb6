//! Error types for graph operations

use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur during graph traversal and sorting
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// A cycle was reached while computing a transitive closure
    #[error("cycle reached during traversal: {path}")]
    CycleDetected {
        /// The on-stack walk that closed the cycle, arrow-joined
        path: String,
    },

    /// No sink vertex exists among the remaining vertices, so no
    /// topological order can be produced
    #[error("none of the {remaining} remaining vertices is a sink - the graph is cyclic")]
    NoSink {
        /// Number of vertices still unsorted when the search failed
        remaining: usize,
    },
}

impl GraphError {
    /// Creates a cycle detected error with the given walk
    pub fn cycle(path: impl Into<String>) -> Self {
        Self::CycleDetected { path: path.into() }
    }

    /// Creates a no-sink error
    pub fn no_sink(remaining: usize) -> Self {
        Self::NoSink { remaining }
    }
}
