//! Constraint graphs for test ordering
//!
//! This module provides the graph data structures and algorithms that the
//! ordering solver is built on:
//!
//! - Cycle detection with a human-readable cycle report
//! - Transitive dependant (closure) computation in either direction
//! - Topological sorting with a placement policy for isolated vertices
//!
//! # Design
//!
//! The module hides the graph representation behind two layers. [`IntGraph`]
//! works on dense integer vertex IDs and owns every algorithm. [`TokenGraph`]
//! wraps it behind a bijective mapping from arbitrary user tokens (test item
//! names, numbers, any hashable value) to those integer IDs, so callers never
//! see an internal ID.

mod error;
mod int_graph;
mod token_graph;

pub use error::{GraphError, GraphResult};
pub use int_graph::{Direction, IntGraph, IsolatedPolicy};
pub use token_graph::TokenGraph;
