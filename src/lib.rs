//! Taxis: constraint-based test ordering
//!
//! `taxis` (τάξις, Greek for "arrangement, ordering") decides the execution
//! order of a collection of test items from user-declared constraints:
//! absolute positions ("run this first", "run this last", and the ranks in
//! between) and relative relations ("run A before B"). It only ever decides
//! an order; it never runs anything.
//!
//! # Features
//!
//! - **Absolute positions**: eight ranks from the start of the run and
//!   eight from the end, by name (`first` .. `eighth`, `eighth_to_last` ..
//!   `last`)
//! - **Relative relations**: explicit before/after constraints between items
//! - **Cycle diagnostics**: contradictory constraints are reported with the
//!   offending cycle spelled out token by token
//! - **Stable placement**: items with no constraints keep their original
//!   order at the back of the run
//!
//! # Quick Start
//!
//! ```
//! use taxis::{Position, Solver};
//!
//! let mut solver = Solver::new();
//! solver.register_item("setup", Some(Position::Head(0)));
//! solver.register_item("teardown", Some(Position::Tail(7)));
//! solver.register_item("login", None);
//! solver.register_item("browse", None);
//! solver.register_relation("login", "browse");
//!
//! let order = solver.resolve()?;
//! assert_eq!(order, vec!["setup", "login", "browse", "teardown"]);
//! # Ok::<(), taxis::SolverError>(())
//! ```
//!
//! Hosts that collect declarations as plain data can use the
//! [`schedule`] module instead of driving the solver directly.
//!
//! # Module Organization
//!
//! Each module hides one design decision:
//!
//! - [`graph`]: constraint graph representation and algorithms (cycle
//!   detection, dependant closures, topological sort)
//! - [`solver`]: how positions and relations combine into one valid order
//! - [`schedule`]: the thin integration surface for a host test runner

pub mod graph;
pub mod schedule;
pub mod solver;

// Re-export commonly used types for convenience
pub use graph::{Direction, GraphError, GraphResult, IntGraph, IsolatedPolicy, TokenGraph};
pub use schedule::Item;
pub use solver::{Position, Solver, SolverError, SolverResult, HEAD_NAMES, SLOT_COUNT, TAIL_NAMES};

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use taxis::prelude::*;
///
/// let mut solver = Solver::new();
/// solver.register_item("only", None);
/// assert_eq!(solver.resolve().unwrap(), vec!["only"]);
/// ```
pub mod prelude {
    pub use crate::graph::{Direction, GraphError, GraphResult, IsolatedPolicy, TokenGraph};
    pub use crate::schedule::Item;
    pub use crate::solver::{Position, Solver, SolverError, SolverResult};
}
