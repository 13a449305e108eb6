//! Ordering resolution for declared test items
//!
//! The [`Solver`] is the top-level orchestrator, built once per test
//! session. The host integration feeds it every discovered item (with an
//! optional absolute [`Position`]) and every explicit before/after relation;
//! a single [`Solver::resolve`] call then validates the declarations and
//! returns the full execution order, or explains why none exists.
//!
//! Validation folds the absolute positions into the same graph as the
//! relations: consecutive occupied head slots are chained by edges, as are
//! consecutive occupied tail slots, so one set of graph algorithms handles
//! both constraint families.

mod error;
mod position;

pub use error::{SolverError, SolverResult};
pub use position::{Position, HEAD_NAMES, SLOT_COUNT, TAIL_NAMES};

use crate::graph::{Direction, IsolatedPolicy, TokenGraph};
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;

/// Resolves declared ordering constraints into one execution order
///
/// The solver is stateless across sessions: construct it, register every
/// item and relation, resolve once, discard it.
///
/// # Example
///
/// ```
/// use taxis::{Position, Solver};
///
/// let mut solver = Solver::new();
/// solver.register_item("boot", Some(Position::Head(0)));
/// solver.register_item("halt", Some(Position::Tail(7)));
/// solver.register_item("write", None);
/// solver.register_item("read", None);
/// solver.register_relation("write", "read");
///
/// let order = solver.resolve()?;
/// assert_eq!(order, vec!["boot", "write", "read", "halt"]);
/// # Ok::<(), taxis::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Solver<T> {
    /// Explicit relations plus, after preparation, the slot chains
    graph: TokenGraph<T>,
    /// Head slots by rank; `None` where unfilled
    head_slots: [Option<T>; SLOT_COUNT],
    /// Tail slots by rank; `None` where unfilled
    tail_slots: [Option<T>; SLOT_COUNT],
}

impl<T: Clone + Eq + Hash + Display> Default for Solver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash + Display> Solver<T> {
    /// Creates a solver with no declarations
    pub fn new() -> Self {
        Self {
            graph: TokenGraph::new(),
            head_slots: std::array::from_fn(|_| None),
            tail_slots: std::array::from_fn(|_| None),
        }
    }

    /// Registers a test item, optionally claiming an absolute position
    ///
    /// Registration is idempotent for the same token. A claimed slot is
    /// overwritten if a later registration names the same slot: keeping one
    /// token per slot is the caller's registration-time contract, not a
    /// graph invariant.
    pub fn register_item(&mut self, token: T, position: Option<Position>) {
        self.graph.add_vertex(token.clone());

        match position {
            Some(Position::Head(rank)) => {
                if let Some(slot) = self.head_slots.get_mut(rank) {
                    *slot = Some(token);
                }
            }
            Some(Position::Tail(rank)) => {
                if let Some(slot) = self.tail_slots.get_mut(rank) {
                    *slot = Some(token);
                }
            }
            None => {}
        }
    }

    /// Declares that `before` must execute before `after`
    ///
    /// Unseen tokens are registered implicitly.
    pub fn register_relation(&mut self, before: T, after: T) {
        self.graph.add_edge(before, after);
    }

    /// Resolves the declarations into a total execution order
    ///
    /// Either returns the complete order or fails; the caller never sees a
    /// partially reordered result, and the solver stays queryable after a
    /// failure.
    pub fn resolve(&mut self) -> SolverResult<Vec<T>> {
        self.prepare()?;

        let heads = self.occupied_heads();
        let tails = self.occupied_tails();

        // The slotted items have a fixed order of their own; sort the rest.
        let mut work = self.graph.clone();
        for token in heads.iter().chain(tails.iter()) {
            work.remove_vertex(token);
        }
        let remainder = match work.topological_sort(IsolatedPolicy::End) {
            Ok(remainder) => remainder,
            Err(_) => return Err(self.relation_cycle()),
        };

        let mut order = heads;
        order.extend(remainder);
        order.extend(tails);
        debug!(items = order.len(), "resolved execution order");
        Ok(order)
    }

    /// Renders the current constraint graph in Graphviz DOT format
    pub fn to_dot(&self) -> String {
        self.graph.to_dot()
    }

    /// Folds positions into the graph and validates feasibility
    fn prepare(&mut self) -> SolverResult<()> {
        self.materialize_chains();
        self.check_cycle()?;
        self.check_head_order()?;
        self.check_tail_order()?;
        debug!("ordering constraints validated");
        Ok(())
    }

    /// Chains consecutive occupied slots with edges, in rank order
    fn materialize_chains(&mut self) {
        let heads = self.occupied_heads();
        for pair in heads.windows(2) {
            self.graph.add_edge(pair[0].clone(), pair[1].clone());
        }
        let tails = self.occupied_tails();
        for pair in tails.windows(2) {
            self.graph.add_edge(pair[0].clone(), pair[1].clone());
        }
        debug!(
            head_slots = heads.len(),
            tail_slots = tails.len(),
            "materialized absolute-position chains"
        );
    }

    /// Fails if the combined relation/position graph is cyclic
    ///
    /// A cycle that runs through a slotted item means the declared position
    /// itself is unsatisfiable, and is reported as an order conflict rather
    /// than a plain relation cycle.
    fn check_cycle(&mut self) -> SolverResult<()> {
        let cycle = self.graph.cycle();
        if cycle.is_empty() {
            return Ok(());
        }

        let rendered: Vec<String> = cycle.iter().map(|t| t.to_string()).collect();
        if cycle.iter().any(|t| self.occupies_head_slot(t)) {
            return Err(SolverError::head_conflict(rendered));
        }
        if cycle.iter().any(|t| self.occupies_tail_slot(t)) {
            return Err(SolverError::tail_conflict(rendered));
        }
        Err(SolverError::relation_cycle(rendered))
    }

    /// Fails if an explicit relation contradicts the declared head ranking
    ///
    /// The backward closure of the last occupied head slot, reversed and
    /// with that item appended, must be exactly the occupied head run in
    /// rank order; anything else in the closure was pulled into the run by
    /// a relation. Skipped without touching the graph when no head slot is
    /// occupied.
    fn check_head_order(&mut self) -> SolverResult<()> {
        let heads = self.occupied_heads();
        let Some(anchor) = heads.last().cloned() else {
            return Ok(());
        };

        let closure = match self.graph.dependants(&anchor, Direction::Backward) {
            Ok(closure) => closure,
            Err(_) => return Err(self.relation_cycle()),
        };

        let mut execution_order: Vec<T> = closure.iter().rev().cloned().collect();
        execution_order.push(anchor);
        if execution_order != heads {
            let items = closure
                .into_iter()
                .filter(|t| !heads.contains(t))
                .map(|t| t.to_string())
                .collect();
            return Err(SolverError::head_conflict(items));
        }
        Ok(())
    }

    /// Fails if an explicit relation contradicts the declared tail ranking
    ///
    /// Symmetric to the head check: the forward closure of the first
    /// occupied tail slot, with that item prepended, must be exactly the
    /// occupied tail run in rank order.
    fn check_tail_order(&mut self) -> SolverResult<()> {
        let tails = self.occupied_tails();
        let Some(anchor) = tails.first().cloned() else {
            return Ok(());
        };

        let closure = match self.graph.dependants(&anchor, Direction::Forward) {
            Ok(closure) => closure,
            Err(_) => return Err(self.relation_cycle()),
        };

        let mut execution_order = vec![anchor];
        execution_order.extend(closure.iter().cloned());
        if execution_order != tails {
            let items = closure
                .into_iter()
                .filter(|t| !tails.contains(t))
                .map(|t| t.to_string())
                .collect();
            return Err(SolverError::tail_conflict(items));
        }
        Ok(())
    }

    /// The occupied head slots in rank order
    fn occupied_heads(&self) -> Vec<T> {
        self.head_slots.iter().flatten().cloned().collect()
    }

    /// The occupied tail slots in rank order
    fn occupied_tails(&self) -> Vec<T> {
        self.tail_slots.iter().flatten().cloned().collect()
    }

    fn occupies_head_slot(&self, token: &T) -> bool {
        self.head_slots.iter().flatten().any(|t| t == token)
    }

    fn occupies_tail_slot(&self, token: &T) -> bool {
        self.tail_slots.iter().flatten().any(|t| t == token)
    }

    fn relation_cycle(&mut self) -> SolverError {
        let cycle = self.graph.cycle().iter().map(|t| t.to_string()).collect();
        SolverError::relation_cycle(cycle)
    }
}
