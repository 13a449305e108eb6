//! Token-keyed adapter over the integer graph
//!
//! Callers identify vertices by arbitrary tokens (test item names, numbers,
//! any hashable value). This adapter owns a bijective mapping between those
//! tokens and the dense integer IDs of [`IntGraph`], translating arguments
//! and results on every operation so internal IDs never escape.
//!
//! Integer IDs come from a monotonically increasing counter and are never
//! reused, even after a vertex is removed, so a stale ID can never silently
//! alias a token added later.

use super::error::GraphResult;
use super::int_graph::{Direction, IntGraph, IsolatedPolicy};
use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// A directed graph whose vertices are user tokens
///
/// # Example
///
/// ```
/// use taxis::graph::TokenGraph;
///
/// let mut graph = TokenGraph::new();
/// graph.add_edge("login", "browse");
/// graph.add_edge("browse", "logout");
///
/// assert!(graph.is_acyclic());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: serde::Deserialize<'de> + Eq + Hash + Clone"
))]
pub struct TokenGraph<T> {
    /// Token to internal ID
    tokens: HashMap<T, usize>,
    /// Internal ID back to token; always a bijection with `tokens`
    tokens_inv: HashMap<usize, T>,
    /// Next ID to hand out; never decremented
    next_id: usize,
    inner: IntGraph,
}

impl<T> Default for TokenGraph<T> {
    fn default() -> Self {
        Self {
            tokens: HashMap::new(),
            tokens_inv: HashMap::new(),
            next_id: 0,
            inner: IntGraph::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> TokenGraph<T> {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the token is present
    pub fn contains(&self, token: &T) -> bool {
        self.tokens.contains_key(token)
    }

    /// Returns the internal ID for a token, interning it if unseen
    fn intern(&mut self, token: &T) -> usize {
        match self.tokens.get(token) {
            Some(&id) => id,
            None => self.add_vertex(token.clone()),
        }
    }

    /// Adds a vertex for the token and returns its internal ID
    ///
    /// An unseen token is assigned the next ID; a known token keeps the ID
    /// it already has, so registration is idempotent.
    pub fn add_vertex(&mut self, token: T) -> usize {
        if let Some(&id) = self.tokens.get(&token) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tokens.insert(token.clone(), id);
        self.tokens_inv.insert(id, token);
        self.inner.add_vertex(id);
        id
    }

    /// Removes the token's vertex and every incident edge; no-op if absent
    pub fn remove_vertex(&mut self, token: &T) {
        if let Some(id) = self.tokens.remove(token) {
            self.tokens_inv.remove(&id);
            self.inner.remove_vertex(id);
        }
    }

    /// Adds the edge `from -> to`, interning unseen tokens
    pub fn add_edge(&mut self, from: T, to: T) {
        let from_id = self.intern(&from);
        let to_id = self.intern(&to);
        self.inner.add_edge(from_id, to_id);
    }

    /// Removes the edge `from -> to`; no-op if either token or the edge is
    /// absent
    pub fn remove_edge(&mut self, from: &T, to: &T) {
        if let (Some(&from_id), Some(&to_id)) = (self.tokens.get(from), self.tokens.get(to)) {
            self.inner.remove_edge(from_id, to_id);
        }
    }

    /// Returns one cycle as a token sequence, empty if the graph is acyclic
    pub fn cycle(&mut self) -> Vec<T> {
        let ids = self.inner.cycle();
        ids.into_iter()
            .filter_map(|id| self.tokens_inv.get(&id).cloned())
            .collect()
    }

    /// Returns true if the graph contains at least one cycle
    pub fn is_cyclic(&mut self) -> bool {
        self.inner.is_cyclic()
    }

    /// Returns true if the graph contains no cycle
    pub fn is_acyclic(&mut self) -> bool {
        !self.is_cyclic()
    }

    /// Returns the transitive dependants of a token, interning it if unseen
    ///
    /// See [`IntGraph::dependants`] for ordering and failure semantics.
    pub fn dependants(&mut self, token: &T, direction: Direction) -> GraphResult<Vec<T>> {
        let id = self.intern(token);
        let ids = self.inner.dependants(id, direction)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| self.tokens_inv.get(&id).cloned())
            .collect())
    }

    /// Returns a topological order of the tokens
    ///
    /// See [`IntGraph::topological_sort`]; the graph itself stays untouched.
    pub fn topological_sort(&self, policy: IsolatedPolicy) -> GraphResult<Vec<T>> {
        let ids = self.inner.topological_sort(policy)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| self.tokens_inv.get(&id).cloned())
            .collect())
    }
}

impl<T: Clone + Eq + Hash + Display> TokenGraph<T> {
    /// Renders the graph in Graphviz DOT format
    ///
    /// Tokens become node labels; edges carry no label. Render with e.g.
    /// `dot -Tpng constraints.dot -o constraints.png`.
    pub fn to_dot(&self) -> String {
        let mut graph = DiGraph::<String, ()>::new();
        let mut indices = HashMap::new();

        for id in self.inner.vertices() {
            if let Some(token) = self.tokens_inv.get(&id) {
                indices.insert(id, graph.add_node(token.to_string()));
            }
        }
        for id in self.inner.vertices() {
            for &successor in self.inner.successors(id) {
                if let (Some(&a), Some(&b)) = (indices.get(&id), indices.get(&successor)) {
                    graph.add_edge(a, b, ());
                }
            }
        }

        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}
