//! Directed graph over dense integer vertex IDs
//!
//! This is the algorithmic core of the crate: adjacency management, cycle
//! detection, transitive dependant computation and topological sorting all
//! live here, keyed on small non-negative integers assigned by the caller.
//!
//! # Design
//!
//! The graph uses a bidirectional adjacency list representation:
//! - `forward`: successors of a vertex (outgoing edges)
//! - `inverse`: predecessors of a vertex (incoming edges)
//!
//! The two maps are kept symmetric: an edge is present in `forward` exactly
//! when its reverse is present in `inverse`. A separate `vertices` list
//! records insertion order, which drives every traversal so that results are
//! deterministic for a given construction sequence.
//!
//! All traversals use explicit stacks rather than recursion, so graph depth
//! is never limited by the call stack.

use super::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Traversal direction for dependant queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing edges (successors)
    Forward,
    /// Follow incoming edges (predecessors)
    Backward,
}

/// Placement of isolated vertices in a topological sort result
///
/// An isolated vertex has neither incoming nor outgoing edges. The sort
/// stabilizes such vertices to one end of the result, in insertion order
/// among themselves, instead of interleaving them with constrained vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsolatedPolicy {
    /// Isolated vertices come before all constrained vertices
    Start,
    /// Isolated vertices come after all constrained vertices
    End,
}

/// A directed graph over dense integer vertex IDs
///
/// # Example
///
/// ```
/// use taxis::graph::{IntGraph, IsolatedPolicy};
///
/// let mut graph = IntGraph::new();
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
///
/// assert!(!graph.is_cyclic());
/// let order = graph.topological_sort(IsolatedPolicy::End).unwrap();
/// assert_eq!(order, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntGraph {
    /// Vertices in insertion order
    vertices: Vec<usize>,
    /// Successor adjacency lists
    forward: HashMap<usize, Vec<usize>>,
    /// Predecessor adjacency lists, symmetric with `forward`
    inverse: HashMap<usize, Vec<usize>>,
    /// Cached cycle result; `None` means stale
    #[serde(skip)]
    cycle_cache: Option<Vec<usize>>,
}

impl IntGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if the vertex is present
    pub fn contains(&self, id: usize) -> bool {
        self.vertices.contains(&id)
    }

    /// Returns all vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices.iter().copied()
    }

    /// Returns the successors of a vertex, in edge insertion order
    pub fn successors(&self, id: usize) -> &[usize] {
        self.forward.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the predecessors of a vertex, in edge insertion order
    pub fn predecessors(&self, id: usize) -> &[usize] {
        self.inverse.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds a vertex; no-op if it is already present
    pub fn add_vertex(&mut self, id: usize) {
        if !self.contains(id) {
            self.cycle_cache = None;
            self.vertices.push(id);
        }
    }

    /// Removes a vertex together with every incident edge, in both
    /// directions; no-op if the vertex is absent
    pub fn remove_vertex(&mut self, id: usize) {
        if !self.contains(id) {
            return;
        }
        self.cycle_cache = None;
        self.vertices.retain(|&v| v != id);
        self.forward.remove(&id);
        self.inverse.remove(&id);
        for successors in self.forward.values_mut() {
            successors.retain(|&v| v != id);
        }
        for predecessors in self.inverse.values_mut() {
            predecessors.retain(|&v| v != id);
        }
    }

    /// Adds the edge `from -> to`, creating missing vertices
    ///
    /// Edges form a set per ordered pair: adding an existing edge is a no-op.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.add_vertex(from);
        self.add_vertex(to);

        let successors = self.forward.entry(from).or_default();
        if !successors.contains(&to) {
            self.cycle_cache = None;
            successors.push(to);
            self.inverse.entry(to).or_default().push(from);
        }
    }

    /// Removes the edge `from -> to`; no-op if the edge is absent
    pub fn remove_edge(&mut self, from: usize, to: usize) {
        if let Some(successors) = self.forward.get_mut(&from) {
            if successors.contains(&to) {
                self.cycle_cache = None;
                successors.retain(|&v| v != to);
                if let Some(predecessors) = self.inverse.get_mut(&to) {
                    predecessors.retain(|&v| v != from);
                }
            }
        }
    }

    /// Returns one cycle as a vertex sequence in traversal order, or an
    /// empty sequence if the graph is acyclic
    ///
    /// The search walks depth-first from unvisited vertices in insertion
    /// order; on discovering a back-edge to a vertex on the current walk,
    /// the partial walk from that vertex to the current one is the cycle.
    /// Which cycle is reported therefore depends only on insertion order.
    /// The result is cached until the next mutation.
    pub fn cycle(&mut self) -> Vec<usize> {
        if self.cycle_cache.is_none() {
            self.cycle_cache = Some(self.find_cycle());
        }
        self.cycle_cache.clone().unwrap_or_default()
    }

    /// Returns true if the graph contains at least one cycle
    pub fn is_cyclic(&mut self) -> bool {
        !self.cycle().is_empty()
    }

    fn find_cycle(&self) -> Vec<usize> {
        let mut visited: HashSet<usize> = HashSet::new();

        for &root in &self.vertices {
            if visited.contains(&root) {
                continue;
            }
            visited.insert(root);
            let mut on_walk = HashSet::from([root]);
            let mut walk = vec![root];
            // Frame: (vertex, index of the next successor to explore)
            let mut frames = vec![(root, 0usize)];

            while let Some(&mut (vertex, ref mut next)) = frames.last_mut() {
                let successors = self.successors(vertex);
                if *next >= successors.len() {
                    frames.pop();
                    walk.pop();
                    on_walk.remove(&vertex);
                    continue;
                }
                let candidate = successors[*next];
                *next += 1;

                if on_walk.contains(&candidate) {
                    // The back-edge target is always on the current walk.
                    let start = walk.iter().position(|&v| v == candidate).unwrap_or(0);
                    return walk[start..].to_vec();
                }
                if visited.insert(candidate) {
                    on_walk.insert(candidate);
                    walk.push(candidate);
                    frames.push((candidate, 0));
                }
            }
        }

        Vec::new()
    }

    /// Returns the transitive closure of successors (`Direction::Forward`)
    /// or predecessors (`Direction::Backward`) of `id`, excluding `id`
    /// itself
    ///
    /// The closure is duplicate-free and deterministically ordered: at every
    /// vertex the most recently added edge is explored first, so a run of
    /// edges inserted consecutively is walked contiguously. Returns
    /// [`GraphError::CycleDetected`] if a cycle is reachable from `id`,
    /// since a transitive closure is undefined on a cyclic region.
    pub fn dependants(&self, id: usize, direction: Direction) -> GraphResult<Vec<usize>> {
        if !self.contains(id) {
            return Ok(Vec::new());
        }

        let mut closure = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut on_walk = HashSet::from([id]);
        let mut walk = vec![id];
        // Frame: (vertex, number of adjacent vertices not yet explored)
        let mut frames = vec![(id, self.adjacent(id, direction).len())];

        while let Some(&mut (vertex, ref mut remaining)) = frames.last_mut() {
            if *remaining == 0 {
                frames.pop();
                walk.pop();
                on_walk.remove(&vertex);
                continue;
            }
            *remaining -= 1;
            // Newest edge first
            let candidate = self.adjacent(vertex, direction)[*remaining];

            if on_walk.contains(&candidate) {
                let start = walk.iter().position(|&v| v == candidate).unwrap_or(0);
                let path: Vec<String> = walk[start..].iter().map(|v| v.to_string()).collect();
                return Err(GraphError::cycle(path.join(" -> ")));
            }
            if visited.insert(candidate) {
                closure.push(candidate);
                on_walk.insert(candidate);
                walk.push(candidate);
                frames.push((candidate, self.adjacent(candidate, direction).len()));
            }
        }

        Ok(closure)
    }

    fn adjacent(&self, id: usize, direction: Direction) -> &[usize] {
        match direction {
            Direction::Forward => self.successors(id),
            Direction::Backward => self.predecessors(id),
        }
    }

    /// Returns a linear order in which every edge `(a, b)` places `a`
    /// before `b`
    ///
    /// Reverse Kahn's algorithm keyed on out-degree: repeatedly take the
    /// first remaining vertex (insertion order) with no outgoing edge,
    /// record it and remove it from a working copy; the final remaining
    /// vertex is recorded last; the recorded list reversed is the order.
    /// The sort is destructive, so it runs on a full structural copy and
    /// the graph itself stays untouched.
    ///
    /// Vertices that were isolated in the input graph are stabilized to one
    /// end of the result per `policy`, keeping insertion order among
    /// themselves. Fails with [`GraphError::NoSink`] on a cyclic graph.
    pub fn topological_sort(&self, policy: IsolatedPolicy) -> GraphResult<Vec<usize>> {
        let isolated: Vec<usize> = self
            .vertices
            .iter()
            .copied()
            .filter(|&v| self.successors(v).is_empty() && self.predecessors(v).is_empty())
            .collect();

        let mut work = self.clone();
        let mut removal_order = Vec::with_capacity(self.vertices.len());

        while work.vertices.len() > 1 {
            let sink = work
                .first_sink()
                .ok_or_else(|| GraphError::no_sink(work.vertices.len()))?;
            removal_order.push(sink);
            work.remove_vertex(sink);
        }
        if let Some(&lone) = work.vertices.first() {
            removal_order.push(lone);
        }
        removal_order.reverse();

        let constrained = removal_order.iter().copied().filter(|v| !isolated.contains(v));
        let floated = isolated.iter().copied();
        Ok(match policy {
            IsolatedPolicy::Start => floated.chain(constrained).collect(),
            IsolatedPolicy::End => constrained.chain(floated).collect(),
        })
    }

    fn first_sink(&self) -> Option<usize> {
        self.vertices
            .iter()
            .copied()
            .find(|&v| self.successors(v).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let mut graph = IntGraph::new();
        assert!(graph.is_empty());
        assert!(!graph.is_cyclic());
        assert_eq!(
            graph.topological_sort(IsolatedPolicy::End).unwrap(),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn test_add_vertex_idempotent() {
        let mut graph = IntGraph::new();
        graph.add_vertex(0);
        graph.add_vertex(0);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_add_edge_creates_vertices() {
        let mut graph = IntGraph::new();
        graph.add_edge(3, 7);
        assert!(graph.contains(3));
        assert!(graph.contains(7));
        assert_eq!(graph.successors(3), &[7]);
        assert_eq!(graph.predecessors(7), &[3]);
    }

    #[test]
    fn test_add_edge_no_duplicates() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 1);
        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.predecessors(1), &[0]);
    }

    #[test]
    fn test_remove_vertex_scrubs_edges() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);

        graph.remove_vertex(1);

        assert_eq!(graph.len(), 2);
        assert!(graph.successors(0).is_empty());
        assert!(graph.predecessors(2).is_empty());
        assert_eq!(graph.successors(2), &[0]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.remove_vertex(9);
        graph.remove_edge(1, 0);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.successors(0), &[1]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycle() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 3);
        graph.add_edge(2, 3);
        assert_eq!(graph.cycle(), Vec::<usize>::new());
        assert!(!graph.is_cyclic());
    }

    #[test]
    fn test_cycle_detection_triangle() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        assert_eq!(graph.cycle(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_behind_lead_in_path() {
        // 0 -> 1 -> 2 -> 1: the cycle excludes the lead-in vertex
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 1);
        assert_eq!(graph.cycle(), vec![1, 2]);
    }

    #[test]
    fn test_self_loop_is_cyclic() {
        let mut graph = IntGraph::new();
        graph.add_edge(4, 4);
        assert_eq!(graph.cycle(), vec![4]);
        assert!(graph.is_cyclic());
    }

    #[test]
    fn test_cycle_cache_invalidation() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 0);
        assert!(graph.is_cyclic());

        graph.remove_edge(1, 0);
        assert!(!graph.is_cyclic());

        graph.add_edge(1, 0);
        assert!(graph.is_cyclic());
    }

    #[test]
    fn test_dependants_forward() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 3);
        graph.add_edge(2, 3);

        let mut dependants = graph.dependants(0, Direction::Forward).unwrap();
        dependants.sort_unstable();
        assert_eq!(dependants, vec![1, 2, 3]);
    }

    #[test]
    fn test_dependants_backward() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);

        let dependants = graph.dependants(2, Direction::Backward).unwrap();
        assert_eq!(dependants, vec![1, 0]);
    }

    #[test]
    fn test_dependants_excludes_self() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        assert_eq!(graph.dependants(1, Direction::Forward).unwrap(), Vec::<usize>::new());
        assert_eq!(graph.dependants(0, Direction::Forward).unwrap(), vec![1]);
    }

    #[test]
    fn test_dependants_of_absent_vertex() {
        let graph = IntGraph::new();
        assert_eq!(graph.dependants(5, Direction::Forward).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_dependants_on_cycle_errors() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);

        let result = graph.dependants(0, Direction::Forward);
        assert!(matches!(result, Err(GraphError::CycleDetected { .. })));
    }

    #[test]
    fn test_dependants_ignores_unreachable_cycle() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(2, 3);
        graph.add_edge(3, 2);

        assert_eq!(graph.dependants(0, Direction::Forward).unwrap(), vec![1]);
    }

    #[test]
    fn test_dependants_newest_edge_first() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 9);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);

        // The 0 -> 1 edge was added after 0 -> 9, so the 1-chain is walked first
        assert_eq!(graph.dependants(0, Direction::Forward).unwrap(), vec![1, 2, 9]);
    }

    #[test]
    fn test_topological_sort_linear() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        assert_eq!(graph.topological_sort(IsolatedPolicy::End).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_topological_sort_diamond() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 3);
        graph.add_edge(2, 3);

        let order = graph.topological_sort(IsolatedPolicy::End).unwrap();
        let index = |v: usize| order.iter().position(|&x| x == v).unwrap();
        assert!(index(0) < index(1));
        assert!(index(0) < index(2));
        assert!(index(1) < index(3));
        assert!(index(2) < index(3));
    }

    #[test]
    fn test_topological_sort_isolated_end() {
        let mut graph = IntGraph::new();
        graph.add_vertex(7);
        graph.add_edge(0, 1);
        graph.add_vertex(8);

        let order = graph.topological_sort(IsolatedPolicy::End).unwrap();
        assert_eq!(order, vec![0, 1, 7, 8]);
    }

    #[test]
    fn test_topological_sort_isolated_start() {
        let mut graph = IntGraph::new();
        graph.add_vertex(7);
        graph.add_edge(0, 1);
        graph.add_vertex(8);

        let order = graph.topological_sort(IsolatedPolicy::Start).unwrap();
        assert_eq!(order, vec![7, 8, 0, 1]);
    }

    #[test]
    fn test_topological_sort_cyclic_fails() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);

        let result = graph.topological_sort(IsolatedPolicy::End);
        assert!(matches!(result, Err(GraphError::NoSink { .. })));
    }

    #[test]
    fn test_topological_sort_leaves_graph_intact() {
        let mut graph = IntGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);

        graph.topological_sort(IsolatedPolicy::End).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.successors(1), &[2]);
        assert_eq!(graph.predecessors(2), &[1]);
    }
}
