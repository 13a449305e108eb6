//! Host-runner integration surface
//!
//! A test runner that wants its collection reordered collects one [`Item`]
//! per discovered test (the item's name, its declared absolute position if
//! any, and its explicit before/after relations) and hands the batch to
//! [`order`]. The returned name list is the execution order; the host
//! reorders its own collection to match.
//!
//! This layer is deliberately thin: declared intent is parsed and validated
//! here, everything else is the [`Solver`](crate::Solver).

use crate::solver::{Position, Solver, SolverResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One discovered test item and its declared ordering intent
///
/// `position` holds one of the sixteen recognized absolute-position names
/// (`"first"` .. `"eighth"`, `"eighth_to_last"` .. `"last"`); it is parsed
/// and validated when the batch is ordered. `before` and `after` name other
/// items by their tokens; names that never appear as items of their own are
/// still honored as vertices in the constraint graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Token identifying the test item; assumed stable for one session
    pub name: String,
    /// Declared absolute-position name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Items that must run after this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<String>,
    /// Items that must run before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
}

impl Item {
    /// Creates an item with no declared intent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Claims an absolute position by name
    pub fn at(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Declares that this item runs before `other`
    pub fn runs_before(mut self, other: impl Into<String>) -> Self {
        self.before.push(other.into());
        self
    }

    /// Declares that this item runs after `other`
    pub fn runs_after(mut self, other: impl Into<String>) -> Self {
        self.after.push(other.into());
        self
    }
}

/// Resolves a batch of declared items into an execution order
///
/// Position names are validated eagerly, before any graph work; the first
/// unrecognized name fails the whole batch. Relation declarations are fed
/// to the solver with `after` inverted, so both spellings produce the same
/// edge direction.
pub fn order(items: &[Item]) -> SolverResult<Vec<String>> {
    let mut solver = Solver::new();

    for item in items {
        let position = item
            .position
            .as_deref()
            .map(str::parse::<Position>)
            .transpose()?;
        solver.register_item(item.name.clone(), position);
    }
    for item in items {
        for later in &item.before {
            solver.register_relation(item.name.clone(), later.clone());
        }
        for earlier in &item.after {
            solver.register_relation(earlier.clone(), item.name.clone());
        }
    }

    debug!(items = items.len(), "ordering declared test items");
    solver.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolverError;

    #[test]
    fn test_before_and_after_produce_the_same_edge() {
        let with_before = vec![Item::new("a").runs_before("b"), Item::new("b")];
        let with_after = vec![Item::new("a"), Item::new("b").runs_after("a")];

        assert_eq!(order(&with_before).unwrap(), order(&with_after).unwrap());
    }

    #[test]
    fn test_position_names_are_applied() {
        let items = vec![
            Item::new("teardown").at("last"),
            Item::new("setup").at("first"),
            Item::new("work"),
        ];

        assert_eq!(order(&items).unwrap(), vec!["setup", "work", "teardown"]);
    }

    #[test]
    fn test_unknown_position_fails_eagerly() {
        let items = vec![Item::new("a").at("soonish")];

        let err = order(&items).unwrap_err();
        assert!(matches!(err, SolverError::UnknownPosition(name) if name == "soonish"));
    }

    #[test]
    fn test_relation_to_undeclared_item_creates_it() {
        let items = vec![Item::new("a").runs_after("phantom")];

        assert_eq!(order(&items).unwrap(), vec!["phantom", "a"]);
    }

    #[test]
    fn test_items_from_json() {
        let raw = r#"[
            {"name": "boot", "position": "first"},
            {"name": "shutdown", "position": "last"},
            {"name": "write", "after": ["boot"]},
            {"name": "read", "after": ["write"]}
        ]"#;

        let items: Vec<Item> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            order(&items).unwrap(),
            vec!["boot", "write", "read", "shutdown"]
        );
    }
}
