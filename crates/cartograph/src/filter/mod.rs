//! Composable subgraph visibility facilities.
//!
//! Four independent facilities, none destructive to the underlying graph
//! except package scoping (which builds a new filtered payload):
//!
//! - [`LabelFilter`]: hide nodes whose kind is outside an allow-set.
//!   Edges are unaffected by this rule alone.
//! - [`EdgeKindFilter`]: hide edges whose relation kind is outside an
//!   allow-set. Nodes are unaffected.
//! - [`package`]: path-prefix scoping that produces a new `GraphData`,
//!   plus monorepo package auto-detection.
//! - [`focus`]: depth-limited neighborhood visibility around a focal node.
//!
//! The allow-set filters are consumed by the visual-state resolver as its
//! final hidden gate; scoping and focus compose on top of them.

pub mod focus;
pub mod package;

pub use focus::focus_set;
pub use package::{detect_packages, scope_to_prefix, PackageCandidate};

use std::collections::HashSet;

use crate::types::{EdgeKind, NodeKind};

/// Allow-set over node kinds: a node whose kind is not in the set is
/// hidden, regardless of which interaction rule matched it.
#[derive(Debug, Clone, Default)]
pub struct LabelFilter {
    allowed: HashSet<NodeKind>,
}

impl LabelFilter {
    /// Create a filter allowing exactly the given kinds.
    pub fn new(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            allowed: kinds.into_iter().collect(),
        }
    }

    /// Whether nodes of this kind stay visible.
    #[must_use]
    pub fn allows(&self, kind: NodeKind) -> bool {
        self.allowed.contains(&kind)
    }

    /// The allowed kinds.
    #[must_use]
    pub fn allowed(&self) -> &HashSet<NodeKind> {
        &self.allowed
    }
}

/// Allow-set over edge kinds: an edge whose kind is not in the set is
/// hidden. Hiding is a separate boolean, not a style change, so a
/// renderer can skip hidden edges entirely.
#[derive(Debug, Clone, Default)]
pub struct EdgeKindFilter {
    allowed: HashSet<EdgeKind>,
}

impl EdgeKindFilter {
    /// Create a filter allowing exactly the given kinds.
    pub fn new(kinds: impl IntoIterator<Item = EdgeKind>) -> Self {
        Self {
            allowed: kinds.into_iter().collect(),
        }
    }

    /// Whether edges of this kind stay visible.
    #[must_use]
    pub fn allows(&self, kind: EdgeKind) -> bool {
        self.allowed.contains(&kind)
    }

    /// The allowed kinds.
    #[must_use]
    pub fn allowed(&self) -> &HashSet<EdgeKind> {
        &self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_filter_gates_by_kind() {
        let filter = LabelFilter::new([NodeKind::Function, NodeKind::Class]);

        assert!(filter.allows(NodeKind::Function));
        assert!(filter.allows(NodeKind::Class));
        assert!(!filter.allows(NodeKind::Folder));
        assert!(!filter.allows(NodeKind::Variable));
    }

    #[test]
    fn empty_label_filter_hides_everything() {
        let filter = LabelFilter::new([]);
        assert!(!filter.allows(NodeKind::Function));
    }

    #[test]
    fn edge_kind_filter_gates_by_kind() {
        let filter = EdgeKindFilter::new([EdgeKind::Calls]);

        assert!(filter.allows(EdgeKind::Calls));
        assert!(!filter.allows(EdgeKind::Contains));
        assert!(!filter.allows(EdgeKind::MemberOf));
    }
}
