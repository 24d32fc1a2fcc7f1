//! Hierarchy lookups.
//!
//! Hierarchical relations (`isA`, `partOf`, `hasMember`, ...) point from the
//! more specific node to the more general one, so "children" of a node are
//! the sources of its incoming edges.

use crate::canonical::NodeId;
use crate::language::Relation;

use super::index::BelGraph;

/// Direct children of `node` along `relation`, in edge insertion order.
pub fn children(graph: &BelGraph, node: &NodeId, relation: Relation) -> Vec<NodeId> {
    graph
        .in_edges(node)
        .into_iter()
        .filter(|e| e.data.relation == relation)
        .map(|e| e.source)
        .collect()
}
