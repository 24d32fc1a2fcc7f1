//! Ontological inference: causal edges flow down `isA` hierarchies.
//!
//! If `child isA node` and `node increases X`, then `child increases X` is
//! added with the same evidence, citation, annotations and modifiers. The
//! walk continues into each child's own children, so a child that already
//! inherited edges passes them on further down.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::canonical::NodeId;
use crate::error::{BelResult, GraphError};
use crate::graph::traverse::children;
use crate::graph::{BelGraph, EdgeRecord};
use crate::language::Relation;

/// `[inference]` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Do not copy an edge onto a child that already has an identical one.
    /// Off by default: repeated runs add duplicate parallel edges.
    pub skip_existing: bool,
}

/// Outcome of an inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    /// Causal edges copied onto descendants.
    pub edges_added: usize,
    /// `isA` edges followed.
    pub children_visited: usize,
}

/// Copy every causal edge of `source` onto `target`: outgoing edges keep
/// their target, incoming edges keep their source. Returns the number of
/// edges added.
pub fn transfer_causal_edges(
    graph: &mut BelGraph,
    source: &NodeId,
    target: &NodeId,
    config: &InferenceConfig,
) -> BelResult<usize> {
    let outgoing = graph.out_edges(source).into_iter().map(|e| EdgeRecord {
        source: target.clone(),
        ..e
    });
    let incoming = graph.in_edges(source).into_iter().map(|e| EdgeRecord {
        target: target.clone(),
        ..e
    });
    let candidates: Vec<EdgeRecord> = outgoing
        .chain(incoming)
        .filter(|e| e.data.relation.is_causal())
        .collect();

    let mut added = 0;
    for edge in candidates {
        if config.skip_existing && graph.has_qualified_edge(&edge.source, &edge.target, &edge.data) {
            continue;
        }
        graph.add_qualified_edge(&edge.source, &edge.target, edge.data)?;
        added += 1;
    }
    Ok(added)
}

/// Propagate the causal edges of `node` to every node below it in the
/// `isA` hierarchy.
///
/// Children are visited depth-first in edge order: a child receives its
/// parent's edges before its own children are processed. Each `isA` edge is
/// followed at most once, so cyclic hierarchies terminate. Self-loops
/// (`x isA x`) are ignored.
pub fn infer_child_relations(
    graph: &mut BelGraph,
    node: &NodeId,
    config: &InferenceConfig,
) -> BelResult<InferenceReport> {
    if !graph.has_node(node) {
        return Err(GraphError::InvalidNode {
            node: node.to_string(),
        }
        .into());
    }

    let mut report = InferenceReport::default();
    let mut followed: HashSet<(NodeId, NodeId)> = HashSet::new();

    // Stack of (parent, child) is-a edges still to process.
    let mut stack: Vec<(NodeId, NodeId)> = children(graph, node, Relation::IsA)
        .into_iter()
        .rev()
        .map(|child| (node.clone(), child))
        .collect();

    while let Some((parent, child)) = stack.pop() {
        // `x isA x` adds nothing to inherit.
        if child == parent || !followed.insert((child.clone(), parent.clone())) {
            continue;
        }
        report.children_visited += 1;
        report.edges_added += transfer_causal_edges(graph, &parent, &child, config)?;

        for grandchild in children(graph, &child, Relation::IsA).into_iter().rev() {
            stack.push((child.clone(), grandchild));
        }
    }

    tracing::info!(
        node = %node,
        edges_added = report.edges_added,
        children_visited = report.children_visited,
        "ontological inference complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeData;
    use crate::language::Function;
    use crate::provenance::Citation;

    fn bp(name: &str) -> NodeId {
        NodeId::named(Function::BiologicalProcess, "GO", name)
    }

    fn cited(relation: Relation) -> EdgeData {
        EdgeData::new(relation)
            .with_citation(Citation::new("PubMed", "title", "1"))
            .with_evidence("text")
    }

    /// parent increases target; source decreases parent; child isA parent.
    fn build() -> BelGraph {
        let mut graph = BelGraph::new();
        for name in ["parent", "child", "target", "source"] {
            graph.ensure_node(&bp(name));
        }
        graph.add_qualified_edge(&bp("parent"), &bp("target"), cited(Relation::Increases)).unwrap();
        graph.add_qualified_edge(&bp("source"), &bp("parent"), cited(Relation::Decreases)).unwrap();
        graph.add_unqualified_edge(&bp("child"), &bp("parent"), Relation::IsA).unwrap();
        graph
    }

    #[test]
    fn causal_edges_transfer_to_child() {
        let mut graph = build();
        let report = infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        assert_eq!(report.edges_added, 2);
        assert_eq!(report.children_visited, 1);
        assert!(graph.has_relation(&bp("child"), &bp("target"), Relation::Increases));
        assert!(graph.has_relation(&bp("source"), &bp("child"), Relation::Decreases));
    }

    #[test]
    fn copied_edges_keep_provenance() {
        let mut graph = build();
        infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        let copied = &graph.out_edges(&bp("child"))
            .into_iter()
            .find(|e| e.data.relation == Relation::Increases)
            .unwrap();
        assert!(copied.data.same_assertion(&cited(Relation::Increases)));
    }

    #[test]
    fn non_causal_edges_stay() {
        let mut graph = build();
        graph.ensure_node(&bp("friend"));
        graph
            .add_qualified_edge(&bp("parent"), &bp("friend"), EdgeData::new(Relation::Association))
            .unwrap();
        infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        assert!(!graph.has_edge(&bp("child"), &bp("friend")));
    }

    #[test]
    fn inheritance_passes_to_grandchildren() {
        let mut graph = build();
        graph.ensure_node(&bp("grandchild"));
        graph.add_unqualified_edge(&bp("grandchild"), &bp("child"), Relation::IsA).unwrap();
        infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        assert!(graph.has_relation(&bp("grandchild"), &bp("target"), Relation::Increases));
    }

    #[test]
    fn repeated_runs_accumulate_unless_skipping() {
        let mut graph = build();
        let config = InferenceConfig::default();
        infer_child_relations(&mut graph, &bp("parent"), &config).unwrap();
        infer_child_relations(&mut graph, &bp("parent"), &config).unwrap();
        assert_eq!(graph.edge_multiplicity(&bp("child"), &bp("target")), 2);

        let mut graph = build();
        let skip = InferenceConfig { skip_existing: true };
        infer_child_relations(&mut graph, &bp("parent"), &skip).unwrap();
        let second = infer_child_relations(&mut graph, &bp("parent"), &skip).unwrap();
        assert_eq!(second.edges_added, 0);
        assert_eq!(graph.edge_multiplicity(&bp("child"), &bp("target")), 1);
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let mut graph = build();
        graph.add_unqualified_edge(&bp("parent"), &bp("child"), Relation::IsA).unwrap();
        let report = infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        assert_eq!(report.children_visited, 2);
    }

    #[test]
    fn self_loop_copies_nothing() {
        let mut graph = build();
        graph.add_unqualified_edge(&bp("parent"), &bp("parent"), Relation::IsA).unwrap();
        let report = infer_child_relations(&mut graph, &bp("parent"), &InferenceConfig::default()).unwrap();
        assert_eq!(report.children_visited, 1);
        assert_eq!(report.edges_added, 2);
        assert_eq!(graph.edge_multiplicity(&bp("parent"), &bp("target")), 1);
    }

    #[test]
    fn unknown_node_is_invalid() {
        let mut graph = build();
        assert!(infer_child_relations(&mut graph, &bp("nowhere"), &InferenceConfig::default()).is_err());
    }
}
