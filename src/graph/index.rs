//! In-memory BEL graph.
//!
//! Uses `petgraph` for the multigraph structure and a `HashMap` from
//! canonical [`NodeId`] to `NodeIndex` for O(1) node lookups. Mutation
//! takes `&mut self`; there is no removal API, so node and edge counts only
//! grow.

use std::collections::{BTreeMap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use serde_json::{Value, json};

use super::edge::{EdgeData, EdgeRecord};
use crate::canonical::{NodeAttributes, NodeId, node_attributes};
use crate::error::{BelResult, GraphError};
use crate::language::Relation;
use crate::provenance;

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// A node: its identity plus merged attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub attributes: NodeAttributes,
}

/// Directed multigraph of BEL nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct BelGraph {
    graph: DiGraph<NodeRecord, EdgeData>,
    node_index: HashMap<NodeId, NodeIndex>,
    /// Free-form document metadata (name, version, ...).
    document: BTreeMap<String, String>,
}

impl BelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, id: &NodeId) -> GraphResult<NodeIndex> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::InvalidNode {
                node: id.to_string(),
            })
    }

    // ── Nodes ──────────────────────────────────────────────────────────

    /// Insert a node or merge attributes into an existing one.
    ///
    /// Missing keys are added. A key whose value differs keeps the existing
    /// value and logs a warning. Returns `true` if the node is new.
    pub fn add_node(&mut self, id: &NodeId, attributes: NodeAttributes) -> bool {
        if let Some(&idx) = self.node_index.get(id) {
            let existing = &mut self.graph[idx].attributes;
            for (key, value) in attributes {
                match existing.get(&key) {
                    None => {
                        existing.insert(key, value);
                    }
                    Some(current) if *current == value => {}
                    Some(current) => {
                        tracing::warn!(
                            node = %id,
                            key = %key,
                            kept = %current,
                            ignored = %value,
                            "conflicting node attribute, keeping existing value"
                        );
                    }
                }
            }
            return false;
        }
        let idx = self.graph.add_node(NodeRecord {
            id: id.clone(),
            attributes,
        });
        self.node_index.insert(id.clone(), idx);
        true
    }

    /// Insert a node with the attributes derived from its identity.
    pub fn ensure_node(&mut self, id: &NodeId) -> bool {
        self.add_node(id, node_attributes(id))
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_attributes(&self, id: &NodeId) -> Option<&NodeAttributes> {
        self.node_index.get(id).map(|&idx| &self.graph[idx].attributes)
    }

    /// All node identities, in insertion order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    // ── Edges ──────────────────────────────────────────────────────────

    /// Add an edge carrying provenance. Always inserts a new parallel edge.
    ///
    /// Causal relations are rejected unless the edge has evidence and a
    /// complete citation. Both endpoints must already exist.
    pub fn add_qualified_edge(&mut self, u: &NodeId, v: &NodeId, data: EdgeData) -> BelResult<()> {
        provenance::validate(
            data.relation,
            data.citation.as_ref(),
            data.evidence.as_deref(),
            false,
        )?;
        let (source, target) = (self.index_of(u)?, self.index_of(v)?);
        self.graph.add_edge(source, target, data);
        Ok(())
    }

    /// Add a provenance-free edge unless one with the same relation already
    /// connects `u` to `v`. Returns `true` if an edge was added.
    pub fn add_unqualified_edge(&mut self, u: &NodeId, v: &NodeId, relation: Relation) -> GraphResult<bool> {
        let (source, target) = (self.index_of(u)?, self.index_of(v)?);
        let exists = self
            .graph
            .edges_connecting(source, target)
            .any(|e| e.weight().relation == relation);
        if exists {
            return Ok(false);
        }
        self.graph.add_edge(source, target, EdgeData::new(relation));
        Ok(true)
    }

    /// Whether any edge runs from `u` to `v`.
    pub fn has_edge(&self, u: &NodeId, v: &NodeId) -> bool {
        self.connecting(u, v).next().is_some()
    }

    /// Whether an edge with this relation runs from `u` to `v`.
    pub fn has_relation(&self, u: &NodeId, v: &NodeId, relation: Relation) -> bool {
        self.connecting(u, v).any(|data| data.relation == relation)
    }

    /// Whether an edge making the same assertion already runs from `u` to `v`.
    pub fn has_qualified_edge(&self, u: &NodeId, v: &NodeId, data: &EdgeData) -> bool {
        self.connecting(u, v).any(|existing| existing.same_assertion(data))
    }

    /// Number of edges from `u` to `v`.
    pub fn edge_multiplicity(&self, u: &NodeId, v: &NodeId) -> usize {
        self.connecting(u, v).count()
    }

    fn connecting<'a>(&'a self, u: &NodeId, v: &NodeId) -> impl Iterator<Item = &'a EdgeData> + 'a {
        let pair = self.node_index.get(u).copied().zip(self.node_index.get(v).copied());
        pair.into_iter()
            .flat_map(move |(source, target)| self.graph.edges_connecting(source, target))
            .map(|e| e.weight())
    }

    // petgraph walks a node's adjacency list newest first; edge indices are
    // stable without removals, so sorting by index restores insertion order.
    fn records(&self, idx: NodeIndex, direction: Direction) -> Vec<EdgeRecord> {
        let mut adjacent: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        adjacent.sort_by_key(|e| e.id());
        adjacent
            .into_iter()
            .map(|e| EdgeRecord {
                source: self.graph[e.source()].id.clone(),
                target: self.graph[e.target()].id.clone(),
                data: e.weight().clone(),
            })
            .collect()
    }

    /// Edges leaving `id`, in insertion order. Empty if the node does not
    /// exist.
    pub fn out_edges(&self, id: &NodeId) -> Vec<EdgeRecord> {
        self.node_index
            .get(id)
            .map(|&idx| self.records(idx, Direction::Outgoing))
            .unwrap_or_default()
    }

    /// Edges entering `id`, in insertion order. Empty if the node does not
    /// exist.
    pub fn in_edges(&self, id: &NodeId) -> Vec<EdgeRecord> {
        self.node_index
            .get(id)
            .map(|&idx| self.records(idx, Direction::Incoming))
            .unwrap_or_default()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> Vec<EdgeRecord> {
        self.graph
            .edge_references()
            .map(|e| EdgeRecord {
                source: self.graph[e.source()].id.clone(),
                target: self.graph[e.target()].id.clone(),
                data: e.weight().clone(),
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // ── Document metadata ──────────────────────────────────────────────

    pub fn document(&self) -> &BTreeMap<String, String> {
        &self.document
    }

    pub fn set_document(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.document.insert(key.into(), value.into());
    }

    /// JSON rendering of the whole graph: document, nodes and edges.
    pub fn to_json(&self) -> Value {
        let nodes: Vec<&NodeRecord> = self.graph.node_weights().collect();
        let edges = self.edges();
        json!({
            "document": self.document,
            "nodes": nodes,
            "edges": edges,
        })
    }
}
