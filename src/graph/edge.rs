//! Edge payloads.

use serde::Serialize;

use crate::canonical::{ModifierEffect, NodeId};
use crate::language::Relation;
use crate::provenance::{Annotations, Citation, StatementContext};

/// Data stored on each petgraph edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub relation: Relation,
    pub evidence: Option<String>,
    pub citation: Option<Citation>,
    pub annotations: Annotations,
    /// Modifier on the source node, e.g. `act(...)` in subject position.
    pub subject: Option<ModifierEffect>,
    /// Modifier on the target node.
    pub object: Option<ModifierEffect>,
    /// Line of the script the statement came from.
    pub line: Option<usize>,
}

impl EdgeData {
    /// An edge with no provenance, as used for structural relations.
    pub fn new(relation: Relation) -> Self {
        Self {
            relation,
            evidence: None,
            citation: None,
            annotations: Annotations::new(),
            subject: None,
            object: None,
            line: None,
        }
    }

    /// Attach the ambient citation, evidence and annotations.
    pub fn with_context(mut self, context: &StatementContext) -> Self {
        self.citation = context.citation.clone();
        self.evidence = context.evidence.clone();
        self.annotations = context.annotations.clone();
        self
    }

    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citation = Some(citation);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_subject(mut self, modifier: Option<ModifierEffect>) -> Self {
        self.subject = modifier;
        self
    }

    pub fn with_object(mut self, modifier: Option<ModifierEffect>) -> Self {
        self.object = modifier;
        self
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// The same assertion seen from the other end: modifiers swap sides.
    pub fn reversed(&self) -> Self {
        let mut reversed = self.clone();
        std::mem::swap(&mut reversed.subject, &mut reversed.object);
        reversed
    }

    /// `(relation, citation, evidence)`, which together with the endpoints
    /// identifies a qualified edge.
    pub fn provenance_key(&self) -> (Relation, Option<&Citation>, Option<&str>) {
        (self.relation, self.citation.as_ref(), self.evidence.as_deref())
    }

    /// Whether two edges make the same assertion. The source line is not
    /// part of the assertion.
    pub fn same_assertion(&self, other: &EdgeData) -> bool {
        self.provenance_key() == other.provenance_key()
            && self.annotations == other.annotations
            && self.subject == other.subject
            && self.object == other.object
    }
}

/// An edge with its endpoints, as returned by graph queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub data: EdgeData,
}
