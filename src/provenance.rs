//! Provenance: citations, evidence and annotations attached to edges.
//!
//! BEL scripts set provenance ambiently with `SET` lines; every statement
//! that follows inherits the current [`StatementContext`] until it is unset
//! or replaced.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ProvenanceError;
use crate::language::Relation;

/// A literature reference: `(type, name, reference)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub reference: String,
}

impl Citation {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.kind.trim().is_empty() {
            Some("type")
        } else if self.name.trim().is_empty() {
            Some("name")
        } else if self.reference.trim().is_empty() {
            Some("reference")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// Value of a single annotation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Single(String),
    Set(BTreeSet<String>),
}

pub type Annotations = BTreeMap<String, AnnotationValue>;

/// Check that a relation's provenance is sufficient to store it.
///
/// Causal relations always need a complete citation and evidence. When
/// `strict_correlative` is set the same holds for correlative relations.
pub fn validate(
    relation: Relation,
    citation: Option<&Citation>,
    evidence: Option<&str>,
    strict_correlative: bool,
) -> Result<(), ProvenanceError> {
    if !(relation.is_causal() || (strict_correlative && relation.is_correlative())) {
        return Ok(());
    }
    let relation_name = relation.as_str().to_string();
    let citation = citation.ok_or_else(|| ProvenanceError::MissingCitation {
        relation: relation_name.clone(),
    })?;
    if let Some(field) = citation.missing_field() {
        return Err(ProvenanceError::IncompleteCitation {
            relation: relation_name,
            field: field.to_string(),
        });
    }
    match evidence {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(ProvenanceError::MissingEvidence {
            relation: relation_name,
        }),
    }
}

/// Ambient provenance maintained between statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementContext {
    pub citation: Option<Citation>,
    pub evidence: Option<String>,
    pub annotations: Annotations,
}

impl StatementContext {
    /// Replace the citation. A new citation starts a new evidence block, so
    /// evidence and annotations are cleared.
    pub fn set_citation(&mut self, citation: Citation) {
        self.citation = Some(citation);
        self.evidence = None;
        self.annotations.clear();
    }

    pub fn set_evidence(&mut self, evidence: impl Into<String>) {
        self.evidence = Some(evidence.into());
    }

    pub fn set_annotation(&mut self, key: impl Into<String>, value: AnnotationValue) {
        self.annotations.insert(key.into(), value);
    }

    /// Remove one key. `Citation` and `Evidence` (and its alias
    /// `SupportingText`) clear the corresponding field.
    pub fn unset(&mut self, key: &str) {
        match key {
            "Citation" => {
                self.citation = None;
                self.evidence = None;
                self.annotations.clear();
            }
            "Evidence" | "SupportingText" => self.evidence = None,
            _ => {
                self.annotations.remove(key);
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
