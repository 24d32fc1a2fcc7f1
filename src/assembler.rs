//! Graph assembly: parsed statements → nodes and edges.
//!
//! A [`Session`] holds everything that is scoped to one compilation: the
//! anonymous-node counter and the ambient provenance set by control lines.
//! Nothing here is process-global, so independent sessions can assemble
//! separate graphs side by side.
//!
//! Assembly does not roll back. If a statement fails halfway (for example a
//! causal edge without evidence), the nodes it already inserted stay.

use serde::{Deserialize, Serialize};

use crate::canonical::{
    AnonymousIds, CanonicalTerm, ModifierEffect, NodeId, canonicalize_modifier, canonicalize_term,
};
use crate::error::BelResult;
use crate::grammar::ast::{Statement, SubjectTerm, Term};
use crate::grammar::control::Control;
use crate::graph::{BelGraph, EdgeData};
use crate::language::{Function, Relation};
use crate::provenance::{self, StatementContext};

/// `[assembler]` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Add `g transcribedTo r` and `r translatedTo p` for every named
    /// RNA, miRNA and protein.
    pub complete_origin: bool,
    /// Give reactions with identical participants the same node.
    pub merge_identical_reactions: bool,
    /// Hold correlative relations to the same provenance rules as causal ones.
    pub require_provenance_for_correlative: bool,
}

/// Per-compilation assembly state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: AssemblerConfig,
    ids: AnonymousIds,
    context: StatementContext,
}

impl Session {
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            ids: AnonymousIds::new(config.merge_identical_reactions),
            config,
            context: StatementContext::default(),
        }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn context(&self) -> &StatementContext {
        &self.context
    }

    /// Number of anonymous nodes handed out so far.
    pub fn anonymous_count(&self) -> u64 {
        self.ids.issued()
    }

    /// Reset the anonymous counter and the ambient provenance.
    pub fn clear(&mut self) {
        self.ids.reset();
        self.context.clear();
    }

    /// Apply a `SET` / `UNSET` line to the ambient provenance.
    pub fn apply_control(&mut self, control: &Control) {
        match control {
            Control::SetCitation(citation) => self.context.set_citation(citation.clone()),
            Control::SetEvidence(text) => self.context.set_evidence(text.clone()),
            Control::SetAnnotation { key, value } => {
                self.context.set_annotation(key.clone(), value.clone());
            }
            Control::Unset(key) => self.context.unset(key),
            Control::UnsetAll => self.context.clear(),
            Control::Ignored(keyword) => {
                tracing::debug!(keyword = %keyword, "control line has no effect on the graph");
            }
        }
    }

    // ── Terms ──────────────────────────────────────────────────────────

    /// Insert a term and everything structurally beneath it.
    pub fn add_term(&mut self, graph: &mut BelGraph, term: &Term) -> BelResult<NodeId> {
        let canonical = canonicalize_term(term, &mut self.ids)?;
        self.insert(graph, &canonical)?;
        Ok(canonical.id)
    }

    /// Insert the term of a subject or object and canonicalize its modifier.
    pub fn add_subject(
        &mut self,
        graph: &mut BelGraph,
        subject: &SubjectTerm,
    ) -> BelResult<(NodeId, Option<ModifierEffect>)> {
        let id = self.add_term(graph, subject.term())?;
        Ok((id, subject.modifier().map(canonicalize_modifier)))
    }

    fn insert(&self, graph: &mut BelGraph, term: &CanonicalTerm) -> BelResult<()> {
        graph.add_node(&term.id, term.attributes.clone());
        if self.config.complete_origin {
            complete_origin(graph, &term.id)?;
        }
        for part in &term.parts {
            self.insert(graph, &part.term)?;
            let (source, target) = if part.inbound {
                (&part.term.id, &term.id)
            } else {
                (&term.id, &part.term.id)
            };
            graph.add_unqualified_edge(source, target, part.relation)?;
        }
        Ok(())
    }

    // ── Statements ─────────────────────────────────────────────────────

    /// Assemble one statement under the current provenance. Returns the
    /// number of edges added.
    pub fn add_statement(
        &mut self,
        graph: &mut BelGraph,
        statement: &Statement,
        line: Option<usize>,
    ) -> BelResult<usize> {
        self.assemble(graph, statement, line).map(|(_, _, edges)| edges)
    }

    fn assemble(
        &mut self,
        graph: &mut BelGraph,
        statement: &Statement,
        line: Option<usize>,
    ) -> BelResult<(NodeId, Option<ModifierEffect>, usize)> {
        match statement {
            Statement::Term(subject) => {
                let (id, modifier) = self.add_subject(graph, subject)?;
                Ok((id, modifier, 0))
            }
            Statement::Relation {
                subject,
                relation,
                object,
            } => {
                let (u, subject_modifier) = self.add_subject(graph, subject)?;
                let (v, object_modifier) = self.add_subject(graph, object)?;
                let edges = self.relate(
                    graph,
                    (&u, subject_modifier.clone()),
                    *relation,
                    (&v, object_modifier),
                    line,
                )?;
                Ok((u, subject_modifier, edges))
            }
            Statement::Nested {
                subject,
                relation,
                nested,
            } => {
                let (u, subject_modifier) = self.add_subject(graph, subject)?;
                let (v, object_modifier, inner) = self.assemble(graph, nested, line)?;
                let outer = self.relate(
                    graph,
                    (&u, subject_modifier.clone()),
                    *relation,
                    (&v, object_modifier),
                    line,
                )?;
                Ok((u, subject_modifier, inner + outer))
            }
            Statement::List {
                subject,
                relation,
                members,
            } => {
                let (u, subject_modifier) = self.add_subject(graph, subject)?;
                let mut edges = 0;
                for member in members {
                    let v = self.add_term(graph, member)?;
                    if graph.add_unqualified_edge(&u, &v, *relation)? {
                        edges += 1;
                    }
                }
                Ok((u, subject_modifier, edges))
            }
        }
    }

    fn relate(
        &self,
        graph: &mut BelGraph,
        (u, subject): (&NodeId, Option<ModifierEffect>),
        relation: Relation,
        (v, object): (&NodeId, Option<ModifierEffect>),
        line: Option<usize>,
    ) -> BelResult<usize> {
        if relation.is_structural() || relation == Relation::IsA {
            return Ok(usize::from(graph.add_unqualified_edge(u, v, relation)?));
        }

        if self.config.require_provenance_for_correlative {
            provenance::validate(
                relation,
                self.context.citation.as_ref(),
                self.context.evidence.as_deref(),
                true,
            )?;
        }

        let data = EdgeData::new(relation)
            .with_context(&self.context)
            .with_subject(subject)
            .with_object(object)
            .with_line(line);

        if relation.is_symmetric() {
            let reversed = data.reversed();
            graph.add_qualified_edge(u, v, data)?;
            graph.add_qualified_edge(v, u, reversed)?;
            return Ok(2);
        }
        graph.add_qualified_edge(u, v, data)?;
        Ok(1)
    }
}

/// Add the gene and RNA a named RNA, miRNA or protein originates from.
fn complete_origin(graph: &mut BelGraph, id: &NodeId) -> BelResult<()> {
    let NodeId::Named { function, .. } = id else {
        return Ok(());
    };
    let rna = match function {
        Function::Protein => {
            let Some(rna) = id.with_function(Function::Rna) else {
                return Ok(());
            };
            graph.ensure_node(&rna);
            graph.add_unqualified_edge(&rna, id, Relation::TranslatedTo)?;
            rna
        }
        Function::Rna | Function::MiRna => id.clone(),
        _ => return Ok(()),
    };
    if let Some(gene) = id.with_function(Function::Gene) {
        graph.ensure_node(&gene);
        graph.add_unqualified_edge(&gene, &rna, Relation::TranscribedTo)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BelError, ProvenanceError};
    use crate::grammar::control::parse_control;
    use crate::grammar::parser::{ParserConfig, parse_statement};
    use crate::namespace::AllowAll;

    fn cited_session(config: AssemblerConfig) -> Session {
        let mut session = Session::new(config);
        session.apply_control(&parse_control(r#"SET Citation = {"PubMed", "Example", "12345"}"#).unwrap());
        session.apply_control(&parse_control(r#"SET Evidence = "Some text""#).unwrap());
        session
    }

    fn add(session: &mut Session, graph: &mut BelGraph, input: &str) -> BelResult<usize> {
        let statement = parse_statement(input, &AllowAll, &ParserConfig::default())?;
        session.add_statement(graph, &statement, None)
    }

    fn protein(name: &str) -> NodeId {
        NodeId::named(Function::Protein, "HGNC", name)
    }

    #[test]
    fn relation_adds_qualified_edge_with_context() {
        let mut session = cited_session(AssemblerConfig::default());
        let mut graph = BelGraph::new();
        assert_eq!(add(&mut session, &mut graph, "p(HGNC:A) -> p(HGNC:B)").unwrap(), 1);
        let edge = &graph.out_edges(&protein("A"))[0];
        assert_eq!(edge.data.relation, Relation::Increases);
        assert_eq!(edge.data.evidence.as_deref(), Some("Some text"));
        assert_eq!(edge.data.citation.as_ref().map(|c| c.reference.as_str()), Some("12345"));
    }

    #[test]
    fn modifiers_are_attached() {
        let mut session = cited_session(AssemblerConfig::default());
        let mut graph = BelGraph::new();
        add(&mut session, &mut graph, "kin(p(HGNC:A)) -> deg(p(HGNC:B))").unwrap();
        let edge = &graph.out_edges(&protein("A"))[0];
        assert!(matches!(edge.data.subject, Some(ModifierEffect::Activity { .. })));
        assert_eq!(edge.data.object, Some(ModifierEffect::Degradation));
    }

    #[test]
    fn symmetric_relation_adds_reverse_edge() {
        let mut session = cited_session(AssemblerConfig::default());
        let mut graph = BelGraph::new();
        assert_eq!(add(&mut session, &mut graph, "act(p(HGNC:A)) -- p(HGNC:B)").unwrap(), 2);
        assert!(graph.has_edge(&protein("A"), &protein("B")));
        let back = &graph.out_edges(&protein("B"))[0];
        assert!(back.data.subject.is_none());
        assert!(back.data.object.is_some());
    }

    #[test]
    fn causal_without_provenance_fails_but_keeps_nodes() {
        let mut session = Session::default();
        let mut graph = BelGraph::new();
        let err = add(&mut session, &mut graph, "p(HGNC:A) -> p(HGNC:B)").unwrap_err();
        assert!(matches!(err, BelError::Provenance(ProvenanceError::MissingCitation { .. })));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn strict_correlative_provenance() {
        let mut session = Session::new(AssemblerConfig {
            require_provenance_for_correlative: true,
            ..Default::default()
        });
        let mut graph = BelGraph::new();
        assert!(add(&mut session, &mut graph, "p(HGNC:A) positiveCorrelation p(HGNC:B)").is_err());
        let mut relaxed = Session::default();
        assert!(add(&mut relaxed, &mut graph, "p(HGNC:A) positiveCorrelation p(HGNC:B)").is_ok());
    }

    #[test]
    fn is_a_needs_no_provenance() {
        let mut session = Session::default();
        let mut graph = BelGraph::new();
        add(&mut session, &mut graph, "p(HGNC:AKT1) isA p(SFAM:\"AKT Family\")").unwrap();
        assert!(graph.has_relation(
            &protein("AKT1"),
            &NodeId::named(Function::Protein, "SFAM", "AKT Family"),
            Relation::IsA
        ));
    }

    #[test]
    fn nested_statement_adds_both_edges() {
        let mut session = cited_session(AssemblerConfig::default());
        let mut graph = BelGraph::new();
        let added = add(
            &mut session,
            &mut graph,
            "p(HGNC:A) increases (p(HGNC:B) decreases p(HGNC:C))",
        )
        .unwrap();
        assert_eq!(added, 2);
        assert!(graph.has_relation(&protein("A"), &protein("B"), Relation::Increases));
        assert!(graph.has_relation(&protein("B"), &protein("C"), Relation::Decreases));
    }

    #[test]
    fn list_statement_adds_member_edges() {
        let mut session = Session::default();
        let mut graph = BelGraph::new();
        let family = NodeId::named(Function::Protein, "SFAM", "AKT Family");
        add(
            &mut session,
            &mut graph,
            "p(SFAM:\"AKT Family\") hasMembers list(p(HGNC:AKT1), p(HGNC:AKT2))",
        )
        .unwrap();
        assert!(graph.has_relation(&family, &protein("AKT1"), Relation::HasMember));
        assert!(graph.has_relation(&family, &protein("AKT2"), Relation::HasMember));
    }

    #[test]
    fn complete_origin_adds_central_dogma() {
        let mut session = Session::new(AssemblerConfig {
            complete_origin: true,
            ..Default::default()
        });
        let mut graph = BelGraph::new();
        add(&mut session, &mut graph, "p(HGNC:AKT1)").unwrap();
        let rna = NodeId::named(Function::Rna, "HGNC", "AKT1");
        let gene = NodeId::named(Function::Gene, "HGNC", "AKT1");
        assert!(graph.has_relation(&rna, &protein("AKT1"), Relation::TranslatedTo));
        assert!(graph.has_relation(&gene, &rna, Relation::TranscribedTo));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn clear_resets_counter_and_context() {
        let mut session = cited_session(AssemblerConfig::default());
        let mut graph = BelGraph::new();
        add(&mut session, &mut graph, "rxn(reactants(a(CHEBI:x)), products(a(CHEBI:y)))").unwrap();
        assert_eq!(session.anonymous_count(), 1);
        session.clear();
        assert_eq!(session.anonymous_count(), 0);
        assert!(session.context().citation.is_none());
    }
}
