//! Term canonicalization: [`Term`] → [`NodeId`] with attributes and the
//! structural parts (members, variant bases, reaction participants) that
//! must exist alongside it in the graph.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Value, json};

use super::modifier::ReactionEffect;
use super::{Bound, DEFAULT_NAMESPACE, FragmentRange, FusionRange, NodeId, Variant};
use crate::grammar::ast::{FusionAst, ModIdentifier, Term, VariantAst};
use crate::grammar::error::{GrammarError, GrammarResult};
use crate::language::{self, Entity, Function, Relation};

/// Attribute mapping stored on each node.
pub type NodeAttributes = BTreeMap<String, Value>;

/// Numbering for anonymous nodes, scoped to one compilation session.
#[derive(Debug, Clone, Default)]
pub struct AnonymousIds {
    issued: u64,
    /// Present when identical reactions should share one node.
    reactions: Option<HashMap<ReactionEffect, u64>>,
}

impl AnonymousIds {
    pub fn new(merge_identical_reactions: bool) -> Self {
        Self {
            issued: 0,
            reactions: merge_identical_reactions.then(HashMap::new),
        }
    }

    /// Hand out the next id. The first id is 1.
    pub fn next_id(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Id for a reaction, reusing an earlier id for the same participants
    /// when merging is enabled.
    pub fn reaction_id(&mut self, effect: &ReactionEffect) -> u64 {
        if let Some(existing) = self.reactions.as_ref().and_then(|map| map.get(effect)) {
            return *existing;
        }
        let id = self.next_id();
        if let Some(map) = self.reactions.as_mut() {
            map.insert(effect.clone(), id);
        }
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn reset(&mut self) {
        self.issued = 0;
        if let Some(map) = self.reactions.as_mut() {
            map.clear();
        }
    }
}

/// A structural edge between a term and one of its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralPart {
    pub relation: Relation,
    pub term: CanonicalTerm,
    /// Edge runs from the part to the owning term (`base hasVariant variant`)
    /// rather than from the owner to the part.
    pub inbound: bool,
}

/// A canonicalized term ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTerm {
    pub id: NodeId,
    pub attributes: NodeAttributes,
    pub parts: Vec<StructuralPart>,
}

impl CanonicalTerm {
    fn leaf(id: NodeId) -> Self {
        let attributes = node_attributes(&id);
        Self {
            id,
            attributes,
            parts: Vec::new(),
        }
    }
}

/// Canonicalize a parsed term.
pub fn canonicalize_term(term: &Term, ids: &mut AnonymousIds) -> GrammarResult<CanonicalTerm> {
    match term {
        Term::Simple {
            function,
            entity,
            variants,
            position,
        } => {
            let base = NodeId::named(*function, entity.namespace.clone(), entity.name.clone());
            if variants.is_empty() {
                return Ok(CanonicalTerm::leaf(base));
            }
            let mut canonical = variants
                .iter()
                .map(|v| canonical_variant(*function, v, *position))
                .collect::<GrammarResult<Vec<_>>>()?;
            canonical.sort();
            let id = NodeId::Variant {
                function: *function,
                namespace: entity.namespace.clone(),
                name: entity.name.clone(),
                variants: canonical,
            };
            let mut term = CanonicalTerm::leaf(id);
            term.parts.push(StructuralPart {
                relation: Relation::HasVariant,
                term: CanonicalTerm::leaf(base),
                inbound: true,
            });
            Ok(term)
        }
        Term::Fusion {
            function,
            fusion,
            position,
        } => Ok(CanonicalTerm::leaf(canonical_fusion(*function, fusion, *position)?)),
        Term::List {
            function, members, ..
        } => {
            let members = members
                .iter()
                .map(|m| canonicalize_term(m, ids))
                .collect::<GrammarResult<Vec<_>>>()?;
            let mut member_ids: Vec<NodeId> = members.iter().map(|m| m.id.clone()).collect();
            member_ids.sort();
            let mut term = CanonicalTerm::leaf(NodeId::List {
                function: *function,
                members: member_ids,
            });
            term.parts = members
                .into_iter()
                .map(|member| StructuralPart {
                    relation: Relation::HasComponent,
                    term: member,
                    inbound: false,
                })
                .collect();
            Ok(term)
        }
        Term::Reaction {
            reactants,
            products,
            ..
        } => {
            let reactants = reactants
                .iter()
                .map(|t| canonicalize_term(t, ids))
                .collect::<GrammarResult<Vec<_>>>()?;
            let products = products
                .iter()
                .map(|t| canonicalize_term(t, ids))
                .collect::<GrammarResult<Vec<_>>>()?;
            let effect = ReactionEffect {
                reactants: reactants.iter().map(|t| t.id.clone()).collect(),
                products: products.iter().map(|t| t.id.clone()).collect(),
            };
            let id = NodeId::Anonymous {
                function: Function::Reaction,
                id: ids.reaction_id(&effect),
            };
            let mut term = CanonicalTerm::leaf(id);
            if let Value::Object(participants) = effect.to_value() {
                term.attributes.extend(participants);
            }
            let parts = reactants
                .into_iter()
                .map(|t| (Relation::HasReactant, t))
                .chain(products.into_iter().map(|t| (Relation::HasProduct, t)));
            term.parts = parts
                .map(|(relation, term)| StructuralPart {
                    relation,
                    term,
                    inbound: false,
                })
                .collect();
            Ok(term)
        }
    }
}

fn mod_entity(identifier: &ModIdentifier) -> Entity {
    match identifier {
        ModIdentifier::Default(name) => Entity::new(DEFAULT_NAMESPACE, name.clone()),
        ModIdentifier::Namespaced(entity) => entity.clone(),
    }
}

fn canonical_variant(function: Function, variant: &VariantAst, position: usize) -> GrammarResult<Variant> {
    let invalid = |fragment: &str, message: &str| GrammarError::InvalidVariant {
        position,
        fragment: fragment.to_string(),
        message: message.to_string(),
    };

    let canonical = match variant {
        VariantAst::Hgvs(text) => {
            if text.trim().is_empty() {
                return Err(invalid(text, "empty HGVS string"));
            }
            Variant::Hgvs {
                variant: text.clone(),
            }
        }
        VariantAst::ProteinModification {
            identifier,
            code,
            position,
        } => Variant::ProteinModification {
            identifier: mod_entity(identifier),
            code: code.clone(),
            position: *position,
        },
        VariantAst::GeneModification(identifier) => Variant::GeneModification {
            identifier: mod_entity(identifier),
        },
        VariantAst::Fragment { range, description } => Variant::Fragment {
            range: FragmentRange::parse(range).ok_or_else(|| invalid(range, "malformed fragment range"))?,
            description: description.clone(),
        },
        VariantAst::Substitution {
            reference,
            position: at,
            variant,
        } => {
            let hgvs = if function == Function::Protein {
                let from = language::amino_acid(reference)
                    .ok_or_else(|| invalid(reference, "unknown amino acid"))?;
                let to = language::amino_acid(variant)
                    .ok_or_else(|| invalid(variant, "unknown amino acid"))?;
                format!("p.{from}{at}{to}")
            } else {
                format!("c.{at}{reference}>{variant}")
            };
            Variant::Hgvs { variant: hgvs }
        }
        VariantAst::Truncation { position: at } => Variant::Hgvs {
            variant: format!("p.{at}*"),
        },
    };
    Ok(canonical)
}

fn canonical_fusion(function: Function, fusion: &FusionAst, position: usize) -> GrammarResult<NodeId> {
    let range = |text: &Option<String>| -> GrammarResult<FusionRange> {
        match text {
            None => Ok(FusionRange::Missing),
            Some(text) => FusionRange::parse(text).ok_or_else(|| GrammarError::InvalidFusion {
                position,
                fragment: text.clone(),
                message: "malformed breakpoint range".into(),
            }),
        }
    };

    let id = match fusion {
        FusionAst::Modern {
            partner_5p,
            range_5p,
            partner_3p,
            range_3p,
        } => NodeId::Fusion {
            function,
            partner_5p: partner_5p.clone(),
            range_5p: range(range_5p)?,
            partner_3p: partner_3p.clone(),
            range_3p: range(range_3p)?,
        },
        FusionAst::Legacy {
            partner_5p,
            partner_3p,
            break_5p,
            start_3p,
        } => NodeId::Fusion {
            function,
            partner_5p: partner_5p.clone(),
            range_5p: break_5p.map_or(FusionRange::Missing, |at| FusionRange::Known {
                reference: "c".into(),
                left: Bound::Unknown,
                right: Bound::Position(at),
            }),
            partner_3p: partner_3p.clone(),
            range_3p: start_3p.map_or(FusionRange::Missing, |at| FusionRange::Known {
                reference: "c".into(),
                left: Bound::Position(at),
                right: Bound::Unknown,
            }),
        },
    };
    Ok(id)
}

fn entity_value(entity: &Entity) -> Value {
    json!({ "namespace": entity.namespace, "name": entity.name })
}

/// Attributes describing a node, derived from its identity alone.
pub fn node_attributes(id: &NodeId) -> NodeAttributes {
    let mut attributes = NodeAttributes::new();
    attributes.insert("function".into(), json!(id.function().label()));
    attributes.insert("bel".into(), json!(id.to_string()));
    match id {
        NodeId::Named { .. } => {}
        NodeId::Variant { variants, .. } => {
            let rendered: Vec<String> = variants.iter().map(ToString::to_string).collect();
            attributes.insert("variants".into(), json!(rendered));
        }
        NodeId::Fusion {
            partner_5p,
            range_5p,
            partner_3p,
            range_3p,
            ..
        } => {
            attributes.insert(
                "fusion".into(),
                json!({
                    "partner_5p": entity_value(partner_5p),
                    "range_5p": range_5p.to_string(),
                    "partner_3p": entity_value(partner_3p),
                    "range_3p": range_3p.to_string(),
                }),
            );
        }
        NodeId::List { members, .. } => {
            let rendered: Vec<String> = members.iter().map(ToString::to_string).collect();
            attributes.insert("members".into(), json!(rendered));
        }
        NodeId::Anonymous { id, .. } => {
            attributes.insert("id".into(), json!(id));
        }
    }
    if let Some(entity) = id.entity() {
        attributes.insert("identifier".into(), entity_value(&entity));
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Statement, SubjectTerm};
    use crate::grammar::parser::{ParserConfig, parse_statement};
    use crate::namespace::AllowAll;

    fn canonical(input: &str, ids: &mut AnonymousIds) -> CanonicalTerm {
        let statement = parse_statement(input, &AllowAll, &ParserConfig::default()).unwrap();
        let Statement::Term(SubjectTerm::Bare(term)) = statement else {
            panic!("expected a bare term");
        };
        canonicalize_term(&term, ids).unwrap()
    }

    fn id(input: &str) -> NodeId {
        canonical(input, &mut AnonymousIds::default()).id
    }

    #[test]
    fn simple_term_is_named() {
        assert_eq!(id("p(HGNC:AKT1)"), NodeId::named(Function::Protein, "HGNC", "AKT1"));
        assert_eq!(id("proteinAbundance(HGNC:AKT1)"), id("p(HGNC:AKT1)"));
    }

    #[test]
    fn named_complex_is_named() {
        assert_eq!(
            id("complex(SCOMP:\"AP-1 Complex\")"),
            NodeId::named(Function::Complex, "SCOMP", "AP-1 Complex")
        );
    }

    #[test]
    fn complex_member_order_is_irrelevant() {
        assert_eq!(
            id("complex(p(HGNC:FOS), p(HGNC:JUN))"),
            id("complex(p(HGNC:JUN), p(HGNC:FOS))")
        );
    }

    #[test]
    fn complex_parts_are_components() {
        let term = canonical("complex(p(HGNC:FOS), p(HGNC:JUN))", &mut AnonymousIds::default());
        assert_eq!(term.parts.len(), 2);
        assert!(term
            .parts
            .iter()
            .all(|p| p.relation == Relation::HasComponent && !p.inbound));
    }

    #[test]
    fn variant_order_is_irrelevant() {
        assert_eq!(
            id("p(HGNC:AKT1, pmod(Ph, Ser, 473), var(\"p.Ala127Tyr\"))"),
            id("p(HGNC:AKT1, var(\"p.Ala127Tyr\"), pmod(Ph, Ser, 473))")
        );
    }

    #[test]
    fn variant_links_back_to_base() {
        let term = canonical("p(HGNC:AKT1, pmod(Ph))", &mut AnonymousIds::default());
        let part = &term.parts[0];
        assert_eq!(part.relation, Relation::HasVariant);
        assert!(part.inbound);
        assert_eq!(part.term.id, NodeId::named(Function::Protein, "HGNC", "AKT1"));
    }

    #[test]
    fn legacy_variants_match_modern() {
        assert_eq!(
            id("p(HGNC:AKT1, sub(A, 127, Y))"),
            id("p(HGNC:AKT1, var(\"p.Ala127Tyr\"))")
        );
        assert_eq!(id("g(HGNC:CFTR, sub(G, 308, A))"), id("g(HGNC:CFTR, var(\"c.308G>A\"))"));
        assert_eq!(id("p(HGNC:AKT1, trunc(40))"), id("p(HGNC:AKT1, var(\"p.40*\"))"));
        assert_eq!(
            id("p(HGNC:AKT1, pmod(P, S, 473))"),
            id("p(HGNC:AKT1, pmod(Ph, Ser, 473))")
        );
    }

    #[test]
    fn legacy_fusion_matches_modern() {
        assert_eq!(
            id("p(HGNC:BCR, fus(HGNC:JAK2, 1875, 2626))"),
            id("p(fus(HGNC:BCR, \"c.?_1875\", HGNC:JAK2, \"c.2626_?\"))")
        );
    }

    #[test]
    fn malformed_fragment_is_rejected() {
        let statement =
            parse_statement("p(HGNC:AKT1, frag(\"5-20\"))", &AllowAll, &ParserConfig::default()).unwrap();
        let Statement::Term(SubjectTerm::Bare(term)) = statement else {
            panic!("expected a bare term");
        };
        assert!(matches!(
            canonicalize_term(&term, &mut AnonymousIds::default()),
            Err(GrammarError::InvalidVariant { .. })
        ));
    }

    #[test]
    fn reactions_are_numbered_from_one() {
        let mut ids = AnonymousIds::default();
        let first = canonical("rxn(reactants(a(CHEBI:superoxide)), products(a(CHEBI:oxygen)))", &mut ids);
        let second = canonical("rxn(reactants(a(CHEBI:water)), products(a(CHEBI:oxygen)))", &mut ids);
        assert_eq!(
            first.id,
            NodeId::Anonymous {
                function: Function::Reaction,
                id: 1
            }
        );
        assert_eq!(
            second.id,
            NodeId::Anonymous {
                function: Function::Reaction,
                id: 2
            }
        );
    }

    #[test]
    fn identical_reactions_merge_when_enabled() {
        let rxn = "rxn(reactants(a(CHEBI:superoxide)), products(a(CHEBI:oxygen)))";
        let mut merging = AnonymousIds::new(true);
        assert_eq!(canonical(rxn, &mut merging).id, canonical(rxn, &mut merging).id);
        let mut plain = AnonymousIds::new(false);
        assert_ne!(canonical(rxn, &mut plain).id, canonical(rxn, &mut plain).id);
    }

    #[test]
    fn reaction_attributes_list_participants() {
        let term = canonical(
            "rxn(reactants(a(CHEBI:superoxide)), products(a(CHEBI:\"hydrogen peroxide\"), a(CHEBI:oxygen)))",
            &mut AnonymousIds::default(),
        );
        assert_eq!(term.attributes["reactants"][0]["function"], json!("Abundance"));
        assert_eq!(
            term.attributes["reactants"][0]["identifier"],
            json!({ "namespace": "CHEBI", "name": "superoxide" })
        );
        assert_eq!(term.attributes["products"].as_array().map(Vec::len), Some(2));
        assert_eq!(term.parts.len(), 3);
    }

    #[test]
    fn attributes_include_identifier() {
        let attrs = node_attributes(&NodeId::named(Function::Protein, "HGNC", "AKT1"));
        assert_eq!(attrs["function"], json!("Protein"));
        assert_eq!(attrs["identifier"], json!({ "namespace": "HGNC", "name": "AKT1" }));
    }
}
