//! Canonical node identities.
//!
//! Equivalent BEL spellings (short or long function names, BEL 1.0 variant
//! syntax, either fusion notation, any member order) produce the same
//! [`NodeId`], which is what the graph deduplicates on.
//!
//! - [`node`]: term → [`NodeId`] plus attributes and structural parts
//! - [`modifier`]: subject/object modifiers → [`modifier::ModifierEffect`]

pub mod modifier;
pub mod node;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::{Entity, Function, quote_if_needed};

pub use modifier::{ModifierEffect, MolecularActivity, ReactionEffect, canonicalize_modifier};
pub use node::{
    AnonymousIds, CanonicalTerm, NodeAttributes, StructuralPart, canonicalize_term, node_attributes,
};

/// Namespace given to BEL's built-in modification names (`Ph`, `Me`, ...).
pub const DEFAULT_NAMESPACE: &str = "bel";

/// Canonical identity of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeId {
    Named {
        function: Function,
        namespace: String,
        name: String,
    },
    /// A named entity plus its variants, sorted.
    Variant {
        function: Function,
        namespace: String,
        name: String,
        variants: Vec<Variant>,
    },
    Fusion {
        function: Function,
        partner_5p: Entity,
        range_5p: FusionRange,
        partner_3p: Entity,
        range_3p: FusionRange,
    },
    /// `complex(...)` / `composite(...)` with members, sorted.
    List {
        function: Function,
        members: Vec<NodeId>,
    },
    /// Nodes without a natural identity, numbered per session.
    Anonymous { function: Function, id: u64 },
}

impl NodeId {
    pub fn named(function: Function, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        NodeId::Named {
            function,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn function(&self) -> Function {
        match self {
            NodeId::Named { function, .. }
            | NodeId::Variant { function, .. }
            | NodeId::Fusion { function, .. }
            | NodeId::List { function, .. }
            | NodeId::Anonymous { function, .. } => *function,
        }
    }

    /// The namespaced entity of a named or variant node.
    pub fn entity(&self) -> Option<Entity> {
        match self {
            NodeId::Named {
                namespace, name, ..
            }
            | NodeId::Variant {
                namespace, name, ..
            } => Some(Entity::new(namespace.clone(), name.clone())),
            _ => None,
        }
    }

    /// The same entity under another function, e.g. the gene of a protein.
    pub fn with_function(&self, function: Function) -> Option<NodeId> {
        match self {
            NodeId::Named {
                namespace, name, ..
            } => Some(NodeId::named(function, namespace.clone(), name.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.function().short();
        match self {
            NodeId::Named {
                namespace, name, ..
            } => write!(f, "{short}({})", Entity::new(namespace.clone(), name.clone())),
            NodeId::Variant {
                namespace,
                name,
                variants,
                ..
            } => {
                write!(f, "{short}({}", Entity::new(namespace.clone(), name.clone()))?;
                for variant in variants {
                    write!(f, ", {variant}")?;
                }
                f.write_str(")")
            }
            NodeId::Fusion {
                partner_5p,
                range_5p,
                partner_3p,
                range_3p,
                ..
            } => write!(
                f,
                "{short}(fus({partner_5p}, \"{range_5p}\", {partner_3p}, \"{range_3p}\"))"
            ),
            NodeId::List { members, .. } => {
                write!(f, "{short}(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
            NodeId::Anonymous { id, .. } => write!(f, "{short}(#{id})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// A canonical variant descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// HGVS string; BEL 1.0 `sub` and `trunc` are rewritten into this form.
    Hgvs { variant: String },
    ProteinModification {
        identifier: Entity,
        code: Option<String>,
        position: Option<u32>,
    },
    GeneModification { identifier: Entity },
    Fragment {
        range: FragmentRange,
        description: Option<String>,
    },
}

fn write_identifier(f: &mut fmt::Formatter<'_>, identifier: &Entity) -> fmt::Result {
    if identifier.namespace == DEFAULT_NAMESPACE {
        f.write_str(&quote_if_needed(&identifier.name))
    } else {
        write!(f, "{identifier}")
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Hgvs { variant } => write!(f, "var(\"{variant}\")"),
            Variant::ProteinModification {
                identifier,
                code,
                position,
            } => {
                f.write_str("pmod(")?;
                write_identifier(f, identifier)?;
                if let Some(code) = code {
                    write!(f, ", {code}")?;
                }
                if let Some(position) = position {
                    write!(f, ", {position}")?;
                }
                f.write_str(")")
            }
            Variant::GeneModification { identifier } => {
                f.write_str("gmod(")?;
                write_identifier(f, identifier)?;
                f.write_str(")")
            }
            Variant::Fragment { range, description } => {
                write!(f, "frag(\"{range}\"")?;
                if let Some(description) = description {
                    write!(f, ", \"{description}\"")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One end of a fragment or fusion range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Position(u32),
    /// `?`
    Unknown,
    /// `*`
    CTerminal,
}

impl Bound {
    pub fn parse(text: &str) -> Option<Bound> {
        match text {
            "?" => Some(Bound::Unknown),
            "*" => Some(Bound::CTerminal),
            _ => text.parse().ok().map(Bound::Position),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Position(p) => write!(f, "{p}"),
            Bound::Unknown => f.write_str("?"),
            Bound::CTerminal => f.write_str("*"),
        }
    }
}

/// `frag("5_20")`, `frag("?_*")`, or `frag("?")` for an unknown range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentRange {
    Missing,
    Known { start: Bound, stop: Bound },
}

impl FragmentRange {
    pub fn parse(text: &str) -> Option<Self> {
        if text == "?" {
            return Some(FragmentRange::Missing);
        }
        let (start, stop) = text.split_once('_')?;
        Some(FragmentRange::Known {
            start: Bound::parse(start)?,
            stop: Bound::parse(stop)?,
        })
    }
}

impl fmt::Display for FragmentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentRange::Missing => f.write_str("?"),
            FragmentRange::Known { start, stop } => write!(f, "{start}_{stop}"),
        }
    }
}

/// A fusion breakpoint range such as `r.1_79`; `?` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionRange {
    Missing,
    Known {
        reference: String,
        left: Bound,
        right: Bound,
    },
}

impl FusionRange {
    pub fn parse(text: &str) -> Option<Self> {
        if text == "?" {
            return Some(FusionRange::Missing);
        }
        let (reference, span) = text.split_once('.')?;
        if !matches!(reference, "c" | "r" | "p" | "g" | "m" | "n") {
            return None;
        }
        let (left, right) = span.split_once('_')?;
        Some(FusionRange::Known {
            reference: reference.to_string(),
            left: Bound::parse(left)?,
            right: Bound::parse(right)?,
        })
    }
}

impl fmt::Display for FusionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionRange::Missing => f.write_str("?"),
            FusionRange::Known {
                reference,
                left,
                right,
            } => write!(f, "{reference}.{left}_{right}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_named_and_anonymous() {
        assert_eq!(
            NodeId::named(Function::Protein, "HGNC", "AKT1").to_string(),
            "p(HGNC:AKT1)"
        );
        assert_eq!(
            NodeId::Anonymous {
                function: Function::Reaction,
                id: 1
            }
            .to_string(),
            "rxn(#1)"
        );
    }

    #[test]
    fn display_variant_uses_default_names() {
        let id = NodeId::Variant {
            function: Function::Protein,
            namespace: "HGNC".into(),
            name: "AKT1".into(),
            variants: vec![Variant::ProteinModification {
                identifier: Entity::new(DEFAULT_NAMESPACE, "Ph"),
                code: Some("Ser".into()),
                position: Some(473),
            }],
        };
        assert_eq!(id.to_string(), "p(HGNC:AKT1, pmod(Ph, Ser, 473))");
    }

    #[test]
    fn ranges_parse() {
        assert_eq!(
            FusionRange::parse("r.1_79"),
            Some(FusionRange::Known {
                reference: "r".into(),
                left: Bound::Position(1),
                right: Bound::Position(79),
            })
        );
        assert_eq!(FusionRange::parse("?"), Some(FusionRange::Missing));
        assert_eq!(FusionRange::parse("x.1_2"), None);
        assert_eq!(
            FragmentRange::parse("?_*"),
            Some(FragmentRange::Known {
                start: Bound::Unknown,
                stop: Bound::CTerminal,
            })
        );
        assert_eq!(FragmentRange::parse("5-20"), None);
    }

    #[test]
    fn with_function_swaps_only_named() {
        let protein = NodeId::named(Function::Protein, "HGNC", "AKT1");
        assert_eq!(
            protein.with_function(Function::Gene),
            Some(NodeId::named(Function::Gene, "HGNC", "AKT1"))
        );
    }
}
