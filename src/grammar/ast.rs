//! Abstract syntax for BEL statements.
//!
//! The AST stays close to what was written: BEL 1.0 forms (`sub`, `trunc`,
//! legacy fusions, activity functions like `kin(...)`) are kept as distinct
//! nodes here and only normalized by the canonicalizers. Positions in the
//! AST are byte offsets into the statement, used to tag canonicalization
//! errors.

use crate::language::{Entity, Function, Relation};

/// A BEL term: a function applied to arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `p(HGNC:AKT1)`, `p(HGNC:AKT1, pmod(Ph))`, `complex(SCOMP:"AP-1 Complex")`.
    Simple {
        function: Function,
        entity: Entity,
        variants: Vec<VariantAst>,
        position: usize,
    },
    /// `p(fus(HGNC:TMPRSS2, "r.1_79", HGNC:ERG, "r.312_5034"))`.
    Fusion {
        function: Function,
        fusion: FusionAst,
        position: usize,
    },
    /// `complex(p(HGNC:FOS), p(HGNC:JUN))` and `composite(...)`.
    List {
        function: Function,
        members: Vec<Term>,
        position: usize,
    },
    /// `rxn(reactants(...), products(...))`.
    Reaction {
        reactants: Vec<Term>,
        products: Vec<Term>,
        position: usize,
    },
}

impl Term {
    pub fn function(&self) -> Function {
        match self {
            Term::Simple { function, .. }
            | Term::Fusion { function, .. }
            | Term::List { function, .. } => *function,
            Term::Reaction { .. } => Function::Reaction,
        }
    }
}

/// Identifier of a protein or gene modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModIdentifier {
    /// Default BEL namespace, e.g. `Ph` (already mapped from `P`).
    Default(String),
    /// Namespaced modification, e.g. `MOD:PhosRes`.
    Namespaced(Entity),
}

/// A variant argument inside a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantAst {
    /// `var("p.Ala127Tyr")`.
    Hgvs(String),
    /// `pmod(Ph, Ser, 473)`; residue and position are optional.
    ProteinModification {
        identifier: ModIdentifier,
        code: Option<String>,
        position: Option<u32>,
    },
    /// `gmod(Me)`.
    GeneModification(ModIdentifier),
    /// `frag("5_20")` or `frag("?", "55kD")`.
    Fragment {
        range: String,
        description: Option<String>,
    },
    /// BEL 1.0 `sub(A, 127, Y)`.
    Substitution {
        reference: String,
        position: u32,
        variant: String,
    },
    /// BEL 1.0 `trunc(40)`.
    Truncation { position: u32 },
}

/// The two fusion notations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FusionAst {
    /// `fus(NS:A, "r.1_79", NS:B, "r.312_5034")`; ranges may be `"?"`.
    Modern {
        partner_5p: Entity,
        range_5p: Option<String>,
        partner_3p: Entity,
        range_3p: Option<String>,
    },
    /// BEL 1.0 `p(NS:A, fus(NS:B, 1875, 2626))`.
    Legacy {
        partner_5p: Entity,
        partner_3p: Entity,
        break_5p: Option<u32>,
        start_3p: Option<u32>,
    },
}

/// The activity named inside `ma(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAst {
    /// Canonical default activity such as `KinaseActivity`.
    Default(String),
    Namespaced(Entity),
}

/// A modifier wrapped around a subject or object term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// `act(term)` or `act(term, ma(...))`.
    Activity { activity: Option<ActivityAst> },
    /// BEL 1.0 `kin(term)`, `tscript(term)` and friends, holding the
    /// canonical activity name.
    LegacyActivity { label: String },
    /// `deg(term)`.
    Degradation,
    /// `tloc(term, fromLoc(...), toLoc(...))` or the bare two-location form.
    Translocation { from: Entity, to: Entity },
    /// `sec(term)`.
    CellSecretion,
    /// `surf(term)`.
    CellSurfaceExpression,
}

/// Subject or object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectTerm {
    Bare(Term),
    Modified { modifier: Modifier, term: Term },
}

impl SubjectTerm {
    pub fn term(&self) -> &Term {
        match self {
            SubjectTerm::Bare(term) | SubjectTerm::Modified { term, .. } => term,
        }
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        match self {
            SubjectTerm::Bare(_) => None,
            SubjectTerm::Modified { modifier, .. } => Some(modifier),
        }
    }
}

/// A parsed BEL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A lone term, which only introduces nodes.
    Term(SubjectTerm),
    /// `subject relation object`.
    Relation {
        subject: SubjectTerm,
        relation: Relation,
        object: SubjectTerm,
    },
    /// `subject relation (inner statement)`.
    Nested {
        subject: SubjectTerm,
        relation: Relation,
        nested: Box<Statement>,
    },
    /// `subject hasMembers list(a, b, c)`.
    List {
        subject: SubjectTerm,
        relation: Relation,
        members: Vec<Term>,
    },
}

impl Statement {
    pub fn subject(&self) -> &SubjectTerm {
        match self {
            Statement::Term(subject)
            | Statement::Relation { subject, .. }
            | Statement::Nested { subject, .. }
            | Statement::List { subject, .. } => subject,
        }
    }
}
