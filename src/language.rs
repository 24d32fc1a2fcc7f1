//! BEL language tables: functions, relations, activities and fixed locations.
//!
//! Every surface keyword the grammar accepts is mapped here onto one
//! canonical value. BEL 1.0 short forms and BEL 2.0 long forms share a
//! single entry, so the parser never has to special-case legacy syntax.

use serde::{Deserialize, Serialize};

/// A namespace-qualified name, e.g. `HGNC:AKT1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub namespace: String,
    pub name: String,
}

impl Entity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Whether this name was written without a namespace prefix.
    pub fn is_naked(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_naked() {
            write!(f, "{}", quote_if_needed(&self.name))
        } else {
            write!(f, "{}:{}", self.namespace, quote_if_needed(&self.name))
        }
    }
}

/// Quote a BEL value when it contains anything other than word characters.
pub fn quote_if_needed(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// The BEL term functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Function {
    Abundance,
    Gene,
    #[serde(rename = "RNA")]
    Rna,
    #[serde(rename = "miRNA")]
    MiRna,
    Protein,
    BiologicalProcess,
    Pathology,
    #[serde(rename = "ComplexAbundance")]
    Complex,
    #[serde(rename = "CompositeAbundance")]
    Composite,
    Reaction,
}

impl Function {
    /// Resolve a function keyword (short or long form).
    pub fn from_keyword(word: &str) -> Option<Self> {
        let function = match word {
            "a" | "abundance" => Function::Abundance,
            "g" | "geneAbundance" => Function::Gene,
            "r" | "rnaAbundance" => Function::Rna,
            "m" | "microRNAAbundance" => Function::MiRna,
            "p" | "proteinAbundance" => Function::Protein,
            "bp" | "biologicalProcess" => Function::BiologicalProcess,
            "path" | "pathology" => Function::Pathology,
            "complex" | "complexAbundance" => Function::Complex,
            "composite" | "compositeAbundance" => Function::Composite,
            "rxn" | "reaction" => Function::Reaction,
            _ => return None,
        };
        Some(function)
    }

    /// Canonical label used in node identities and attributes.
    pub fn label(self) -> &'static str {
        match self {
            Function::Abundance => "Abundance",
            Function::Gene => "Gene",
            Function::Rna => "RNA",
            Function::MiRna => "miRNA",
            Function::Protein => "Protein",
            Function::BiologicalProcess => "BiologicalProcess",
            Function::Pathology => "Pathology",
            Function::Complex => "ComplexAbundance",
            Function::Composite => "CompositeAbundance",
            Function::Reaction => "Reaction",
        }
    }

    /// BEL 2.0 short keyword.
    pub fn short(self) -> &'static str {
        match self {
            Function::Abundance => "a",
            Function::Gene => "g",
            Function::Rna => "r",
            Function::MiRna => "m",
            Function::Protein => "p",
            Function::BiologicalProcess => "bp",
            Function::Pathology => "path",
            Function::Complex => "complex",
            Function::Composite => "composite",
            Function::Reaction => "rxn",
        }
    }

    /// Functions that name a sequence and can therefore carry variants.
    pub fn supports_variants(self) -> bool {
        matches!(
            self,
            Function::Gene | Function::Rna | Function::MiRna | Function::Protein
        )
    }

    /// Functions that can be written as a fusion of two partners.
    pub fn supports_fusion(self) -> bool {
        matches!(self, Function::Gene | Function::Rna | Function::Protein)
    }

    /// Functions whose arguments may be a list of member terms.
    pub fn is_list(self) -> bool {
        matches!(self, Function::Complex | Function::Composite)
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Relation types carried by graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Increases,
    Decreases,
    DirectlyIncreases,
    DirectlyDecreases,
    CausesNoChange,
    RateLimitingStepOf,
    Regulates,
    Association,
    PositiveCorrelation,
    NegativeCorrelation,
    IsA,
    PartOf,
    SubProcessOf,
    BiomarkerFor,
    PrognosticBiomarkerFor,
    Orthologous,
    AnalogousTo,
    TranscribedTo,
    TranslatedTo,
    HasMember,
    HasComponent,
    HasVariant,
    HasReactant,
    HasProduct,
}

/// The relations ontological inference transfers along `isA`.
pub const CAUSAL_RELATIONS: [Relation; 6] = [
    Relation::Increases,
    Relation::Decreases,
    Relation::DirectlyIncreases,
    Relation::DirectlyDecreases,
    Relation::CausesNoChange,
    Relation::RateLimitingStepOf,
];

/// Relations that hold in both directions and are stored twice.
pub const SYMMETRIC_RELATIONS: [Relation; 5] = [
    Relation::Association,
    Relation::PositiveCorrelation,
    Relation::NegativeCorrelation,
    Relation::Orthologous,
    Relation::AnalogousTo,
];

impl Relation {
    /// Resolve a relation keyword, symbol, or BEL 1.0 abbreviation.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let relation = match word {
            "increases" | "->" => Relation::Increases,
            "decreases" | "-|" => Relation::Decreases,
            "directlyIncreases" | "=>" => Relation::DirectlyIncreases,
            "directlyDecreases" | "=|" => Relation::DirectlyDecreases,
            "causesNoChange" | "cnc" => Relation::CausesNoChange,
            "rateLimitingStepOf" => Relation::RateLimitingStepOf,
            "regulates" | "reg" => Relation::Regulates,
            "association" | "--" => Relation::Association,
            "positiveCorrelation" | "pos" => Relation::PositiveCorrelation,
            "negativeCorrelation" | "neg" => Relation::NegativeCorrelation,
            "isA" => Relation::IsA,
            "partOf" => Relation::PartOf,
            "subProcessOf" | "sub" => Relation::SubProcessOf,
            "biomarkerFor" => Relation::BiomarkerFor,
            "prognosticBiomarkerFor" => Relation::PrognosticBiomarkerFor,
            "orthologous" => Relation::Orthologous,
            "analogousTo" | "analogous" => Relation::AnalogousTo,
            "transcribedTo" | ":>" => Relation::TranscribedTo,
            "translatedTo" | ">>" => Relation::TranslatedTo,
            "hasMember" => Relation::HasMember,
            "hasComponent" => Relation::HasComponent,
            "hasVariant" => Relation::HasVariant,
            "hasReactant" => Relation::HasReactant,
            "hasProduct" => Relation::HasProduct,
            _ => return None,
        };
        Some(relation)
    }

    /// Resolve the list forms `hasMembers` / `hasComponents` to their
    /// per-member relation.
    pub fn from_list_keyword(word: &str) -> Option<Self> {
        match word {
            "hasMembers" => Some(Relation::HasMember),
            "hasComponents" => Some(Relation::HasComponent),
            _ => None,
        }
    }

    /// BEL 2.0 long name.
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Increases => "increases",
            Relation::Decreases => "decreases",
            Relation::DirectlyIncreases => "directlyIncreases",
            Relation::DirectlyDecreases => "directlyDecreases",
            Relation::CausesNoChange => "causesNoChange",
            Relation::RateLimitingStepOf => "rateLimitingStepOf",
            Relation::Regulates => "regulates",
            Relation::Association => "association",
            Relation::PositiveCorrelation => "positiveCorrelation",
            Relation::NegativeCorrelation => "negativeCorrelation",
            Relation::IsA => "isA",
            Relation::PartOf => "partOf",
            Relation::SubProcessOf => "subProcessOf",
            Relation::BiomarkerFor => "biomarkerFor",
            Relation::PrognosticBiomarkerFor => "prognosticBiomarkerFor",
            Relation::Orthologous => "orthologous",
            Relation::AnalogousTo => "analogousTo",
            Relation::TranscribedTo => "transcribedTo",
            Relation::TranslatedTo => "translatedTo",
            Relation::HasMember => "hasMember",
            Relation::HasComponent => "hasComponent",
            Relation::HasVariant => "hasVariant",
            Relation::HasReactant => "hasReactant",
            Relation::HasProduct => "hasProduct",
        }
    }

    pub fn is_causal(self) -> bool {
        CAUSAL_RELATIONS.contains(&self)
    }

    pub fn is_symmetric(self) -> bool {
        SYMMETRIC_RELATIONS.contains(&self)
    }

    pub fn is_correlative(self) -> bool {
        matches!(
            self,
            Relation::Association | Relation::PositiveCorrelation | Relation::NegativeCorrelation
        )
    }

    /// Edges that describe how a node is built rather than what a statement
    /// claims. These never need provenance.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Relation::HasMember
                | Relation::HasComponent
                | Relation::HasVariant
                | Relation::HasReactant
                | Relation::HasProduct
                | Relation::TranscribedTo
                | Relation::TranslatedTo
        )
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Molecular activities
// ---------------------------------------------------------------------------

/// Default-namespace molecular activities: every accepted spelling paired
/// with its canonical name.
const ACTIVITY_LABELS: &[(&str, &str)] = &[
    ("cat", "CatalyticActivity"),
    ("catalyticActivity", "CatalyticActivity"),
    ("chap", "ChaperoneActivity"),
    ("chaperoneActivity", "ChaperoneActivity"),
    ("gtp", "GTPBoundActivity"),
    ("gtpBoundActivity", "GTPBoundActivity"),
    ("kin", "KinaseActivity"),
    ("kinaseActivity", "KinaseActivity"),
    ("pep", "PeptidaseActivity"),
    ("peptidaseActivity", "PeptidaseActivity"),
    ("phos", "PhosphataseActivity"),
    ("phosphataseActivity", "PhosphataseActivity"),
    ("ribo", "RibosylationActivity"),
    ("ribosylationActivity", "RibosylationActivity"),
    ("tscript", "TranscriptionalActivity"),
    ("transcriptionalActivity", "TranscriptionalActivity"),
    ("tport", "TransportActivity"),
    ("transportActivity", "TransportActivity"),
];

/// Canonical name for a default-namespace activity written inside `ma(...)`.
pub fn default_activity(word: &str) -> Option<&'static str> {
    ACTIVITY_LABELS
        .iter()
        .find(|(key, label)| *key == word || *label == word)
        .map(|(_, label)| *label)
}

/// Canonical activity for a BEL 1.0 activity function such as `kin(...)`.
pub fn legacy_activity_function(word: &str) -> Option<&'static str> {
    ACTIVITY_LABELS
        .iter()
        .find(|(key, _)| *key == word)
        .map(|(_, label)| *label)
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Namespace used for the fixed translocation short forms.
pub const LOCATION_NAMESPACE: &str = "GOCC";
pub const INTRACELLULAR: &str = "intracellular";
pub const EXTRACELLULAR_SPACE: &str = "extracellular space";
pub const CELL_SURFACE: &str = "cell surface";

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// BEL 1.0 one-letter protein modification codes and their BEL 2.0 names.
const LEGACY_PMOD_CODES: &[(&str, &str)] = &[
    ("P", "Ph"),
    ("A", "Ac"),
    ("F", "Farn"),
    ("G", "Glyco"),
    ("H", "Hy"),
    ("M", "Me"),
    ("R", "ADPRib"),
    ("S", "Sumo"),
    ("U", "Ub"),
];

/// BEL 2.0 default protein modification names.
const PMOD_NAMES: &[&str] = &[
    "Ac", "ADPRib", "Farn", "Gerger", "Glyco", "Hy", "ISG", "Me", "Me1", "Me2", "Me3", "Myr",
    "Nedd", "NGlyco", "NO", "OGlyco", "Palm", "Ph", "Sulf", "Sumo", "Ub", "UbK48", "UbK63",
    "UbMono", "UbPoly",
];

/// Amino acid one-letter and three-letter codes.
const AMINO_ACIDS: &[(&str, &str)] = &[
    ("A", "Ala"),
    ("R", "Arg"),
    ("N", "Asn"),
    ("D", "Asp"),
    ("C", "Cys"),
    ("E", "Glu"),
    ("Q", "Gln"),
    ("G", "Gly"),
    ("H", "His"),
    ("I", "Ile"),
    ("L", "Leu"),
    ("K", "Lys"),
    ("M", "Met"),
    ("F", "Phe"),
    ("P", "Pro"),
    ("S", "Ser"),
    ("T", "Thr"),
    ("W", "Trp"),
    ("Y", "Tyr"),
    ("V", "Val"),
];

/// Canonical default-namespace protein modification name, accepting BEL 1.0
/// one-letter codes.
pub fn pmod_name(word: &str) -> Option<&'static str> {
    if let Some(name) = PMOD_NAMES.iter().find(|n| **n == word) {
        return Some(name);
    }
    LEGACY_PMOD_CODES
        .iter()
        .find(|(code, _)| *code == word)
        .map(|(_, name)| *name)
}

/// Whether `word` is a BEL 1.0 one-letter pmod code.
pub fn is_legacy_pmod_code(word: &str) -> bool {
    LEGACY_PMOD_CODES.iter().any(|(code, _)| *code == word)
}

/// Canonical default-namespace gene modification name.
pub fn gmod_name(word: &str) -> Option<&'static str> {
    match word {
        "Me" | "M" => Some("Me"),
        _ => None,
    }
}

/// Three-letter amino acid code for either a one- or three-letter input.
pub fn amino_acid(word: &str) -> Option<&'static str> {
    AMINO_ACIDS
        .iter()
        .find(|(one, three)| *one == word || *three == word)
        .map(|(_, three)| *three)
}
