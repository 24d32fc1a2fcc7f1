//! Rich diagnostic error types for the BEL grammar.
//!
//! Every variant carries the byte position and the offending fragment of the
//! statement, plus a `#[diagnostic(code(...), help(...))]` so the user knows
//! exactly which part of the line to fix.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while tokenizing or parsing a BEL statement.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GrammarError {
    #[error("unexpected token \"{fragment}\" at position {position}, expected {expected}")]
    #[diagnostic(
        code(bel::grammar::unexpected_token),
        help("Check for balanced parentheses and commas between function arguments.")
    )]
    UnexpectedToken {
        position: usize,
        fragment: String,
        expected: String,
    },

    #[error("statement ended early at position {position}, expected {expected}")]
    #[diagnostic(
        code(bel::grammar::unexpected_end),
        help("The statement is incomplete. A closing parenthesis or an argument is missing.")
    )]
    UnexpectedEnd { position: usize, expected: String },

    #[error("unterminated string starting at position {position}")]
    #[diagnostic(
        code(bel::grammar::unterminated_string),
        help("Close the quoted value with a matching `\"`. Escape embedded quotes as `\\\"`.")
    )]
    UnterminatedString { position: usize },

    #[error("unexpected character '{fragment}' at position {position}")]
    #[diagnostic(
        code(bel::grammar::unexpected_character),
        help("Names containing punctuation or spaces must be quoted.")
    )]
    UnexpectedCharacter { position: usize, fragment: String },

    #[error("unknown function \"{fragment}\" at position {position}")]
    #[diagnostic(
        code(bel::grammar::unknown_function),
        help(
            "Valid term functions are a, g, r, m, p, bp, path, complex, composite \
             and rxn (or their long forms such as proteinAbundance)."
        )
    )]
    UnknownFunction { position: usize, fragment: String },

    #[error("unknown relation \"{fragment}\" at position {position}")]
    #[diagnostic(
        code(bel::grammar::unknown_relation),
        help(
            "Use a BEL relation such as increases (->), decreases (-|), \
             directlyIncreases (=>), association (--) or isA."
        )
    )]
    UnknownRelation { position: usize, fragment: String },

    #[error("unknown molecular activity \"{fragment}\" at position {position}")]
    #[diagnostic(
        code(bel::grammar::unknown_activity),
        help(
            "Default activities are cat, chap, gtp, kin, pep, phos, ribo, tscript and tport. \
             Other activities must be namespace-qualified, e.g. ma(GOMF:\"kinase activity\")."
        )
    )]
    UnknownActivity { position: usize, fragment: String },

    #[error("translocation at position {position} needs both a source and a target location")]
    #[diagnostic(
        code(bel::grammar::tloc_arity),
        help(
            "Write tloc(term, fromLoc(NS:from), toLoc(NS:to)) or \
             tloc(term, NS:from, NS:to)."
        )
    )]
    InvalidTranslocationArity { position: usize, fragment: String },

    #[error("malformed identifier \"{fragment}\" at position {position}")]
    #[diagnostic(
        code(bel::grammar::malformed_identifier),
        help("Identifiers are written NAMESPACE:name; quote names containing spaces.")
    )]
    MalformedIdentifier { position: usize, fragment: String },

    #[error("invalid variant \"{fragment}\" at position {position}: {message}")]
    #[diagnostic(
        code(bel::grammar::invalid_variant),
        help("Variants are var(\"p.Ala127Tyr\"), pmod(Ph, Ser, 473), gmod(Me) or frag(\"5_20\").")
    )]
    InvalidVariant {
        position: usize,
        fragment: String,
        message: String,
    },

    #[error("invalid fusion \"{fragment}\" at position {position}: {message}")]
    #[diagnostic(
        code(bel::grammar::invalid_fusion),
        help("Write fus(NS:A, \"r.1_79\", NS:B, \"r.312_5034\") inside a g, r or p term.")
    )]
    InvalidFusion {
        position: usize,
        fragment: String,
        message: String,
    },

    #[error("trailing input \"{fragment}\" at position {position}")]
    #[diagnostic(
        code(bel::grammar::trailing_input),
        help("A statement is a single term, or subject, relation and object.")
    )]
    TrailingInput { position: usize, fragment: String },

    #[error("nesting deeper than {max_depth} at position {position}")]
    #[diagnostic(
        code(bel::grammar::nesting_too_deep),
        help("Raise `max_depth` in the [parser] configuration if the statement is legitimate.")
    )]
    NestingTooDeep { position: usize, max_depth: usize },

    #[error("invalid SET/UNSET line \"{fragment}\": {message}")]
    #[diagnostic(
        code(bel::grammar::invalid_set),
        help(
            "Use SET Citation = {{\"type\", \"name\", \"reference\"}}, \
             SET Evidence = \"...\", SET Key = \"value\" or UNSET Key."
        )
    )]
    InvalidSet { fragment: String, message: String },

    #[error("name \"{fragment}\" at position {position} has no namespace")]
    #[diagnostic(
        code(bel::grammar::naked_name),
        help("Prefix the name with its namespace, or set `allow_naked_names = true`.")
    )]
    NakedName { position: usize, fragment: String },

    #[error("BEL 1.0 syntax \"{fragment}\" at position {position} is disabled")]
    #[diagnostic(
        code(bel::grammar::legacy_disabled),
        help("Rewrite the term in BEL 2.0 form, or set `allow_legacy = true`.")
    )]
    LegacyDisabled { position: usize, fragment: String },

    #[error("{fragment}() at position {position} has no members")]
    #[diagnostic(
        code(bel::grammar::empty_list),
        help("A list abundance needs at least one member term, e.g. complex(p(HGNC:FOS), p(HGNC:JUN)).")
    )]
    EmptyList { position: usize, fragment: String },
}

impl GrammarError {
    /// Byte position of the error within the statement, when known.
    pub fn position(&self) -> Option<usize> {
        match self {
            GrammarError::UnexpectedToken { position, .. }
            | GrammarError::UnexpectedEnd { position, .. }
            | GrammarError::UnterminatedString { position }
            | GrammarError::UnexpectedCharacter { position, .. }
            | GrammarError::UnknownFunction { position, .. }
            | GrammarError::UnknownRelation { position, .. }
            | GrammarError::UnknownActivity { position, .. }
            | GrammarError::InvalidTranslocationArity { position, .. }
            | GrammarError::MalformedIdentifier { position, .. }
            | GrammarError::InvalidVariant { position, .. }
            | GrammarError::InvalidFusion { position, .. }
            | GrammarError::TrailingInput { position, .. }
            | GrammarError::NestingTooDeep { position, .. }
            | GrammarError::NakedName { position, .. }
            | GrammarError::LegacyDisabled { position, .. }
            | GrammarError::EmptyList { position, .. } => Some(*position),
            GrammarError::InvalidSet { .. } => None,
        }
    }
}

/// Convenience alias for grammar results.
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
