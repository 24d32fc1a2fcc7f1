//! Rich diagnostic error types for the BEL compiler.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong
//! in a statement and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::grammar::error::GrammarError;

/// Top-level error type for the BEL compiler.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BelError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Provenance(#[from] ProvenanceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Namespace errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum NamespaceError {
    #[error("unknown namespace: \"{namespace}\"")]
    #[diagnostic(
        code(bel::namespace::unknown_namespace),
        help(
            "The namespace prefix is not known to the resolver. \
             Add it to the [namespaces] section of the configuration \
             or check the prefix for typos."
        )
    )]
    UnknownNamespace { namespace: String },

    #[error("unknown term \"{name}\" in namespace \"{namespace}\"")]
    #[diagnostic(
        code(bel::namespace::unknown_term),
        help(
            "The namespace exists but does not contain this name. \
             Check spelling and capitalization; names are matched exactly."
        )
    )]
    UnknownTerm { namespace: String, name: String },

    #[error("invalid pattern for namespace \"{namespace}\": {message}")]
    #[diagnostic(
        code(bel::namespace::invalid_pattern),
        help("Namespace patterns are regular expressions matched against the whole name.")
    )]
    InvalidPattern { namespace: String, message: String },
}

// ---------------------------------------------------------------------------
// Provenance errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ProvenanceError {
    #[error("{relation} edge is missing evidence")]
    #[diagnostic(
        code(bel::provenance::missing_evidence),
        help(
            "Causal statements need supporting text. \
             Add `SET Evidence = \"...\"` before the statement."
        )
    )]
    MissingEvidence { relation: String },

    #[error("{relation} edge is missing a citation")]
    #[diagnostic(
        code(bel::provenance::missing_citation),
        help(
            "Causal statements must be cited. \
             Add `SET Citation = {{\"PubMed\", \"title\", \"12345\"}}` before the statement."
        )
    )]
    MissingCitation { relation: String },

    #[error("incomplete citation for {relation} edge: {field} is empty")]
    #[diagnostic(
        code(bel::provenance::incomplete_citation),
        help("A citation needs a type, a name and a reference; none may be empty.")
    )]
    IncompleteCitation { relation: String, field: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("node not found: {node}")]
    #[diagnostic(
        code(bel::graph::invalid_node),
        help(
            "The node has no corresponding entry in the graph. \
             Compile a statement mentioning it first."
        )
    )]
    InvalidNode { node: String },
}

/// Convenience alias for functions returning BEL compiler results.
pub type BelResult<T> = std::result::Result<T, BelError>;
