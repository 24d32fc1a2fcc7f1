//! BEL grammar: tokens, syntax tree and recursive-descent parser.
//!
//! ## Architecture
//!
//! ```text
//! statement text ──→ lexer ──→ parser ──→ ast::Statement
//!                                 │
//!                        NamespaceResolver
//!                        (entity validation)
//!
//! SET / UNSET / DEFINE ──→ control ──→ Control
//! ```
//!
//! The parser validates syntax and namespaces only. Turning terms into
//! canonical node identities is the job of [`crate::canonical`].
//!
//! ## Usage
//!
//! ```rust
//! use bel_graph::grammar::{ParserConfig, parse_statement};
//! use bel_graph::namespace::AllowAll;
//!
//! let statement =
//!     parse_statement("kin(p(HGNC:AKT1)) -> p(HGNC:GSK3B)", &AllowAll, &ParserConfig::default())
//!         .unwrap();
//! assert!(statement.subject().modifier().is_some());
//! ```

pub mod ast;
pub mod control;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Statement, SubjectTerm, Term};
pub use control::{Control, parse_control};
pub use error::{GrammarError, GrammarResult};
pub use parser::{ParserConfig, parse_statement, parse_term};
