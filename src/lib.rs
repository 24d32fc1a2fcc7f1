// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # bel-graph
//!
//! A compiler for the Biological Expression Language (BEL): statements in,
//! a directed multigraph of canonical biological entities out.
//!
//! ## Architecture
//!
//! - **Grammar** (`grammar`): lexer and recursive-descent parser for BEL 2.0
//!   statements, with optional BEL 1.0 forms
//! - **Canonicalization** (`canonical`): terms and modifiers to canonical
//!   node identities and modifier mappings
//! - **Graph** (`graph`): petgraph-backed multigraph with provenance on edges
//! - **Assembly** (`assembler`): statements into nodes and edges under the
//!   ambient citation, evidence and annotations
//! - **Inference** (`infer`): causal edges transferred down `isA` hierarchies
//! - **Compiler** (`compiler`): whole scripts, with per-statement failures
//!
//! ## Library usage
//!
//! ```
//! use bel_graph::compiler::Compiler;
//! use bel_graph::config::CompilerConfig;
//!
//! let mut compiler = Compiler::new(CompilerConfig::default()).unwrap();
//! let report = compiler.compile_str(
//!     r#"
//! SET Citation = {"PubMed", "Example", "12345"}
//! SET Evidence = "AKT1 phosphorylates GSK3B"
//! kin(p(HGNC:AKT1)) -| act(p(HGNC:GSK3B))
//! "#,
//! );
//! assert!(report.is_clean());
//! assert_eq!(compiler.graph().edge_count(), 1);
//! ```

pub mod assembler;
pub mod canonical;
pub mod compiler;
pub mod config;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod infer;
pub mod language;
pub mod namespace;
pub mod provenance;
