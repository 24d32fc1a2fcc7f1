//! Script compiler: BEL text in, graph out.
//!
//! [`Compiler`] ties the pieces together. It reads a script line by line,
//! feeds control lines to the assembly [`Session`], parses and assembles
//! statements, and records failures without stopping. One bad statement
//! costs one statement, never the whole document.

use serde::Serialize;
use serde_json::Value;

use crate::assembler::Session;
use crate::canonical::{AnonymousIds, NodeAttributes, NodeId, canonicalize_term};
use crate::config::CompilerConfig;
use crate::error::{BelError, BelResult};
use crate::grammar::ast::{Statement, Term};
use crate::grammar::control::{self, Control};
use crate::grammar::parser::{parse_statement, parse_term};
use crate::graph::BelGraph;
use crate::infer::{InferenceReport, infer_child_relations};
use crate::language::Function;
use crate::namespace::NamespaceResolver;

/// A statement or control line that could not be compiled.
#[derive(Debug)]
pub struct StatementFailure {
    /// 1-based line where the (possibly continued) statement starts.
    pub line: usize,
    pub text: String,
    pub error: BelError,
}

/// Summary of one [`Compiler::compile_str`] call.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Statements assembled into the graph.
    pub statements: usize,
    /// Edges those statements added.
    pub edges: usize,
    /// `SET` / `UNSET` lines applied.
    pub controls: usize,
    /// Control lines recognized but ignored (`DEFINE`, `SET DOCUMENT`, ...).
    pub skipped: usize,
    pub failures: Vec<StatementFailure>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Counts-only view of a report, for JSON output.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub statements: usize,
    pub edges: usize,
    pub controls: usize,
    pub skipped: usize,
    pub failures: usize,
}

impl From<&CompileReport> for ReportSummary {
    fn from(report: &CompileReport) -> Self {
        Self {
            statements: report.statements,
            edges: report.edges,
            controls: report.controls,
            skipped: report.skipped,
            failures: report.failures.len(),
        }
    }
}

/// Compiles BEL scripts into one [`BelGraph`].
///
/// Successive `compile_str` calls add to the same graph and share the
/// session, so provenance set by one chunk applies to the next.
pub struct Compiler {
    config: CompilerConfig,
    resolver: Box<dyn NamespaceResolver>,
    session: Session,
    graph: BelGraph,
}

impl Compiler {
    /// Build a compiler, resolving namespaces as the configuration says.
    pub fn new(config: CompilerConfig) -> BelResult<Self> {
        let resolver = config.namespaces.build_resolver()?;
        Ok(Self::with_resolver(config, resolver))
    }

    /// Build a compiler with a caller-supplied namespace resolver. The
    /// `[namespaces]` section of `config` is not used.
    pub fn with_resolver(config: CompilerConfig, resolver: Box<dyn NamespaceResolver>) -> Self {
        Self {
            session: Session::new(config.assembler.clone()),
            config,
            resolver,
            graph: BelGraph::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn graph(&self) -> &BelGraph {
        &self.graph
    }

    pub fn into_graph(self) -> BelGraph {
        self.graph
    }

    /// Compile a whole script.
    pub fn compile_str(&mut self, script: &str) -> CompileReport {
        let mut report = CompileReport::default();
        for (line, text) in logical_lines(script) {
            if let Err(error) = self.compile_line(&text, line, &mut report) {
                tracing::warn!(line, error = %error, "statement skipped");
                report.failures.push(StatementFailure { line, text, error });
            }
        }
        tracing::info!(
            statements = report.statements,
            edges = report.edges,
            failures = report.failures.len(),
            nodes = self.graph.node_count(),
            "compilation finished"
        );
        report
    }

    fn compile_line(&mut self, text: &str, line: usize, report: &mut CompileReport) -> BelResult<()> {
        if control::is_control(text) {
            let control = control::parse_control(text)?;
            if matches!(control, Control::Ignored(_)) {
                report.skipped += 1;
            } else {
                report.controls += 1;
            }
            self.session.apply_control(&control);
            return Ok(());
        }
        report.edges += self.add_statement(text, Some(line))?;
        report.statements += 1;
        Ok(())
    }

    /// Parse and assemble a single statement under the current provenance.
    /// Returns the number of edges added.
    pub fn add_statement(&mut self, text: &str, line: Option<usize>) -> BelResult<usize> {
        let statement = parse_statement(text, self.resolver.as_ref(), &self.config.parser)?;
        self.session.add_statement(&mut self.graph, &statement, line)
    }

    /// Canonical identity of a term written in BEL, e.g. `p(HGNC:AKT1)`.
    /// A modifier around the term is ignored.
    ///
    /// Reaction ids are handed out per session, so a reaction resolves to
    /// the graph node with the same reactants and products. An unknown
    /// reaction gets a fresh id that matches nothing in the graph.
    pub fn resolve_node(&self, text: &str) -> BelResult<NodeId> {
        let subject = parse_term(text, self.resolver.as_ref(), &self.config.parser)?;
        let mut ids = AnonymousIds::new(self.config.assembler.merge_identical_reactions);
        let term = canonicalize_term(subject.term(), &mut ids)?;
        if term.id.function() != Function::Reaction {
            return Ok(term.id);
        }
        let wanted = participants(&term.attributes);
        let existing = self.graph.nodes().into_iter().find(|id| {
            id.function() == Function::Reaction
                && self.graph.node_attributes(id).map(participants) == Some(wanted)
        });
        Ok(existing.unwrap_or(term.id))
    }

    /// Canonical identities of every top-level term in a statement, in
    /// reading order. Nothing is added to the graph.
    pub fn canonical_terms(&self, text: &str) -> BelResult<Vec<NodeId>> {
        let statement = parse_statement(text, self.resolver.as_ref(), &self.config.parser)?;
        let mut terms = Vec::new();
        collect_terms(&statement, &mut terms);
        let mut ids = AnonymousIds::new(self.config.assembler.merge_identical_reactions);
        terms
            .into_iter()
            .map(|term| Ok(canonicalize_term(term, &mut ids)?.id))
            .collect()
    }

    /// Run ontological inference from `node` with the configured options.
    pub fn infer(&mut self, node: &NodeId) -> BelResult<InferenceReport> {
        infer_child_relations(&mut self.graph, node, &self.config.inference)
    }
}

fn participants(attributes: &NodeAttributes) -> (Option<&Value>, Option<&Value>) {
    (attributes.get("reactants"), attributes.get("products"))
}

fn collect_terms<'a>(statement: &'a Statement, out: &mut Vec<&'a Term>) {
    match statement {
        Statement::Term(subject) => out.push(subject.term()),
        Statement::Relation { subject, object, .. } => {
            out.push(subject.term());
            out.push(object.term());
        }
        Statement::Nested { subject, nested, .. } => {
            out.push(subject.term());
            collect_terms(nested, out);
        }
        Statement::List {
            subject, members, ..
        } => {
            out.push(subject.term());
            out.extend(members.iter());
        }
    }
}

/// Split a script into `(line, text)` pairs, dropping blank lines and
/// `#` comments and joining lines that end with a backslash.
fn logical_lines(script: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in script.lines().enumerate() {
        let trimmed = raw.trim();
        let continued = trimmed.ends_with('\\');
        let body = trimmed.trim_end_matches('\\').trim_end();

        let (start, mut text) = match pending.take() {
            Some((start, mut text)) => {
                if !body.is_empty() {
                    text.push(' ');
                    text.push_str(body);
                }
                (start, text)
            }
            None => {
                if body.is_empty() || body.starts_with('#') {
                    continue;
                }
                (idx + 1, body.to_string())
            }
        };

        if continued {
            pending = Some((start, text));
        } else {
            text.truncate(text.trim_end().len());
            lines.push((start, text));
        }
    }
    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}
