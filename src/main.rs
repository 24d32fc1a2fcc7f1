//! bel-graph CLI: compile BEL scripts into graphs.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use bel_graph::canonical::node_attributes;
use bel_graph::compiler::{CompileReport, Compiler, ReportSummary};
use bel_graph::config::CompilerConfig;
use bel_graph::error::BelError;

#[derive(Parser)]
#[command(name = "bel-graph", version, about = "Biological Expression Language compiler")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a BEL script and print a summary.
    Compile {
        /// Path to the BEL script.
        file: PathBuf,
    },

    /// Compile a BEL script and write the graph as JSON.
    Export {
        /// Path to the BEL script.
        file: PathBuf,

        /// Output file (stdout if omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Parse one statement and show the canonical form of its terms.
    Check {
        /// A BEL statement, e.g. 'kin(p(HGNC:AKT1)) -> p(HGNC:GSK3B)'.
        statement: String,
    },

    /// Compile a script, then transfer causal edges down the isA hierarchy
    /// below one node.
    Infer {
        /// Path to the BEL script.
        file: PathBuf,

        /// The BEL term to start from, e.g. 'p(SFAM:"AKT Family")'.
        #[arg(long)]
        node: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };

    match cli.command {
        Commands::Compile { file } => {
            let (compiler, report) = compile_file(config, &file)?;
            let graph = compiler.graph();
            println!("Compiled {}", file.display());
            println!("  statements: {}", report.statements);
            println!("  controls:   {}", report.controls);
            println!("  skipped:    {}", report.skipped);
            println!("  nodes:      {}", graph.node_count());
            println!("  edges:      {}", graph.edge_count());
            finish(report)?;
        }

        Commands::Export { file, output } => {
            let (compiler, report) = compile_file(config, &file)?;
            let mut graph = compiler.into_graph();
            graph.set_document("source", file.display().to_string());
            let mut document = graph.to_json();
            document["report"] = serde_json::to_value(ReportSummary::from(&report)).into_diagnostic()?;
            let json = serde_json::to_string_pretty(&document).into_diagnostic()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json).into_diagnostic()?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
            finish(report)?;
        }

        Commands::Check { statement } => {
            let compiler = Compiler::new(config)?;
            let terms = compiler.canonical_terms(&statement)?;
            println!("Valid statement. Terms ({}):", terms.len());
            for term in &terms {
                let attributes = serde_json::to_string(&node_attributes(term)).into_diagnostic()?;
                println!("  {term}");
                println!("    {attributes}");
            }
        }

        Commands::Infer { file, node } => {
            let (mut compiler, report) = compile_file(config, &file)?;
            let root = compiler.resolve_node(&node)?;
            let before = compiler.graph().edge_count();
            let inferred = compiler.infer(&root)?;
            println!("Inference from {root}:");
            println!("  children visited: {}", inferred.children_visited);
            println!("  edges added:      {}", inferred.edges_added);
            println!("  edges total:      {} (was {before})", compiler.graph().edge_count());
            finish(report)?;
        }
    }

    Ok(())
}

fn compile_file(config: CompilerConfig, file: &Path) -> Result<(Compiler, CompileReport)> {
    let script = std::fs::read_to_string(file).into_diagnostic()?;
    let mut compiler = Compiler::new(config)?;
    let report = compiler.compile_str(&script);
    Ok((compiler, report))
}

/// Print every failed statement with its diagnostic. Fails if there were any.
fn finish(report: CompileReport) -> Result<()> {
    let failed = report.failures.len();
    if failed == 0 {
        return Ok(());
    }
    for failure in report.failures {
        let offset = match &failure.error {
            BelError::Grammar(e) => e.position(),
            _ => None,
        };
        match offset {
            Some(offset) => eprintln!("line {} (offset {offset}): {}", failure.line, failure.text),
            None => eprintln!("line {}: {}", failure.line, failure.text),
        }
        eprintln!("{:?}", miette::Report::new(failure.error));
    }
    miette::bail!("{failed} statement(s) failed to compile")
}
