//! Benchmarks for statement parsing and script compilation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bel_graph::compiler::Compiler;
use bel_graph::config::CompilerConfig;
use bel_graph::grammar::{ParserConfig, parse_statement};
use bel_graph::namespace::AllowAll;

const STATEMENTS: &[&str] = &[
    "kin(p(HGNC:AKT1)) -> p(HGNC:GSK3B, pmod(Ph, Ser, 9))",
    "act(p(HGNC:AKT1), ma(GO:\"kinase activity\")) =| deg(p(HGNC:CDKN1B))",
    "tloc(p(HGNC:FOXO3), fromLoc(GOCC:cytoplasm), toLoc(GOCC:nucleus)) -| r(HGNC:CCND1)",
    "complex(p(HGNC:FOS), p(HGNC:JUN)) increases (p(HGNC:A) decreases bp(GO:apoptosis))",
    "rxn(reactants(a(CHEBI:superoxide)), products(a(CHEBI:\"hydrogen peroxide\"), a(CHEBI:oxygen)))",
];

fn bench_parse(c: &mut Criterion) {
    let config = ParserConfig::default();
    c.bench_function("parse_statements", |bench| {
        bench.iter(|| {
            for statement in STATEMENTS {
                black_box(parse_statement(statement, &AllowAll, &config).unwrap());
            }
        })
    });
}

fn bench_compile(c: &mut Criterion) {
    let mut script = String::from(
        "SET Citation = {\"PubMed\", \"Benchmark\", \"1\"}\nSET Evidence = \"synthetic\"\n",
    );
    for i in 0..200 {
        script.push_str(&format!("p(HGNC:G{i}) -> p(HGNC:G{})\n", i + 1));
        script.push_str(&format!("p(HGNC:G{i}) isA p(SFAM:F{})\n", i % 10));
    }

    c.bench_function("compile_400_lines", |bench| {
        bench.iter(|| {
            let mut compiler = Compiler::new(CompilerConfig::default()).unwrap();
            black_box(compiler.compile_str(&script))
        })
    });
}

criterion_group!(benches, bench_parse, bench_compile);
criterion_main!(benches);
