//! Benchmarks for clarity_logic
//!
//! Run with: cargo bench -p clarity_logic

use clarity_graph::{ArgumentGraph, Proposition};
use clarity_logic::{parser, ConsistencyEngine, EngineConfig, ExpressionCompiler};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// `a0, a0 → a1, …, a(n-1) → an`, optionally closed with `¬an`.
fn implication_chain(len: usize, refuted: bool) -> ArgumentGraph {
    let mut propositions = vec![Proposition::new("s0", "start").with_expression("a0")];
    for i in 0..len {
        propositions.push(
            Proposition::new(format!("s{}", i + 1), format!("step {}", i + 1))
                .with_expression(format!("a{} → a{}", i, i + 1)),
        );
    }
    if refuted {
        propositions.push(Proposition::new("end", "denial").with_expression(format!("¬a{}", len)));
    }
    ArgumentGraph::new(propositions, vec![])
}

fn shared_engine() -> ConsistencyEngine {
    let mut config = EngineConfig::default();
    config.compiler.share_atoms = true;
    ConsistencyEngine::with_config(&config)
}

fn bench_parse(c: &mut Criterion) {
    let expressions = [
        "p → q",
        "(a ∧ b) ∨ ¬(c ↔ d)",
        "∀x (human(x) → mortal(x))",
        "budget > 10 ∧ cost ≤ budget",
    ];

    c.bench_function("parse_expressions", |b| {
        b.iter(|| {
            for expr in expressions.iter() {
                let _ = parser::parse(black_box(expr));
            }
        });
    });
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for len in [8, 32, 128].iter() {
        let graph = implication_chain(*len, false);
        group.bench_with_input(BenchmarkId::new("chain", len), &graph, |b, graph| {
            b.iter(|| {
                let mut compiler = ExpressionCompiler::new(Default::default());
                for prop in &graph.propositions {
                    black_box(compiler.compile(prop));
                }
            });
        });
    }

    group.finish();
}

fn bench_check(c: &mut Criterion) {
    let engine = shared_engine();
    let mut group = c.benchmark_group("consistency_check");

    for len in [8, 32, 128].iter() {
        let consistent = implication_chain(*len, false);
        group.bench_with_input(BenchmarkId::new("consistent", len), &consistent, |b, graph| {
            b.iter(|| engine.check(black_box(graph)));
        });

        let refuted = implication_chain(*len, true);
        group.bench_with_input(BenchmarkId::new("core_extraction", len), &refuted, |b, graph| {
            b.iter(|| engine.check(black_box(graph)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_compile, bench_check);
criterion_main!(benches);
