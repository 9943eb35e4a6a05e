//! Benchmarks for clarity_graph
//!
//! Run with: cargo bench -p clarity_graph

use clarity_graph::{
    ArgumentGraph, Proposition, PropositionKind, Relationship, StructuralAnalyzer, SupportGraph,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A layered argument: each layer supports the next, with one back edge per layer.
fn layered_argument(layers: usize, width: usize) -> ArgumentGraph {
    let mut propositions = Vec::with_capacity(layers * width);
    let mut relationships = Vec::new();

    for layer in 0..layers {
        for slot in 0..width {
            let kind = match layer {
                0 => PropositionKind::Evidence,
                l if l + 1 == layers => PropositionKind::Conclusion,
                _ if slot == 0 => PropositionKind::Assumption,
                _ => PropositionKind::Premise,
            };
            propositions.push(
                Proposition::new(format!("p{}_{}", layer, slot), format!("statement {}", slot))
                    .with_kind(kind),
            );
            if layer > 0 {
                for prev in 0..width {
                    relationships.push(Relationship::supports(
                        format!("r{}_{}_{}", layer, prev, slot),
                        format!("p{}_{}", layer - 1, prev),
                        format!("p{}_{}", layer, slot),
                    ));
                }
            }
        }
        if layer > 0 {
            relationships.push(Relationship::supports(
                format!("back{}", layer),
                format!("p{}_0", layer),
                format!("p{}_0", layer - 1),
            ));
        }
    }

    ArgumentGraph::new(propositions, relationships)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("support_graph");

    for layers in [4, 8, 16].iter() {
        let argument = layered_argument(*layers, 4);
        group.bench_with_input(BenchmarkId::new("build", layers), &argument, |b, arg| {
            b.iter(|| SupportGraph::build(black_box(arg)));
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = StructuralAnalyzer::new();
    let mut group = c.benchmark_group("structural_analysis");

    for layers in [4, 8, 16].iter() {
        let argument = layered_argument(*layers, 3);
        group.bench_with_input(BenchmarkId::new("analyze", layers), &argument, |b, arg| {
            b.iter(|| analyzer.analyze(black_box(arg)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_analyze);
criterion_main!(benches);
