//! Dependency ordering of the support graph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use super::SupportGraph;

/// Kahn's algorithm, most fundamental propositions first.
///
/// Ties are broken by input order. Nodes on a cycle, and nodes only reachable
/// through one, never reach in-degree zero and are omitted.
pub fn topological_order(graph: &SupportGraph) -> Vec<NodeIndex> {
    let inner = graph.inner();
    let mut in_degree: Vec<usize> = inner
        .node_indices()
        .map(|v| inner.neighbors_directed(v, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(Reverse(i)) = ready.pop() {
        let v = NodeIndex::new(i);
        order.push(v);
        for w in graph.successors(v) {
            in_degree[w.index()] -= 1;
            if in_degree[w.index()] == 0 {
                ready.push(Reverse(w.index()));
            }
        }
    }
    order
}
