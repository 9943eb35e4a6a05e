//! Betweenness centrality (Brandes) on the directed support graph.

use std::collections::VecDeque;

use super::SupportGraph;
use crate::error::{Error, Result};

/// Computes normalized betweenness centrality, indexed by node index.
///
/// Scores are divided by `(n - 1)(n - 2)`, the number of ordered pairs a
/// node can sit between in a directed graph, so they fall in `0.0..=1.0`.
/// A graph without support edges has no shortest paths through any node,
/// so every score is zero.
pub fn betweenness(graph: &SupportGraph) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if graph.edge_count() == 0 {
        return Ok(vec![0.0; n]);
    }

    let successors: Vec<Vec<usize>> = graph
        .inner()
        .node_indices()
        .map(|v| graph.successors(v).into_iter().map(|w| w.index()).collect())
        .collect();

    let mut centrality = vec![0.0_f64; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![-1_i64; n];
        sigma[source] = 1.0;
        dist[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &successors[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in &mut centrality {
            *value *= scale;
        }
    }

    if let Some(bad) = centrality.iter().position(|c| !c.is_finite()) {
        return Err(Error::DegenerateGraph(format!(
            "non-finite centrality for node {}",
            graph.node(petgraph::graph::NodeIndex::new(bad)).id
        )));
    }

    Ok(centrality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentGraph, Proposition, Relationship};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> SupportGraph {
        let props = ids.iter().map(|id| Proposition::new(*id, *id)).collect();
        let rels = edges
            .iter()
            .enumerate()
            .map(|(i, (a, b))| Relationship::supports(format!("r{}", i), *a, *b))
            .collect();
        SupportGraph::build(&ArgumentGraph::new(props, rels))
    }

    #[test]
    fn test_chain_middle_node() {
        // a -> b -> c: only b lies between a pair, (a, c); normalized by 2
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let c = betweenness(&g).unwrap();
        assert_eq!(c[0], 0.0);
        assert!((c[1] - 0.5).abs() < 1e-9);
        assert_eq!(c[2], 0.0);
    }

    #[test]
    fn test_star_hub_dominates() {
        let g = graph(
            &["a", "b", "hub", "d", "e", "f"],
            &[("a", "hub"), ("b", "hub"), ("d", "hub"), ("e", "hub"), ("hub", "f")],
        );
        let c = betweenness(&g).unwrap();
        // four shortest paths x -> hub -> f over 5 * 4 ordered pairs
        assert!((c[2] - 0.2).abs() < 1e-9);
        assert!(c.iter().enumerate().all(|(i, v)| i == 2 || *v == 0.0));
    }

    #[test]
    fn test_split_paths_share_credit() {
        // a -> b -> d and a -> c -> d: b and c each carry half of (a, d)
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let c = betweenness(&g).unwrap();
        assert!((c[1] - c[2]).abs() < 1e-12);
        assert!((c[1] - 0.5 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_edgeless_graph_scores_zero() {
        let g = graph(&["a", "b", "c", "d"], &[]);
        assert_eq!(betweenness(&g).unwrap(), vec![0.0; 4]);
    }
}
