//! Simple-cycle enumeration over the support graph.
//!
//! Every elementary cycle is reported exactly once, rooted at its
//! lowest-indexed node (the proposition that appears first in the input).
//! The search from a root only visits nodes with a higher index that share
//! its strongly connected component.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;

use super::SupportGraph;
use crate::error::{Error, Result};

/// Enumerates all simple cycles of length two or more.
///
/// Fails with [`Error::CycleBudgetExceeded`] once more than `limit` cycles
/// have been found; dense graphs have exponentially many.
pub fn simple_cycles(graph: &SupportGraph, limit: usize) -> Result<Vec<Vec<NodeIndex>>> {
    let n = graph.node_count();
    let mut component = vec![usize::MAX; n];
    let mut cyclic = vec![false; n];
    for (c, scc) in tarjan_scc(graph.inner()).into_iter().enumerate() {
        let nontrivial = scc.len() > 1;
        for node in scc {
            component[node.index()] = c;
            cyclic[node.index()] = nontrivial;
        }
    }

    let mut search = CycleSearch {
        graph,
        component,
        on_path: vec![false; n],
        path: Vec::new(),
        cycles: Vec::new(),
        limit,
    };

    for start in graph.inner().node_indices() {
        if cyclic[start.index()] {
            search.run(start)?;
        }
    }

    Ok(search.cycles)
}

/// One node on the search path and how far through its successors we are.
struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

struct CycleSearch<'a> {
    graph: &'a SupportGraph,
    component: Vec<usize>,
    on_path: Vec<bool>,
    path: Vec<NodeIndex>,
    cycles: Vec<Vec<NodeIndex>>,
    limit: usize,
}

impl CycleSearch<'_> {
    /// Depth-first search from `start` with an explicit stack, so path
    /// length is bounded by memory rather than by the thread's stack.
    fn run(&mut self, start: NodeIndex) -> Result<()> {
        let mut stack = vec![self.enter(start)];

        while let Some(frame) = stack.last_mut() {
            let next = match frame.successors.get(frame.next) {
                Some(&next) => {
                    frame.next += 1;
                    next
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    self.on_path[node.index()] = false;
                    self.path.pop();
                    continue;
                }
            };

            if next == start {
                if self.path.len() >= 2 {
                    self.cycles.push(self.path.clone());
                    if self.cycles.len() > self.limit {
                        return Err(Error::CycleBudgetExceeded { limit: self.limit });
                    }
                }
                continue;
            }
            if next.index() < start.index()
                || self.component[next.index()] != self.component[start.index()]
                || self.on_path[next.index()]
            {
                continue;
            }
            let frame = self.enter(next);
            stack.push(frame);
        }
        Ok(())
    }

    fn enter(&mut self, node: NodeIndex) -> Frame {
        self.path.push(node);
        self.on_path[node.index()] = true;
        Frame {
            node,
            successors: self.graph.successors(node),
            next: 0,
        }
    }
}
