//! Configuration for structural analysis.

use serde::{Deserialize, Serialize};

/// Thresholds and budgets used by [`StructuralAnalyzer`](crate::StructuralAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Betweenness centrality an assumption must strictly exceed to count as load-bearing.
    pub load_bearing_threshold: f64,
    /// Centrality is skipped for graphs with fewer nodes than this.
    pub min_nodes_for_centrality: usize,
    /// A strongly held claim with this many evidence predecessors or fewer is hasty.
    pub max_hasty_evidence: usize,
    /// Upper bound on enumerated simple cycles before the analysis gives up.
    pub max_cycles: usize,
    /// Centrality above which a cognitive bias is rated high severity.
    pub high_severity_centrality: f64,
    /// Centrality above which a cognitive bias is rated medium severity.
    pub medium_severity_centrality: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            load_bearing_threshold: 0.3,
            min_nodes_for_centrality: 3,
            max_hasty_evidence: 1,
            max_cycles: 10_000,
            high_severity_centrality: 0.3,
            medium_severity_centrality: 0.1,
        }
    }
}
