//! Structural Graph Analyzer
//!
//! Builds a directed support graph from the argument and looks for reasoning
//! defects in its shape:
//! - Circular reasoning (simple cycles)
//! - Hasty generalization (strong claims with thin evidence)
//! - False dilemma (two-premise claims framed as a binary choice)
//! - Appeal to authority (evidence that cites a source and nothing backs)
//! - Load-bearing assumptions (high betweenness centrality)
//! - Cognitive biases, rated by centrality (see [`bias`])
//!
//! Only `supports`, `depends_on` and `concludes_from` edges enter the graph.
//! The authority and bias rules read typed edges from the argument itself.
//! Each analysis is independent: one that fails is recorded as unavailable
//! and contributes no findings, and the others still run.

pub mod bias;
pub mod centrality;
pub mod cycles;
pub mod order;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::argument::ArgumentGraph;
use crate::bias::CognitiveBias;
use crate::config::StructureConfig;
use crate::error::Result;
use crate::fallacy::{Fallacy, PatternType};
use crate::proposition::{Confidence, PropositionKind};
use crate::relationship::RelationKind;

/// Words that mark evidence as resting on who said it.
const AUTHORITY_MARKERS: &[&str] = &[
    "says",
    "according",
    "expert",
    "authority",
    "believes",
    "argues",
    "claims",
    "stated",
];

/// Node payload of the support graph.
#[derive(Debug, Clone)]
pub struct SupportNode {
    pub id: String,
    pub statement: String,
    pub kind: PropositionKind,
    pub confidence: Confidence,
    pub formal_expression: String,
}

impl SupportNode {
    /// The statement, or the id when the statement is blank.
    pub fn label(&self) -> &str {
        if self.statement.trim().is_empty() {
            &self.id
        } else {
            &self.statement
        }
    }
}

/// The support-flow view of an argument graph.
///
/// Node indices follow proposition input order. Parallel edges collapse into
/// one, self-loops and edges with an unknown endpoint are dropped.
#[derive(Debug, Clone)]
pub struct SupportGraph {
    graph: DiGraph<SupportNode, RelationKind>,
    index: HashMap<String, NodeIndex>,
}

impl SupportGraph {
    /// Builds the support graph for `argument`.
    pub fn build(argument: &ArgumentGraph) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for prop in &argument.propositions {
            if index.contains_key(&prop.id) {
                trace!("Duplicate proposition id {}, keeping first", prop.id);
                continue;
            }
            let node = graph.add_node(SupportNode {
                id: prop.id.clone(),
                statement: prop.statement.clone(),
                kind: prop.kind.clone(),
                confidence: prop.confidence.clone(),
                formal_expression: prop.formal_expression.clone(),
            });
            index.insert(prop.id.clone(), node);
        }

        for rel in &argument.relationships {
            if !rel.kind.is_support_flow() {
                continue;
            }
            match (index.get(&rel.from_id), index.get(&rel.to_id)) {
                (Some(&from), Some(&to)) if from != to => {
                    graph.update_edge(from, to, rel.kind.clone());
                }
                (Some(_), Some(_)) => trace!("Ignoring self-loop on {}", rel.from_id),
                _ => trace!(
                    "Ignoring dangling {} edge {} -> {}",
                    rel.kind,
                    rel.from_id,
                    rel.to_id
                ),
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying petgraph graph.
    pub fn inner(&self) -> &DiGraph<SupportNode, RelationKind> {
        &self.graph
    }

    pub fn node(&self, index: NodeIndex) -> &SupportNode {
        &self.graph[index]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Direct successors in input order.
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Direct predecessors in input order.
    pub fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(node, dir).collect();
        out.sort();
        out.dedup();
        out
    }

    /// The kind of the edge `from -> to`, if present.
    pub fn edge_kind(&self, from: NodeIndex, to: NodeIndex) -> Option<&RelationKind> {
        self.graph
            .find_edge(from, to)
            .map(|edge| &self.graph[edge])
    }

    fn ids(&self, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|n| self.graph[*n].id.clone()).collect()
    }
}

/// A structural analysis that can fail independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Cycles,
    Centrality,
}

/// Everything structural analysis found for one argument graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralReport {
    /// Circular, hasty-generalization, false-dilemma and appeal-to-authority
    /// findings, in that order.
    pub fallacies: Vec<Fallacy>,
    /// Cognitive biases, grouped by rule.
    pub biases: Vec<CognitiveBias>,
    /// Ids of assumptions whose centrality exceeds the threshold.
    ///
    /// Returned instead of written back so the caller owns its records.
    pub load_bearing: Vec<String>,
    /// Every simple cycle, as proposition ids.
    pub cycles: Vec<Vec<String>>,
    /// Betweenness centrality per proposition, in input order.
    pub centrality: IndexMap<String, f64>,
    /// Acyclic propositions, most fundamental first.
    pub topological_order: Vec<String>,
    /// Analyses that failed and were treated as having no findings.
    pub unavailable: Vec<Analysis>,
}

/// Runs every structural analysis over an argument graph.
#[derive(Debug, Clone, Default)]
pub struct StructuralAnalyzer {
    config: StructureConfig,
}

impl StructuralAnalyzer {
    /// Creates an analyzer with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with explicit thresholds.
    pub fn with_config(config: StructureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Runs all analyses. Never fails; see [`StructuralReport::unavailable`].
    pub fn analyze(&self, argument: &ArgumentGraph) -> StructuralReport {
        let graph = SupportGraph::build(argument);
        debug!(
            "Support graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let mut report = StructuralReport::default();

        match self.detect_circular_reasoning(&graph) {
            Ok((fallacies, cycles)) => {
                report.fallacies.extend(fallacies);
                report.cycles = cycles;
            }
            Err(e) => {
                warn!("Cycle analysis unavailable: {}", e);
                report.unavailable.push(Analysis::Cycles);
            }
        }

        report
            .fallacies
            .extend(self.detect_hasty_generalization(&graph));
        report.fallacies.extend(self.detect_false_dilemma(&graph));
        report
            .fallacies
            .extend(self.detect_appeal_to_authority(argument));

        match self.find_load_bearing(&graph) {
            Ok((load_bearing, centrality)) => {
                report.load_bearing = load_bearing;
                report.centrality = centrality;
            }
            Err(e) => {
                warn!("Centrality analysis unavailable: {}", e);
                report.unavailable.push(Analysis::Centrality);
            }
        }

        report.biases = bias::detect_biases(argument, &report.centrality, &self.config);
        report.topological_order = graph.ids(&order::topological_order(&graph));

        debug!(
            "Structural analysis: {} fallacies, {} biases, {} load-bearing assumptions",
            report.fallacies.len(),
            report.biases.len(),
            report.load_bearing.len()
        );
        report
    }

    /// One `circular` fallacy per simple cycle, plus the cycles themselves.
    pub fn detect_circular_reasoning(
        &self,
        graph: &SupportGraph,
    ) -> Result<(Vec<Fallacy>, Vec<Vec<String>>)> {
        let cycles = cycles::simple_cycles(graph, self.config.max_cycles)?;
        let mut fallacies = Vec::with_capacity(cycles.len());
        let mut ids = Vec::with_capacity(cycles.len());

        for cycle in &cycles {
            let mut description = String::from("Circular reasoning detected:\n");
            for (i, node) in cycle.iter().enumerate() {
                description.push_str(&format!("  {}. {}\n", i + 1, graph.node(*node).label()));
                let next = cycle[(i + 1) % cycle.len()];
                if i + 1 < cycle.len() {
                    let kind = graph
                        .edge_kind(*node, next)
                        .map(RelationKind::as_str)
                        .unwrap_or("supports");
                    description.push_str(&format!("     ↓ {}\n", kind));
                }
            }
            description.push_str("  (loops back to 1)");

            let cycle_ids = graph.ids(cycle);
            let mut chain = cycle_ids.clone();
            chain.push(cycle_ids[0].clone());

            fallacies.push(
                Fallacy::new(PatternType::Circular, cycle_ids.clone(), description)
                    .with_formal_structure(chain.join(" → ")),
            );
            ids.push(cycle_ids);
        }

        debug!("Found {} simple cycles", cycles.len());
        Ok((fallacies, ids))
    }

    /// Strong claims backed by at most `max_hasty_evidence` evidence predecessors.
    pub fn detect_hasty_generalization(&self, graph: &SupportGraph) -> Vec<Fallacy> {
        let mut fallacies = Vec::new();

        for node in graph.inner().node_indices() {
            let prop = graph.node(node);
            if !prop.kind.is_claim_like() || !prop.confidence.is_strong() {
                continue;
            }

            let evidence = graph
                .predecessors(node)
                .into_iter()
                .filter(|p| graph.node(*p).kind == PropositionKind::Evidence)
                .count();

            if evidence <= self.config.max_hasty_evidence {
                trace!("Hasty generalization at {} ({} evidence)", prop.id, evidence);
                fallacies.push(
                    Fallacy::new(
                        PatternType::HastyGeneralization,
                        vec![prop.id.clone()],
                        format!(
                            "High confidence claim supported by only {} piece(s) of evidence:\n  \"{}\"",
                            evidence,
                            prop.label()
                        ),
                    )
                    .with_formal_structure(format!(
                        "|evidence({})| = {} ≤ {}",
                        prop.id, evidence, self.config.max_hasty_evidence
                    )),
                );
            }
        }

        fallacies
    }

    /// Claims with exactly two predecessors whose expression is a disjunction.
    pub fn detect_false_dilemma(&self, graph: &SupportGraph) -> Vec<Fallacy> {
        let mut fallacies = Vec::new();

        for node in graph.inner().node_indices() {
            let prop = graph.node(node);
            if !prop.kind.is_claim_like() {
                continue;
            }
            let predecessors = graph.predecessors(node);
            if predecessors.len() != 2 || !has_disjunction_marker(&prop.formal_expression) {
                continue;
            }

            let mut affected = vec![prop.id.clone()];
            affected.extend(graph.ids(&predecessors));
            fallacies.push(
                Fallacy::new(
                    PatternType::FalseDilemma,
                    affected,
                    format!(
                        "Argument presents only two options when more may exist:\n  \"{}\"",
                        prop.label()
                    ),
                )
                .with_formal_structure(prop.formal_expression.trim().to_string()),
            );
        }

        fallacies
    }

    /// Evidence citing a source rather than data, with no `supports` edge
    /// backing it.
    pub fn detect_appeal_to_authority(&self, argument: &ArgumentGraph) -> Vec<Fallacy> {
        let mut fallacies = Vec::new();

        for prop in argument.propositions_of(&PropositionKind::Evidence) {
            let statement = prop.statement.to_lowercase();
            let expression = prop.formal_expression.to_lowercase();
            let Some(marker) = AUTHORITY_MARKERS
                .iter()
                .find(|m| statement.contains(*m) || expression.contains(*m))
            else {
                continue;
            };

            let backed = argument
                .relationships_to(&prop.id)
                .any(|r| r.kind == RelationKind::Supports);
            if backed {
                continue;
            }

            trace!("Appeal to authority at {} ({:?})", prop.id, marker);
            fallacies.push(
                Fallacy::new(
                    PatternType::AppealToAuthority,
                    vec![prop.id.clone()],
                    format!(
                        "Evidence rests on a source rather than independent justification:\n  \"{}\"",
                        prop.statement
                    ),
                )
                .with_formal_structure(format!("|supports → {}| = 0", prop.id)),
            );
        }

        fallacies
    }

    /// Assumptions whose betweenness centrality exceeds the threshold.
    ///
    /// Graphs below `min_nodes_for_centrality` have no findings and an empty
    /// centrality table.
    pub fn find_load_bearing(
        &self,
        graph: &SupportGraph,
    ) -> Result<(Vec<String>, IndexMap<String, f64>)> {
        if graph.node_count() < self.config.min_nodes_for_centrality {
            return Ok((Vec::new(), IndexMap::new()));
        }

        let scores = centrality::betweenness(graph)?;
        let mut table = IndexMap::with_capacity(scores.len());
        let mut load_bearing = Vec::new();

        for node in graph.inner().node_indices() {
            let prop = graph.node(node);
            let score = scores[node.index()];
            table.insert(prop.id.clone(), score);
            if prop.kind == PropositionKind::Assumption
                && score > self.config.load_bearing_threshold
            {
                debug!("Load-bearing assumption {} (centrality {:.3})", prop.id, score);
                load_bearing.push(prop.id.clone());
            }
        }

        Ok((load_bearing, table))
    }
}

/// Whether an expression is framed as an either/or choice.
fn has_disjunction_marker(expr: &str) -> bool {
    let lower = expr.to_lowercase();
    lower.contains('∨') || lower.contains(" or ") || lower.contains('|')
}
