//! The full analysis pipeline.
//!
//! Structural analysis runs first so its load-bearing findings can shape
//! contradiction severity and scoring. They are merged into a working copy of
//! the graph; the caller's propositions are never touched.

use clarity_graph::{Analysis, ArgumentGraph, CognitiveBias, Fallacy, StructuralAnalyzer};
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::contradiction::Contradiction;
use crate::engine::EngineStats;
use crate::error::Result;
use crate::orchestrator::{ContradictionOrchestrator, FallbackDetector, ImplicationSource, Tier};
use crate::scoring::{score_arguments, ArgumentScore};

/// Everything the engine found for one argument graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Whether the formal check found a model.
    pub consistent: bool,
    pub contradictions: Vec<Contradiction>,
    /// The tier the contradictions came from.
    pub contradiction_tier: Option<Tier>,
    pub fallacies: Vec<Fallacy>,
    pub biases: Vec<CognitiveBias>,
    /// Propositions the caller may flag as load-bearing.
    pub load_bearing_ids: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub topological_order: Vec<String>,
    pub centrality: IndexMap<String, f64>,
    pub argument_scores: Vec<ArgumentScore>,
    pub unavailable_analyses: Vec<Analysis>,
    pub stats: EngineStats,
}

/// Runs structural analysis, contradiction orchestration and scoring.
pub struct Analyzer {
    structure: StructuralAnalyzer,
    orchestrator: ContradictionOrchestrator,
}

impl Analyzer {
    /// Creates an analyzer with the default configuration and no collaborators.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            structure: StructuralAnalyzer::with_config(config.structure.clone()),
            orchestrator: ContradictionOrchestrator::new(&config),
        }
    }

    /// Plugs in the external implication source and fallback detector.
    pub fn with_collaborators(
        mut self,
        implications: impl ImplicationSource + 'static,
        fallback: impl FallbackDetector + 'static,
    ) -> Self {
        self.orchestrator = self
            .orchestrator
            .with_implications(implications)
            .with_fallback(fallback);
        self
    }

    pub fn analyze(&self, graph: &ArgumentGraph) -> AnalysisReport {
        let structure = self.structure.analyze(graph);
        let working = graph.with_load_bearing(&structure.load_bearing);

        let outcome = self.orchestrator.run(&working);
        let argument_scores = score_arguments(&working, &outcome.contradictions, &structure.centrality);

        info!(
            "Analysis: {} propositions, {} contradictions, {} fallacies, {} biases, {} load-bearing",
            graph.propositions.len(),
            outcome.contradictions.len(),
            structure.fallacies.len(),
            structure.biases.len(),
            structure.load_bearing.len()
        );

        AnalysisReport {
            consistent: outcome.consistency.is_consistent(),
            contradictions: outcome.contradictions,
            contradiction_tier: outcome.tier,
            fallacies: structure.fallacies,
            biases: structure.biases,
            load_bearing_ids: structure.load_bearing,
            cycles: structure.cycles,
            topological_order: structure.topological_order,
            centrality: structure.centrality,
            argument_scores,
            unavailable_analyses: structure.unavailable,
            stats: outcome.consistency.stats,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyzes a `{"propositions": [...], "relationships": [...]}` document with
/// the default configuration and returns the report as JSON.
pub fn analyze_json(input: &str) -> Result<String> {
    let graph: ArgumentGraph = serde_json::from_str(input)?;
    let report = Analyzer::new().analyze(&graph);
    Ok(serde_json::to_string(&report)?)
}
