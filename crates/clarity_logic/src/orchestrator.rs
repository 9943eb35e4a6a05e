//! Contradiction Orchestrator
//!
//! Sequences the contradiction detectors by strict precedence:
//!
//! 1. An [`ImplicationSource`] may add relationships implied by domain
//!    knowledge. They feed every later tier.
//! 2. The [`ConsistencyEngine`] is authoritative: a contradiction found here
//!    ends the run.
//! 3. Otherwise every `contradicts` edge between two known propositions is
//!    reported directly.
//! 4. Only when nothing was found so far, and there are enough propositions,
//!    a [`FallbackDetector`] is consulted.
//!
//! Collaborator failures are logged and treated as empty output.

use clarity_graph::{content_id, ArgumentGraph, RelationKind, Relationship};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, OrchestratorConfig};
use crate::contradiction::{Contradiction, ContradictionKind, Severity};
use crate::engine::{ConsistencyEngine, ConsistencyReport};
use crate::error::Result;
use crate::proof::explicit_proof;

/// Supplies relationships implied by knowledge outside the argument.
pub trait ImplicationSource: Send + Sync {
    fn implications(&self, graph: &ArgumentGraph) -> Result<Vec<Relationship>>;
}

/// Last-resort detector for contradictions the formal tiers cannot see.
pub trait FallbackDetector: Send + Sync {
    fn detect(&self, graph: &ArgumentGraph) -> Result<Vec<Contradiction>>;
}

impl<F> ImplicationSource for F
where
    F: Fn(&ArgumentGraph) -> Result<Vec<Relationship>> + Send + Sync,
{
    fn implications(&self, graph: &ArgumentGraph) -> Result<Vec<Relationship>> {
        self(graph)
    }
}

impl<F> FallbackDetector for F
where
    F: Fn(&ArgumentGraph) -> Result<Vec<Contradiction>> + Send + Sync,
{
    fn detect(&self, graph: &ArgumentGraph) -> Result<Vec<Contradiction>> {
        self(graph)
    }
}

/// An implication source that never adds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImplications;

impl ImplicationSource for NoImplications {
    fn implications(&self, _graph: &ArgumentGraph) -> Result<Vec<Relationship>> {
        Ok(Vec::new())
    }
}

/// A fallback detector that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackDetector for NoFallback {
    fn detect(&self, _graph: &ArgumentGraph) -> Result<Vec<Contradiction>> {
        Ok(Vec::new())
    }
}

/// The tier that produced the reported contradictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// The satisfiability check.
    Formal,
    /// Explicit `contradicts` relationships.
    Explicit,
    /// The fallback detector.
    Fallback,
}

/// What one orchestration run found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationOutcome {
    pub contradictions: Vec<Contradiction>,
    /// `None` when no tier found anything.
    pub tier: Option<Tier>,
    /// Relationships added by the implication source.
    pub implied_relationships: Vec<Relationship>,
    /// The formal check, always run.
    pub consistency: ConsistencyReport,
}

/// Runs the contradiction tiers in order of precedence.
pub struct ContradictionOrchestrator {
    engine: ConsistencyEngine,
    config: OrchestratorConfig,
    implications: Box<dyn ImplicationSource>,
    fallback: Box<dyn FallbackDetector>,
}

impl ContradictionOrchestrator {
    /// Creates an orchestrator with no external collaborators.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            engine: ConsistencyEngine::with_config(config),
            config: config.orchestrator.clone(),
            implications: Box::new(NoImplications),
            fallback: Box::new(NoFallback),
        }
    }

    pub fn with_implications(mut self, source: impl ImplicationSource + 'static) -> Self {
        self.implications = Box::new(source);
        self
    }

    pub fn with_fallback(mut self, detector: impl FallbackDetector + 'static) -> Self {
        self.fallback = Box::new(detector);
        self
    }

    /// Runs every tier that is needed for `graph`.
    pub fn run(&self, graph: &ArgumentGraph) -> OrchestrationOutcome {
        let implied = self.implied_relationships(graph);
        let mut working = graph.clone();
        working.extend_relationships(implied.iter().cloned());

        let consistency = self.engine.check(&working);
        if let Some(c) = consistency.contradiction.clone() {
            info!("Formal check found a contradiction over {:?}", c.proposition_ids);
            return OrchestrationOutcome {
                contradictions: vec![c],
                tier: Some(Tier::Formal),
                implied_relationships: implied,
                consistency,
            };
        }

        let explicit = explicit_contradictions(&working);
        if !explicit.is_empty() {
            info!("{} explicit contradictions", explicit.len());
            return OrchestrationOutcome {
                contradictions: explicit,
                tier: Some(Tier::Explicit),
                implied_relationships: implied,
                consistency,
            };
        }

        let fallback = self.fallback_contradictions(&working);
        let tier = (!fallback.is_empty()).then_some(Tier::Fallback);
        OrchestrationOutcome {
            contradictions: fallback,
            tier,
            implied_relationships: implied,
            consistency,
        }
    }

    fn implied_relationships(&self, graph: &ArgumentGraph) -> Vec<Relationship> {
        // one proposition cannot imply anything about another
        if graph.propositions.len() < 2 {
            return Vec::new();
        }
        match self.implications.implications(graph) {
            Ok(rels) => {
                debug!("Implication source added {} relationships", rels.len());
                rels.into_iter()
                    .map(|mut rel| {
                        if rel.id.is_empty() {
                            rel.id = content_id(
                                "semantic_rel",
                                &[rel.from_id.as_str(), rel.to_id.as_str(), rel.kind.as_str()],
                            );
                        }
                        rel
                    })
                    .collect()
            }
            Err(e) => {
                warn!("Implication source failed: {}", e);
                Vec::new()
            }
        }
    }

    fn fallback_contradictions(&self, graph: &ArgumentGraph) -> Vec<Contradiction> {
        if graph.propositions.len() < self.config.min_propositions_for_fallback {
            return Vec::new();
        }
        match self.fallback.detect(graph) {
            Ok(found) => found
                .into_iter()
                .filter(|c| !c.proposition_ids.is_empty())
                .enumerate()
                .map(|(index, mut c)| {
                    // findings over the same propositions still get distinct ids
                    let mut parts = vec![c.kind.as_str().to_string(), index.to_string()];
                    parts.extend(c.proposition_ids.iter().cloned());
                    c.id = content_id("contra_fallback", &parts);
                    c
                })
                .collect(),
            Err(e) => {
                warn!("Fallback detector failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// One contradiction per `contradicts` edge whose endpoints are both known.
///
/// Critical when either endpoint is load-bearing, major otherwise.
pub fn explicit_contradictions(graph: &ArgumentGraph) -> Vec<Contradiction> {
    graph
        .relationships_of(&RelationKind::Contradicts)
        .filter_map(|rel| {
            let from = graph.proposition(&rel.from_id)?;
            let to = graph.proposition(&rel.to_id)?;
            let severity = if from.is_load_bearing || to.is_load_bearing {
                Severity::Critical
            } else {
                Severity::Major
            };
            Some(Contradiction {
                id: content_id(
                    "contra_explicit",
                    &[rel.id.as_str(), from.id.as_str(), to.id.as_str()],
                ),
                proposition_ids: vec![from.id.clone(), to.id.clone()],
                kind: ContradictionKind::Logical,
                severity,
                formal_proof: explicit_proof(from, to).render(),
                human_explanation: format!(
                    "'{}' directly conflicts with '{}'",
                    from.statement, to.statement
                ),
            })
        })
        .collect()
}
