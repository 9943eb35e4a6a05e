//! Configuration for the Clarity logic engine.

use clarity_graph::StructureConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration for an [`Analyzer`](crate::Analyzer).
///
/// Aggregates the expression compiler, the structural analyzer and the
/// contradiction orchestrator settings. Every field has a default, so a
/// partial JSON document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Expression compilation settings.
    pub compiler: CompilerConfig,
    /// Structural fallacy analysis thresholds.
    pub structure: StructureConfig,
    /// Tier sequencing settings.
    pub orchestrator: OrchestratorConfig,
}

impl EngineConfig {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Settings for the expression compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Let identical atom, predicate and comparison text in different
    /// propositions share one variable. Off by default: each proposition
    /// gets its own namespace.
    pub share_atoms: bool,
    /// Largest clause set CNF distribution may produce for one expression.
    /// Larger expressions fall through to pattern matching.
    pub max_cnf_clauses: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            share_atoms: false,
            max_cnf_clauses: 4096,
        }
    }
}

/// Settings for contradiction tier sequencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// The fallback detector is only consulted with at least this many propositions.
    pub min_propositions_for_fallback: usize,
    /// Cores of at most this many propositions are reported as critical.
    pub core_critical_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_propositions_for_fallback: 2,
            core_critical_limit: 3,
        }
    }
}
