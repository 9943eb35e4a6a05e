//! Contradiction records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The nature of a detected inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContradictionKind {
    /// The statements cannot all hold under propositional logic.
    #[default]
    Logical,
    /// The statements conflict on timing.
    Temporal,
    /// The statements conflict given facts about the world.
    Empirical,
}

impl ContradictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logical => "logical",
            Self::Temporal => "temporal",
            Self::Empirical => "empirical",
        }
    }
}

impl fmt::Display for ContradictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a contradiction undermines the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of propositions that cannot all be true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contradiction {
    pub id: String,
    /// The propositions involved; never empty.
    pub proposition_ids: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: ContradictionKind,
    pub severity: Severity,
    #[serde(default)]
    pub formal_proof: String,
    #[serde(default)]
    pub human_explanation: String,
}

impl Contradiction {
    /// Whether `id` is one of the conflicting propositions.
    pub fn involves(&self, id: &str) -> bool {
        self.proposition_ids.iter().any(|p| p == id)
    }
}
