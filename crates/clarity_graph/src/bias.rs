//! Cognitive bias records.
//!
//! Each bias is a structural signature of a System 1 shortcut, named after the
//! chapter of Kahneman's *Thinking, Fast and Slow* that describes it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The heuristic a bias finding was detected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasType {
    /// An absolute assumption nothing supports.
    Anchoring,
    /// A claim backed only by agreeing inputs.
    Confirmation,
    /// Confident evidence phrased as an impression.
    Availability,
    /// A confident load-bearing claim with no breakdown.
    PlanningFallacy,
    /// Evidence that measures something other than what the claim is about.
    AttributeSubstitution,
}

impl BiasType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anchoring => "anchoring",
            Self::Confirmation => "confirmation",
            Self::Availability => "availability",
            Self::PlanningFallacy => "planning_fallacy",
            Self::AttributeSubstitution => "attribute_substitution",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Anchoring => "Anchoring Effect",
            Self::Confirmation => "Confirmation Bias",
            Self::Availability => "Availability Heuristic",
            Self::PlanningFallacy => "Planning Fallacy",
            Self::AttributeSubstitution => "Attribute Substitution",
        }
    }

    /// Where the heuristic is described.
    pub fn reference(&self) -> &'static str {
        match self {
            Self::Anchoring => "Thinking, Fast and Slow, Chapter 11: Anchors",
            Self::Confirmation => {
                "Thinking, Fast and Slow, Chapter 7: A Machine for Jumping to Conclusions"
            }
            Self::Availability => "Thinking, Fast and Slow, Chapter 12: The Science of Availability",
            Self::PlanningFallacy => "Thinking, Fast and Slow, Chapter 23: The Outside View",
            Self::AttributeSubstitution => {
                "Thinking, Fast and Slow, Chapter 9: Answering an Easier Question"
            }
        }
    }

    pub(crate) fn id_prefix(&self) -> &'static str {
        match self {
            Self::Anchoring => "bias_anchoring",
            Self::Confirmation => "bias_confirmation",
            Self::Availability => "bias_availability",
            Self::PlanningFallacy => "bias_planning",
            Self::AttributeSubstitution => "bias_substitution",
        }
    }
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the argument rests on the biased proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasSeverity {
    Low,
    Medium,
    High,
}

/// A cognitive bias found in the argument graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveBias {
    pub id: String,
    pub name: String,
    pub bias_type: BiasType,
    pub kahneman_reference: String,
    pub description: String,
    /// The proposition the bias is anchored on comes first.
    pub affected_node_ids: Vec<String>,
    pub severity: BiasSeverity,
    /// Kahneman's thinking system the shortcut belongs to (1 = fast, 2 = slow).
    pub system: u8,
}

impl CognitiveBias {
    /// Creates a System 1 bias whose id and name derive from its type and nodes.
    pub fn new(
        bias_type: BiasType,
        affected_node_ids: Vec<String>,
        severity: BiasSeverity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::ids::content_id(bias_type.id_prefix(), &affected_node_ids),
            name: bias_type.display_name().to_string(),
            bias_type,
            kahneman_reference: bias_type.reference().to_string(),
            description: description.into(),
            affected_node_ids,
            severity,
            system: 1,
        }
    }

    pub fn affects(&self, id: &str) -> bool {
        self.affected_node_ids.iter().any(|n| n == id)
    }
}
