//! Propositions: the nodes of an argument graph.
//!
//! A `Proposition` pairs a natural-language statement with an optional
//! symbolic-logic expression. Its `id` is the stable identity used by
//! relationships, contradictions and fallacies.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The role a proposition plays in an argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropositionKind {
    Premise,
    Conclusion,
    #[default]
    Claim,
    Evidence,
    Assumption,
    Constraint,
    Risk,
    /// Any kind the extraction collaborator produced that this engine does not know.
    Other(String),
}

impl PropositionKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Premise => "premise",
            Self::Conclusion => "conclusion",
            Self::Claim => "claim",
            Self::Evidence => "evidence",
            Self::Assumption => "assumption",
            Self::Constraint => "constraint",
            Self::Risk => "risk",
            Self::Other(s) => s,
        }
    }

    /// Claims and conclusions are the kinds that assert a position the rest of
    /// the argument is meant to support.
    pub fn is_claim_like(&self) -> bool {
        matches!(self, Self::Claim | Self::Conclusion)
    }
}

impl From<&str> for PropositionKind {
    fn from(s: &str) -> Self {
        match s {
            "premise" => Self::Premise,
            "conclusion" => Self::Conclusion,
            "claim" => Self::Claim,
            "evidence" => Self::Evidence,
            "assumption" => Self::Assumption,
            "constraint" => Self::Constraint,
            "risk" => Self::Risk,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PropositionKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PropositionKind> for String {
    fn from(kind: PropositionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PropositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly the speaker holds a proposition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
    /// Stated as if it were beyond question ("always", "everyone knows").
    UnstatedAsAbsolute,
    Other(String),
}

impl Confidence {
    /// Returns the wire name of the confidence level.
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::UnstatedAsAbsolute => "unstated_as_absolute",
            Self::Other(s) => s,
        }
    }

    /// High confidence, whether explicit or implied by absolute phrasing.
    pub fn is_strong(&self) -> bool {
        matches!(self, Self::High | Self::UnstatedAsAbsolute)
    }
}

impl From<&str> for Confidence {
    fn from(s: &str) -> Self {
        match s {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            "unstated_as_absolute" => Self::UnstatedAsAbsolute,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Confidence {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Confidence> for String {
    fn from(c: Confidence) -> Self {
        c.as_str().to_string()
    }
}

/// A single proposition extracted from an argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposition {
    /// Identity, unique within one analysis call.
    pub id: String,
    /// The natural-language statement.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub statement: String,
    /// Symbolic-logic rendering of the statement; may be empty.
    #[serde(
        default,
        alias = "formal_expression",
        deserialize_with = "null_as_empty"
    )]
    pub formal_expression: String,
    #[serde(rename = "type", default)]
    pub kind: PropositionKind,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, alias = "is_implicit")]
    pub is_implicit: bool,
    /// Set when structural analysis finds the proposition is a high-centrality assumption.
    #[serde(default, alias = "is_load_bearing")]
    pub is_load_bearing: bool,
    #[serde(default, alias = "is_anchored")]
    pub is_anchored: bool,
}

impl Proposition {
    /// Creates a claim with medium confidence and no formal expression.
    pub fn new(id: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            statement: statement.into(),
            formal_expression: String::new(),
            kind: PropositionKind::Claim,
            confidence: Confidence::Medium,
            is_implicit: false,
            is_load_bearing: false,
            is_anchored: false,
        }
    }

    /// Sets the symbolic-logic expression.
    pub fn with_expression(mut self, expr: impl Into<String>) -> Self {
        self.formal_expression = expr.into();
        self
    }

    /// Sets the proposition kind.
    pub fn with_kind(mut self, kind: PropositionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the confidence level.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Marks the proposition as load-bearing.
    pub fn load_bearing(mut self) -> Self {
        self.is_load_bearing = true;
        self
    }

    /// Returns the trimmed formal expression, or `None` when it is blank.
    pub fn expression(&self) -> Option<&str> {
        let trimmed = self.formal_expression.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Upstream extractors send `null` for absent text fields.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
