//! Typed, directed relationships between propositions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical role of a relationship edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    /// `from` gives a reason to believe `to`.
    Supports,
    /// `from` and `to` cannot both hold.
    Contradicts,
    /// `from` only holds if `to` holds.
    DependsOn,
    /// `from` undermines `to`.
    Attacks,
    /// `from` takes `to` for granted.
    Assumes,
    /// `from` is concluded from `to`.
    ConcludesFrom,
    Other(String),
}

impl RelationKind {
    /// Returns the wire name of the relationship kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::DependsOn => "depends_on",
            Self::Attacks => "attacks",
            Self::Assumes => "assumes",
            Self::ConcludesFrom => "concludes_from",
            Self::Other(s) => s,
        }
    }

    /// Whether the edge carries support flow and belongs in the support graph.
    ///
    /// Adversarial edges (`contradicts`, `attacks`) and `assumes` are excluded.
    pub fn is_support_flow(&self) -> bool {
        matches!(self, Self::Supports | Self::DependsOn | Self::ConcludesFrom)
    }

    /// Whether the edge states that its endpoints are incompatible.
    pub fn is_adversarial(&self) -> bool {
        matches!(self, Self::Contradicts | Self::Attacks)
    }
}

impl From<&str> for RelationKind {
    fn from(s: &str) -> Self {
        match s {
            "supports" => Self::Supports,
            "contradicts" => Self::Contradicts,
            "depends_on" => Self::DependsOn,
            "attacks" => Self::Attacks,
            "assumes" => Self::Assumes,
            "concludes_from" => Self::ConcludesFrom,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a relationship was asserted. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strength {
    Strong,
    #[default]
    Moderate,
    Weak,
    Other(String),
}

impl Strength {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Strength {
    fn from(s: String) -> Self {
        match s.as_str() {
            "strong" => Self::Strong,
            "moderate" => Self::Moderate,
            "weak" => Self::Weak,
            _ => Self::Other(s),
        }
    }
}

impl From<Strength> for String {
    fn from(s: Strength) -> Self {
        s.as_str().to_string()
    }
}

/// A directed, typed edge between two propositions.
///
/// Endpoints are plain ids; an id that names no proposition leaves the edge
/// dangling, which every consumer tolerates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "from_id", alias = "source")]
    pub from_id: String,
    #[serde(alias = "to_id", alias = "target")]
    pub to_id: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default)]
    pub strength: Strength,
    /// Free-text reason, usually supplied by the extraction collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Relationship {
    /// Creates a relationship with moderate strength and no label.
    pub fn new(
        id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
            strength: Strength::Moderate,
            label: None,
        }
    }

    /// Shorthand for a `supports` edge.
    pub fn supports(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(id, from, to, RelationKind::Supports)
    }

    /// Shorthand for a `contradicts` edge.
    pub fn contradicts(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::new(id, from, to, RelationKind::Contradicts)
    }

    /// Sets the strength.
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_flow_kinds() {
        assert!(RelationKind::Supports.is_support_flow());
        assert!(RelationKind::DependsOn.is_support_flow());
        assert!(RelationKind::ConcludesFrom.is_support_flow());
        assert!(!RelationKind::Contradicts.is_support_flow());
        assert!(!RelationKind::Attacks.is_support_flow());
        assert!(!RelationKind::Assumes.is_support_flow());
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = RelationKind::from("refines");
        assert_eq!(kind, RelationKind::Other("refines".into()));
        assert_eq!(String::from(kind), "refines");
    }

    #[test]
    fn test_deserialize_source_target_aliases() {
        let json = r#"{"source":"a","target":"b","type":"attacks"}"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.from_id, "a");
        assert_eq!(rel.to_id, "b");
        assert_eq!(rel.kind, RelationKind::Attacks);
        assert_eq!(rel.strength, Strength::Moderate);
    }

    #[test]
    fn test_serialize_camel_case() {
        let rel = Relationship::supports("r1", "a", "b").with_strength(Strength::Strong);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["fromId"], "a");
        assert_eq!(json["type"], "supports");
        assert_eq!(json["strength"], "strong");
        assert!(json.get("label").is_none());
    }
}
