//! Structural fallacy records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The structural signature a fallacy was detected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// A simple cycle in the support graph.
    Circular,
    /// A strongly held claim with at most one piece of direct evidence.
    HastyGeneralization,
    /// A two-premise claim framed as a binary choice.
    FalseDilemma,
    /// Evidence that cites a source instead of data, with nothing backing it.
    AppealToAuthority,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::HastyGeneralization => "hasty_generalization",
            Self::FalseDilemma => "false_dilemma",
            Self::AppealToAuthority => "appeal_to_authority",
        }
    }

    /// Conventional display name of the fallacy.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Circular => "Circular Reasoning (Begging the Question)",
            Self::HastyGeneralization => "Hasty Generalization",
            Self::FalseDilemma => "False Dilemma (False Dichotomy)",
            Self::AppealToAuthority => "Appeal to Authority",
        }
    }

    /// Prefix used for content-derived fallacy ids.
    pub(crate) fn id_prefix(&self) -> &'static str {
        match self {
            Self::Circular => "fallacy_circular",
            Self::HastyGeneralization => "fallacy_hasty",
            Self::FalseDilemma => "fallacy_dilemma",
            Self::AppealToAuthority => "fallacy_authority",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reasoning defect found in the shape of the argument graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fallacy {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Proposition ids involved, in the order the pattern visits them.
    pub affected_node_ids: Vec<String>,
    pub pattern_type: PatternType,
    /// Compact symbolic rendering of the offending structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formal_structure: Option<String>,
}

impl Fallacy {
    /// Creates a fallacy whose id and name derive from its pattern and nodes.
    pub fn new(
        pattern_type: PatternType,
        affected_node_ids: Vec<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::ids::content_id(pattern_type.id_prefix(), &affected_node_ids),
            name: pattern_type.display_name().to_string(),
            description: description.into(),
            affected_node_ids,
            pattern_type,
            formal_structure: None,
        }
    }

    /// Attaches a symbolic rendering.
    pub fn with_formal_structure(mut self, structure: impl Into<String>) -> Self {
        self.formal_structure = Some(structure.into());
        self
    }

    /// Whether the fallacy involves `id`.
    pub fn affects(&self, id: &str) -> bool {
        self.affected_node_ids.iter().any(|n| n == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallacy_ids_are_content_derived() {
        let a = Fallacy::new(PatternType::Circular, vec!["a".into(), "b".into()], "loop");
        let b = Fallacy::new(PatternType::Circular, vec!["a".into(), "b".into()], "other text");
        assert_eq!(a.id, b.id);
        assert!(a.id.starts_with("fallacy_circular_"));
        assert!(a.affects("b"));
    }

    #[test]
    fn test_pattern_type_serializes_snake_case() {
        let fallacy = Fallacy::new(PatternType::HastyGeneralization, vec!["c".into()], "d");
        let json = serde_json::to_value(&fallacy).unwrap();
        assert_eq!(json["patternType"], "hasty_generalization");
        assert_eq!(json["affectedNodeIds"][0], "c");
        assert!(json.get("formalStructure").is_none());
    }
}
