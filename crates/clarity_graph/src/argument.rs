//! The argument graph: the complete input of one analysis call.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::proposition::{Proposition, PropositionKind};
use crate::relationship::{RelationKind, Relationship};

/// Propositions and the relationships between them, in caller order.
///
/// Order matters: it fixes variable numbering, the core-extraction pass and
/// tie-breaking in every structural analysis, which keeps results deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentGraph {
    #[serde(default)]
    pub propositions: Vec<Proposition>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ArgumentGraph {
    /// Creates a graph from its parts.
    pub fn new(propositions: Vec<Proposition>, relationships: Vec<Relationship>) -> Self {
        Self {
            propositions,
            relationships,
        }
    }

    /// Parses a `{"propositions": [...], "relationships": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))
    }

    /// Serializes the graph back to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }

    /// Returns `true` when there are no propositions.
    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    /// Looks up a proposition by id. The first occurrence wins on duplicates.
    pub fn proposition(&self, id: &str) -> Option<&Proposition> {
        self.propositions.iter().find(|p| p.id == id)
    }

    /// Position of a proposition in input order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.propositions.iter().position(|p| p.id == id)
    }

    /// All relationships leaving `id`.
    pub fn relationships_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.from_id == id)
    }

    /// All relationships arriving at `id`.
    pub fn relationships_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.to_id == id)
    }

    /// Relationships of one kind, in input order.
    pub fn relationships_of<'a>(
        &'a self,
        kind: &'a RelationKind,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| &r.kind == kind)
    }

    /// Propositions of one kind, in input order.
    pub fn propositions_of<'a>(
        &'a self,
        kind: &'a PropositionKind,
    ) -> impl Iterator<Item = &'a Proposition> {
        self.propositions.iter().filter(move |p| &p.kind == kind)
    }

    /// Returns a copy with `is_load_bearing` set on every listed proposition.
    ///
    /// The receiver is left untouched; callers decide whether to adopt the flags.
    pub fn with_load_bearing(&self, ids: &[String]) -> Self {
        let mut merged = self.clone();
        for prop in &mut merged.propositions {
            if ids.iter().any(|id| id == &prop.id) {
                prop.is_load_bearing = true;
            }
        }
        merged
    }

    /// Appends relationships, e.g. those supplied by an implication extractor.
    pub fn extend_relationships(&mut self, extra: impl IntoIterator<Item = Relationship>) {
        self.relationships.extend(extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArgumentGraph {
        ArgumentGraph::new(
            vec![
                Proposition::new("a", "A").with_kind(PropositionKind::Evidence),
                Proposition::new("b", "B").with_kind(PropositionKind::Assumption),
                Proposition::new("c", "C"),
            ],
            vec![
                Relationship::supports("r1", "a", "c"),
                Relationship::supports("r2", "b", "c"),
                Relationship::contradicts("r3", "a", "b"),
            ],
        )
    }

    #[test]
    fn test_lookup() {
        let graph = sample();
        assert_eq!(graph.proposition("b").unwrap().statement, "B");
        assert_eq!(graph.position("c"), Some(2));
        assert!(graph.proposition("zzz").is_none());
    }

    #[test]
    fn test_edge_queries() {
        let graph = sample();
        assert_eq!(graph.relationships_to("c").count(), 2);
        assert_eq!(graph.relationships_from("a").count(), 2);
        assert_eq!(graph.relationships_of(&RelationKind::Contradicts).count(), 1);
        assert_eq!(graph.propositions_of(&PropositionKind::Evidence).count(), 1);
    }

    #[test]
    fn test_with_load_bearing_does_not_mutate_receiver() {
        let graph = sample();
        let merged = graph.with_load_bearing(&["b".to_string()]);
        assert!(merged.proposition("b").unwrap().is_load_bearing);
        assert!(!graph.proposition("b").unwrap().is_load_bearing);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ArgumentGraph::from_json("nope"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_json_empty_document() {
        let graph = ArgumentGraph::from_json("{}").unwrap();
        assert!(graph.is_empty());
        assert!(graph.relationships.is_empty());
    }
}
