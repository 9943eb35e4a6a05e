//! Argument robustness scores.
//!
//! ```text
//! base    = e / (e + 1)                 e = incoming `supports` edges
//! penalty = 0.3 × contradictions + 0.2 × vulnerable assumptions
//! bonus   = 0.1 × betweenness centrality
//! score   = clamp(base − penalty + bonus, 0, 1)
//! ```

use clarity_graph::{ArgumentGraph, Proposition, PropositionKind, RelationKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::contradiction::Contradiction;

const CONTRADICTION_PENALTY: f64 = 0.3;
const VULNERABILITY_PENALTY: f64 = 0.2;
const CENTRALITY_BONUS: f64 = 0.1;

/// How well one proposition is supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentScore {
    pub proposition_id: String,
    /// 0.0 (vulnerable) to 1.0 (well supported).
    pub score: f64,
    /// Incoming `supports` edges.
    pub evidence_paths: usize,
    /// Contradictions naming this proposition.
    pub contradiction_count: usize,
    /// Unsupported load-bearing assumptions linked by `depends_on` or `assumes`.
    pub vulnerable_assumptions: usize,
}

/// Scores every proposition of `graph`, in input order.
///
/// `graph` should already carry the load-bearing flags from structural
/// analysis; a proposition missing from `centrality` gets no bonus.
pub fn score_arguments(
    graph: &ArgumentGraph,
    contradictions: &[Contradiction],
    centrality: &IndexMap<String, f64>,
) -> Vec<ArgumentScore> {
    graph
        .propositions
        .iter()
        .map(|prop| {
            let evidence_paths = support_count(graph, &prop.id);
            let contradiction_count = contradictions.iter().filter(|c| c.involves(&prop.id)).count();
            let vulnerable_assumptions = vulnerable_assumptions(graph, &prop.id);

            let base = evidence_paths as f64 / (evidence_paths as f64 + 1.0);
            let penalty = contradiction_count as f64 * CONTRADICTION_PENALTY
                + vulnerable_assumptions as f64 * VULNERABILITY_PENALTY;
            let bonus = centrality.get(&prop.id).copied().unwrap_or(0.0) * CENTRALITY_BONUS;

            ArgumentScore {
                proposition_id: prop.id.clone(),
                score: (base - penalty + bonus).clamp(0.0, 1.0),
                evidence_paths,
                contradiction_count,
                vulnerable_assumptions,
            }
        })
        .collect()
}

fn support_count(graph: &ArgumentGraph, id: &str) -> usize {
    graph
        .relationships_to(id)
        .filter(|r| r.kind == RelationKind::Supports)
        .count()
}

fn is_vulnerable(graph: &ArgumentGraph, prop: &Proposition) -> bool {
    prop.kind == PropositionKind::Assumption
        && prop.is_load_bearing
        && support_count(graph, &prop.id) == 0
}

/// Vulnerable assumptions on either end of this proposition's dependency edges.
fn vulnerable_assumptions(graph: &ArgumentGraph, id: &str) -> usize {
    let dependency = |kind: &RelationKind| matches!(kind, RelationKind::DependsOn | RelationKind::Assumes);

    let outgoing = graph
        .relationships_from(id)
        .filter(|r| dependency(&r.kind))
        .filter_map(|r| graph.proposition(&r.to_id));
    let incoming = graph
        .relationships_to(id)
        .filter(|r| dependency(&r.kind))
        .filter_map(|r| graph.proposition(&r.from_id));

    outgoing
        .chain(incoming)
        .filter(|p| is_vulnerable(graph, p))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contradiction::{ContradictionKind, Severity};
    use clarity_graph::{Proposition, Relationship};

    fn contradiction(ids: &[&str]) -> Contradiction {
        Contradiction {
            id: "c1".into(),
            proposition_ids: ids.iter().map(|s| s.to_string()).collect(),
            kind: ContradictionKind::Logical,
            severity: Severity::Critical,
            formal_proof: String::new(),
            human_explanation: String::new(),
        }
    }

    fn score_of<'a>(scores: &'a [ArgumentScore], id: &str) -> &'a ArgumentScore {
        scores.iter().find(|s| s.proposition_id == id).unwrap()
    }

    #[test]
    fn test_well_supported_claim() {
        let graph = ArgumentGraph::new(
            vec![
                Proposition::new("c", "Claim"),
                Proposition::new("e1", "E1").with_kind(PropositionKind::Evidence),
                Proposition::new("e2", "E2").with_kind(PropositionKind::Evidence),
                Proposition::new("e3", "E3").with_kind(PropositionKind::Evidence),
            ],
            vec![
                Relationship::supports("r1", "e1", "c"),
                Relationship::supports("r2", "e2", "c"),
                Relationship::supports("r3", "e3", "c"),
            ],
        );
        let scores = score_arguments(&graph, &[], &IndexMap::new());
        let claim = score_of(&scores, "c");
        assert_eq!(claim.evidence_paths, 3);
        assert!((claim.score - 0.75).abs() < 1e-9);
        assert_eq!(score_of(&scores, "e1").score, 0.0);
    }

    #[test]
    fn test_contradiction_penalty() {
        let graph = ArgumentGraph::new(
            vec![Proposition::new("c", "Claim"), Proposition::new("e", "E")],
            vec![Relationship::supports("r1", "e", "c")],
        );
        let scores = score_arguments(&graph, &[contradiction(&["c"])], &IndexMap::new());
        let claim = score_of(&scores, "c");
        assert_eq!(claim.contradiction_count, 1);
        assert!((claim.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_vulnerable_assumption_both_directions() {
        let graph = ArgumentGraph::new(
            vec![
                Proposition::new("c", "Claim"),
                Proposition::new("a1", "A1").with_kind(PropositionKind::Assumption).load_bearing(),
                Proposition::new("a2", "A2").with_kind(PropositionKind::Assumption).load_bearing(),
                Proposition::new("a3", "A3").with_kind(PropositionKind::Assumption),
            ],
            vec![
                Relationship::new("r1", "c", "a1", RelationKind::DependsOn),
                Relationship::new("r2", "a2", "c", RelationKind::Assumes),
                Relationship::new("r3", "c", "a3", RelationKind::DependsOn),
            ],
        );
        let scores = score_arguments(&graph, &[], &IndexMap::new());
        assert_eq!(score_of(&scores, "c").vulnerable_assumptions, 2);
    }

    #[test]
    fn test_supported_assumption_is_not_vulnerable() {
        let graph = ArgumentGraph::new(
            vec![
                Proposition::new("c", "Claim"),
                Proposition::new("a", "A").with_kind(PropositionKind::Assumption).load_bearing(),
                Proposition::new("e", "E").with_kind(PropositionKind::Evidence),
            ],
            vec![
                Relationship::new("r1", "c", "a", RelationKind::DependsOn),
                Relationship::supports("r2", "e", "a"),
            ],
        );
        let scores = score_arguments(&graph, &[], &IndexMap::new());
        assert_eq!(score_of(&scores, "c").vulnerable_assumptions, 0);
    }

    #[test]
    fn test_centrality_bonus() {
        let graph = ArgumentGraph::new(
            vec![Proposition::new("hub", "Hub"), Proposition::new("e", "E")],
            vec![Relationship::supports("r1", "e", "hub")],
        );
        let centrality: IndexMap<String, f64> = [("hub".to_string(), 0.5)].into_iter().collect();
        let scores = score_arguments(&graph, &[], &centrality);
        assert!((score_of(&scores, "hub").score - 0.55).abs() < 1e-9);
    }
}
