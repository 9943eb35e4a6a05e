//! Cognitive bias detection.
//!
//! Each rule looks for the shape a System 1 shortcut leaves in the argument:
//! - Anchoring: an absolute assumption with no support
//! - Confirmation: a claim fed only by agreeing inputs
//! - Availability: confident evidence phrased as an impression
//! - Planning fallacy: a confident load-bearing claim with no breakdown
//! - Attribute substitution: support that talks about different variables
//!
//! Severity follows the biased proposition's betweenness centrality, since
//! more of the argument routes through a central node.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::trace;

use crate::argument::ArgumentGraph;
use crate::bias::{BiasSeverity, BiasType, CognitiveBias};
use crate::config::StructureConfig;
use crate::proposition::{Confidence, Proposition, PropositionKind};
use crate::relationship::RelationKind;

/// Words that mark evidence as a felt impression rather than a measurement.
const SUBJECTIVE_MARKERS: &[&str] = &[
    "feels",
    "seems",
    "looks like",
    "appears",
    "intuition",
    "gut",
    "sense",
    "impression",
    "vibe",
];

/// Identifiers that are connectives or constants, never variables.
const RESERVED_WORDS: &[&str] = &["true", "false", "and", "or", "not"];

/// Runs every bias rule over `argument`, in rule order.
pub fn detect_biases(
    argument: &ArgumentGraph,
    centrality: &IndexMap<String, f64>,
    config: &StructureConfig,
) -> Vec<CognitiveBias> {
    let rules = BiasRules {
        argument,
        centrality,
        config,
    };

    let mut biases = rules.anchoring();
    biases.extend(rules.confirmation());
    biases.extend(rules.availability());
    biases.extend(rules.planning_fallacy());
    biases.extend(rules.attribute_substitution());
    biases
}

struct BiasRules<'a> {
    argument: &'a ArgumentGraph,
    centrality: &'a IndexMap<String, f64>,
    config: &'a StructureConfig,
}

impl BiasRules<'_> {
    fn severity(&self, id: &str) -> BiasSeverity {
        match self.centrality.get(id) {
            Some(&c) if c > self.config.high_severity_centrality => BiasSeverity::High,
            Some(&c) if c > self.config.medium_severity_centrality => BiasSeverity::Medium,
            _ => BiasSeverity::Low,
        }
    }

    /// Ids on the far end of the `supports` edges arriving at `id`.
    fn supporters<'s>(&'s self, id: &'s str) -> Vec<&'s str> {
        self.argument
            .relationships_to(id)
            .filter(|r| r.kind == RelationKind::Supports)
            .map(|r| r.from_id.as_str())
            .collect()
    }

    fn claims(&self) -> Vec<&Proposition> {
        self.argument
            .propositions
            .iter()
            .filter(|p| p.kind.is_claim_like())
            .collect()
    }

    fn anchoring(&self) -> Vec<CognitiveBias> {
        self.argument
            .propositions_of(&PropositionKind::Assumption)
            .filter(|p| p.confidence == Confidence::UnstatedAsAbsolute)
            .filter(|p| self.supporters(&p.id).is_empty())
            .map(|p| {
                trace!("Anchoring on {}", p.id);
                let advice = if p.is_anchored {
                    "It has been flagged as an anchoring point."
                } else {
                    "Consider what evidence would be needed to verify it."
                };
                CognitiveBias::new(
                    BiasType::Anchoring,
                    vec![p.id.clone()],
                    self.severity(&p.id),
                    format!(
                        "The assumption \"{}\" is stated as an absolute without supporting evidence. \
                         Later reasoning is adjusted relative to it instead of being evaluated on its own. {}",
                        p.statement, advice
                    ),
                )
            })
            .collect()
    }

    fn confirmation(&self) -> Vec<CognitiveBias> {
        let mut biases = Vec::new();

        for claim in self.claims() {
            let challenged = self
                .argument
                .relationships_to(&claim.id)
                .any(|r| r.kind.is_adversarial());
            if challenged {
                continue;
            }

            let mut affected = vec![claim.id.clone()];
            for from in self.supporters(&claim.id) {
                if !affected.iter().any(|a| a == from) {
                    affected.push(from.to_string());
                }
            }
            let supporters = affected.len() - 1;
            if supporters < 2 {
                continue;
            }

            biases.push(CognitiveBias::new(
                BiasType::Confirmation,
                affected,
                self.severity(&claim.id),
                format!(
                    "The claim \"{}\" has {} supporting inputs and nothing that contradicts or \
                     attacks it. Only agreeing evidence was gathered.",
                    claim.statement, supporters
                ),
            ));
        }

        biases
    }

    fn availability(&self) -> Vec<CognitiveBias> {
        let mut biases = Vec::new();

        for evidence in self.argument.propositions_of(&PropositionKind::Evidence) {
            if !matches!(evidence.confidence, Confidence::High | Confidence::Medium) {
                continue;
            }
            let statement = evidence.statement.to_lowercase();
            let expression = evidence.formal_expression.to_lowercase();
            let Some(marker) = SUBJECTIVE_MARKERS
                .iter()
                .find(|m| statement.contains(*m) || expression.contains(*m))
            else {
                continue;
            };

            biases.push(CognitiveBias::new(
                BiasType::Availability,
                vec![evidence.id.clone()],
                self.severity(&evidence.id),
                format!(
                    "The evidence \"{}\" rests on \"{}\", an impression of what comes to mind easily \
                     rather than a measurement.",
                    evidence.statement, marker
                ),
            ));
        }

        biases
    }

    fn planning_fallacy(&self) -> Vec<CognitiveBias> {
        let mut biases = Vec::new();

        for claim in self.claims() {
            if claim.confidence != Confidence::High || !self.is_load_bearing(claim) {
                continue;
            }
            let decomposed = self
                .argument
                .relationships_from(&claim.id)
                .any(|r| matches!(r.kind, RelationKind::DependsOn | RelationKind::Assumes));
            let constrained = self.argument.relationships_to(&claim.id).any(|r| {
                self.argument.proposition(&r.from_id).is_some_and(|p| {
                    matches!(p.kind, PropositionKind::Constraint | PropositionKind::Risk)
                })
            });
            if decomposed || constrained {
                continue;
            }

            biases.push(CognitiveBias::new(
                BiasType::PlanningFallacy,
                vec![claim.id.clone()],
                self.severity(&claim.id),
                format!(
                    "The claim \"{}\" carries the argument and is held with high confidence, \
                     but depends on nothing and faces no stated constraint or risk.",
                    claim.statement
                ),
            ));
        }

        biases
    }

    fn attribute_substitution(&self) -> Vec<CognitiveBias> {
        let mut biases = Vec::new();

        for claim in self.claims() {
            let claim_vars = expression_variables(&claim.formal_expression);
            if claim_vars.is_empty() {
                continue;
            }

            for from in self.supporters(&claim.id) {
                let Some(support) = self.argument.proposition(from) else {
                    continue;
                };
                let support_vars = expression_variables(&support.formal_expression);
                if support_vars.is_empty() || support_vars.iter().any(|v| claim_vars.contains(v)) {
                    continue;
                }

                biases.push(CognitiveBias::new(
                    BiasType::AttributeSubstitution,
                    vec![claim.id.clone(), support.id.clone()],
                    self.severity(&claim.id),
                    format!(
                        "The claim \"{}\" is about [{}] but its support \"{}\" measures [{}].",
                        claim.statement,
                        claim_vars.join(", "),
                        support.statement,
                        support_vars.join(", ")
                    ),
                ));
            }
        }

        biases
    }

    fn is_load_bearing(&self, prop: &Proposition) -> bool {
        prop.is_load_bearing
            || self
                .centrality
                .get(&prop.id)
                .is_some_and(|c| *c > self.config.load_bearing_threshold)
    }
}

/// Variables an expression talks about, sorted.
///
/// Call arguments count whatever their case; function names do not. Outside
/// a call only lowercase identifiers count, so `P → Q` names no variables.
fn expression_variables(expr: &str) -> Vec<String> {
    let chars: Vec<char> = expr.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut vars = BTreeSet::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        if !is_word(chars[i]) {
            match chars[i] {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            i += 1;
            continue;
        }

        let begin = i;
        while i < chars.len() && is_word(chars[i]) {
            i += 1;
        }
        let word: String = chars[begin..i].iter().collect();
        let is_call = chars[i..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| *c == '(');
        let lowercase = word.chars().all(|c| !c.is_uppercase());

        if !is_call
            && (depth > 0 || lowercase)
            && word.chars().count() > 1
            && !word.starts_with(|c: char| c.is_ascii_digit())
            && !RESERVED_WORDS.contains(&word.as_str())
        {
            vars.insert(word);
        }
    }

    vars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Proposition, Relationship};

    fn detect(argument: &ArgumentGraph, centrality: &[(&str, f64)]) -> Vec<CognitiveBias> {
        let table: IndexMap<String, f64> = centrality
            .iter()
            .map(|(id, c)| (id.to_string(), *c))
            .collect();
        detect_biases(argument, &table, &StructureConfig::default())
    }

    fn of_type(biases: &[CognitiveBias], bias_type: BiasType) -> Vec<&CognitiveBias> {
        biases.iter().filter(|b| b.bias_type == bias_type).collect()
    }

    fn absolute_assumption(id: &str) -> Proposition {
        Proposition::new(id, "Larger deals mean better outcomes")
            .with_kind(PropositionKind::Assumption)
            .with_confidence(Confidence::UnstatedAsAbsolute)
    }

    fn evidence(id: &str) -> Proposition {
        Proposition::new(id, format!("evidence {}", id)).with_kind(PropositionKind::Evidence)
    }

    #[test]
    fn test_expression_variables() {
        assert_eq!(expression_variables("quality(outcome)"), vec!["outcome"]);
        assert_eq!(
            expression_variables("market_sentiment = positive"),
            vec!["market_sentiment", "positive"]
        );
        assert_eq!(expression_variables("f(g(Deal, size))"), vec!["Deal", "size"]);
        assert!(expression_variables("P → Q").is_empty());
        assert!(expression_variables("p ∧ true").is_empty());
    }

    #[test]
    fn test_anchoring_on_unsupported_absolute_assumption() {
        let mut anchored = absolute_assumption("a1");
        anchored.is_anchored = true;
        let argument = ArgumentGraph::new(
            vec![anchored, absolute_assumption("a2"), evidence("e")],
            vec![Relationship::supports("r1", "e", "a2")],
        );

        let biases = detect(&argument, &[]);
        let found = of_type(&biases, BiasType::Anchoring);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, vec!["a1"]);
        assert!(found[0].description.contains("anchoring point"));
        assert!(found[0].kahneman_reference.contains("Chapter 11"));
        assert_eq!(found[0].system, 1);
    }

    #[test]
    fn test_confirmation_needs_two_unchallenged_supports() {
        let argument = ArgumentGraph::new(
            vec![
                Proposition::new("c", "We should pivot"),
                Proposition::new("d", "We should hire"),
                evidence("e1"),
                evidence("e2"),
                evidence("x"),
            ],
            vec![
                Relationship::supports("r1", "e1", "c"),
                Relationship::supports("r2", "e2", "c"),
                Relationship::supports("r3", "e1", "d"),
                Relationship::supports("r4", "e2", "d"),
                Relationship::contradicts("r5", "x", "d"),
            ],
        );

        let biases = detect(&argument, &[]);
        let found = of_type(&biases, BiasType::Confirmation);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, vec!["c", "e1", "e2"]);
    }

    #[test]
    fn test_availability_on_subjective_evidence() {
        let argument = ArgumentGraph::new(
            vec![
                Proposition::new("e1", "Market timing feels right")
                    .with_kind(PropositionKind::Evidence)
                    .with_confidence(Confidence::High),
                Proposition::new("e2", "It seems popular")
                    .with_kind(PropositionKind::Evidence)
                    .with_confidence(Confidence::Low),
                Proposition::new("e3", "Revenue grew 12%")
                    .with_kind(PropositionKind::Evidence)
                    .with_confidence(Confidence::High),
            ],
            vec![],
        );

        let biases = detect(&argument, &[]);
        let found = of_type(&biases, BiasType::Availability);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, vec!["e1"]);
        assert!(found[0].description.contains("\"feels\""));
    }

    #[test]
    fn test_planning_fallacy_needs_no_breakdown() {
        let claim = |id: &str| {
            Proposition::new(id, format!("We ship {} by Friday", id))
                .with_confidence(Confidence::High)
                .load_bearing()
        };
        let argument = ArgumentGraph::new(
            vec![
                claim("bare"),
                claim("split"),
                claim("risky"),
                Proposition::new("sub", "Backend done"),
                Proposition::new("risk", "Vendor delay").with_kind(PropositionKind::Risk),
            ],
            vec![
                Relationship::new("r1", "split", "sub", RelationKind::DependsOn),
                Relationship::new("r2", "risk", "risky", RelationKind::Attacks),
            ],
        );

        let biases = detect(&argument, &[]);
        let found = of_type(&biases, BiasType::PlanningFallacy);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, vec!["bare"]);
    }

    #[test]
    fn test_central_claim_counts_as_load_bearing() {
        let argument = ArgumentGraph::new(
            vec![Proposition::new("c", "It will work").with_confidence(Confidence::High)],
            vec![],
        );
        assert!(of_type(&detect(&argument, &[]), BiasType::PlanningFallacy).is_empty());
        assert_eq!(
            of_type(&detect(&argument, &[("c", 0.6)]), BiasType::PlanningFallacy).len(),
            1
        );
    }

    #[test]
    fn test_attribute_substitution_on_disjoint_variables() {
        let argument = ArgumentGraph::new(
            vec![
                Proposition::new("c", "The outcome was good").with_expression("quality(outcome)"),
                evidence("e1").with_expression("size(deal)"),
                evidence("e2").with_expression("quality(outcome) ∧ rated(outcome)"),
                evidence("e3").with_expression("P"),
            ],
            vec![
                Relationship::supports("r1", "e1", "c"),
                Relationship::supports("r2", "e2", "c"),
                Relationship::supports("r3", "e3", "c"),
            ],
        );

        let biases = detect(&argument, &[]);
        let found = of_type(&biases, BiasType::AttributeSubstitution);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, vec!["c", "e1"]);
        assert!(found[0].description.contains("[deal]"));
    }

    #[test]
    fn test_severity_scales_with_centrality() {
        let argument = ArgumentGraph::new(vec![absolute_assumption("a")], vec![]);
        let severity = |c: f64| detect(&argument, &[("a", c)])[0].severity;

        assert_eq!(severity(0.01), BiasSeverity::Low);
        assert_eq!(severity(0.2), BiasSeverity::Medium);
        assert_eq!(severity(0.5), BiasSeverity::High);
        assert_eq!(detect(&argument, &[])[0].severity, BiasSeverity::Low);
    }

    #[test]
    fn test_ids_are_stable_and_distinct() {
        let argument = ArgumentGraph::new(
            vec![absolute_assumption("a1"), absolute_assumption("a2")],
            vec![],
        );
        let first = detect(&argument, &[]);
        let second = detect(&argument, &[]);
        assert_eq!(first, second);
        assert_ne!(first[0].id, first[1].id);
        assert!(first[0].id.starts_with("bias_anchoring_"));
    }
}
