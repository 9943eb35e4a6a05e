//! Proof Generation
//!
//! Renders an unsatisfiable core as a structured derivation. A proof is a
//! sequence of sections, each a [`ProofStep`]; the rendered text is a pure
//! function of the core, and the proof carries a BLAKE3 digest of that text
//! so a stored proof can be checked against its content.

use std::collections::BTreeSet;

use clarity_graph::{Proposition, RelationKind, Relationship};
use serde::{Deserialize, Serialize};

use crate::compiler::TranslationPath;
use crate::error::{Error, Result};
use crate::formula::OperatorFamily;

const RULE_WIDTH: usize = 60;

/// A rendered derivation together with an integrity digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicProof {
    /// The ordered sections that make up the proof.
    pub steps: Vec<ProofStep>,
    /// Hex-encoded BLAKE3 digest of the rendered text.
    pub hash: String,
}

impl LogicProof {
    /// Creates a proof from its sections and seals it with a digest.
    pub fn new(steps: Vec<ProofStep>) -> Self {
        let mut proof = Self {
            steps,
            hash: String::new(),
        };
        proof.hash = proof.compute_hash();
        proof
    }

    /// The full proof text, one line per entry of every step.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the stored digest still matches the content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step of a given type, if the proof has one.
    pub fn step(&self, step_type: StepType) -> Option<&ProofStep> {
        self.steps.iter().find(|s| s.step_type == step_type)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    fn compute_hash(&self) -> String {
        hex::encode(blake3::hash(self.render().as_bytes()).as_bytes())
    }
}

/// One section of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Position of the section, starting at 1.
    pub step_num: usize,
    pub step_type: StepType,
    /// Rendered lines, including the section heading.
    pub lines: Vec<String>,
}

impl ProofStep {
    fn new(step_num: usize, step_type: StepType, lines: Vec<String>) -> Self {
        Self {
            step_num,
            step_type,
            lines,
        }
    }
}

/// The role of a proof section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    /// Title and decision procedure.
    Method,
    /// The core propositions as given.
    Premises,
    /// How each expression reads in propositional logic.
    Translation,
    /// Explicit `contradicts` edges inside the core.
    Constraints,
    /// The solver's verdict and core size.
    SolverResult,
    /// A symbolic derivation of the conflict.
    Derivation,
    /// The closing statement.
    Conclusion,
    /// A single explicit-edge contradiction.
    Contradiction,
}

/// A core proposition together with how it was translated.
#[derive(Debug, Clone, Copy)]
pub struct CoreMember<'a> {
    pub proposition: &'a Proposition,
    pub path: TranslationPath,
    pub families: &'a BTreeSet<OperatorFamily>,
}

impl CoreMember<'_> {
    /// The formal expression, or the statement when there is none.
    fn asserted(&self) -> &str {
        self.proposition
            .expression()
            .unwrap_or(self.proposition.statement.as_str())
    }
}

/// Builds the derivation for an unsatisfiable core.
///
/// `relationships` may be the whole input; only `contradicts` edges with both
/// endpoints in the core are cited.
pub fn contradiction_proof(core: &[CoreMember<'_>], relationships: &[Relationship]) -> LogicProof {
    let sections = [
        (StepType::Method, method_section()),
        (StepType::Premises, premises_section(core)),
        (StepType::Translation, translation_section(core)),
        (StepType::Constraints, constraints_section(core, relationships)),
        (StepType::SolverResult, solver_section(core.len())),
        (StepType::Derivation, derivation_section(core)),
        (StepType::Conclusion, conclusion_section(core.len())),
    ];
    LogicProof::new(
        sections
            .into_iter()
            .enumerate()
            .map(|(i, (step_type, lines))| ProofStep::new(i + 1, step_type, lines))
            .collect(),
    )
}

/// The one-step proof for an explicit `contradicts` edge.
pub fn explicit_proof(from: &Proposition, to: &Proposition) -> LogicProof {
    let lines = vec![
        "Explicit contradiction:".to_string(),
        format!("  {}", from.expression().unwrap_or("?")),
        "  ⊥ (contradicts)".to_string(),
        format!("  {}", to.expression().unwrap_or("?")),
    ];
    LogicProof::new(vec![ProofStep::new(1, StepType::Contradiction, lines)])
}

fn strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn method_section() -> Vec<String> {
    let mut lines = strings(&["FORMAL PROOF OF CONTRADICTION"]);
    lines.push("=".repeat(RULE_WIDTH));
    lines.extend(strings(&[
        "",
        "Method: Boolean Satisfiability (SAT) Solving",
        "Algorithm: DPLL (Davis-Putnam-Logemann-Loveland)",
        "",
    ]));
    lines
}

fn premises_section(core: &[CoreMember<'_>]) -> Vec<String> {
    let mut lines = strings(&["Given Propositions:", ""]);
    for (i, member) in core.iter().enumerate() {
        lines.push(format!("  P{}: {}", i + 1, member.proposition.statement));
        if let Some(expr) = member.proposition.expression() {
            lines.push(format!("      Formal: {}", expr));
        }
        lines.push(String::new());
    }
    lines
}

fn translation_section(core: &[CoreMember<'_>]) -> Vec<String> {
    let mut lines = strings(&["Translation to Propositional Logic:", ""]);
    for (i, member) in core.iter().enumerate() {
        let Some(expr) = member.proposition.expression() else {
            continue;
        };
        lines.push(format!("  P{}: {}", i + 1, expr));
        for family in member.families {
            lines.push(format!("      {}", family.translation_note()));
        }
        match member.path {
            TranslationPath::PatternMatched(op) => lines.push(format!(
                "      Approximated by its top-level {}; inner structure not analyzed",
                op.as_str()
            )),
            TranslationPath::Atomic => {
                lines.push("      Treated as a single atomic proposition".to_string())
            }
            TranslationPath::Empty | TranslationPath::Structured => {}
        }
        lines.push(String::new());
    }
    lines
}

fn constraints_section(core: &[CoreMember<'_>], relationships: &[Relationship]) -> Vec<String> {
    let member = |id: &str| core.iter().find(|m| m.proposition.id == id);
    let direct: Vec<_> = relationships
        .iter()
        .filter(|r| r.kind == RelationKind::Contradicts)
        .filter_map(|r| Some((r, member(&r.from_id)?, member(&r.to_id)?)))
        .collect();

    let mut lines = strings(&["Constraint Analysis:", ""]);
    if direct.is_empty() {
        lines.push("  No direct contradictions; the conflict follows from the".to_string());
        lines.push("  combined constraints of the core.".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push("  Direct Contradictions:".to_string());
    for (rel, from, to) in direct {
        lines.push(format!("    • '{}'", from.proposition.statement));
        lines.push("      CONTRADICTS".to_string());
        lines.push(format!("      '{}'", to.proposition.statement));
        if let Some(label) = rel.label.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("      Reason: {}", label));
        }
        lines.push(String::new());
    }
    lines
}

fn solver_section(core_size: usize) -> Vec<String> {
    let mut lines = strings(&[
        "SAT Solver Analysis:",
        "",
        "  Converted all propositions and relationships to CNF clauses.",
        "  Applied DPLL algorithm to find satisfying assignment.",
        "",
        "  Result: UNSATISFIABLE",
        "",
        "  Explanation:",
        "    No assignment of truth values can simultaneously satisfy",
        "    all propositions and their constraints.",
        "",
    ]);
    lines.push(format!(
        "  Minimal Unsatisfiable Core: {} proposition(s)",
        core_size
    ));
    lines.push("    (Removing any one of them restores satisfiability)".to_string());
    lines.push(String::new());
    lines
}

fn derivation_section(core: &[CoreMember<'_>]) -> Vec<String> {
    let mut lines = strings(&["Logical Derivation:", ""]);
    match core {
        [p1, p2] => {
            lines.push("  Assume both P1 and P2 are true:".to_string());
            lines.push(format!("    P1: {}", p1.asserted()));
            lines.push(format!("    P2: {}", p2.asserted()));
            lines.extend(strings(&[
                "",
                "  This leads to: (P1) ∧ (P2)",
                "",
                "  But the constraints require: ¬(P1 ∧ P2)",
                "",
                "  Contradiction: (P1 ∧ P2) ∧ ¬(P1 ∧ P2)",
            ]));
        }
        [_, _, _] => {
            lines.extend(strings(&[
                "  The combination of these three propositions",
                "  creates a logical impossibility:",
                "",
            ]));
            for (i, member) in core.iter().enumerate() {
                lines.push(format!("    P{} asserts: {}", i + 1, member.asserted()));
            }
            lines.extend(strings(&[
                "",
                "  Together, they form: P1 ∧ P2 ∧ P3",
                "  But constraints make this unsatisfiable.",
            ]));
        }
        _ => {
            lines.push(format!(
                "  {} proposition(s) jointly unsatisfiable:",
                core.len()
            ));
            for (i, member) in core.iter().enumerate() {
                lines.push(format!("    P{}: {}", i + 1, member.asserted()));
            }
        }
    }
    lines.push(String::new());
    lines
}

fn conclusion_section(core_size: usize) -> Vec<String> {
    let mut lines = strings(&["Conclusion:"]);
    lines.push(format!(
        "  At least one of the {} propositions in the core must be rejected.",
        core_size
    ));
    lines.extend(strings(&[
        "  The set of propositions is logically inconsistent.",
        "",
        "∴ UNSATISFIABLE (proved by exhaustive search)",
        "Q.E.D.",
        "",
    ]));
    lines.push("─".repeat(RULE_WIDTH));
    lines.extend(strings(&[
        "Note: This proof is formally verified by a SAT solver,",
        "      which guarantees correctness through exhaustive search.",
    ]));
    lines
}
