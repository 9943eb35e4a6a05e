//! Symbolic-logic formulas.
//!
//! A [`Formula`] is the closed operator tree the structured parser produces
//! from a proposition's formal expression. Predicates, comparisons and set
//! membership are leaves: each becomes one boolean variable during CNF
//! conversion.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A comparison operator between two terms.
///
/// `≠` and `∉` never appear here: the parser rewrites them as negated
/// equality and negated membership so both spellings share a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Eq => "=",
            CmpOp::Ge => "≥",
            CmpOp::Le => "≤",
        }
    }
}

/// A parsed formal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// `⊤` or `⊥`.
    Const(bool),
    /// A bare propositional variable such as `p` or `likes_milk`.
    Atom(String),
    /// `name(arg, ...)`; arguments are kept as normalized text.
    Predicate { name: String, args: Vec<String> },
    /// `left op right` between two terms.
    Comparison {
        left: String,
        op: CmpOp,
        right: String,
    },
    /// `element ∈ set`.
    Membership { element: String, set: String },
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

/// Operator families that get a translation note in proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorFamily {
    Implication,
    Biconditional,
    Conjunction,
    Disjunction,
}

impl OperatorFamily {
    /// The propositional-logic reading of the family.
    pub fn translation_note(&self) -> &'static str {
        match self {
            OperatorFamily::Implication => "Implication: A → B ≡ ¬A ∨ B",
            OperatorFamily::Biconditional => "Biconditional: A ↔ B ≡ (A → B) ∧ (B → A)",
            OperatorFamily::Conjunction => "Conjunction: Each conjunct must be true",
            OperatorFamily::Disjunction => "Disjunction: At least one disjunct must be true",
        }
    }
}

impl Formula {
    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::Implies(Box::new(left), Box::new(right))
    }

    pub fn iff(left: Formula, right: Formula) -> Self {
        Formula::Iff(Box::new(left), Box::new(right))
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    /// Whether this node becomes a single variable.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Formula::Atom(_)
                | Formula::Predicate { .. }
                | Formula::Comparison { .. }
                | Formula::Membership { .. }
        )
    }

    /// Canonical text of a leaf, used to name its variable.
    ///
    /// Returns `None` for constants and connectives.
    pub fn leaf_text(&self) -> Option<String> {
        match self {
            Formula::Atom(name) => Some(name.clone()),
            Formula::Predicate { name, args } => Some(format!("{}({})", name, args.join(", "))),
            Formula::Comparison { left, op, right } => {
                Some(format!("{} {} {}", left, op.symbol(), right))
            }
            Formula::Membership { element, set } => Some(format!("{} ∈ {}", element, set)),
            _ => None,
        }
    }

    /// Every operator family used anywhere in the formula.
    pub fn families(&self) -> BTreeSet<OperatorFamily> {
        let mut out = BTreeSet::new();
        self.collect_families(&mut out);
        out
    }

    fn collect_families(&self, out: &mut BTreeSet<OperatorFamily>) {
        match self {
            Formula::Not(inner) => inner.collect_families(out),
            Formula::And(l, r) => {
                out.insert(OperatorFamily::Conjunction);
                l.collect_families(out);
                r.collect_families(out);
            }
            Formula::Or(l, r) => {
                out.insert(OperatorFamily::Disjunction);
                l.collect_families(out);
                r.collect_families(out);
            }
            Formula::Implies(l, r) => {
                out.insert(OperatorFamily::Implication);
                l.collect_families(out);
                r.collect_families(out);
            }
            Formula::Iff(l, r) => {
                out.insert(OperatorFamily::Biconditional);
                l.collect_families(out);
                r.collect_families(out);
            }
            _ => {}
        }
    }

    /// Number of leaves, counting repeats.
    pub fn leaf_count(&self) -> usize {
        match self {
            Formula::Const(_) => 0,
            Formula::Not(inner) => inner.leaf_count(),
            Formula::And(l, r) | Formula::Or(l, r) | Formula::Implies(l, r) | Formula::Iff(l, r) => {
                l.leaf_count() + r.leaf_count()
            }
            _ => 1,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Const(true) => f.write_str("⊤"),
            Formula::Const(false) => f.write_str("⊥"),
            // connectives always print their own parentheses
            Formula::Not(inner) => write!(f, "¬{}", inner),
            Formula::And(l, r) => write!(f, "({} ∧ {})", l, r),
            Formula::Or(l, r) => write!(f, "({} ∨ {})", l, r),
            Formula::Implies(l, r) => write!(f, "({} → {})", l, r),
            Formula::Iff(l, r) => write!(f, "({} ↔ {})", l, r),
            leaf => match leaf.leaf_text() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}
