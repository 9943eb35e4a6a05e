//! Variables, literals, clauses and CNF conversion.
//!
//! A [`VariableTable`] is created fresh for every consistency check and
//! dropped with it, so variable numbering never leaks between unrelated
//! proposition sets.

use std::fmt;

use indexmap::IndexSet;
use log::trace;

use crate::error::{Error, Result};
use crate::formula::Formula;

/// What a boolean variable stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarKey {
    /// "This proposition holds."
    Assertion(String),
    /// An atom, predicate, comparison or membership by its canonical text.
    /// `scope` is the owning proposition, or `None` when atoms are shared.
    Atom { scope: Option<String>, text: String },
    /// A synthetic part created by the pattern-matching fallback.
    Part { prop: String, label: String },
    /// A relationship endpoint naming no proposition. Every occurrence gets
    /// its own variable, so dangling edges never constrain each other.
    Unresolved { id: String, occurrence: usize },
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Assertion(id) => write!(f, "{}", id),
            VarKey::Atom {
                scope: Some(scope),
                text,
            } => write!(f, "{}_{}", scope, text),
            VarKey::Atom { scope: None, text } => write!(f, "{}", text),
            VarKey::Part { prop, label } => write!(f, "{}_{}", prop, label),
            VarKey::Unresolved { id, .. } => write!(f, "{}", id),
        }
    }
}

/// Index of a variable in its [`VariableTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A variable or its negation.
///
/// Ordering groups both polarities of a variable together, which lets
/// [`Clause::new`] spot tautologies after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    var: VarId,
    negated: bool,
}

impl Literal {
    pub fn positive(var: VarId) -> Self {
        Self { var, negated: false }
    }

    pub fn negative(var: VarId) -> Self {
        Self { var, negated: true }
    }

    pub fn var(self) -> VarId {
        self.var
    }

    pub fn is_negated(self) -> bool {
        self.negated
    }

    /// The value this literal needs its variable to take to be true.
    pub fn polarity(self) -> bool {
        !self.negated
    }

    pub fn negate(self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }
}

/// A disjunction of literals. Literals are kept sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let mut literals: Vec<Literal> = literals.into_iter().collect();
        literals.sort();
        literals.dedup();
        Self { literals }
    }

    pub fn unit(literal: Literal) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// The empty clause, which no assignment satisfies.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause contains a variable in both polarities.
    pub fn is_tautology(&self) -> bool {
        self.literals
            .windows(2)
            .any(|w| w[0].var == w[1].var && w[0].negated != w[1].negated)
    }

    /// The clause `guard ∨ self`.
    pub fn guarded_by(&self, guard: Literal) -> Self {
        Clause::new(std::iter::once(guard).chain(self.literals.iter().copied()))
    }
}

/// The arena of variables for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    keys: IndexSet<VarKey>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable for `key`, allocating it on first use.
    pub fn intern(&mut self, key: VarKey) -> VarId {
        let (index, fresh) = self.keys.insert_full(key);
        if fresh {
            trace!("Allocated variable {} for {}", index, self.keys[index]);
        }
        VarId(index)
    }

    /// Returns the variable for `key` if it was ever allocated.
    pub fn get(&self, key: &VarKey) -> Option<VarId> {
        self.keys.get_index_of(key).map(VarId)
    }

    pub fn key(&self, var: VarId) -> Option<&VarKey> {
        self.keys.get_index(var.0)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Renders a literal with its variable name, for logs and tests.
    pub fn describe(&self, literal: Literal) -> String {
        let name = self
            .key(literal.var)
            .map(|k| k.to_string())
            .unwrap_or_else(|| format!("v{}", literal.var.0));
        if literal.negated {
            format!("¬{}", name)
        } else {
            name
        }
    }
}

/// Negation normal form: negations only on literals, no implications.
#[derive(Debug, Clone)]
enum Nnf {
    Lit(Literal),
    Const(bool),
    And(Vec<Nnf>),
    Or(Vec<Nnf>),
}

/// Budget for NNF conversion. Biconditionals convert each side twice, so
/// nested ones grow exponentially without it.
struct NnfBudget {
    remaining: usize,
    limit: usize,
}

impl NnfBudget {
    fn spend(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::CnfTooLarge { limit: self.limit });
        }
        self.remaining -= 1;
        Ok(())
    }
}

/// NNF nodes allowed per clause of the CNF budget.
const NNF_NODES_PER_CLAUSE: usize = 16;

fn to_nnf<F>(formula: &Formula, positive: bool, leaf: &mut F, budget: &mut NnfBudget) -> Result<Nnf>
where
    F: FnMut(&Formula) -> VarId,
{
    budget.spend()?;
    let nnf = match formula {
        Formula::Const(value) => Nnf::Const(*value == positive),
        Formula::Not(inner) => to_nnf(inner, !positive, leaf, budget)?,
        Formula::And(l, r) if positive => Nnf::And(vec![
            to_nnf(l, true, leaf, budget)?,
            to_nnf(r, true, leaf, budget)?,
        ]),
        Formula::And(l, r) => Nnf::Or(vec![
            to_nnf(l, false, leaf, budget)?,
            to_nnf(r, false, leaf, budget)?,
        ]),
        Formula::Or(l, r) if positive => Nnf::Or(vec![
            to_nnf(l, true, leaf, budget)?,
            to_nnf(r, true, leaf, budget)?,
        ]),
        Formula::Or(l, r) => Nnf::And(vec![
            to_nnf(l, false, leaf, budget)?,
            to_nnf(r, false, leaf, budget)?,
        ]),
        Formula::Implies(l, r) if positive => Nnf::Or(vec![
            to_nnf(l, false, leaf, budget)?,
            to_nnf(r, true, leaf, budget)?,
        ]),
        Formula::Implies(l, r) => Nnf::And(vec![
            to_nnf(l, true, leaf, budget)?,
            to_nnf(r, false, leaf, budget)?,
        ]),
        Formula::Iff(l, r) => {
            // positive: (¬l ∨ r) ∧ (l ∨ ¬r); negative: (l ∨ r) ∧ (¬l ∨ ¬r)
            let (lp, ln) = (to_nnf(l, true, leaf, budget)?, to_nnf(l, false, leaf, budget)?);
            let (rp, rn) = (to_nnf(r, true, leaf, budget)?, to_nnf(r, false, leaf, budget)?);
            if positive {
                Nnf::And(vec![Nnf::Or(vec![ln, rp]), Nnf::Or(vec![lp, rn])])
            } else {
                Nnf::And(vec![Nnf::Or(vec![lp, rp]), Nnf::Or(vec![ln, rn])])
            }
        }
        leaf_formula => {
            let var = leaf(leaf_formula);
            if positive {
                Nnf::Lit(Literal::positive(var))
            } else {
                Nnf::Lit(Literal::negative(var))
            }
        }
    };
    Ok(nnf)
}

/// Clause sets during distribution: literal lists without tautologies.
type RawCnf = Vec<Vec<Literal>>;

fn distribute(nnf: Nnf, limit: usize) -> Result<RawCnf> {
    match nnf {
        Nnf::Lit(lit) => Ok(vec![vec![lit]]),
        Nnf::Const(true) => Ok(Vec::new()),
        Nnf::Const(false) => Ok(vec![Vec::new()]),
        Nnf::And(children) => {
            let mut out = Vec::new();
            for child in children {
                out.extend(distribute(child, limit)?);
                if out.len() > limit {
                    return Err(Error::CnfTooLarge { limit });
                }
            }
            Ok(out)
        }
        Nnf::Or(children) => {
            // the empty disjunction is false: one empty clause
            let mut acc: RawCnf = vec![Vec::new()];
            for child in children {
                let cnf = distribute(child, limit)?;
                if acc.len().saturating_mul(cnf.len()) > limit {
                    return Err(Error::CnfTooLarge { limit });
                }
                let mut next = Vec::with_capacity(acc.len() * cnf.len());
                for left in &acc {
                    for right in &cnf {
                        let mut merged = left.clone();
                        merged.extend(right.iter().copied());
                        merged.sort();
                        merged.dedup();
                        if !Clause::new(merged.iter().copied()).is_tautology() {
                            next.push(merged);
                        }
                    }
                }
                acc = next;
            }
            Ok(acc)
        }
    }
}

/// Converts a formula to CNF, resolving each leaf to a variable with `leaf`.
///
/// Tautological clauses are dropped. A result with no clauses means the
/// formula is valid; a result containing an empty clause means it is
/// unsatisfiable on its own. Fails with [`Error::CnfTooLarge`] once more than
/// `max_clauses` clauses would be produced.
pub fn to_cnf<F>(formula: &Formula, max_clauses: usize, mut leaf: F) -> Result<Vec<Clause>>
where
    F: FnMut(&Formula) -> VarId,
{
    let mut budget = NnfBudget {
        remaining: max_clauses.saturating_mul(NNF_NODES_PER_CLAUSE),
        limit: max_clauses,
    };
    let nnf = to_nnf(formula, true, &mut leaf, &mut budget)?;
    let raw = distribute(nnf, max_clauses)?;

    let clauses: IndexSet<Clause> = raw
        .into_iter()
        .map(Clause::new)
        .filter(|c| !c.is_tautology())
        .collect();
    Ok(clauses.into_iter().collect())
}
