//! Satisfiability Solver
//!
//! A DPLL decision procedure: unit propagation to a fixpoint, then branch on
//! the lowest-numbered unassigned variable (true first), backtracking
//! chronologically on conflict. Branching is fully deterministic, so the same
//! clause set always yields the same verdict and the same model.

use serde::{Deserialize, Serialize};

use crate::cnf::{Clause, Literal};

/// Outcome of a satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Satisfiable)
    }
}

/// Search effort for one or more solver calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveStats {
    /// Branching decisions made.
    pub decisions: usize,
    /// Literals assigned by unit propagation.
    pub propagations: usize,
    /// Conflicts that forced a backtrack.
    pub conflicts: usize,
}

impl SolveStats {
    pub fn merge(&mut self, other: &SolveStats) {
        self.decisions += other.decisions;
        self.propagations += other.propagations;
        self.conflicts += other.conflicts;
    }
}

/// Verdict, model and effort of one solver call.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub verdict: Verdict,
    /// Satisfying assignment indexed by variable, `None` for variables no
    /// clause mentions. Empty when unsatisfiable.
    pub model: Vec<Option<bool>>,
    pub stats: SolveStats,
}

impl Solution {
    /// The model's value for `literal`, if its variable was assigned.
    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.model
            .get(literal.var().index())
            .copied()
            .flatten()
            .map(|v| v == literal.polarity())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    /// A branching choice whose other value is still untried.
    Decision,
    /// A branching choice after its first value failed.
    Flipped,
    /// Forced by unit propagation.
    Implied,
}

/// Decides satisfiability of a fixed clause set.
#[derive(Debug)]
pub struct Solver<'a> {
    clauses: Vec<&'a Clause>,
    assignment: Vec<Option<bool>>,
    trail: Vec<(usize, Reason)>,
    branch_order: Vec<usize>,
    stats: SolveStats,
}

impl<'a> Solver<'a> {
    /// Creates a solver over `clauses`. An empty set is satisfiable.
    pub fn new(clauses: impl IntoIterator<Item = &'a Clause>) -> Self {
        let clauses: Vec<&Clause> = clauses.into_iter().collect();
        let mut branch_order: Vec<usize> = clauses
            .iter()
            .flat_map(|c| c.literals().iter().map(|l| l.var().index()))
            .collect();
        branch_order.sort_unstable();
        branch_order.dedup();
        let width = branch_order.last().map(|v| v + 1).unwrap_or(0);

        Self {
            clauses,
            assignment: vec![None; width],
            trail: Vec::new(),
            branch_order,
            stats: SolveStats::default(),
        }
    }

    /// Runs the search to completion.
    pub fn solve(mut self) -> Solution {
        let verdict = self.search();
        Solution {
            verdict,
            model: if verdict.is_sat() {
                self.assignment
            } else {
                Vec::new()
            },
            stats: self.stats,
        }
    }

    fn search(&mut self) -> Verdict {
        if self.clauses.iter().any(|c| c.is_empty()) {
            return Verdict::Unsatisfiable;
        }

        loop {
            if !self.propagate() {
                self.stats.conflicts += 1;
                if !self.backtrack() {
                    return Verdict::Unsatisfiable;
                }
                continue;
            }

            match self.next_unassigned() {
                None => return Verdict::Satisfiable,
                Some(var) => {
                    self.stats.decisions += 1;
                    self.assign(var, true, Reason::Decision);
                }
            }
        }
    }

    fn assign(&mut self, var: usize, value: bool, reason: Reason) {
        self.assignment[var] = Some(value);
        self.trail.push((var, reason));
    }

    fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.assignment[literal.var().index()].map(|v| v == literal.polarity())
    }

    /// Unit propagation to a fixpoint. Returns `false` on conflict.
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;
            for i in 0..self.clauses.len() {
                let clause = self.clauses[i];
                let mut unassigned = None;
                let mut open = 0;
                let mut satisfied = false;

                for &literal in clause.literals() {
                    match self.literal_value(literal) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            open += 1;
                            unassigned = Some(literal);
                        }
                    }
                }

                if satisfied {
                    continue;
                }
                match (open, unassigned) {
                    (0, _) => return false,
                    (1, Some(literal)) => {
                        self.stats.propagations += 1;
                        self.assign(literal.var().index(), literal.polarity(), Reason::Implied);
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Undoes the trail up to the latest untried decision and flips it.
    /// Returns `false` when no decision is left to flip.
    fn backtrack(&mut self) -> bool {
        while let Some((var, reason)) = self.trail.pop() {
            let value = self.assignment[var];
            self.assignment[var] = None;
            if reason == Reason::Decision {
                let flipped = !value.unwrap_or(true);
                self.assign(var, flipped, Reason::Flipped);
                return true;
            }
        }
        false
    }

    fn next_unassigned(&self) -> Option<usize> {
        self.branch_order
            .iter()
            .copied()
            .find(|&v| self.assignment[v].is_none())
    }
}

/// Convenience wrapper: solves `clauses` in one call.
pub fn solve<'a>(clauses: impl IntoIterator<Item = &'a Clause>) -> Solution {
    Solver::new(clauses).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{VarKey, VariableTable};

    struct Vars(VariableTable);

    impl Vars {
        fn new() -> Self {
            Vars(VariableTable::new())
        }

        fn lit(&mut self, name: &str) -> Literal {
            match name.strip_prefix('-') {
                Some(n) => Literal::negative(self.0.intern(VarKey::Assertion(n.into()))),
                None => Literal::positive(self.0.intern(VarKey::Assertion(name.into()))),
            }
        }

        fn clauses(&mut self, raw: &[&[&str]]) -> Vec<Clause> {
            raw.iter()
                .map(|c| Clause::new(c.iter().map(|n| self.lit(n)).collect::<Vec<_>>()))
                .collect()
        }
    }

    fn satisfies(solution: &Solution, clauses: &[Clause]) -> bool {
        clauses
            .iter()
            .all(|c| c.literals().iter().any(|l| solution.value(*l) == Some(true)))
    }

    #[test]
    fn test_empty_set_is_satisfiable() {
        let solution = solve(&Vec::<Clause>::new());
        assert_eq!(solution.verdict, Verdict::Satisfiable);
        assert!(solution.model.is_empty());
    }

    #[test]
    fn test_empty_clause_is_unsatisfiable() {
        let clauses = vec![Clause::new(Vec::new())];
        assert_eq!(solve(&clauses).verdict, Verdict::Unsatisfiable);
    }

    #[test]
    fn test_unit_contradiction() {
        let mut v = Vars::new();
        let clauses = v.clauses(&[&["p"], &["-p"]]);
        let solution = solve(&clauses);
        assert_eq!(solution.verdict, Verdict::Unsatisfiable);
        assert_eq!(solution.stats.decisions, 0);
    }

    #[test]
    fn test_modus_ponens_is_satisfiable() {
        let mut v = Vars::new();
        let clauses = v.clauses(&[&["p"], &["-p", "q"], &["q"]]);
        let solution = solve(&clauses);
        assert!(solution.verdict.is_sat());
        assert!(satisfies(&solution, &clauses));
    }

    #[test]
    fn test_requires_backtracking() {
        // the first choice p = true fails, p = false succeeds
        let mut v = Vars::new();
        let clauses = v.clauses(&[&["-p", "q"], &["-p", "-q"], &["p", "r"], &["-r", "s"]]);
        let solution = solve(&clauses);
        assert!(solution.verdict.is_sat());
        assert!(satisfies(&solution, &clauses));
        assert!(solution.stats.conflicts >= 1);
    }

    #[test]
    fn test_pigeonhole_three_into_two() {
        // pigeon i in hole j: pij
        let mut v = Vars::new();
        let clauses = v.clauses(&[
            &["p11", "p12"],
            &["p21", "p22"],
            &["p31", "p32"],
            &["-p11", "-p21"],
            &["-p11", "-p31"],
            &["-p21", "-p31"],
            &["-p12", "-p22"],
            &["-p12", "-p32"],
            &["-p22", "-p32"],
        ]);
        assert_eq!(solve(&clauses).verdict, Verdict::Unsatisfiable);
    }

    #[test]
    fn test_deterministic() {
        let mut v = Vars::new();
        let clauses = v.clauses(&[&["a", "b", "c"], &["-a", "-b"], &["-b", "-c"], &["-a", "c"]]);
        let first = solve(&clauses);
        let second = solve(&clauses);
        assert_eq!(first, second);
    }
}
