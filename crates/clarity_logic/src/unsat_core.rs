//! Minimal Core Extractor
//!
//! Clauses are stored with the proposition (or relationship) that produced
//! them. Restricting the database to a subset of propositions keeps their
//! own clauses plus every relationship clause whose known endpoints are all
//! kept. The restriction is monotone in the kept set, so when dropping a
//! proposition once made the set satisfiable, dropping it from any smaller
//! kept set does too. That is what makes a single greedy pass pass the
//! single-removal test.

use log::{debug, trace};

use crate::cnf::Clause;
use crate::solver::{solve, SolveStats, Verdict};

/// Where a clause came from, by position in the proposition list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOrigin {
    Proposition(usize),
    /// `None` marks an endpoint that names no proposition.
    Relationship {
        from: Option<usize>,
        to: Option<usize>,
    },
}

impl ClauseOrigin {
    fn is_kept(&self, kept: &[bool]) -> bool {
        let keeps = |idx: &Option<usize>| idx.map_or(true, |i| kept.get(i).copied().unwrap_or(false));
        match self {
            ClauseOrigin::Proposition(i) => kept.get(*i).copied().unwrap_or(false),
            ClauseOrigin::Relationship { from, to } => keeps(from) && keeps(to),
        }
    }
}

/// All clauses of one check, tagged with their origin.
#[derive(Debug, Clone, Default)]
pub struct ClauseDatabase {
    clauses: Vec<Clause>,
    origins: Vec<ClauseOrigin>,
    proposition_count: usize,
}

impl ClauseDatabase {
    pub fn new(proposition_count: usize) -> Self {
        Self {
            proposition_count,
            ..Self::default()
        }
    }

    pub fn add(&mut self, clause: Clause, origin: ClauseOrigin) {
        self.clauses.push(clause);
        self.origins.push(origin);
    }

    pub fn extend(&mut self, clauses: impl IntoIterator<Item = Clause>, origin: ClauseOrigin) {
        for clause in clauses {
            self.add(clause, origin);
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn proposition_count(&self) -> usize {
        self.proposition_count
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clauses that survive when only the propositions flagged in `kept` remain.
    pub fn restricted<'a>(&'a self, kept: &'a [bool]) -> impl Iterator<Item = &'a Clause> + 'a {
        self.clauses
            .iter()
            .zip(&self.origins)
            .filter(move |(_, origin)| origin.is_kept(kept))
            .map(|(clause, _)| clause)
    }

    /// Solves the restriction to `kept`, adding the effort to `stats`.
    pub fn check(&self, kept: &[bool], stats: &mut SolveStats) -> Verdict {
        let solution = solve(self.restricted(kept));
        stats.merge(&solution.stats);
        solution.verdict
    }
}

/// Result of core extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsatCore {
    /// Positions of the core propositions, in input order.
    pub members: Vec<usize>,
    /// Satisfiability checks performed.
    pub solver_calls: usize,
}

/// Greedy single-pass reduction of an unsatisfiable database.
///
/// Visits propositions in input order and drops each one for good if the
/// rest stays unsatisfiable. The last remaining proposition is never
/// dropped, so the core is never empty.
pub fn extract_core(db: &ClauseDatabase, stats: &mut SolveStats) -> UnsatCore {
    let n = db.proposition_count();
    let mut kept = vec![true; n];
    let mut remaining = n;
    let mut solver_calls = 0;

    for i in 0..n {
        if remaining <= 1 {
            break;
        }
        kept[i] = false;
        solver_calls += 1;
        if db.check(&kept, stats) == Verdict::Unsatisfiable {
            trace!("Dropped proposition #{} from core", i);
            remaining -= 1;
        } else {
            kept[i] = true;
        }
    }

    let members: Vec<usize> = (0..n).filter(|&i| kept[i]).collect();
    debug!(
        "Core reduced from {} to {} propositions in {} checks",
        n,
        members.len(),
        solver_calls
    );
    UnsatCore {
        members,
        solver_calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{Literal, VarKey, VariableTable};

    fn lit(table: &mut VariableTable, name: &str, positive: bool) -> Literal {
        let var = table.intern(VarKey::Assertion(name.into()));
        if positive {
            Literal::positive(var)
        } else {
            Literal::negative(var)
        }
    }

    #[test]
    fn test_restriction_follows_endpoints() {
        let mut t = VariableTable::new();
        let mut db = ClauseDatabase::new(2);
        db.add(Clause::unit(lit(&mut t, "a", true)), ClauseOrigin::Proposition(0));
        db.add(Clause::unit(lit(&mut t, "b", true)), ClauseOrigin::Proposition(1));
        db.add(
            Clause::new([lit(&mut t, "a", false), lit(&mut t, "b", false)]),
            ClauseOrigin::Relationship {
                from: Some(0),
                to: Some(1),
            },
        );
        db.add(
            Clause::new([lit(&mut t, "a", false), lit(&mut t, "ghost", false)]),
            ClauseOrigin::Relationship {
                from: Some(0),
                to: None,
            },
        );

        assert_eq!(db.restricted(&[true, true]).count(), 4);
        assert_eq!(db.restricted(&[true, false]).count(), 2);
        assert_eq!(db.restricted(&[false, true]).count(), 1);
    }

    #[test]
    fn test_extracts_pair_from_noise() {
        // x, a, y, ¬a: only a and ¬a are needed
        let mut t = VariableTable::new();
        let mut db = ClauseDatabase::new(4);
        db.add(Clause::unit(lit(&mut t, "x", true)), ClauseOrigin::Proposition(0));
        db.add(Clause::unit(lit(&mut t, "a", true)), ClauseOrigin::Proposition(1));
        db.add(Clause::unit(lit(&mut t, "y", true)), ClauseOrigin::Proposition(2));
        db.add(Clause::unit(lit(&mut t, "a", false)), ClauseOrigin::Proposition(3));

        let mut stats = SolveStats::default();
        let core = extract_core(&db, &mut stats);
        assert_eq!(core.members, vec![1, 3]);
        assert_eq!(core.solver_calls, 4);
    }

    #[test]
    fn test_self_contradiction_keeps_single_member() {
        let mut t = VariableTable::new();
        let mut db = ClauseDatabase::new(2);
        db.add(Clause::unit(lit(&mut t, "a", true)), ClauseOrigin::Proposition(0));
        db.add(Clause::unit(lit(&mut t, "b", true)), ClauseOrigin::Proposition(1));
        db.add(Clause::unit(lit(&mut t, "b", false)), ClauseOrigin::Proposition(1));

        let mut stats = SolveStats::default();
        let core = extract_core(&db, &mut stats);
        assert_eq!(core.members, vec![1]);
    }

    #[test]
    fn test_core_members_are_each_necessary() {
        // a, a → b, b → c, ¬c, plus an unrelated d
        let mut t = VariableTable::new();
        let mut db = ClauseDatabase::new(5);
        db.add(Clause::unit(lit(&mut t, "a", true)), ClauseOrigin::Proposition(0));
        db.add(
            Clause::new([lit(&mut t, "a", false), lit(&mut t, "b", true)]),
            ClauseOrigin::Proposition(1),
        );
        db.add(Clause::unit(lit(&mut t, "d", true)), ClauseOrigin::Proposition(2));
        db.add(
            Clause::new([lit(&mut t, "b", false), lit(&mut t, "c", true)]),
            ClauseOrigin::Proposition(3),
        );
        db.add(Clause::unit(lit(&mut t, "c", false)), ClauseOrigin::Proposition(4));

        let mut stats = SolveStats::default();
        let core = extract_core(&db, &mut stats);
        assert_eq!(core.members, vec![0, 1, 3, 4]);

        for &m in &core.members {
            let mut kept = vec![false; 5];
            for &k in &core.members {
                kept[k] = k != m;
            }
            assert_eq!(db.check(&kept, &mut stats), Verdict::Satisfiable);
        }
    }
}
