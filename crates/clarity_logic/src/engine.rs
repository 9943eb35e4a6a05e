//! Consistency Engine
//!
//! One [`ConsistencyEngine::check`] call compiles every proposition and
//! relationship into a fresh clause database, asks the solver for a model
//! and, when there is none, reduces the propositions to a small
//! unsatisfiable core and renders a proof for it.
//!
//! Nothing is retained between calls: every check builds its own compiler and
//! variable table, so unrelated proposition sets never share numbering.

use std::collections::{BTreeSet, HashMap};

use clarity_graph::{content_id, ArgumentGraph, Proposition};
use indexmap::IndexMap;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::compiler::{CompiledProposition, ExpressionCompiler, TranslationPath};
use crate::config::{CompilerConfig, EngineConfig};
use crate::constraints::compile_relationship;
use crate::contradiction::{Contradiction, ContradictionKind, Severity};
use crate::proof::{contradiction_proof, CoreMember, LogicProof};
use crate::solver::{solve, SolveStats, Verdict};
use crate::unsat_core::{extract_core, ClauseDatabase, ClauseOrigin};

/// Counters for one consistency check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    /// Propositions compiled (after dropping duplicate ids).
    pub propositions_compiled: usize,
    /// Boolean variables allocated.
    pub variables: usize,
    /// Clauses contributed by propositions.
    pub proposition_clauses: usize,
    /// Clauses contributed by relationships.
    pub relationship_clauses: usize,
    /// Satisfiability checks, including those made during core extraction.
    pub solver_calls: usize,
    /// Propositions translated by pattern matching or as a single atom.
    pub fallbacks: usize,
    /// Search effort summed over every solver call.
    pub search: SolveStats,
    /// Size of the unsatisfiable core, zero when consistent.
    pub core_size: usize,
}

/// Outcome of one consistency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub verdict: Verdict,
    /// Ids of the unsatisfiable core in input order; empty when satisfiable.
    pub core: Vec<String>,
    /// The contradiction describing the core, if any.
    pub contradiction: Option<Contradiction>,
    /// The structured proof behind `contradiction`.
    pub proof: Option<LogicProof>,
    /// How each proposition was translated.
    pub translations: IndexMap<String, TranslationPath>,
    pub stats: EngineStats,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.verdict.is_sat()
    }
}

/// Decides whether a set of propositions can all hold together.
#[derive(Debug, Clone)]
pub struct ConsistencyEngine {
    compiler: CompilerConfig,
    core_critical_limit: usize,
}

impl ConsistencyEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Creates an engine from the compiler and orchestrator settings of `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            core_critical_limit: config.orchestrator.core_critical_limit,
        }
    }

    /// Runs a full check of `graph`.
    ///
    /// Propositions sharing an id are compiled once (the first occurrence).
    /// Relationships whose endpoints name no proposition still compile, over
    /// a free variable that cannot force a conflict.
    pub fn check(&self, graph: &ArgumentGraph) -> ConsistencyReport {
        let props = unique_propositions(graph);
        let positions: HashMap<&str, usize> = props
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.as_str(), i))
            .collect();

        let mut stats = EngineStats {
            propositions_compiled: props.len(),
            ..EngineStats::default()
        };
        let mut compiler = ExpressionCompiler::new(self.compiler.clone());
        let mut db = ClauseDatabase::new(props.len());

        let compiled: Vec<CompiledProposition> = props.iter().map(|p| compiler.compile(p)).collect();
        for (i, c) in compiled.iter().enumerate() {
            stats.proposition_clauses += c.clauses.len();
            if !c.path.is_precise() {
                stats.fallbacks += 1;
            }
            db.extend(c.clauses.iter().cloned(), ClauseOrigin::Proposition(i));
        }

        for rel in &graph.relationships {
            if let Some(clause) = compile_relationship(&mut compiler, rel) {
                let origin = ClauseOrigin::Relationship {
                    from: positions.get(rel.from_id.as_str()).copied(),
                    to: positions.get(rel.to_id.as_str()).copied(),
                };
                db.add(clause, origin);
                stats.relationship_clauses += 1;
            }
        }
        stats.variables = compiler.variables().len();

        let translations: IndexMap<String, TranslationPath> =
            compiled.iter().map(|c| (c.id.clone(), c.path)).collect();

        debug!(
            "Solving {} clauses over {} variables",
            db.len(),
            stats.variables
        );
        let solution = solve(db.clauses());
        stats.solver_calls = 1;
        stats.search.merge(&solution.stats);

        if solution.verdict.is_sat() {
            info!(
                "{} propositions are consistent ({} clauses)",
                props.len(),
                db.len()
            );
            return ConsistencyReport {
                verdict: Verdict::Satisfiable,
                core: Vec::new(),
                contradiction: None,
                proof: None,
                translations,
                stats,
            };
        }

        let core = extract_core(&db, &mut stats.search);
        stats.solver_calls += core.solver_calls;
        stats.core_size = core.members.len();

        let members: Vec<CoreMember<'_>> = core
            .members
            .iter()
            .map(|&i| CoreMember {
                proposition: props[i],
                path: compiled[i].path,
                families: &compiled[i].families,
            })
            .collect();
        let proof = contradiction_proof(&members, &graph.relationships);
        let core_ids: Vec<String> = members.iter().map(|m| m.proposition.id.clone()).collect();
        trace!("Core: {:?}", core_ids);

        let contradiction = Contradiction {
            id: content_id("contra_sat", &core_ids),
            proposition_ids: core_ids.clone(),
            kind: ContradictionKind::Logical,
            severity: self.core_severity(core_ids.len()),
            formal_proof: proof.render(),
            human_explanation: format!(
                "SAT solver detected logical inconsistency among {} propositions. \
                 These statements cannot all be true simultaneously.",
                core_ids.len()
            ),
        };

        info!(
            "{} propositions are inconsistent; core of {} after {} solver calls",
            props.len(),
            core_ids.len(),
            stats.solver_calls
        );

        ConsistencyReport {
            verdict: Verdict::Unsatisfiable,
            core: core_ids,
            contradiction: Some(contradiction),
            proof: Some(proof),
            translations,
            stats,
        }
    }

    /// Contradictions found by a check: none, or exactly one for the core.
    pub fn detect_contradictions(&self, graph: &ArgumentGraph) -> Vec<Contradiction> {
        self.check(graph).contradiction.into_iter().collect()
    }

    fn core_severity(&self, size: usize) -> Severity {
        if size <= self.core_critical_limit {
            Severity::Critical
        } else {
            Severity::Major
        }
    }
}

impl Default for ConsistencyEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Propositions in input order, keeping the first of each id.
fn unique_propositions(graph: &ArgumentGraph) -> Vec<&Proposition> {
    let mut seen = BTreeSet::new();
    graph
        .propositions
        .iter()
        .filter(|p| {
            let fresh = seen.insert(p.id.as_str());
            if !fresh {
                debug!("Duplicate proposition id {}, keeping the first", p.id);
            }
            fresh
        })
        .collect()
}
