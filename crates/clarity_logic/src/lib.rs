//! Clarity Logic - Formal Consistency Engine
//!
//! This crate decides whether the propositions of an argument can all be true
//! at once. Each proposition's symbolic-logic expression is compiled to
//! clauses, typed relationships add constraints between propositions, and a
//! DPLL solver searches for a model. When none exists the engine reduces the
//! propositions to a small unsatisfiable core and renders a formal proof.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Analyzer                               │
//! │   Structural Analysis │ Orchestration │ Argument Scoring     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Contradiction Orchestrator               │   │
//! │  │  Implications │ Formal │ Explicit │ Fallback         │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                Consistency Engine                     │   │
//! │  │  Expression Compiler │ Relationship Constraints      │   │
//! │  │  DPLL Solver │ Core Extraction │ Proof Generation    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use clarity_graph::{ArgumentGraph, Proposition, Relationship};
//! use clarity_logic::ConsistencyEngine;
//!
//! let graph = ArgumentGraph::new(
//!     vec![
//!         Proposition::new("p1", "I love cow milk").with_expression("p"),
//!         Proposition::new("p2", "I hate all cow-based products").with_expression("¬q"),
//!         Proposition::new("p3", "Cow milk is a cow-based product").with_expression("p → q"),
//!     ],
//!     vec![Relationship::contradicts("r1", "p2", "p3")],
//! );
//!
//! let report = ConsistencyEngine::new().check(&graph);
//! assert!(!report.is_consistent());
//! println!("{}", report.proof.unwrap().render());
//! ```

pub mod analysis;
pub mod cnf;
pub mod compiler;
pub mod config;
pub mod constraints;
pub mod contradiction;
pub mod engine;
pub mod error;
pub mod formula;
pub mod orchestrator;
pub mod parser;
pub mod proof;
pub mod scoring;
pub mod solver;
pub mod unsat_core;

// Re-exports
pub use analysis::{analyze_json, AnalysisReport, Analyzer};
pub use cnf::{Clause, Literal, VarId, VarKey, VariableTable};
pub use compiler::{CompiledProposition, ExpressionCompiler, PatternOperator, TranslationPath};
pub use config::{CompilerConfig, EngineConfig, OrchestratorConfig};
pub use contradiction::{Contradiction, ContradictionKind, Severity};
pub use engine::{ConsistencyEngine, ConsistencyReport, EngineStats};
pub use error::{Error, Result};
pub use formula::{CmpOp, Formula, OperatorFamily};
pub use orchestrator::{
    ContradictionOrchestrator, FallbackDetector, ImplicationSource, NoFallback, NoImplications,
    OrchestrationOutcome, Tier,
};
pub use proof::{LogicProof, ProofStep, StepType};
pub use scoring::{score_arguments, ArgumentScore};
pub use solver::{solve, Solution, SolveStats, Solver, Verdict};
pub use unsat_core::{extract_core, ClauseDatabase, ClauseOrigin, UnsatCore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
