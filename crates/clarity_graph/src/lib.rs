//! Clarity Graph - Argument Graph Model and Structural Analysis
//!
//! This crate holds the data model shared by the Clarity engine (propositions,
//! relationships and the argument graph that carries them) and the structural
//! analyzer that looks for reasoning defects in the graph's shape.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Argument Graph                          │
//! │          Propositions │ Relationships │ JSON I/O             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Support Graph                       │   │
//! │  │  supports │ depends_on │ concludes_from (petgraph)    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                Structural Analyzer                    │   │
//! │  │  Cycles │ Hasty Generalization │ False Dilemma       │   │
//! │  │  Appeal to Authority │ Cognitive Biases              │   │
//! │  │  Betweenness Centrality │ Topological Order          │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use clarity_graph::{ArgumentGraph, Proposition, Relationship, StructuralAnalyzer};
//!
//! let graph = ArgumentGraph::new(
//!     vec![
//!         Proposition::new("a", "The policy works"),
//!         Proposition::new("b", "Experts endorse it"),
//!         Proposition::new("c", "Experts endorse working policies"),
//!     ],
//!     vec![
//!         Relationship::supports("r1", "a", "b"),
//!         Relationship::supports("r2", "b", "c"),
//!         Relationship::supports("r3", "c", "a"),
//!     ],
//! );
//!
//! let report = StructuralAnalyzer::new().analyze(&graph);
//! assert_eq!(report.cycles.len(), 1);
//! ```

pub mod argument;
pub mod bias;
pub mod config;
pub mod error;
pub mod fallacy;
pub mod ids;
pub mod proposition;
pub mod relationship;
pub mod structure;

// Re-exports
pub use argument::ArgumentGraph;
pub use bias::{BiasSeverity, BiasType, CognitiveBias};
pub use config::StructureConfig;
pub use error::{Error, Result};
pub use fallacy::{Fallacy, PatternType};
pub use ids::content_id;
pub use proposition::{Confidence, Proposition, PropositionKind};
pub use relationship::{RelationKind, Relationship, Strength};
pub use structure::{Analysis, StructuralAnalyzer, StructuralReport, SupportGraph, SupportNode};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
