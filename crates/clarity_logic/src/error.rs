//! Error types for the Clarity logic engine.

use thiserror::Error;

/// A specialized `Result` type for logic engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while compiling or checking propositions.
///
/// Most of these never reach a caller: parse and CNF errors select the next
/// step of the compiler's fallback chain, and collaborator errors are logged
/// and treated as empty output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A formal expression could not be parsed by the structured parser.
    #[error("Parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    /// Conversion to conjunctive normal form exceeded the clause budget.
    #[error("CNF conversion exceeded {limit} clauses")]
    CnfTooLarge { limit: usize },

    /// An error originating from the argument graph layer.
    #[error("Graph error: {0}")]
    Graph(String),

    /// An error occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An external collaborator (implication source, fallback detector) failed.
    #[error("External collaborator error: {0}")]
    External(String),
}

impl Error {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}

impl From<clarity_graph::Error> for Error {
    fn from(e: clarity_graph::Error) -> Self {
        Error::Graph(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
