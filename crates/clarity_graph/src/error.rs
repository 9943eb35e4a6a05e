//! Error types for the Clarity argument graph.

use thiserror::Error;

/// A specialized `Result` type for argument graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while building or analyzing an argument graph.
///
/// Structural analyses report these as values rather than aborting: a failed
/// analysis is recorded as unavailable and the remaining analyses still run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input document did not satisfy the argument graph contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Simple-cycle enumeration produced more cycles than the configured budget.
    #[error("cycle enumeration exceeded budget of {limit} cycles")]
    CycleBudgetExceeded { limit: usize },

    /// The graph shape made an algorithm produce no meaningful result.
    #[error("degenerate graph: {0}")]
    DegenerateGraph(String),

    /// An error occurred during data serialization or deserialization.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CycleBudgetExceeded { limit: 8 };
        assert!(err.to_string().contains('8'));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
