//! Definition loading errors.

use thiserror::Error;

/// Errors that can occur while reading a machine definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The JSON document could not be decoded
    #[error("Invalid JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    /// The text ended before a required line
    #[error("Definition ended early: missing {expected}")]
    MissingLine { expected: &'static str },

    #[error("Line {line}: '{token}' is not a state count")]
    InvalidStateCount { line: usize, token: String },

    #[error("Line {line}: expected {expected} state names, found {found}")]
    StateCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {message}")]
    UnknownState { line: usize, message: String },

    #[error("Line {line}: '{token}' is not a number")]
    InvalidNumber { line: usize, token: String },

    #[error("Line {line}: unexpected content after the last matrix row")]
    UnexpectedLine { line: usize },
}
