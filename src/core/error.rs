//! Errors raised by machine operations and probability helpers.

use thiserror::Error;

/// Broad category of a [`MachineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: empty state lists, wrong vector lengths, bad rows.
    InvalidArgument,

    /// The named state is not part of the machine.
    NotFound,
}

/// Errors that can occur when building, querying or mutating a machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("A state machine needs at least one state")]
    EmptyStates,

    #[error("Matrix has {found} rows, expected one per state ({expected})")]
    RowCount { expected: usize, found: usize },

    #[error("Matrix row {row} has {found} entries, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("State '{state}' already exists")]
    DuplicateState { state: String },

    #[error("Vector '{vector}' has {found} entries, expected {expected}")]
    VectorLength {
        vector: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Probability {value} at index {index} is outside [0, 1]")]
    ProbabilityOutOfRange { index: usize, value: f64 },

    #[error("Probability vector sums to {sum}, expected 1.0")]
    InvalidRow { sum: f64 },

    #[error("Cannot renormalize a vector that sums to zero")]
    ZeroSumVector,

    #[error("State '{state}' is not part of this machine")]
    StateNotFound { state: String },
}

impl MachineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StateNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_the_only_not_found_kind() {
        let missing = MachineError::StateNotFound {
            state: "Hide".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        assert_eq!(MachineError::EmptyStates.kind(), ErrorKind::InvalidArgument);
        assert_eq!(MachineError::ZeroSumVector.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            MachineError::VectorLength {
                vector: "p_to",
                expected: 2,
                found: 3,
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn messages_include_context() {
        let err = MachineError::VectorLength {
            vector: "p_from",
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "Vector 'p_from' has 2 entries, expected 3");
    }
}
