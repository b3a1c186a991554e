//! Build errors for the state machine builder.

use crate::core::MachineError;
use crate::definition::DefinitionViolation;
use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Machine name not specified. Call .name(name) before .build()")]
    MissingName,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error(
        "Definition rejected with {} violation(s): {}",
        .violations.len(),
        summarize(.violations)
    )]
    Invalid { violations: Vec<DefinitionViolation> },

    #[error(transparent)]
    Machine(#[from] MachineError),
}

fn summarize(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_violation() {
        let err = BuildError::Invalid {
            violations: vec![
                DefinitionViolation::EmptyStates,
                DefinitionViolation::RowSum { row: 1, sum: 0.5 },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Definition rejected with 2 violation(s): Definition has no states; \
             Row 1 sums to 0.5, expected 1.0"
        );
    }
}
