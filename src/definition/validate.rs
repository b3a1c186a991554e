//! Whole-definition validation that reports every problem at once.
//!
//! Definitions usually come from hand-edited files. Stopping at the first
//! bad row means fixing them one at a time, so every check runs and the
//! failures accumulate in a `Validation`.

use crate::core::{row_sum, valid_vector_within, State};
use crate::definition::MachineDefinition;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem found in a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionViolation {
    #[error("Definition has no states")]
    EmptyStates,

    #[error("State '{state}' is listed more than once")]
    DuplicateState { state: String },

    #[error("Matrix has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },

    #[error("Row {row} has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column {column}: {value} is not a probability")]
    InvalidProbability { row: usize, column: usize, value: f64 },

    #[error("Row {row} sums to {sum}, expected 1.0")]
    RowSum { row: usize, sum: f64 },
}

type Check = Validation<(), NonEmptyVec<DefinitionViolation>>;

/// Validate `definition`, accumulating ALL violations.
///
/// Returns `Validation::Success(())` if the definition describes a valid
/// machine: a non-empty list of distinct states and a square matrix of
/// probabilities in `[0, 1]` whose rows sum to 1.0 within `tolerance`.
pub fn validate<S: State>(
    definition: &MachineDefinition<S>,
    tolerance: f64,
) -> Validation<(), NonEmptyVec<DefinitionViolation>> {
    let mut checks: Vec<Check> = Vec::new();
    let n = definition.states.len();

    if n == 0 {
        checks.push(Validation::fail(DefinitionViolation::EmptyStates));
    }

    for (i, state) in definition.states.iter().enumerate() {
        if definition.states[..i].contains(state) {
            checks.push(Validation::fail(DefinitionViolation::DuplicateState {
                state: state.name().to_string(),
            }));
        }
    }

    if definition.matrix.len() != n {
        checks.push(Validation::fail(DefinitionViolation::RowCount {
            expected: n,
            found: definition.matrix.len(),
        }));
    }

    for (row, probabilities) in definition.matrix.iter().enumerate() {
        checks.push(check_row(row, probabilities, n, tolerance));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn check_row(row: usize, probabilities: &[f64], n: usize, tolerance: f64) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    if probabilities.len() != n {
        checks.push(Validation::fail(DefinitionViolation::RowLength {
            row,
            expected: n,
            found: probabilities.len(),
        }));
    }

    for (column, &value) in probabilities.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            checks.push(Validation::fail(DefinitionViolation::InvalidProbability {
                row,
                column,
                value,
            }));
        }
    }

    if !valid_vector_within(probabilities, tolerance) {
        checks.push(Validation::fail(DefinitionViolation::RowSum {
            row,
            sum: row_sum(probabilities),
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}
