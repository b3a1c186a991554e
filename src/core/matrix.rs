//! Square transition matrix.
//!
//! Row `i` holds the probabilities of moving from state `i` to every state.
//! Structural edits never mutate in place: `with_added_state` and
//! `with_removed_state` build a fresh matrix and leave `self` untouched.

use super::error::MachineError;
use super::pvector::{fix_p_vector, valid_vector_within};
use serde::{Deserialize, Serialize};

/// Square table of transition probabilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionMatrix {
    rows: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    /// Wrap `rows`, checking only that the table is square.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MachineError> {
        let n = rows.len();
        if let Some((row, len)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != n)
        {
            return Err(MachineError::DimensionMismatch {
                row,
                expected: n,
                found: len,
            });
        }
        Ok(Self { rows })
    }

    /// Number of states (rows, and columns) in the matrix.
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Outgoing probabilities of state `index`.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Indices of rows that do not sum to 1.0 within `tolerance`.
    pub fn invalid_rows(&self, tolerance: f64) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !valid_vector_within(row, tolerance))
            .map(|(i, _)| i)
            .collect()
    }

    /// Renormalize the given rows in place.
    ///
    /// Rows with no mass are left as they are and reported back.
    pub fn renormalize_rows(&mut self, indices: &[usize]) -> Vec<usize> {
        let mut skipped = Vec::new();
        for &i in indices {
            let Some(row) = self.rows.get_mut(i) else {
                continue;
            };
            match fix_p_vector(row) {
                Ok(fixed) => *row = fixed,
                Err(_) => skipped.push(i),
            }
        }
        skipped
    }

    /// Matrix with one more state appended as the last row and column.
    ///
    /// Each existing row `i` is scaled by `1 - p_to[i]` and gains `p_to[i]`
    /// as its new last column, so a row summing to 1 still sums to 1.
    /// `p_from` becomes the new state's row verbatim.
    pub fn with_added_state(
        &self,
        p_to: &[f64],
        p_from: &[f64],
    ) -> Result<Self, MachineError> {
        let n = self.dimension();
        if p_to.len() != n {
            return Err(MachineError::VectorLength {
                vector: "p_to",
                expected: n,
                found: p_to.len(),
            });
        }
        if p_from.len() != n + 1 {
            return Err(MachineError::VectorLength {
                vector: "p_from",
                expected: n + 1,
                found: p_from.len(),
            });
        }
        if let Some((index, &value)) = p_to
            .iter()
            .chain(p_from)
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(MachineError::ProbabilityOutOfRange {
                index: if index < n { index } else { index - n },
                value,
            });
        }

        let mut rows: Vec<Vec<f64>> = self
            .rows
            .iter()
            .zip(p_to)
            .map(|(row, &to_new)| {
                let keep = 1.0 - to_new;
                let mut grown: Vec<f64> = row.iter().map(|p| p * keep).collect();
                grown.push(to_new);
                grown
            })
            .collect();
        rows.push(p_from.to_vec());

        Ok(Self { rows })
    }

    /// Matrix without state `removed`.
    ///
    /// The mass row `i` sent to the removed state is spread evenly over the
    /// `n - 1` remaining columns. Callers must not remove the last state.
    pub fn with_removed_state(&self, removed: usize) -> Self {
        let n = self.dimension();
        debug_assert!(n > 1 && removed < n);
        let share = (n - 1) as f64;

        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != removed)
            .map(|(_, row)| {
                let spread = row[removed] / share;
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != removed)
                    .map(|(_, p)| p + spread)
                    .collect::<Vec<f64>>()
            })
            .collect();

        Self { rows }
    }
}
