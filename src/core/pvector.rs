//! Probability vector helpers.
//!
//! A probability vector (one row of a transition matrix) is valid when its
//! entries sum to 1.0. Sums are compared within a tolerance because rows
//! accumulate rounding error across add/remove cycles.

use super::error::MachineError;

/// Tolerance used when no other is configured.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Outcome of walking a row's cumulative distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampled {
    /// Index of the chosen column.
    pub index: usize,

    /// The walk ran off the end of the row and was clamped.
    pub clamped: bool,
}

/// Sum of a vector's entries.
pub fn row_sum(vector: &[f64]) -> f64 {
    vector.iter().sum()
}

/// Check whether `vector` sums to 1.0 within [`DEFAULT_TOLERANCE`].
///
/// # Example
///
/// ```rust
/// use npcmind::core::valid_vector;
///
/// assert!(valid_vector(&[0.5, 0.5]));
/// assert!(!valid_vector(&[0.5, 0.5, 0.75]));
/// ```
pub fn valid_vector(vector: &[f64]) -> bool {
    valid_vector_within(vector, DEFAULT_TOLERANCE)
}

/// Check whether `vector` sums to 1.0 within `tolerance`.
pub fn valid_vector_within(vector: &[f64], tolerance: f64) -> bool {
    (row_sum(vector) - 1.0).abs() <= tolerance
}

/// Rescale a non-negative vector so it sums to 1.0, keeping proportions.
///
/// Returns [`MachineError::ZeroSumVector`] when there is no mass to scale.
///
/// # Example
///
/// ```rust
/// use npcmind::core::fix_p_vector;
///
/// let fixed = fix_p_vector(&[0.3, 0.3]).unwrap();
/// assert!((fixed[0] - 0.5).abs() < 1e-12);
/// assert!((fixed[1] - 0.5).abs() < 1e-12);
/// ```
pub fn fix_p_vector(vector: &[f64]) -> Result<Vec<f64>, MachineError> {
    let total = row_sum(vector);
    if total == 0.0 || !total.is_finite() {
        return Err(MachineError::ZeroSumVector);
    }
    Ok(vector.iter().map(|p| p / total).collect())
}

/// Pick a column of `row` for a uniform draw in `[0, 1)`.
///
/// Walks the running sum from index 0 and stops at the first column whose
/// cumulative mass exceeds `draw`, so zero-probability columns are never
/// chosen. A row that sums to less than `draw` is clamped to its last
/// column with positive mass.
///
/// `row` must not be empty.
pub fn sample_index(row: &[f64], draw: f64) -> Sampled {
    let mut index = 0;
    let mut cumulative = row[0];

    while cumulative <= draw {
        index += 1;
        if index == row.len() {
            let last = row.iter().rposition(|p| *p > 0.0).unwrap_or(row.len() - 1);
            return Sampled {
                index: last,
                clamped: true,
            };
        }
        cumulative += row[index];
    }

    Sampled {
        index,
        clamped: false,
    }
}
