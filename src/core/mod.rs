//! Core types and pure logic of the transition model.
//!
//! This module contains everything that does not own a random source:
//! - States via the `State` trait
//! - Probability vector checks, renormalization and cumulative sampling
//! - The square transition matrix and its structural edits
//! - Bounded transition history

mod error;
mod history;
mod matrix;
mod pvector;
mod state;

pub use error::{ErrorKind, MachineError};
pub use history::{StateHistory, StateTransition, TransitionKind};
pub use matrix::TransitionMatrix;
pub use pvector::{
    fix_p_vector, row_sum, sample_index, valid_vector, valid_vector_within, Sampled,
    DEFAULT_TOLERANCE,
};
pub use state::{ParseStateError, State};
