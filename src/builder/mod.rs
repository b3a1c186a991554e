//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder that validates a complete
//! definition before creating a machine, and the `state_enum!` macro for
//! declaring behavior states with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
