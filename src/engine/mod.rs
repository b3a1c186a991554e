//! The stateful side of the crate.
//!
//! `core` holds the pure transition model; this module wraps it in a
//! machine that owns a random source, tracks the current state and applies
//! structural edits in place.
//!
//! # Key Concepts
//!
//! - **Sampling**: `next_state` draws from the current state's row
//! - **Mutation**: `add_state` and `remove_state` rebuild the matrix so every
//!   row keeps summing to 1.0
//! - **Ownership**: each machine owns its generator; nothing is shared
//!   between instances, so hosts drive one machine per NPC

mod machine;

pub use machine::StateMachine;
