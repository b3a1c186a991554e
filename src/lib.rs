//! npcmind: a probabilistic state machine for NPC behavior selection
//!
//! An NPC's behaviors (chase, avoid, hide, shoot, ...) are the states of a
//! Markov chain. Each tick the host asks the machine for the next behavior,
//! which is drawn from the current behavior's row of the transition matrix.
//! States can be added and removed at runtime; every structural edit
//! rebuilds the matrix so that each row remains a probability distribution.
//!
//! # Core Concepts
//!
//! - **State**: Type-safe behavior identifiers via the `State` trait
//! - **Transition matrix**: Square table whose row `i` is the distribution
//!   over next states given state `i`
//! - **StateMachine**: Owns the states, the matrix, the current state and a
//!   private random source
//! - **Definitions**: Serializable `(name, states, matrix)` triples loaded
//!   from JSON or text and validated as a whole
//!
//! # Example
//!
//! ```rust
//! use npcmind::{state_enum, StateMachineBuilder};
//!
//! state_enum! {
//!     enum Behavior {
//!         Chase,
//!         Avoid,
//!         Hide,
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new()
//!     .name("m1")
//!     .state(Behavior::Chase, vec![0.5, 0.5])
//!     .state(Behavior::Avoid, vec![0.5, 0.5])
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! let next = machine.next_state().clone();
//! assert!(machine.states().contains(&next));
//!
//! // Chase and Avoid each give up part of their mass to the new state
//! machine
//!     .add_state(Behavior::Hide, &[0.2, 0.3], &[0.1, 0.1, 0.8])
//!     .unwrap();
//! assert_eq!(machine.num_states(), 3);
//!
//! machine.remove_state(&Behavior::Avoid).unwrap();
//! assert_eq!(machine.num_states(), 2);
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use core::{
    fix_p_vector, valid_vector, ErrorKind, MachineError, State, StateHistory, StateTransition,
    TransitionKind, TransitionMatrix,
};
pub use definition::{DefinitionError, MachineDefinition};
pub use engine::StateMachine;
