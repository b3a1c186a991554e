//! Machine definitions: the `(name, states, matrix)` triple a machine is
//! built from.
//!
//! Definitions can be written by hand in JSON or in a small text format,
//! validated as a whole, and turned into a running [`StateMachine`].
//!
//! # Example
//!
//! ```rust
//! use npcmind::definition::MachineDefinition;
//! use npcmind::state_enum;
//!
//! state_enum! {
//!     enum Behavior {
//!         Chase,
//!         Avoid,
//!     }
//! }
//!
//! let json = r#"{
//!     "name": "scout",
//!     "states": ["Chase", "Avoid"],
//!     "matrix": [[0.9, 0.1], [0.4, 0.6]]
//! }"#;
//!
//! let definition: MachineDefinition<Behavior> = MachineDefinition::from_json(json).unwrap();
//! let machine = definition.into_machine_with_seed(42).unwrap();
//! assert_eq!(machine.num_states(), 2);
//! ```

pub mod error;
pub mod text;
pub mod validate;

pub use error::DefinitionError;
pub use text::parse_text;
pub use validate::{validate, DefinitionViolation};

use crate::builder::{BuildError, StateMachineBuilder};
use crate::core::State;
use crate::engine::StateMachine;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Serializable description of a state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineDefinition<S: State> {
    /// Informational machine name
    pub name: String,

    /// States in matrix order
    pub states: Vec<S>,

    /// Row `i` is the outgoing probability vector of `states[i]`
    pub matrix: Vec<Vec<f64>>,
}

impl<S: State> MachineDefinition<S> {
    /// Decode a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a definition from the plain-text format.
    pub fn parse_text(source: &str) -> Result<Self, DefinitionError>
    where
        S: FromStr,
        S::Err: Display,
    {
        text::parse_text(source)
    }

    /// Validate and build an entropy-seeded machine.
    pub fn into_machine(self) -> Result<StateMachine<S>, BuildError> {
        StateMachineBuilder::new().definition(self).build()
    }

    /// Validate and build a machine with a reproducible seed.
    pub fn into_machine_with_seed(self, seed: u64) -> Result<StateMachine<S>, BuildError> {
        StateMachineBuilder::new().definition(self).seed(seed).build()
    }
}

impl<S: State, R: Rng> StateMachine<S, R> {
    /// Snapshot of the machine's current `(name, states, matrix)` triple.
    pub fn definition(&self) -> MachineDefinition<S> {
        MachineDefinition {
            name: self.name().to_string(),
            states: self.states().to_vec(),
            matrix: self.matrix().rows().to_vec(),
        }
    }
}
