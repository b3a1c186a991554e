//! Core State trait for behavioral states.
//!
//! A state is an opaque behavior identifier. States are compared by
//! equality only; their position in a machine's state list is what gives
//! them a row and column in the transition matrix.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Trait for NPC behavior states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and definitions
/// - `PartialEq`: states are located in the state list by equality
/// - `Debug`: states appear in errors and log events
/// - `Serialize` + `Deserialize`: definitions and histories are serializable
///
/// # Example
///
/// ```rust
/// use npcmind::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Behavior {
///     Chase,
///     Avoid,
///     Hide,
/// }
///
/// impl State for Behavior {
///     fn name(&self) -> &str {
///         match self {
///             Self::Chase => "Chase",
///             Self::Avoid => "Avoid",
///             Self::Hide => "Hide",
///         }
///     }
/// }
///
/// assert_eq!(Behavior::Hide.name(), "Hide");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Error returned when a token does not name any state.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown state '{token}'")]
pub struct ParseStateError {
    pub token: String,
}

impl ParseStateError {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Chase,
        Avoid,
        Shoot,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Chase => "Chase",
                Self::Avoid => "Avoid",
                Self::Shoot => "Shoot",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Chase.name(), "Chase");
        assert_eq!(TestState::Avoid.name(), "Avoid");
        assert_eq!(TestState::Shoot.name(), "Shoot");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Avoid;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn state_is_comparable() {
        assert_eq!(TestState::Shoot, TestState::Shoot);
        assert_ne!(TestState::Shoot, TestState::Chase);
    }

    #[test]
    fn parse_error_names_the_token() {
        let err = ParseStateError::new("Dance");
        assert_eq!(err.to_string(), "Unknown state 'Dance'");
    }
}
