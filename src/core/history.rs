//! Bounded record of state transitions.
//!
//! Hosts that replay or debug NPC behavior can ask a machine to keep its
//! most recent transitions. The history holds at most `capacity` entries
//! and drops the oldest one when full.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How a transition came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Drawn from the current state's probability vector.
    Sampled,

    /// Imposed by the host or by removal of the current state.
    Forced,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use npcmind::core::{State, StateTransition, TransitionKind};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Behavior {
///     Patrol,
///     Chase,
/// }
///
/// impl State for Behavior {
///     fn name(&self) -> &str {
///         match self {
///             Self::Patrol => "Patrol",
///             Self::Chase => "Chase",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Behavior::Patrol,
///     to: Behavior::Chase,
///     kind: TransitionKind::Sampled,
///     timestamp: Utc::now(),
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Whether the move was sampled or forced
    pub kind: TransitionKind,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use npcmind::core::{State, StateHistory, StateTransition, TransitionKind};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Behavior { Patrol, Chase, Shoot }
///
/// impl State for Behavior {
///     fn name(&self) -> &str {
///         match self {
///             Self::Patrol => "Patrol",
///             Self::Chase => "Chase",
///             Self::Shoot => "Shoot",
///         }
///     }
/// }
///
/// let mut history = StateHistory::with_capacity(8);
/// history.push(StateTransition {
///     from: Behavior::Patrol,
///     to: Behavior::Chase,
///     kind: TransitionKind::Sampled,
///     timestamp: Utc::now(),
/// });
/// history.push(StateTransition {
///     from: Behavior::Chase,
///     to: Behavior::Shoot,
///     kind: TransitionKind::Sampled,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Patrol -> Chase -> Shoot
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of transitions kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn push(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest kept transition, then the
    /// `to` state of each transition in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the oldest and newest kept transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Iterate over kept transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
