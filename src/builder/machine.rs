//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, DEFAULT_TOLERANCE};
use crate::definition::{validate, MachineDefinition};
use crate::engine::StateMachine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike [`StateMachine::new`], the builder validates the whole definition
/// and refuses to build a machine whose rows do not sum to 1.0.
///
/// # Example
///
/// ```
/// use npcmind::builder::StateMachineBuilder;
/// use npcmind::state_enum;
///
/// state_enum! {
///     enum Behavior {
///         Patrol,
///         Chase,
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .name("guard")
///     .state(Behavior::Patrol, vec![0.8, 0.2])
///     .state(Behavior::Chase, vec![0.3, 0.7])
///     .seed(11)
///     .history(32)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), &Behavior::Patrol);
/// ```
pub struct StateMachineBuilder<S: State, R: Rng = StdRng> {
    name: Option<String>,
    states: Vec<S>,
    rows: Vec<Vec<f64>>,
    rng: Option<R>,
    seed: Option<u64>,
    tolerance: f64,
    history: Option<usize>,
}

impl<S: State> StateMachineBuilder<S, StdRng> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: None,
            states: Vec::new(),
            rows: Vec::new(),
            rng: None,
            seed: None,
            tolerance: DEFAULT_TOLERANCE,
            history: None,
        }
    }
}

impl<S: State, R: Rng> StateMachineBuilder<S, R> {
    /// Set the machine name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a state with its outgoing probability vector.
    ///
    /// States are indexed in the order they are added; the first one is the
    /// initial state.
    pub fn state(mut self, state: S, p_vector: Vec<f64>) -> Self {
        self.states.push(state);
        self.rows.push(p_vector);
        self
    }

    /// Take name, states and matrix from a definition.
    ///
    /// Replaces anything set by earlier calls to `name` or `state`.
    pub fn definition(mut self, definition: MachineDefinition<S>) -> Self {
        self.name = Some(definition.name);
        self.states = definition.states;
        self.rows = definition.matrix;
        self
    }

    /// Seed the random source for reproducible trajectories.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use `rng` as the machine's random source.
    pub fn rng<R2: Rng>(self, rng: R2) -> StateMachineBuilder<S, R2> {
        StateMachineBuilder {
            name: self.name,
            states: self.states,
            rows: self.rows,
            rng: Some(rng),
            seed: self.seed,
            tolerance: self.tolerance,
            history: self.history,
        }
    }

    /// Set the tolerance for row-sum checks.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Keep the last `capacity` transitions.
    pub fn history(mut self, capacity: usize) -> Self {
        self.history = Some(capacity);
        self
    }
}

impl<S: State, R: Rng + SeedableRng> StateMachineBuilder<S, R> {
    /// Build the state machine.
    ///
    /// An explicit rng wins over a seed; with neither, the random source is
    /// seeded from system entropy.
    pub fn build(self) -> Result<StateMachine<S, R>, BuildError> {
        let name = self.name.ok_or(BuildError::MissingName)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let definition = MachineDefinition {
            name,
            states: self.states,
            matrix: self.rows,
        };
        if let Validation::Failure(errors) = validate(&definition, self.tolerance) {
            return Err(BuildError::Invalid {
                violations: errors.iter().cloned().collect(),
            });
        }

        let rng = match (self.rng, self.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => R::seed_from_u64(seed),
            (None, None) => R::from_entropy(),
        };

        let mut machine = StateMachine::with_tolerance(
            definition.name,
            definition.states,
            definition.matrix,
            rng,
            self.tolerance,
        )?;
        if let Some(capacity) = self.history {
            machine.enable_history(capacity);
        }

        Ok(machine)
    }
}

impl<S: State> Default for StateMachineBuilder<S, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionViolation;
    use crate::state_enum;

    state_enum! {
        enum Behavior {
            Chase,
            Avoid,
            Hide,
        }
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<Behavior>::new().build();
        assert!(matches!(result, Err(BuildError::MissingName)));
    }

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::<Behavior>::new().name("m").build();
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .name("m1")
            .state(Behavior::Chase, vec![0.5, 0.5])
            .state(Behavior::Avoid, vec![0.5, 0.5])
            .seed(9)
            .build()
            .unwrap();

        assert_eq!(machine.name(), "m1");
        assert_eq!(machine.num_states(), 2);
        assert_eq!(machine.current_state(), &Behavior::Chase);
        assert!(machine.history().is_none());
    }

    #[test]
    fn builder_reports_every_violation() {
        let result = StateMachineBuilder::new()
            .name("bad")
            .state(Behavior::Chase, vec![0.5, 0.4])
            .state(Behavior::Avoid, vec![0.5])
            .build();

        match result {
            Err(BuildError::Invalid { violations }) => {
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, DefinitionViolation::RowSum { row: 0, .. })));
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, DefinitionViolation::RowLength { row: 1, .. })));
            }
            other => panic!("Expected invalid definition, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn tolerance_and_history_are_applied() {
        let machine = StateMachineBuilder::new()
            .name("loose")
            .state(Behavior::Chase, vec![0.5, 0.499])
            .state(Behavior::Hide, vec![0.5, 0.5])
            .tolerance(0.01)
            .history(8)
            .seed(1)
            .build()
            .unwrap();

        assert_eq!(machine.tolerance(), 0.01);
        assert!(machine.drifted_rows().is_empty());
        assert_eq!(machine.history().map(|h| h.capacity()), Some(8));
    }

    #[test]
    fn explicit_rng_is_used() {
        let build = |seed| {
            StateMachineBuilder::new()
                .name("seeded")
                .state(Behavior::Chase, vec![0.2, 0.3, 0.5])
                .state(Behavior::Avoid, vec![0.3, 0.3, 0.4])
                .state(Behavior::Hide, vec![0.6, 0.2, 0.2])
                .rng(StdRng::seed_from_u64(seed))
                .build()
                .unwrap()
        };

        let mut a = build(5);
        let mut b = build(5);
        for _ in 0..32 {
            assert_eq!(a.next_state(), b.next_state());
        }
    }
}
