//! Probabilistic state machine that samples its next behavior.

use crate::core::{
    sample_index, valid_vector_within, MachineError, State, StateHistory, StateTransition,
    TransitionKind, TransitionMatrix, DEFAULT_TOLERANCE,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

/// Probabilistic finite-state machine over a set of named states.
///
/// The machine owns its random source. Each instance draws from its own
/// generator, so two machines built with the same seed follow the same
/// trajectory regardless of what other machines do.
///
/// # Example
///
/// ```rust
/// use npcmind::{state_enum, StateMachine};
///
/// state_enum! {
///     enum Behavior {
///         Chase,
///         Avoid,
///     }
/// }
///
/// let mut machine = StateMachine::with_seed(
///     "guard",
///     vec![Behavior::Chase, Behavior::Avoid],
///     vec![vec![0.5, 0.5], vec![0.5, 0.5]],
///     7,
/// )
/// .unwrap();
///
/// assert_eq!(machine.current_state(), &Behavior::Chase);
/// let next = machine.next_state().clone();
/// assert!(machine.states().contains(&next));
/// ```
#[derive(Debug)]
pub struct StateMachine<S: State, R: Rng = StdRng> {
    name: String,
    states: Vec<S>,
    matrix: TransitionMatrix,
    current: usize,
    rng: R,
    tolerance: f64,
    history: Option<StateHistory<S>>,
}

impl<S: State> StateMachine<S, StdRng> {
    /// Create a machine seeded from system entropy.
    pub fn new(
        name: impl Into<String>,
        states: Vec<S>,
        matrix: Vec<Vec<f64>>,
    ) -> Result<Self, MachineError> {
        Self::with_rng(name, states, matrix, StdRng::from_entropy())
    }

    /// Create a machine whose draws are reproducible from `seed`.
    pub fn with_seed(
        name: impl Into<String>,
        states: Vec<S>,
        matrix: Vec<Vec<f64>>,
        seed: u64,
    ) -> Result<Self, MachineError> {
        Self::with_rng(name, states, matrix, StdRng::seed_from_u64(seed))
    }
}

impl<S: State, R: Rng> StateMachine<S, R> {
    /// Create a machine that draws from `rng`.
    ///
    /// The machine starts in `states[0]`. The state list must be non-empty
    /// and free of duplicates, and `matrix` must have one row of
    /// `states.len()` entries per state. Rows that do not sum to 1.0 are
    /// accepted but reported; see [`StateMachine::drifted_rows`].
    pub fn with_rng(
        name: impl Into<String>,
        states: Vec<S>,
        matrix: Vec<Vec<f64>>,
        rng: R,
    ) -> Result<Self, MachineError> {
        Self::with_tolerance(name, states, matrix, rng, DEFAULT_TOLERANCE)
    }

    pub(crate) fn with_tolerance(
        name: impl Into<String>,
        states: Vec<S>,
        matrix: Vec<Vec<f64>>,
        rng: R,
        tolerance: f64,
    ) -> Result<Self, MachineError> {
        if states.is_empty() {
            return Err(MachineError::EmptyStates);
        }
        if let Some(duplicate) = first_duplicate(&states) {
            return Err(MachineError::DuplicateState {
                state: duplicate.name().to_string(),
            });
        }
        if matrix.len() != states.len() {
            return Err(MachineError::RowCount {
                expected: states.len(),
                found: matrix.len(),
            });
        }
        let matrix = TransitionMatrix::new(matrix)?;

        let machine = Self {
            name: name.into(),
            states,
            matrix,
            current: 0,
            rng,
            tolerance,
            history: None,
        };

        let drifted = machine.drifted_rows();
        if !drifted.is_empty() {
            warn!(
                machine = %machine.name,
                rows = ?drifted,
                "transition rows do not sum to 1.0"
            );
        }
        debug!(
            machine = %machine.name,
            states = machine.states.len(),
            "state machine created"
        );

        Ok(machine)
    }

    pub(crate) fn enable_history(&mut self, capacity: usize) {
        self.history = Some(StateHistory::with_capacity(capacity));
    }

    /// Human-readable machine name (pure)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of states, the dimension of the matrix (pure)
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// States in matrix order (pure)
    ///
    /// Index `i` of this slice names row and column `i` of the matrix.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// The transition matrix (pure)
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Position of `state` in [`StateMachine::states`] (pure)
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.index_of(state).is_some()
    }

    /// Outgoing probability vector of `state` (pure)
    pub fn p_vector(&self, state: &S) -> Result<&[f64], MachineError> {
        let index = self.require_index(state)?;
        Ok(&self.matrix.rows()[index])
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.states[self.current]
    }

    /// Tolerance applied to row-sum checks.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Recorded transitions, if history was enabled.
    pub fn history(&self) -> Option<&StateHistory<S>> {
        self.history.as_ref()
    }

    /// Force the machine into `state`.
    ///
    /// Fails with [`MachineError::StateNotFound`] if `state` is not part of
    /// the machine; the current state is left unchanged in that case.
    pub fn set_current_state(&mut self, state: &S) -> Result<(), MachineError> {
        let index = self.require_index(state)?;
        if index != self.current {
            let from = self.states[self.current].clone();
            self.current = index;
            self.record(from, TransitionKind::Forced);
        }
        Ok(())
    }

    /// Sample the next state from the current state's probability vector.
    ///
    /// Draws `u` uniformly from `[0, 1)` and walks the row's cumulative
    /// distribution until it exceeds `u`. The chosen state becomes current.
    pub fn next_state(&mut self) -> &S {
        let draw: f64 = self.rng.gen();
        let row = &self.matrix.rows()[self.current];
        let sampled = sample_index(row, draw);

        if sampled.clamped {
            warn!(
                machine = %self.name,
                state = self.states[self.current].name(),
                draw,
                "row mass ran out before the draw; clamped to last reachable state"
            );
        }

        let from = self.states[self.current].clone();
        self.current = sampled.index;
        trace!(
            machine = %self.name,
            from = from.name(),
            to = self.states[self.current].name(),
            draw,
            "sampled transition"
        );
        self.record(from, TransitionKind::Sampled);

        &self.states[self.current]
    }

    /// Add `state` as a new last row and column.
    ///
    /// `p_to[i]` is the probability that existing state `i` moves to the new
    /// state; the rest of row `i` is scaled by `1 - p_to[i]`. `p_from` is the
    /// full outgoing row of the new state, ending with its self-transition.
    pub fn add_state(
        &mut self,
        state: S,
        p_to: &[f64],
        p_from: &[f64],
    ) -> Result<(), MachineError> {
        if self.contains(&state) {
            return Err(MachineError::DuplicateState {
                state: state.name().to_string(),
            });
        }

        let matrix = self.matrix.with_added_state(p_to, p_from)?;
        if !valid_vector_within(p_from, self.tolerance) {
            return Err(MachineError::InvalidRow {
                sum: p_from.iter().sum(),
            });
        }

        debug!(
            machine = %self.name,
            state = state.name(),
            states = self.states.len() + 1,
            "state added"
        );
        self.matrix = matrix;
        self.states.push(state);
        Ok(())
    }

    /// Remove `state` and spread its incoming mass over the remaining states.
    ///
    /// Returns `Ok(false)` without changing anything when `state` is the only
    /// state left. If `state` is current, the machine moves to the first
    /// remaining state.
    pub fn remove_state(&mut self, state: &S) -> Result<bool, MachineError> {
        let index = self.require_index(state)?;
        if self.states.len() == 1 {
            debug!(
                machine = %self.name,
                state = state.name(),
                "refusing to remove the only state"
            );
            return Ok(false);
        }

        self.matrix = self.matrix.with_removed_state(index);
        let removed = self.states.remove(index);

        if index == self.current {
            self.current = 0;
            warn!(
                machine = %self.name,
                removed = removed.name(),
                to = self.states[0].name(),
                "removed the current state; forcing transition"
            );
            self.record(removed.clone(), TransitionKind::Forced);
        } else if index < self.current {
            self.current -= 1;
        }

        debug!(
            machine = %self.name,
            state = removed.name(),
            states = self.states.len(),
            "state removed"
        );
        Ok(true)
    }

    /// Indices of rows whose sum is off 1.0 by more than the tolerance.
    pub fn drifted_rows(&self) -> Vec<usize> {
        self.matrix.invalid_rows(self.tolerance)
    }

    /// Rescale every drifted row so it sums to 1.0 again.
    ///
    /// Rows with no mass at all cannot be rescaled; they are left as they are
    /// and reported with [`MachineError::ZeroSumVector`] after all other rows
    /// have been fixed.
    pub fn renormalize(&mut self) -> Result<(), MachineError> {
        let drifted = self.drifted_rows();
        if drifted.is_empty() {
            return Ok(());
        }

        let skipped = self.matrix.renormalize_rows(&drifted);
        debug!(
            machine = %self.name,
            rows = ?drifted,
            "renormalized drifted rows"
        );
        if skipped.is_empty() {
            Ok(())
        } else {
            Err(MachineError::ZeroSumVector)
        }
    }

    fn require_index(&self, state: &S) -> Result<usize, MachineError> {
        self.index_of(state).ok_or_else(|| MachineError::StateNotFound {
            state: state.name().to_string(),
        })
    }

    fn record(&mut self, from: S, kind: TransitionKind) {
        if let Some(history) = self.history.as_mut() {
            history.push(StateTransition {
                from,
                to: self.states[self.current].clone(),
                kind,
                timestamp: Utc::now(),
            });
        }
    }
}

fn first_duplicate<S: State>(states: &[S]) -> Option<&S> {
    states
        .iter()
        .enumerate()
        .find(|(i, s)| states[..*i].contains(s))
        .map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{valid_vector, ErrorKind};
    use crate::state_enum;

    state_enum! {
        enum Behavior {
            Chase,
            Avoid,
            Hide,
            Shoot,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn two_state() -> StateMachine<Behavior> {
        StateMachine::with_seed(
            "m1",
            vec![Behavior::Chase, Behavior::Avoid],
            vec![vec![0.5, 0.5], vec![0.5, 0.5]],
            1,
        )
        .unwrap()
    }

    fn three_state() -> StateMachine<Behavior> {
        StateMachine::with_seed(
            "m2",
            vec![Behavior::Chase, Behavior::Avoid, Behavior::Hide],
            vec![
                vec![0.25, 0.5, 0.25],
                vec![0.25, 0.25, 0.5],
                vec![0.5, 0.25, 0.25],
            ],
            2,
        )
        .unwrap()
    }

    fn assert_rows_valid(machine: &StateMachine<Behavior>) {
        for state in machine.states() {
            assert!(valid_vector(machine.p_vector(state).unwrap()), "{state:?}");
        }
    }

    #[test]
    fn construction_starts_in_first_state() {
        let machine = three_state();
        assert_eq!(machine.name(), "m2");
        assert_eq!(machine.num_states(), 3);
        assert_eq!(machine.current_state(), &Behavior::Chase);
        assert!(machine.history().is_none());
    }

    #[test]
    fn construction_rejects_empty_states() {
        let result = StateMachine::<Behavior>::new("empty", vec![], vec![]);
        let err = result.unwrap_err();
        assert_eq!(err, MachineError::EmptyStates);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn construction_rejects_bad_shapes_and_duplicates() {
        assert!(matches!(
            StateMachine::new("m", vec![Behavior::Chase], vec![]),
            Err(MachineError::RowCount { expected: 1, found: 0 })
        ));
        assert!(matches!(
            StateMachine::new(
                "m",
                vec![Behavior::Chase, Behavior::Avoid],
                vec![vec![1.0], vec![0.5, 0.5]]
            ),
            Err(MachineError::DimensionMismatch { row: 0, .. })
        ));
        assert!(matches!(
            StateMachine::new(
                "m",
                vec![Behavior::Chase, Behavior::Chase],
                vec![vec![0.5, 0.5], vec![0.5, 0.5]]
            ),
            Err(MachineError::DuplicateState { .. })
        ));
    }

    #[test]
    fn construction_tolerates_drifted_rows() {
        let machine = StateMachine::with_seed(
            "drift",
            vec![Behavior::Chase, Behavior::Avoid],
            vec![vec![0.3, 0.3], vec![0.5, 0.5]],
            3,
        )
        .unwrap();
        assert_eq!(machine.drifted_rows(), vec![0]);
    }

    #[test]
    fn p_vector_returns_row() {
        let machine = three_state();
        assert_eq!(machine.p_vector(&Behavior::Avoid).unwrap(), &[0.25, 0.25, 0.5]);
        assert_eq!(
            machine.p_vector(&Behavior::Shoot).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn next_state_stays_in_machine() {
        let mut machine = three_state();
        for _ in 0..200 {
            let next = machine.next_state().clone();
            assert!(machine.states().contains(&next));
            assert_eq!(machine.current_state(), &next);
        }
    }

    #[test]
    fn next_state_follows_certain_transitions() {
        let mut machine = StateMachine::with_seed(
            "cycle",
            vec![Behavior::Chase, Behavior::Avoid, Behavior::Hide],
            vec![
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.0, 0.0],
            ],
            4,
        )
        .unwrap();

        assert_eq!(machine.next_state(), &Behavior::Avoid);
        assert_eq!(machine.next_state(), &Behavior::Hide);
        assert_eq!(machine.next_state(), &Behavior::Chase);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = three_state();
        let mut b = three_state();
        for _ in 0..50 {
            assert_eq!(a.next_state(), b.next_state());
        }
    }

    #[test]
    fn set_current_state_validates_membership() {
        let mut machine = three_state();
        machine.set_current_state(&Behavior::Hide).unwrap();
        assert_eq!(machine.current_state(), &Behavior::Hide);

        let err = machine.set_current_state(&Behavior::Shoot).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(machine.current_state(), &Behavior::Hide);
    }

    #[test]
    fn add_state_grows_and_keeps_rows_valid() {
        let mut machine = two_state();
        machine
            .add_state(Behavior::Hide, &[0.2, 0.3], &[0.1, 0.1, 0.8])
            .unwrap();

        assert_eq!(machine.num_states(), 3);
        assert_eq!(machine.states()[2], Behavior::Hide);
        let row0 = machine.p_vector(&Behavior::Chase).unwrap();
        assert!(close(row0[0], 0.4) && close(row0[1], 0.4) && close(row0[2], 0.2));
        assert_rows_valid(&machine);
    }

    #[test]
    fn add_state_rejects_duplicates_and_bad_rows() {
        let mut machine = two_state();
        assert!(matches!(
            machine.add_state(Behavior::Avoid, &[0.2, 0.3], &[0.1, 0.1, 0.8]),
            Err(MachineError::DuplicateState { .. })
        ));
        assert!(matches!(
            machine.add_state(Behavior::Hide, &[0.2], &[0.1, 0.1, 0.8]),
            Err(MachineError::VectorLength { .. })
        ));
        assert!(matches!(
            machine.add_state(Behavior::Hide, &[0.2, 0.3], &[0.1, 0.1, 0.1]),
            Err(MachineError::InvalidRow { .. })
        ));
        assert_eq!(machine.num_states(), 2);
    }

    #[test]
    fn remove_state_shrinks_and_keeps_rows_valid() {
        let mut machine = three_state();
        assert!(machine.remove_state(&Behavior::Hide).unwrap());

        assert_eq!(machine.num_states(), 2);
        assert!(!machine.contains(&Behavior::Hide));
        assert_rows_valid(&machine);
    }

    #[test]
    fn remove_only_state_is_a_no_op() {
        let mut machine =
            StateMachine::with_seed("solo", vec![Behavior::Chase], vec![vec![1.0]], 5).unwrap();
        assert!(!machine.remove_state(&Behavior::Chase).unwrap());
        assert_eq!(machine.num_states(), 1);
        assert_eq!(machine.current_state(), &Behavior::Chase);
    }

    #[test]
    fn remove_missing_state_fails() {
        let mut machine = three_state();
        let err = machine.remove_state(&Behavior::Shoot).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(machine.num_states(), 3);
    }

    #[test]
    fn removing_current_state_moves_to_first_remaining() {
        let mut machine = three_state();
        machine.enable_history(4);
        assert!(machine.remove_state(&Behavior::Chase).unwrap());

        assert_eq!(machine.current_state(), &Behavior::Avoid);
        let history = machine.history().unwrap();
        let last = history.transitions().last().unwrap();
        assert_eq!(last.from, Behavior::Chase);
        assert_eq!(last.to, Behavior::Avoid);
        assert_eq!(last.kind, TransitionKind::Forced);
    }

    #[test]
    fn removing_earlier_state_keeps_current() {
        let mut machine = three_state();
        machine.set_current_state(&Behavior::Hide).unwrap();
        machine.remove_state(&Behavior::Chase).unwrap();
        assert_eq!(machine.current_state(), &Behavior::Hide);
        assert_eq!(machine.index_of(&Behavior::Hide), Some(1));
    }

    #[test]
    fn history_records_sampled_transitions() {
        let mut machine = three_state();
        machine.enable_history(16);
        for _ in 0..5 {
            machine.next_state();
        }
        let history = machine.history().unwrap();
        assert_eq!(history.len(), 5);
        assert!(history
            .transitions()
            .all(|t| t.kind == TransitionKind::Sampled));
        assert_eq!(history.get_path().last().copied(), Some(machine.current_state()));
    }

    #[test]
    fn renormalize_fixes_drifted_rows() {
        let mut machine = StateMachine::with_seed(
            "drift",
            vec![Behavior::Chase, Behavior::Avoid],
            vec![vec![0.6, 0.6], vec![0.5, 0.5]],
            6,
        )
        .unwrap();
        machine.renormalize().unwrap();
        assert!(machine.drifted_rows().is_empty());
        assert_eq!(machine.p_vector(&Behavior::Chase).unwrap(), &[0.5, 0.5]);
    }

    #[test]
    fn renormalize_reports_empty_rows() {
        let mut machine = StateMachine::with_seed(
            "dead",
            vec![Behavior::Chase, Behavior::Avoid],
            vec![vec![0.0, 0.0], vec![0.25, 0.25]],
            7,
        )
        .unwrap();
        assert_eq!(machine.renormalize(), Err(MachineError::ZeroSumVector));
        assert_eq!(machine.drifted_rows(), vec![0]);
    }
}
