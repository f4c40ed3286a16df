use crate::{AutomatonError, AutomatonResult, State, StateId, Transition, TransitiveTransition};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A finite automaton over [Instruction](crate::Instruction)s.
///
/// Invariants (checked by [Automaton::try_new]):
/// - State names are unique and the states are sorted by name.
/// - There is exactly one initial state and it is named `0`.
/// - Every transition connects two states of the automaton.
///
/// Automata are immutable. Optimizer passes create new automata.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Automaton {
    states: Vec<State>,
    transitions: Vec<Transition>,
}

impl Automaton {
    /// Creates a new [Automaton] and validates its invariants.
    pub fn try_new(
        mut states: Vec<State>,
        transitions: Vec<Transition>,
    ) -> AutomatonResult<Self> {
        states.sort_by_key(State::name);
        let automaton = Self {
            states,
            transitions,
        };
        automaton.validate()?;
        Ok(automaton)
    }

    /// Checks the invariants of the automaton.
    pub fn validate(&self) -> AutomatonResult<()> {
        for window in self.states.windows(2) {
            if window[0].name() >= window[1].name() {
                return Err(AutomatonError::DuplicateState(window[1].name()));
            }
        }

        let initial_states = self.states.iter().filter(|s| s.is_initial()).count();
        if initial_states != 1 {
            return Err(AutomatonError::InvalidInitialState(format!(
                "expected exactly one initial state, found {initial_states}"
            )));
        }
        let initial_is_first = self
            .states
            .first()
            .is_some_and(|s| s.is_initial() && s.name() == StateId::INITIAL);
        if !initial_is_first {
            return Err(AutomatonError::InvalidInitialState(
                "the initial state must be named 0".to_owned(),
            ));
        }

        for transition in &self.transitions {
            for state in [transition.from(), transition.to()] {
                if self.state(state).is_none() {
                    return Err(AutomatonError::UnknownState(state));
                }
            }
            if let Transition::Transitive(transitive) = transition {
                transitive.automaton.validate()?;
            }
        }

        Ok(())
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn initial_state(&self) -> &State {
        &self.states[0]
    }

    /// Returns the state with the given `name`.
    pub fn state(&self, name: StateId) -> Option<&State> {
        self.states
            .binary_search_by_key(&name, State::name)
            .ok()
            .map(|index| &self.states[index])
    }

    /// Returns true if `name` refers to a final state.
    pub fn is_final(&self, name: StateId) -> bool {
        self.state(name).is_some_and(State::is_final)
    }

    /// Returns true if the automaton accepts the empty path.
    pub fn is_nullable(&self) -> bool {
        self.initial_state().is_final()
    }

    /// Returns all transitions that leave `name`.
    pub fn outgoing(&self, name: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from() == name)
    }

    /// Returns a copy of this automaton in which the automaton of every transitive transition is
    /// replaced by the result of `f`.
    pub fn try_map_nested(
        &self,
        mut f: impl FnMut(&Automaton) -> AutomatonResult<Automaton>,
    ) -> AutomatonResult<Automaton> {
        let transitions = self
            .transitions
            .iter()
            .map(|transition| match transition {
                Transition::Transitive(transitive) => {
                    Ok(Transition::Transitive(TransitiveTransition {
                        automaton: Arc::new(f(&transitive.automaton)?),
                        ..transitive.clone()
                    }))
                }
                _ => Ok(transition.clone()),
            })
            .collect::<AutomatonResult<Vec<_>>>()?;
        Automaton::try_new(self.states.clone(), transitions)
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for state in &self.states {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{state}")?;
        }
        for transition in &self.transitions {
            writeln!(f)?;
            write!(f, "{transition}")?;
        }
        Ok(())
    }
}
