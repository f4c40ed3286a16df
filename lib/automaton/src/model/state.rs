use std::fmt::{Display, Formatter};

/// The name of a [State].
///
/// The initial state of every automaton is named `0`. Automata built by the Glushkov construction
/// name the remaining states after the position they represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// The name of the initial state.
    pub const INITIAL: StateId = StateId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state of an [Automaton](crate::Automaton).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct State {
    name: StateId,
    is_initial: bool,
    is_final: bool,
}

impl State {
    pub fn new(name: StateId, is_initial: bool, is_final: bool) -> Self {
        Self {
            name,
            is_initial,
            is_final,
        }
    }

    /// Creates the initial state (named `0`).
    pub fn initial(is_final: bool) -> Self {
        Self::new(StateId::INITIAL, true, is_final)
    }

    pub fn name(&self) -> StateId {
        self.name
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        match (self.is_initial, self.is_final) {
            (true, true) => f.write_str(" [initial, final]"),
            (true, false) => f.write_str(" [initial]"),
            (false, true) => f.write_str(" [final]"),
            (false, false) => Ok(()),
        }
    }
}
