use crate::StateId;

/// An error raised while constructing or rewriting an automaton.
///
/// All of these errors indicate a violated invariant of the input (e.g., a malformed syntax tree)
/// or a bug in one of the passes. They are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AutomatonError {
    /// A path operator token that is not part of the SPARQL property path grammar.
    #[error("Unknown property path operator '{0}'")]
    UnknownPathOperator(String),
    /// A node of the syntax tree violates its structural invariants.
    #[error("Malformed path node {id}: {reason}")]
    MalformedNode { id: usize, reason: String },
    /// An instruction without any properties.
    #[error("An instruction must match at least one property")]
    EmptyInstruction,
    /// Two sequence transitions whose endpoints do not align were merged.
    #[error("Cannot merge sequence ending in state {left_to} with sequence starting in state {right_from}")]
    MisalignedSequence {
        left_to: StateId,
        right_from: StateId,
    },
    /// A transition references a state that is not part of the automaton.
    #[error("State {0} is not part of the automaton")]
    UnknownState(StateId),
    /// The automaton does not have exactly one initial state named `0`.
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),
    /// Two states share the same name.
    #[error("Duplicate state {0}")]
    DuplicateState(StateId),
}

impl AutomatonError {
    pub(crate) fn malformed<T>(id: usize, reason: impl Into<String>) -> Result<T, Self> {
        Err(AutomatonError::MalformedNode {
            id,
            reason: reason.into(),
        })
    }
}
