use crate::{Automaton, AutomatonError, AutomatonResult, Instruction, StateId};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A transition that matches a single edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyTransition {
    pub from: StateId,
    pub to: StateId,
    pub instruction: Instruction,
}

/// A transition that matches a chain of edges, one per instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceTransition {
    pub from: StateId,
    pub to: StateId,
    pub instructions: Vec<Instruction>,
}

impl SequenceTransition {
    /// Appends `other` to this sequence.
    ///
    /// Both transitions must meet in the same state, i.e., `self.to == other.from`.
    pub fn merge(&self, other: &SequenceTransition) -> AutomatonResult<SequenceTransition> {
        if self.to != other.from {
            return Err(AutomatonError::MisalignedSequence {
                left_to: self.to,
                right_from: other.from,
            });
        }

        Ok(SequenceTransition {
            from: self.from,
            to: other.to,
            instructions: self
                .instructions
                .iter()
                .chain(other.instructions.iter())
                .cloned()
                .collect(),
        })
    }
}

impl From<PropertyTransition> for SequenceTransition {
    fn from(value: PropertyTransition) -> Self {
        Self {
            from: value.from,
            to: value.to,
            instructions: vec![value.instruction],
        }
    }
}

/// A union of instruction chains that share the same endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlternativeTransition {
    pub from: StateId,
    pub to: StateId,
    pub branches: Vec<Vec<Instruction>>,
}

/// The closure operator of a [TransitiveTransition].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClosureKind {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
}

impl ClosureKind {
    pub fn symbol(self) -> &'static str {
        match self {
            ClosureKind::ZeroOrMore => "*",
            ClosureKind::OneOrMore => "+",
            ClosureKind::ZeroOrOne => "?",
        }
    }
}

/// A transition that evaluates a nested closure (`*`, `+`, or `?`).
///
/// The nested `automaton` only accepts non-empty paths. Taking the transition means following one
/// of these paths. The empty case of `*` and `?` is encoded in the surrounding automaton, as the
/// position of the closure is nullable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitiveTransition {
    pub from: StateId,
    pub to: StateId,
    pub kind: ClosureKind,
    pub automaton: Arc<Automaton>,
}

/// A transition of an [Automaton].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    Property(PropertyTransition),
    Sequence(SequenceTransition),
    Alternative(AlternativeTransition),
    Transitive(TransitiveTransition),
}

impl Transition {
    pub fn from(&self) -> StateId {
        match self {
            Transition::Property(t) => t.from,
            Transition::Sequence(t) => t.from,
            Transition::Alternative(t) => t.from,
            Transition::Transitive(t) => t.from,
        }
    }

    pub fn to(&self) -> StateId {
        match self {
            Transition::Property(t) => t.to,
            Transition::Sequence(t) => t.to,
            Transition::Alternative(t) => t.to,
            Transition::Transitive(t) => t.to,
        }
    }

    /// Returns the same transition between different states.
    #[must_use]
    pub fn with_endpoints(&self, from: StateId, to: StateId) -> Transition {
        match self {
            Transition::Property(t) => Transition::Property(PropertyTransition {
                from,
                to,
                instruction: t.instruction.clone(),
            }),
            Transition::Sequence(t) => Transition::Sequence(SequenceTransition {
                from,
                to,
                instructions: t.instructions.clone(),
            }),
            Transition::Alternative(t) => Transition::Alternative(AlternativeTransition {
                from,
                to,
                branches: t.branches.clone(),
            }),
            Transition::Transitive(t) => Transition::Transitive(TransitiveTransition {
                from,
                to,
                kind: t.kind,
                automaton: Arc::clone(&t.automaton),
            }),
        }
    }

    /// Returns the instruction chains matched by this transition.
    ///
    /// Returns [None] for transitive transitions, as they cannot be expressed by a fixed number of
    /// hops.
    pub fn branches(&self) -> Option<Vec<&[Instruction]>> {
        match self {
            Transition::Property(t) => Some(vec![std::slice::from_ref(&t.instruction)]),
            Transition::Sequence(t) => Some(vec![t.instructions.as_slice()]),
            Transition::Alternative(t) => Some(t.branches.iter().map(Vec::as_slice).collect()),
            Transition::Transitive(_) => None,
        }
    }

    /// Returns the label of this transition: the same transition with both endpoints set to the
    /// initial state. Transitions that match the same paths have equal labels.
    #[must_use]
    pub fn label(&self) -> Transition {
        self.with_endpoints(StateId::INITIAL, StateId::INITIAL)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} : ", self.from(), self.to())?;
        match self {
            Transition::Property(t) => write!(f, "{}", t.instruction),
            Transition::Sequence(t) => write!(f, "{}", t.instructions.iter().join("/")),
            Transition::Alternative(t) => write!(
                f,
                "{}",
                t.branches
                    .iter()
                    .map(|branch| branch.iter().join("/"))
                    .join(" | ")
            ),
            Transition::Transitive(t) => {
                write!(f, "closure{}", t.kind.symbol())?;
                for line in t.automaton.to_string().lines() {
                    write!(f, "\n  {line}")?;
                }
                Ok(())
            }
        }
    }
}
