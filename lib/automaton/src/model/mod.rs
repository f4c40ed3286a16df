mod automaton;
mod instruction;
mod state;
mod transition;

pub use automaton::Automaton;
pub use instruction::Instruction;
pub use state::{State, StateId};
pub use transition::{
    AlternativeTransition, ClosureKind, PropertyTransition, SequenceTransition, Transition,
    TransitiveTransition,
};
