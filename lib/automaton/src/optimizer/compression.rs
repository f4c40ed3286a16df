use crate::optimizer::AutomatonPass;
use crate::{Automaton, AutomatonResult, SequenceTransition, StateId, Transition};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Compresses chains of property transitions into [SequenceTransition]s.
///
/// Starting from the initial state, every chain of transitions is followed until it reaches a
/// state that must be kept: the initial state, a final state, or a state with more than one
/// incoming or outgoing transition. The intermediate states of the chain are removed.
///
/// Transitive and alternative transitions are never part of a chain. Property transitions that
/// are not compressed with others become single-instruction sequences.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathsCompression;

impl AutomatonPass for PathsCompression {
    fn name(&self) -> &str {
        "paths-compression"
    }

    fn rewrite_automaton(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let mut in_degree = FxHashMap::<StateId, usize>::default();
        let mut out_degree = FxHashMap::<StateId, usize>::default();
        for transition in automaton.transitions() {
            *in_degree.entry(transition.to()).or_default() += 1;
            *out_degree.entry(transition.from()).or_default() += 1;
        }
        let is_inner = |state: StateId| {
            state != StateId::INITIAL
                && !automaton.is_final(state)
                && in_degree.get(&state) == Some(&1)
                && out_degree.get(&state) == Some(&1)
        };

        let mut heads = FxHashSet::default();
        let mut queue = VecDeque::from([StateId::INITIAL]);
        heads.insert(StateId::INITIAL);
        let mut transitions = Vec::new();

        while let Some(head) = queue.pop_front() {
            for transition in automaton.outgoing(head) {
                let compressed = match as_sequence(transition) {
                    None => transition.clone(),
                    Some(mut sequence) => {
                        let mut chain = [head].into_iter().collect::<FxHashSet<_>>();
                        while is_inner(sequence.to) && chain.insert(sequence.to) {
                            let next = automaton
                                .outgoing(sequence.to)
                                .find_map(as_sequence);
                            match next {
                                Some(next) => sequence = sequence.merge(&next)?,
                                None => break,
                            }
                        }
                        Transition::Sequence(sequence)
                    }
                };

                if heads.insert(compressed.to()) {
                    queue.push_back(compressed.to());
                }
                transitions.push(compressed);
            }
        }

        let states = automaton
            .states()
            .iter()
            .filter(|state| heads.contains(&state.name()))
            .copied()
            .collect();
        Automaton::try_new(states, transitions)
    }
}

fn as_sequence(transition: &Transition) -> Option<SequenceTransition> {
    match transition {
        Transition::Property(property) => Some(property.clone().into()),
        Transition::Sequence(sequence) => Some(sequence.clone()),
        Transition::Alternative(_) | Transition::Transitive(_) => None,
    }
}
