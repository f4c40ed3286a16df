use crate::optimizer::AutomatonPass;
use crate::{AlternativeTransition, Automaton, AutomatonResult, StateId, Transition};
use rustc_hash::FxHashMap;

/// Merges all non-transitive transitions between the same pair of states into a single
/// [AlternativeTransition].
///
/// The merged transition takes the place of the first transition of its group. Branches keep the
/// order in which they appear and duplicates are dropped. Transitive transitions are kept as they
/// are.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathsMerging;

impl AutomatonPass for PathsMerging {
    fn name(&self) -> &str {
        "paths-merging"
    }

    fn rewrite_automaton(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let mut groups = FxHashMap::<(StateId, StateId), usize>::default();
        let mut transitions = Vec::<Transition>::new();

        for transition in automaton.transitions() {
            let Some(branches) = transition.branches() else {
                transitions.push(transition.clone());
                continue;
            };

            let key = (transition.from(), transition.to());
            let index = *groups.entry(key).or_insert_with(|| {
                transitions.push(Transition::Alternative(AlternativeTransition {
                    from: key.0,
                    to: key.1,
                    branches: Vec::new(),
                }));
                transitions.len() - 1
            });

            if let Transition::Alternative(alternative) = &mut transitions[index] {
                for branch in branches {
                    if !alternative.branches.iter().any(|b| b.as_slice() == branch) {
                        alternative.branches.push(branch.to_vec());
                    }
                }
            }
        }

        Automaton::try_new(automaton.states().to_vec(), transitions)
    }
}
