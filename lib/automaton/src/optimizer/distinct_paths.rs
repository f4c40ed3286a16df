use crate::optimizer::AutomatonPass;
use crate::{AlternativeTransition, Automaton, AutomatonResult, Transition};
use itertools::Itertools;
use rustc_hash::FxHashSet;

/// Removes duplicate branches of alternative transitions and duplicate transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistinctPaths;

impl AutomatonPass for DistinctPaths {
    fn name(&self) -> &str {
        "distinct-paths"
    }

    fn rewrite_automaton(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let mut seen = FxHashSet::default();
        let transitions = automaton
            .transitions()
            .iter()
            .map(|transition| match transition {
                Transition::Alternative(alternative) => {
                    Transition::Alternative(AlternativeTransition {
                        from: alternative.from,
                        to: alternative.to,
                        branches: alternative.branches.iter().unique().cloned().collect(),
                    })
                }
                _ => transition.clone(),
            })
            .filter(|transition| seen.insert(transition.clone()))
            .collect();

        Automaton::try_new(automaton.states().to_vec(), transitions)
    }
}
