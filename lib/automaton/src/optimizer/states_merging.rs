use crate::optimizer::AutomatonPass;
use crate::{Automaton, AutomatonResult, State, StateId, Transition};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

/// Merges equivalent states.
///
/// Two states are equivalent if they agree on being initial and final, and if for every
/// transition leaving one of them, the other has a transition with the same label into an
/// equivalent state. The equivalence is computed by partition refinement until the number of
/// blocks no longer changes. Each block is replaced by its state with the smallest name.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatesMerging;

type Signature = (usize, BTreeSet<(usize, usize)>);

impl AutomatonPass for StatesMerging {
    fn name(&self) -> &str {
        "states-merging"
    }

    fn rewrite_automaton(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let labels = label_indices(automaton);

        let mut blocks = assign_blocks(automaton.states(), |state| {
            (usize::from(state.is_initial()), usize::from(state.is_final()))
        });
        loop {
            let signatures = automaton
                .states()
                .iter()
                .map(|state| {
                    let signature = signature(automaton, &labels, &blocks, state.name());
                    (state.name(), signature)
                })
                .collect::<FxHashMap<StateId, Signature>>();
            let refined = assign_blocks(automaton.states(), |state| {
                signatures[&state.name()].clone()
            });

            let done = count_blocks(&refined) == count_blocks(&blocks);
            blocks = refined;
            if done {
                break;
            }
        }

        // States are sorted by name, hence the first state of a block is its representative.
        let mut representatives = FxHashMap::<usize, StateId>::default();
        let mut states = Vec::new();
        for state in automaton.states() {
            let block = blocks[&state.name()];
            if !representatives.contains_key(&block) {
                representatives.insert(block, state.name());
                states.push(*state);
            }
        }
        let representative = |state: StateId| representatives[&blocks[&state]];

        let mut seen = FxHashSet::default();
        let transitions = automaton
            .transitions()
            .iter()
            .map(|t| t.with_endpoints(representative(t.from()), representative(t.to())))
            .filter(|t| seen.insert(t.clone()))
            .collect();

        Automaton::try_new(states, transitions)
    }
}

/// Assigns an index to every distinct transition label.
fn label_indices(automaton: &Automaton) -> FxHashMap<Transition, usize> {
    let mut labels = FxHashMap::default();
    for transition in automaton.transitions() {
        let next = labels.len();
        labels.entry(transition.label()).or_insert(next);
    }
    labels
}

fn signature(
    automaton: &Automaton,
    labels: &FxHashMap<Transition, usize>,
    blocks: &FxHashMap<StateId, usize>,
    state: StateId,
) -> Signature {
    let edges = automaton
        .outgoing(state)
        .map(|t| (labels[&t.label()], blocks[&t.to()]))
        .collect();
    (blocks[&state], edges)
}

/// Groups the states by `key` and numbers the groups in order of their first state.
fn assign_blocks<K: std::hash::Hash + Eq>(
    states: &[State],
    key: impl Fn(&State) -> K,
) -> FxHashMap<StateId, usize> {
    let mut keys = FxHashMap::<K, usize>::default();
    let mut blocks = FxHashMap::default();
    for state in states {
        let next = keys.len();
        let block = *keys.entry(key(state)).or_insert(next);
        blocks.insert(state.name(), block);
    }
    blocks
}

fn count_blocks(blocks: &FxHashMap<StateId, usize>) -> usize {
    blocks.values().collect::<FxHashSet<_>>().len()
}
