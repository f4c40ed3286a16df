use crate::error::PathEvaluationError;
use rdf_paths_automaton::StateId;
use rdf_paths_model::Term;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::{Display, Formatter};

/// A node of the graph search: the search started at `subject`, is currently at `node`, and has
/// reached `state` of the automaton after `depth` transitions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub subject: Term,
    pub node: Term,
    pub state: StateId,
    pub depth: usize,
}

impl SearchState {
    /// Creates the state in which the search for `origin` starts.
    pub fn origin(origin: Term) -> Self {
        Self {
            node: origin.clone(),
            subject: origin,
            state: StateId::INITIAL,
            depth: 0,
        }
    }

    /// Creates the state that is reached by following a transition to `state` that ends at
    /// `node`.
    #[must_use]
    pub fn successor(&self, node: Term, state: StateId) -> Self {
        Self {
            subject: self.subject.clone(),
            node,
            state,
            depth: self.depth + 1,
        }
    }
}

impl Display for SearchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} @ {} (depth {})",
            self.subject, self.node, self.state, self.depth
        )
    }
}

/// Tracks the progress of a single search.
///
/// For every origin, the set stores the `(node, state)` pairs that have been reached and the
/// nodes that have been emitted as solutions. A pair is only expanded once, which guarantees
/// termination on cyclic graphs. A node is only emitted once per origin.
#[derive(Debug, Default)]
pub struct VisitedSet {
    reached: FxHashMap<Term, FxHashSet<(Term, StateId)>>,
    emitted: FxHashMap<Term, FxHashSet<Term>>,
    len: usize,
    limit: Option<usize>,
}

impl VisitedSet {
    /// Creates a new set that holds at most `limit` reached pairs.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Marks `state` as reached. Returns false if it had already been reached.
    pub fn reach(&mut self, state: &SearchState) -> Result<bool, PathEvaluationError> {
        let inserted = self
            .reached
            .entry(state.subject.clone())
            .or_default()
            .insert((state.node.clone(), state.state));
        if inserted {
            self.len += 1;
            if let Some(limit) = self.limit {
                if self.len > limit {
                    return Err(PathEvaluationError::VisitLimitExceeded { limit });
                }
            }
        }
        Ok(inserted)
    }

    /// Marks `object` as emitted for `origin`. Returns false if it had already been emitted.
    pub fn emit(&mut self, origin: &Term, object: &Term) -> bool {
        self.emitted
            .entry(origin.clone())
            .or_default()
            .insert(object.clone())
    }

    /// Returns the number of reached pairs over all origins.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
