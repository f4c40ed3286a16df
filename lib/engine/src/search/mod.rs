mod hop;
mod state;

pub use state::{SearchState, VisitedSet};

use crate::error::PathEvaluationError;
use crate::{CompiledPropertyPath, PathEvaluationOptions};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt, TryStreamExt};
use hop::evaluate_hops;
use rdf_paths_automaton::{Automaton, StateId, Transition};
use rdf_paths_common::{ExecutionContext, PathGraph, PathPattern, PredicatePattern};
use rdf_paths_model::{PathEndpoint, PathTriple, Term, Variable};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::Instrument;

/// A stream of property path solutions. Each `(subject, object)` pair is produced at most once.
pub type PathSolutionStream = BoxStream<'static, Result<PathTriple, PathEvaluationError>>;

/// Evaluates the pattern `subject path object` against `graph`.
///
/// If the subject is bound, or both endpoints are free, the search starts at the subject and
/// uses the forward automaton of `path`. If only the object is bound, the search starts at the
/// object and uses the backward automaton. Solutions are always reported from subject to object.
///
/// The graph is only queried while the returned stream is polled. Every poll runs inside an
/// `evaluate_property_path` span.
pub fn evaluate_property_path(
    graph: Arc<dyn PathGraph>,
    context: ExecutionContext,
    subject: PathEndpoint,
    path: &CompiledPropertyPath,
    object: PathEndpoint,
    options: PathEvaluationOptions,
) -> PathSolutionStream {
    let span = tracing::info_span!("evaluate_property_path", subject = %subject, object = %object);
    let search = PathSearch::new(graph, context, subject, path, object, options);
    stream::try_unfold(search, move |mut search| {
        let span = span.clone();
        async move {
            let batch = search.next_batch().instrument(span).await?;
            Ok::<_, PathEvaluationError>(batch.map(|batch| (batch, search)))
        }
    })
    .map_ok(|batch| stream::iter(batch.into_iter().map(Ok::<_, PathEvaluationError>)))
    .try_flatten()
    .boxed()
}

/// The node at which a solution must end.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
    Any,
    Term(Term),
    /// The solution must end at the node where it started.
    Origin,
}

impl Target {
    fn matches(&self, state: &SearchState) -> bool {
        match self {
            Target::Any => true,
            Target::Term(term) => *term == state.node,
            Target::Origin => state.subject == state.node,
        }
    }

    fn is_fixed(&self) -> bool {
        !matches!(self, Target::Any)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchPhase {
    /// Find the origins of a search whose start is not bound.
    Probe,
    NextOrigin,
    Explore,
    /// Emit `(x, x)` for every node of the graph.
    Reflexive,
    Done,
}

/// A breadth-first search of the product of an automaton and the graph.
///
/// The origins are searched one after another. Each call to [PathSearch::next_batch] expands a
/// single [SearchState] and returns the solutions found by doing so.
struct PathSearch {
    graph: Arc<dyn PathGraph>,
    context: ExecutionContext,
    automaton: Arc<Automaton>,
    options: PathEvaluationOptions,
    target: Target,
    /// Whether the search runs from the object to the subject.
    backward: bool,
    /// Whether `(x, x)` must be produced for every node once all origins are searched.
    reflexive_scan: bool,
    nesting: usize,
    phase: SearchPhase,
    origins: VecDeque<Term>,
    frontier: VecDeque<SearchState>,
    visited: VisitedSet,
    /// Nodes reachable through a transitive transition, keyed by transition index and start node.
    closures: FxHashMap<(usize, Term), Arc<[Term]>>,
}

impl PathSearch {
    fn new(
        graph: Arc<dyn PathGraph>,
        context: ExecutionContext,
        subject: PathEndpoint,
        path: &CompiledPropertyPath,
        object: PathEndpoint,
        options: PathEvaluationOptions,
    ) -> Self {
        let (automaton, origin, target, backward) = match (subject, object) {
            (PathEndpoint::Term(subject), object) => {
                let target = match object {
                    PathEndpoint::Term(object) => Target::Term(object),
                    PathEndpoint::Variable(_) => Target::Any,
                };
                (path.forward(), Some(subject), target, false)
            }
            (PathEndpoint::Variable(_), PathEndpoint::Term(object)) => {
                (path.backward(), Some(object), Target::Any, true)
            }
            (PathEndpoint::Variable(subject), PathEndpoint::Variable(object)) => {
                let target = if subject == object {
                    Target::Origin
                } else {
                    Target::Any
                };
                (path.forward(), None, target, false)
            }
        };

        Self {
            graph,
            context,
            reflexive_scan: origin.is_none() && automaton.is_nullable(),
            automaton: Arc::clone(automaton),
            target,
            backward,
            nesting: 0,
            phase: if origin.is_some() {
                SearchPhase::NextOrigin
            } else {
                SearchPhase::Probe
            },
            origins: origin.into_iter().collect(),
            frontier: VecDeque::new(),
            visited: VisitedSet::with_limit(options.max_visited),
            closures: FxHashMap::default(),
            options,
        }
    }

    /// Creates a search over the automaton of a transitive transition that starts at `origin`.
    fn nested(&self, automaton: Arc<Automaton>, origin: Term) -> Result<Self, PathEvaluationError> {
        let nesting = self.nesting + 1;
        if nesting > self.options.max_nesting_depth {
            return Err(PathEvaluationError::NestingTooDeep {
                limit: self.options.max_nesting_depth,
            });
        }

        Ok(Self {
            graph: Arc::clone(&self.graph),
            context: self.context.clone(),
            automaton,
            options: self.options.clone(),
            target: Target::Any,
            backward: false,
            reflexive_scan: false,
            nesting,
            phase: SearchPhase::NextOrigin,
            origins: VecDeque::from([origin]),
            frontier: VecDeque::new(),
            visited: VisitedSet::with_limit(self.options.max_visited),
            closures: FxHashMap::default(),
        })
    }

    /// Advances the search. Returns [None] once the search is exhausted.
    async fn next_batch(&mut self) -> Result<Option<Vec<PathTriple>>, PathEvaluationError> {
        loop {
            match self.phase {
                SearchPhase::Probe => {
                    let origins = self.probe_origins().await?;
                    tracing::debug!("Found {} candidate origins", origins.len());
                    self.origins = origins.into();
                    self.phase = SearchPhase::NextOrigin;
                }
                SearchPhase::NextOrigin => match self.origins.pop_front() {
                    Some(origin) => {
                        let state = SearchState::origin(origin);
                        if self.visited.reach(&state)? {
                            self.frontier.push_back(state);
                            self.phase = SearchPhase::Explore;
                        }
                    }
                    None if self.reflexive_scan => self.phase = SearchPhase::Reflexive,
                    None => self.phase = SearchPhase::Done,
                },
                SearchPhase::Explore => match self.frontier.pop_front() {
                    Some(state) => return self.expand(state).await.map(Some),
                    None => self.phase = SearchPhase::NextOrigin,
                },
                SearchPhase::Reflexive => {
                    self.phase = SearchPhase::Done;
                    return self.reflexive_solutions().await.map(Some);
                }
                SearchPhase::Done => return Ok(None),
            }
        }
    }

    async fn expand(&mut self, state: SearchState) -> Result<Vec<PathTriple>, PathEvaluationError> {
        tracing::trace!("Expanding {state}");

        let mut solutions = Vec::new();
        if self.automaton.is_final(state.state) && self.target.matches(&state) {
            if self.visited.emit(&state.subject, &state.node) {
                solutions.push(self.solution(&state));
            }
            if self.options.early_termination && self.target.is_fixed() {
                tracing::debug!("Reached the target from {}, stopping early", state.subject);
                self.frontier.clear();
                return Ok(solutions);
            }
        }

        if self
            .options
            .max_search_depth
            .is_some_and(|max_depth| state.depth >= max_depth)
        {
            return Ok(solutions);
        }

        let automaton = Arc::clone(&self.automaton);
        for (index, transition) in automaton.transitions().iter().enumerate() {
            if transition.from() != state.state {
                continue;
            }

            let nodes = self.follow(index, transition, &state.node).await?;
            for node in nodes.iter() {
                let next = state.successor(node.clone(), transition.to());
                if self.visited.reach(&next)? {
                    self.frontier.push_back(next);
                }
            }
        }
        Ok(solutions)
    }

    /// Returns the nodes that are reachable from `node` by following `transition`.
    async fn follow(
        &mut self,
        index: usize,
        transition: &Transition,
        node: &Term,
    ) -> Result<Arc<[Term]>, PathEvaluationError> {
        if let Transition::Transitive(transitive) = transition {
            let key = (index, node.clone());
            if let Some(nodes) = self.closures.get(&key) {
                return Ok(Arc::clone(nodes));
            }

            tracing::debug!("Evaluating closure{} from {node}", transitive.kind.symbol());
            let nodes: Arc<[Term]> = self
                .evaluate_closure(Arc::clone(&transitive.automaton), node.clone())?
                .await?
                .into();
            self.closures.insert(key, Arc::clone(&nodes));
            return Ok(nodes);
        }

        let Some(branches) = transition.branches() else {
            return PathEvaluationError::internal(format!(
                "The transition {transition} cannot be evaluated as a hop"
            ));
        };
        let start = PathEndpoint::Term(node.clone());
        let pairs = evaluate_hops(self.graph.as_ref(), &self.context, &start, &branches).await?;
        Ok(pairs.into_iter().map(|(_, end)| end).collect())
    }

    /// Runs a nested search over `automaton` and collects all nodes it reaches from `origin`.
    fn evaluate_closure(
        &self,
        automaton: Arc<Automaton>,
        origin: Term,
    ) -> Result<BoxFuture<'static, Result<Vec<Term>, PathEvaluationError>>, PathEvaluationError>
    {
        let mut search = self.nested(automaton, origin)?;
        Ok(async move {
            let mut nodes = Vec::new();
            while let Some(batch) = search.next_batch().await? {
                nodes.extend(batch.into_iter().map(|solution| solution.object));
            }
            Ok(nodes)
        }
        .boxed())
    }

    /// Returns the distinct start nodes of all transitions leaving the initial state.
    ///
    /// For transitive transitions, the initial transitions of the nested automaton are probed.
    async fn probe_origins(&self) -> Result<Vec<Term>, PathEvaluationError> {
        let start = PathEndpoint::Variable(Variable::new_unchecked("_s"));
        let mut seen = FxHashSet::default();
        let mut origins = Vec::new();

        let mut automata = vec![Arc::clone(&self.automaton)];
        while let Some(automaton) = automata.pop() {
            for transition in automaton.outgoing(StateId::INITIAL) {
                let Some(branches) = transition.branches() else {
                    if let Transition::Transitive(transitive) = transition {
                        automata.push(Arc::clone(&transitive.automaton));
                    }
                    continue;
                };

                let pairs =
                    evaluate_hops(self.graph.as_ref(), &self.context, &start, &branches).await?;
                for (origin, _) in pairs {
                    if seen.insert(origin.clone()) {
                        origins.push(origin);
                    }
                }
            }
        }
        Ok(origins)
    }

    /// Emits `(x, x)` for every subject and object `x` of the graph that has not been emitted
    /// yet.
    async fn reflexive_solutions(&mut self) -> Result<Vec<PathTriple>, PathEvaluationError> {
        let subject = Variable::new_unchecked("_s");
        let object = Variable::new_unchecked("_o");
        let pattern = PathPattern::new(
            subject.clone(),
            PredicatePattern::Variable(Variable::new_unchecked("_p")),
            object.clone(),
        );
        let bindings = self
            .graph
            .evaluate_bgp(&[pattern], &self.context)
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        let mut solutions = Vec::new();
        for binding in &bindings {
            for variable in [&subject, &object] {
                if let Some(node) = binding.get(variable) {
                    if self.visited.emit(node, node) {
                        solutions.push(PathTriple::new(node.clone(), node.clone()));
                    }
                }
            }
        }
        tracing::debug!("Emitted {} reflexive solutions", solutions.len());
        Ok(solutions)
    }

    fn solution(&self, state: &SearchState) -> PathTriple {
        let solution = PathTriple::new(state.subject.clone(), state.node.clone());
        if self.backward {
            solution.reversed()
        } else {
            solution
        }
    }
}
