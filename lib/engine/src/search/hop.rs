use crate::error::PathEvaluationError;
use futures::future::try_join_all;
use futures::TryStreamExt;
use itertools::Itertools;
use rdf_paths_automaton::Instruction;
use rdf_paths_common::{
    ExecutionContext, FilterMode, PathGraph, PathPattern, PathQuery, PredicatePattern,
    PropertyFilter,
};
use rdf_paths_model::{PathEndpoint, Term, Variable};
use rustc_hash::FxHashSet;

/// Creates fresh variable names for hop queries.
///
/// Names start with an underscore and are numbered in the order of creation.
#[derive(Debug, Default)]
pub(super) struct VariableGenerator {
    next: usize,
}

impl VariableGenerator {
    pub(super) fn fresh(&mut self, prefix: &str) -> Variable {
        let variable = Variable::new_unchecked(format!("_{prefix}{}", self.next));
        self.next += 1;
        variable
    }
}

/// A query that matches a fixed chain of [Instruction]s starting at `start`.
#[derive(Clone, Debug)]
pub(super) struct HopQuery {
    query: PathQuery,
    start: PathEndpoint,
    end: Variable,
}

impl HopQuery {
    pub(super) fn new(start: PathEndpoint, instructions: &[Instruction]) -> Self {
        let mut variables = VariableGenerator::default();
        let end = variables.fresh("o");
        let mut query = PathQuery::default();

        let mut current = start.clone();
        for (index, instruction) in instructions.iter().enumerate() {
            let next = if index + 1 == instructions.len() {
                PathEndpoint::Variable(end.clone())
            } else {
                PathEndpoint::Variable(variables.fresh("n"))
            };

            let predicate = match instruction.single_property() {
                Some(property) => PredicatePattern::NamedNode(property.clone()),
                None => {
                    let variable = variables.fresh("p");
                    query.filters.push(PropertyFilter {
                        variable: variable.clone(),
                        properties: instruction.properties().to_vec(),
                        mode: if instruction.negation() {
                            FilterMode::NoneOf
                        } else {
                            FilterMode::OneOf
                        },
                    });
                    PredicatePattern::Variable(variable)
                }
            };

            let pattern = if instruction.inverse() {
                PathPattern::new(next.clone(), predicate, current)
            } else {
                PathPattern::new(current, predicate, next.clone())
            };
            query.patterns.push(pattern);
            current = next;
        }

        Self { query, start, end }
    }

    pub(super) fn query(&self) -> &PathQuery {
        &self.query
    }

    /// Returns the distinct `(start, end)` pairs that are connected by the instructions.
    pub(super) async fn execute(
        &self,
        graph: &dyn PathGraph,
        context: &ExecutionContext,
    ) -> Result<Vec<(Term, Term)>, PathEvaluationError> {
        if self.query.is_empty() {
            return match &self.start {
                PathEndpoint::Term(term) => Ok(vec![(term.clone(), term.clone())]),
                PathEndpoint::Variable(_) => {
                    PathEvaluationError::internal("An empty hop requires a bound start")
                }
            };
        }

        tracing::trace!("Evaluating hop query {}", self.query());
        let solutions = graph
            .evaluate_query(&self.query, context)
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        let mut seen = FxHashSet::default();
        let mut pairs = Vec::new();
        for bindings in &solutions {
            let start = match &self.start {
                PathEndpoint::Term(term) => Some(term),
                PathEndpoint::Variable(variable) => bindings.get(variable),
            };
            let (Some(start), Some(end)) = (start, bindings.get(&self.end)) else {
                return PathEvaluationError::internal(format!(
                    "The hop query {} did not bind its endpoints",
                    self.query
                ));
            };
            let pair = (start.clone(), end.clone());
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }
}

/// Evaluates every branch from `start` concurrently and returns the distinct `(start, end)` pairs.
pub(super) async fn evaluate_hops(
    graph: &dyn PathGraph,
    context: &ExecutionContext,
    start: &PathEndpoint,
    branches: &[&[Instruction]],
) -> Result<Vec<(Term, Term)>, PathEvaluationError> {
    let queries = branches
        .iter()
        .map(|branch| HopQuery::new(start.clone(), branch))
        .collect::<Vec<_>>();
    let results = try_join_all(queries.iter().map(|query| query.execute(graph, context))).await?;
    Ok(results.into_iter().flatten().unique().collect())
}
