use rdf_paths_common::{PathPattern, PredicatePattern, PropertyFilter};
use rdf_paths_model::{Bindings, NamedNode, PathEndpoint, Term, Triple};

/// Provides the triples that may match a pattern.
pub(super) trait Candidates {
    fn with_subject(&self, subject: &Term) -> Vec<Triple>;
    fn with_predicate(&self, predicate: &NamedNode) -> Vec<Triple>;
    fn with_object(&self, object: &Term) -> Vec<Triple>;
    fn all(&self) -> Vec<Triple>;
}

/// Evaluates `patterns` as a nested-loop join.
///
/// Filters are applied as soon as their variable is bound. Solutions that do not bind a filtered
/// variable are kept.
pub(super) fn evaluate_patterns(
    graph: &impl Candidates,
    patterns: &[PathPattern],
    filters: &[PropertyFilter],
) -> Vec<Bindings> {
    let mut solutions = vec![Bindings::default()];
    for pattern in patterns {
        solutions = solutions
            .iter()
            .flat_map(|bindings| {
                candidates(graph, pattern, bindings)
                    .into_iter()
                    .filter_map(|triple| match_triple(pattern, &triple, bindings))
                    .collect::<Vec<_>>()
            })
            .filter(|bindings| passes_filters(bindings, filters))
            .collect();

        if solutions.is_empty() {
            break;
        }
    }
    solutions
}

/// Picks the most selective index for `pattern` given the current `bindings`.
fn candidates(graph: &impl Candidates, pattern: &PathPattern, bindings: &Bindings) -> Vec<Triple> {
    if let Some(subject) = resolve(&pattern.subject, bindings) {
        return graph.with_subject(&subject);
    }
    if let Some(object) = resolve(&pattern.object, bindings) {
        return graph.with_object(&object);
    }
    match &pattern.predicate {
        PredicatePattern::NamedNode(predicate) => graph.with_predicate(predicate),
        PredicatePattern::Variable(variable) => match bindings.get(variable) {
            Some(Term::NamedNode(predicate)) => graph.with_predicate(predicate),
            Some(_) => Vec::new(),
            None => graph.all(),
        },
    }
}

fn resolve(endpoint: &PathEndpoint, bindings: &Bindings) -> Option<Term> {
    match endpoint {
        PathEndpoint::Term(term) => Some(term.clone()),
        PathEndpoint::Variable(variable) => bindings.get(variable).cloned(),
    }
}

fn match_triple(pattern: &PathPattern, triple: &Triple, bindings: &Bindings) -> Option<Bindings> {
    let mut result = bindings.clone();
    if !match_endpoint(&pattern.subject, triple.subject.clone().into(), &mut result) {
        return None;
    }

    let predicate = Term::from(triple.predicate.clone());
    let predicate_matches = match &pattern.predicate {
        PredicatePattern::NamedNode(expected) => *expected == triple.predicate,
        PredicatePattern::Variable(variable) => result.bind(variable.clone(), predicate),
    };
    if !predicate_matches {
        return None;
    }

    if !match_endpoint(&pattern.object, triple.object.clone(), &mut result) {
        return None;
    }
    Some(result)
}

fn match_endpoint(endpoint: &PathEndpoint, term: Term, bindings: &mut Bindings) -> bool {
    match endpoint {
        PathEndpoint::Term(expected) => *expected == term,
        PathEndpoint::Variable(variable) => bindings.bind(variable.clone(), term),
    }
}

fn passes_filters(bindings: &Bindings, filters: &[PropertyFilter]) -> bool {
    filters.iter().all(|filter| {
        bindings
            .get(&filter.variable)
            .map_or(true, |term| filter.accepts(term))
    })
}
