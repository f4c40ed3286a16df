#![cfg(test)]

use async_trait::async_trait;
use futures::TryStreamExt;
use itertools::Itertools;
use rdf_paths::common::error::StorageError;
use rdf_paths::common::{BindingStream, ExecutionContext, PathGraph, PathPattern, PathQuery};
use rdf_paths::engine::error::PathEvaluationError;
use rdf_paths::engine::{PathEngine, PathEvaluationOptions};
use rdf_paths::model::vocab::{rdf, rdfs};
use rdf_paths::model::{NamedNode, PathEndpoint, PropertyPathExpression, Triple, Variable};
use rdf_paths::storage::memory::MemGraph;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn node(name: &str) -> PathEndpoint {
    PathEndpoint::Term(ex(name).into())
}

fn var(name: &str) -> PathEndpoint {
    PathEndpoint::Variable(Variable::new_unchecked(name))
}

fn graph(triples: &[(&str, &str, &str)]) -> MemGraph {
    MemGraph::from_triples(
        triples
            .iter()
            .map(|(s, p, o)| Triple::new(ex(s), ex(p), ex(o))),
    )
}

fn p(name: &str) -> PropertyPathExpression {
    PropertyPathExpression::NamedNode(ex(name))
}

fn seq(left: PropertyPathExpression, right: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::Sequence(Box::new(left), Box::new(right))
}

fn alt(left: PropertyPathExpression, right: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::Alternative(Box::new(left), Box::new(right))
}

fn inv(path: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::Reverse(Box::new(path))
}

fn star(path: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::ZeroOrMore(Box::new(path))
}

fn plus(path: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::OneOrMore(Box::new(path))
}

fn opt(path: PropertyPathExpression) -> PropertyPathExpression {
    PropertyPathExpression::ZeroOrOne(Box::new(path))
}

fn neg(names: &[&str]) -> PropertyPathExpression {
    PropertyPathExpression::NegatedPropertySet(names.iter().map(|name| ex(name)).collect())
}

type Pairs = BTreeSet<(String, String)>;

async fn evaluate_with(
    graph: &MemGraph,
    subject: PathEndpoint,
    path: &PropertyPathExpression,
    object: PathEndpoint,
    options: PathEvaluationOptions,
) -> Pairs {
    init_tracing();
    let engine = PathEngine::new(Arc::new(graph.clone())).with_options(options);
    let solutions = engine
        .evaluate(subject, path, object)
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    let pairs = solutions
        .iter()
        .map(|solution| {
            (
                solution.subject.to_string().replace("http://example.com/", ""),
                solution.object.to_string().replace("http://example.com/", ""),
            )
        })
        .collect::<Vec<_>>();
    let distinct = pairs.iter().cloned().collect::<Pairs>();
    assert_eq!(pairs.len(), distinct.len(), "duplicate solutions for {path}");
    distinct
}

async fn evaluate(
    graph: &MemGraph,
    subject: PathEndpoint,
    path: &PropertyPathExpression,
    object: PathEndpoint,
) -> Pairs {
    evaluate_with(graph, subject, path, object, PathEvaluationOptions::default()).await
}

fn pairs(expected: &[(&str, &str)]) -> Pairs {
    expected
        .iter()
        .map(|(s, o)| (format!("<{s}>"), format!("<{o}>")))
        .collect()
}

/// A graph with cycles over two properties.
fn cyclic_graph() -> MemGraph {
    graph(&[
        ("a", "p", "b"),
        ("b", "p", "c"),
        ("c", "p", "a"),
        ("b", "q", "d"),
        ("d", "q", "d"),
        ("c", "q", "e"),
        ("e", "p", "a"),
    ])
}

fn cyclic_graph_nodes() -> Vec<&'static str> {
    vec!["a", "b", "c", "d", "e"]
}

fn sample_paths() -> Vec<PropertyPathExpression> {
    vec![
        p("p"),
        seq(p("p"), p("q")),
        plus(alt(p("p"), p("q"))),
        seq(star(p("p")), p("q")),
        seq(inv(p("p")), star(p("q"))),
        neg(&["q"]),
        opt(seq(p("p"), p("q"))),
        seq(p("p"), star(alt(p("q"), inv(p("p"))))),
        plus(seq(p("p"), star(p("q")))),
        alt(neg(&["p"]), inv(neg(&["q"]))),
    ]
}

#[tokio::test]
async fn one_or_more_from_bound_subject() {
    let graph = graph(&[("a", "p", "b"), ("b", "p", "c")]);

    let result = evaluate(&graph, node("a"), &plus(p("p")), var("x")).await;
    assert_eq!(result, pairs(&[("a", "b"), ("a", "c")]));
}

#[tokio::test]
async fn zero_or_more_includes_start() {
    let graph = graph(&[("a", "p", "b"), ("b", "p", "c")]);

    let result = evaluate(&graph, node("a"), &star(p("p")), var("x")).await;
    assert_eq!(result, pairs(&[("a", "a"), ("a", "b"), ("a", "c")]));
}

#[tokio::test]
async fn negated_property_set() {
    let graph = graph(&[("a", "p", "b"), ("a", "q", "c")]);

    let result = evaluate(&graph, node("a"), &neg(&["p"]), var("x")).await;
    assert_eq!(result, pairs(&[("a", "c")]));
}

#[tokio::test]
async fn negated_inverse_property_set() {
    let graph = graph(&[("b", "p", "a"), ("c", "q", "a")]);

    let result = evaluate(&graph, node("a"), &inv(neg(&["p"])), var("x")).await;
    assert_eq!(result, pairs(&[("a", "c")]));
}

#[tokio::test]
async fn cyclic_graph_terminates() {
    let graph = graph(&[("a", "p", "b"), ("b", "p", "a")]);

    let result = evaluate(&graph, node("a"), &plus(p("p")), var("x")).await;
    assert_eq!(result, pairs(&[("a", "a"), ("a", "b")]));
}

#[tokio::test]
async fn reflexive_closure_for_unknown_node() {
    let graph = graph(&[("a", "p", "b")]);

    let result = evaluate(&graph, node("z"), &star(p("p")), var("x")).await;
    assert_eq!(result, pairs(&[("z", "z")]));

    let result = evaluate(&graph, var("x"), &star(p("p")), node("z")).await;
    assert_eq!(result, pairs(&[("z", "z")]));

    let result = evaluate(&graph, node("z"), &star(p("p")), node("z")).await;
    assert_eq!(result, pairs(&[("z", "z")]));
}

#[tokio::test]
async fn reflexive_closure_with_free_endpoints() {
    let graph = graph(&[("a", "p", "b"), ("c", "q", "d")]);

    let result = evaluate(&graph, var("s"), &star(p("p")), var("o")).await;
    assert_eq!(
        result,
        pairs(&[("a", "a"), ("a", "b"), ("b", "b"), ("c", "c"), ("d", "d")])
    );
}

#[tokio::test]
async fn same_variable_on_both_ends() {
    let graph = graph(&[("a", "p", "b"), ("b", "p", "a"), ("c", "p", "d")]);

    let result = evaluate(&graph, var("x"), &plus(p("p")), var("x")).await;
    assert_eq!(result, pairs(&[("a", "a"), ("b", "b")]));

    let result = evaluate(&graph, var("x"), &star(p("p")), var("x")).await;
    assert_eq!(
        result,
        pairs(&[("a", "a"), ("b", "b"), ("c", "c"), ("d", "d")])
    );
}

#[tokio::test]
async fn single_property_equals_triple_pattern() {
    let graph = cyclic_graph();

    let result = evaluate(&graph, var("s"), &p("q"), var("o")).await;
    assert_eq!(result, pairs(&[("b", "d"), ("d", "d"), ("c", "e")]));
}

#[tokio::test]
async fn sequence_joins_on_intermediate_node() {
    let graph = graph(&[("a", "p", "b"), ("b", "q", "c"), ("a", "p", "d"), ("d", "q", "e")]);

    let result = evaluate(&graph, var("s"), &seq(p("p"), p("q")), var("o")).await;
    assert_eq!(result, pairs(&[("a", "c"), ("a", "e")]));
}

#[tokio::test]
async fn alternative_is_union() {
    let graph = cyclic_graph();

    let left = evaluate(&graph, var("s"), &p("p"), var("o")).await;
    let right = evaluate(&graph, var("s"), &p("q"), var("o")).await;
    let union = evaluate(&graph, var("s"), &alt(p("p"), p("q")), var("o")).await;
    assert_eq!(union, left.union(&right).cloned().collect::<Pairs>());
}

#[tokio::test]
async fn inverse_swaps_endpoints() {
    let graph = cyclic_graph();

    for path in sample_paths() {
        let forward = evaluate(&graph, var("s"), &path, var("o")).await;
        let inverse = evaluate(&graph, var("s"), &inv(path.clone()), var("o")).await;
        let swapped = forward
            .into_iter()
            .map(|(s, o)| (o, s))
            .collect::<Pairs>();
        assert_eq!(inverse, swapped, "^({path})");
    }
}

#[tokio::test]
async fn optimization_preserves_solutions() {
    let graph = cyclic_graph();
    let plain = PathEvaluationOptions::default().with_optimize(false);

    for path in sample_paths() {
        let optimized = evaluate(&graph, var("s"), &path, var("o")).await;
        let unoptimized = evaluate_with(&graph, var("s"), &path, var("o"), plain.clone()).await;
        assert_eq!(optimized, unoptimized, "{path}");
    }
}

#[tokio::test]
async fn bound_endpoints_restrict_solutions() {
    let graph = cyclic_graph();

    for path in sample_paths() {
        let all = evaluate(&graph, var("s"), &path, var("o")).await;
        for name in cyclic_graph_nodes() {
            let expected_from = all
                .iter()
                .filter(|(s, _)| *s == format!("<{name}>"))
                .cloned()
                .collect::<Pairs>();
            let from = evaluate(&graph, node(name), &path, var("o")).await;
            assert_eq!(from, expected_from, "{name} {path} ?o");

            let expected_to = all
                .iter()
                .filter(|(_, o)| *o == format!("<{name}>"))
                .cloned()
                .collect::<Pairs>();
            let to = evaluate(&graph, var("s"), &path, node(name)).await;
            assert_eq!(to, expected_to, "?s {path} {name}");
        }
    }
}

#[tokio::test]
async fn bound_pairs_are_checked() {
    let graph = cyclic_graph();
    let engine = PathEngine::new(Arc::new(graph));
    let path = seq(plus(p("p")), p("q"));

    assert!(engine
        .contains(ex("a").into(), &path, ex("d").into())
        .await
        .unwrap());
    assert!(!engine
        .contains(ex("d").into(), &path, ex("a").into())
        .await
        .unwrap());
}

#[tokio::test]
async fn nested_closures_in_cycles() {
    let graph = cyclic_graph();

    let result = evaluate(&graph, node("a"), &plus(seq(p("p"), star(p("q")))), var("x")).await;
    let expected = cyclic_graph_nodes()
        .into_iter()
        .map(|name| ("a", name))
        .collect_vec();
    assert_eq!(result, pairs(&expected));
}

#[tokio::test]
async fn class_hierarchy() {
    let graph = MemGraph::from_triples([
        Triple::new(ex("alice"), rdf::TYPE, ex("Student")),
        Triple::new(ex("Student"), rdfs::SUB_CLASS_OF, ex("Person")),
        Triple::new(ex("Person"), rdfs::SUB_CLASS_OF, ex("Agent")),
    ]);
    let path = seq(
        PropertyPathExpression::NamedNode(rdf::TYPE.into_owned()),
        star(PropertyPathExpression::NamedNode(
            rdfs::SUB_CLASS_OF.into_owned(),
        )),
    );

    let result = evaluate(&graph, node("alice"), &path, var("class")).await;
    assert_eq!(
        result,
        pairs(&[
            ("alice", "Agent"),
            ("alice", "Person"),
            ("alice", "Student")
        ])
    );
}

#[derive(Debug)]
struct UnavailableGraph;

#[async_trait]
impl PathGraph for UnavailableGraph {
    async fn evaluate_query(
        &self,
        _query: &PathQuery,
        _context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        Err(StorageError::msg("graph unavailable"))
    }

    async fn evaluate_bgp(
        &self,
        _patterns: &[PathPattern],
        _context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        Err(StorageError::msg("graph unavailable"))
    }
}

#[tokio::test]
async fn graph_errors_abort_the_stream() {
    let engine = PathEngine::new(Arc::new(UnavailableGraph));

    let result = engine
        .evaluate(ex("a"), &plus(p("p")), Variable::new_unchecked("x"))
        .unwrap()
        .try_collect::<Vec<_>>()
        .await;
    assert!(matches!(result, Err(PathEvaluationError::Storage(_))));
}

#[derive(Debug)]
struct LabelCheckingGraph {
    inner: MemGraph,
    label: &'static str,
}

impl LabelCheckingGraph {
    fn check(&self, context: &ExecutionContext) -> Result<(), StorageError> {
        if context.query_label() == Some(self.label) {
            Ok(())
        } else {
            Err(StorageError::msg("unexpected execution context"))
        }
    }
}

#[async_trait]
impl PathGraph for LabelCheckingGraph {
    async fn evaluate_query(
        &self,
        query: &PathQuery,
        context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        self.check(context)?;
        self.inner.evaluate_query(query, context).await
    }

    async fn evaluate_bgp(
        &self,
        patterns: &[PathPattern],
        context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        self.check(context)?;
        self.inner.evaluate_bgp(patterns, context).await
    }
}

#[tokio::test]
async fn context_is_forwarded_to_the_graph() {
    let graph = LabelCheckingGraph {
        inner: graph(&[("a", "p", "b")]),
        label: "q1",
    };
    let engine = PathEngine::new(Arc::new(graph))
        .with_context(ExecutionContext::with_query_label("q1"));

    let solutions = engine
        .evaluate(
            Variable::new_unchecked("s"),
            &star(p("p")),
            Variable::new_unchecked("o"),
        )
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();
    assert_eq!(solutions.len(), 3);
}
