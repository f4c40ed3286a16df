use crate::{ex, triple};
use futures::TryStreamExt;
use itertools::Itertools;
use rdf_paths_common::{
    ExecutionContext, FilterMode, PathGraph, PathPattern, PathQuery, PredicatePattern,
    PropertyFilter,
};
use rdf_paths_model::{Bindings, Term, Variable};
use rdf_paths_storage::memory::MemGraph;

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn example_graph() -> MemGraph {
    MemGraph::from_triples([
        triple("a", "p", "b"),
        triple("b", "p", "c"),
        triple("a", "q", "c"),
        triple("c", "r", "c"),
    ])
}

async fn run(graph: &MemGraph, query: PathQuery) -> Vec<Bindings> {
    graph
        .evaluate_query(&query, &ExecutionContext::default())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

fn render(solutions: &[Bindings], variable: &str) -> String {
    solutions
        .iter()
        .filter_map(|bindings| bindings.get(&var(variable)))
        .map(Term::to_string)
        .sorted()
        .join("\n")
}

#[tokio::test]
async fn insert_triples() {
    let graph = MemGraph::new();

    assert!(graph.insert(triple("a", "p", "b")));
    assert!(!graph.insert(triple("a", "p", "b")));
    assert_eq!(graph.extend([triple("a", "p", "b"), triple("b", "p", "c")]), 1);

    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&triple("b", "p", "c")));
    assert!(!graph.contains(&triple("c", "p", "b")));
}

#[tokio::test]
async fn evaluate_single_pattern() {
    let graph = example_graph();
    let query = PathQuery {
        patterns: vec![PathPattern::new(
            ex("a"),
            PredicatePattern::NamedNode(ex("p")),
            var("x"),
        )],
        filters: Vec::new(),
    };

    let solutions = run(&graph, query).await;
    insta::assert_snapshot!(render(&solutions, "x"), @"<http://example.com/b>");
}

#[tokio::test]
async fn evaluate_join() {
    let graph = example_graph();
    let query = PathQuery {
        patterns: vec![
            PathPattern::new(ex("a"), PredicatePattern::NamedNode(ex("p")), var("m")),
            PathPattern::new(var("m"), PredicatePattern::NamedNode(ex("p")), var("x")),
        ],
        filters: Vec::new(),
    };

    let solutions = run(&graph, query).await;
    insta::assert_snapshot!(render(&solutions, "x"), @"<http://example.com/c>");
}

#[tokio::test]
async fn evaluate_negated_filter() {
    let graph = example_graph();
    let query = PathQuery {
        patterns: vec![PathPattern::new(
            ex("a"),
            PredicatePattern::Variable(var("p")),
            var("x"),
        )],
        filters: vec![PropertyFilter {
            variable: var("p"),
            properties: vec![ex("p")],
            mode: FilterMode::NoneOf,
        }],
    };

    let solutions = run(&graph, query).await;
    insta::assert_snapshot!(render(&solutions, "x"), @"<http://example.com/c>");
}

#[tokio::test]
async fn evaluate_repeated_variable() {
    let graph = example_graph();
    let query = PathQuery {
        patterns: vec![PathPattern::new(
            var("x"),
            PredicatePattern::Variable(var("p")),
            var("x"),
        )],
        filters: Vec::new(),
    };

    let solutions = run(&graph, query).await;
    insta::assert_snapshot!(render(&solutions, "x"), @"<http://example.com/c>");
}

#[tokio::test]
async fn evaluate_bgp_lists_all_triples() {
    let graph = example_graph();
    let pattern = PathPattern::new(var("s"), PredicatePattern::Variable(var("p")), var("o"));

    let solutions: Vec<Bindings> = graph
        .evaluate_bgp(&[pattern], &ExecutionContext::default())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(solutions.len(), 4);
    insta::assert_snapshot!(render(&solutions, "s"), @r"
    <http://example.com/a>
    <http://example.com/a>
    <http://example.com/b>
    <http://example.com/c>
    ");
}

#[tokio::test]
async fn concurrent_inserts_are_indexed_once() {
    let graph = MemGraph::new();
    let triples = (0..50)
        .map(|i| triple("a", "p", &format!("o{i}")))
        .collect::<Vec<_>>();

    let inserted = std::thread::scope(|scope| {
        let workers = (0..4)
            .map(|_| scope.spawn(|| graph.extend(triples.iter().cloned())))
            .collect::<Vec<_>>();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .sum::<usize>()
    });
    assert_eq!(inserted, 50);
    assert_eq!(graph.len(), 50);

    let by_subject = run(
        &graph,
        PathQuery {
            patterns: vec![PathPattern::new(
                ex("a"),
                PredicatePattern::NamedNode(ex("p")),
                var("x"),
            )],
            filters: Vec::new(),
        },
    )
    .await;
    assert_eq!(by_subject.len(), 50);

    let scanned = run(
        &graph,
        PathQuery {
            patterns: vec![PathPattern::new(
                var("s"),
                PredicatePattern::Variable(var("p")),
                var("x"),
            )],
            filters: Vec::new(),
        },
    )
    .await;
    assert_eq!(scanned.len(), 50);
}
