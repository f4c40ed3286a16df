#![allow(clippy::panic)]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use futures::TryStreamExt;
use rdf_paths::engine::PathEngine;
use rdf_paths::model::{NamedNode, PropertyPathExpression, Triple, Variable};
use rdf_paths::storage::memory::MemGraph;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn closure_over_chain(c: &mut Criterion) {
    let engine = PathEngine::new(Arc::new(MemGraph::from_triples(generate_chain(1_000))));
    let path = PropertyPathExpression::ZeroOrMore(Box::new(PropertyPathExpression::NamedNode(
        predicate(),
    )));

    c.bench_function("PathEngine::evaluate p* from the chain start", |b| {
        b.to_async(Runtime::new().unwrap()).iter(|| async {
            let solutions = engine
                .evaluate(node(0), &path, Variable::new_unchecked("x"))
                .unwrap()
                .try_collect::<Vec<_>>()
                .await
                .unwrap();
            assert_eq!(solutions.len(), 1_001);
        });
    });

    c.bench_function("PathEngine::contains p* between the chain ends", |b| {
        b.to_async(Runtime::new().unwrap()).iter(|| async {
            let reachable = engine
                .contains(node(0).into(), &path, node(1_000).into())
                .await
                .unwrap();
            assert!(reachable);
        });
    });
}

criterion_group!(paths, closure_over_chain);
criterion_main!(paths);

fn predicate() -> NamedNode {
    NamedNode::new_unchecked("http://example.com/next")
}

fn node(i: u64) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/node{i}"))
}

fn generate_chain(length: u64) -> impl Iterator<Item = Triple> {
    (0..length).map(|i| Triple::new(node(i), predicate(), node(i + 1)))
}
