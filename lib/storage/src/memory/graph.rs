use crate::memory::matcher::{evaluate_patterns, Candidates};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use futures::stream;
use futures::StreamExt;
use rdf_paths_common::error::StorageError;
use rdf_paths_common::{BindingStream, ExecutionContext, PathGraph, PathPattern, PathQuery};
use rdf_paths_model::{NamedNode, Term, Triple};
use rustc_hash::{FxHashSet, FxHasher};
use std::fmt::{Debug, Formatter};
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// An in-memory RDF graph.
///
/// Triples are stored once and indexed by subject, predicate, and object. Cloning a [MemGraph] is
/// cheap and the clones share the same content. Triples can be inserted concurrently with running
/// queries; a query observes the triples that were present when one of its patterns was matched.
///
/// A triple is added to the indexes before it is added to the triple set. Hence, every triple
/// returned by a full scan is also returned by the index lookups.
#[derive(Clone, Default)]
pub struct MemGraph {
    content: Arc<Content>,
}

#[derive(Default)]
struct Content {
    triples: DashSet<Triple, FxBuildHasher>,
    by_subject: DashMap<Term, FxHashSet<Triple>, FxBuildHasher>,
    by_predicate: DashMap<NamedNode, FxHashSet<Triple>, FxBuildHasher>,
    by_object: DashMap<Term, FxHashSet<Triple>, FxBuildHasher>,
    len: AtomicUsize,
}

impl MemGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph that contains `triples`.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let graph = Self::new();
        graph.extend(triples);
        graph
    }

    /// Inserts `triple` and returns true if it was not already part of the graph.
    pub fn insert(&self, triple: Triple) -> bool {
        if self.content.triples.contains(&triple) {
            return false;
        }

        self.content
            .by_subject
            .entry(triple.subject.clone().into())
            .or_default()
            .insert(triple.clone());
        self.content
            .by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.content
            .by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.clone());

        // Concurrent inserts of the same triple may all reach this point, only one of them wins.
        if !self.content.triples.insert(triple) {
            return false;
        }
        self.content.len.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Inserts all `triples` and returns the number of newly inserted triples.
    pub fn extend(&self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .filter(|triple| self.insert(triple.clone()))
            .count()
    }

    /// Returns true if the graph contains `triple`.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.content.triples.contains(triple)
    }

    /// Returns the number of triples.
    pub fn len(&self) -> usize {
        self.content.len.load(Ordering::Acquire)
    }

    /// Returns true if the graph contains no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Candidates for MemGraph {
    fn with_subject(&self, subject: &Term) -> Vec<Triple> {
        self.content
            .by_subject
            .get(subject)
            .map(|triples| triples.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn with_predicate(&self, predicate: &NamedNode) -> Vec<Triple> {
        self.content
            .by_predicate
            .get(predicate)
            .map(|triples| triples.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn with_object(&self, object: &Term) -> Vec<Triple> {
        self.content
            .by_object
            .get(object)
            .map(|triples| triples.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn all(&self) -> Vec<Triple> {
        self.content.triples.iter().map(|t| t.key().clone()).collect()
    }
}

#[async_trait]
impl PathGraph for MemGraph {
    async fn evaluate_query(
        &self,
        query: &PathQuery,
        _context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        let solutions = evaluate_patterns(self, &query.patterns, &query.filters);
        tracing::trace!("Query {query} returned {} solutions", solutions.len());
        Ok(stream::iter(solutions.into_iter().map(Ok)).boxed())
    }

    async fn evaluate_bgp(
        &self,
        patterns: &[PathPattern],
        _context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError> {
        let solutions = evaluate_patterns(self, patterns, &[]);
        Ok(stream::iter(solutions.into_iter().map(Ok)).boxed())
    }
}

impl Debug for MemGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemGraph")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
