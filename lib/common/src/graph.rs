use crate::error::StorageError;
use crate::{ExecutionContext, PathPattern, PathQuery};
use async_trait::async_trait;
use futures::stream::BoxStream;
use rdf_paths_model::Bindings;
use std::fmt::Debug;

/// A stream of variable bindings. The stream either completes or terminates with an error.
pub type BindingStream = BoxStream<'static, Result<Bindings, StorageError>>;

/// The graph that property paths are evaluated against.
///
/// # Consistency
///
/// A single path evaluation issues many queries against the same graph. It is the responsibility
/// of the implementation to ensure that these queries observe the same state, for example, by
/// using a snapshot identified through the [ExecutionContext].
#[async_trait]
pub trait PathGraph: Debug + Send + Sync {
    /// Evaluates a conjunctive query with optional property filters and returns a stream of all
    /// solutions.
    ///
    /// Each solution binds every variable of the query's patterns. Solutions may contain
    /// duplicates.
    async fn evaluate_query(
        &self,
        query: &PathQuery,
        context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError>;

    /// Evaluates a basic graph pattern.
    ///
    /// This is used to enumerate all nodes of the graph, for example, when computing the
    /// reflexive closure of a path whose endpoints are both unbound.
    async fn evaluate_bgp(
        &self,
        patterns: &[PathPattern],
        context: &ExecutionContext,
    ) -> Result<BindingStream, StorageError>;
}
