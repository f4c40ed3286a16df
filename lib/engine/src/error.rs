use rdf_paths_automaton::AutomatonError;
use rdf_paths_common::error::StorageError;

/// A path evaluation error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PathEvaluationError {
    /// Error from the underlying graph.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The path could not be compiled into an automaton.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    /// Closures are nested deeper than allowed.
    #[error("Nested closures exceed the maximum nesting depth of {limit}")]
    NestingTooDeep { limit: usize },
    /// A single search reached more states than allowed.
    #[error("The search visited more than {limit} states")]
    VisitLimitExceeded { limit: usize },
    /// Internal invariant violated.
    #[error("An internal error that likely indicates towards a bug in RDF Paths: {0}")]
    InternalError(String),
}

impl PathEvaluationError {
    /// Returns an [PathEvaluationError::InternalError] with the given `cause`.
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(Self::InternalError(cause.into()))
    }
}
