use std::sync::Arc;

/// Opaque information about the query that is currently evaluated.
///
/// The property path engine never inspects the context. It is forwarded unchanged to every
/// [PathGraph](crate::PathGraph) call so that graph implementations can, for example, pick a
/// snapshot or attribute costs to a query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// An optional label of the query.
    query_label: Option<Arc<str>>,
}

impl ExecutionContext {
    /// Creates a new context with the given query label.
    pub fn with_query_label(label: impl Into<Arc<str>>) -> Self {
        Self {
            query_label: Some(label.into()),
        }
    }

    /// Returns the query label.
    pub fn query_label(&self) -> Option<&str> {
        self.query_label.as_deref()
    }
}
