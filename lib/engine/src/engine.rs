use crate::error::PathEvaluationError;
use crate::{evaluate_property_path, CompiledPropertyPath, PathEvaluationOptions, PathSolutionStream};
use futures::StreamExt;
use rdf_paths_common::{ExecutionContext, PathGraph};
use rdf_paths_model::{PathEndpoint, PropertyPathExpression, Term};
use std::sync::Arc;

/// Represents an instance of the property path engine.
///
/// An instance consists of:
/// - The graph that paths are evaluated against.
/// - An [ExecutionContext] that is forwarded to every graph query.
/// - The [PathEvaluationOptions] used for compiling and evaluating paths.
#[derive(Clone, Debug)]
pub struct PathEngine {
    graph: Arc<dyn PathGraph>,
    context: ExecutionContext,
    options: PathEvaluationOptions,
}

impl PathEngine {
    /// Creates a new [PathEngine] with the default configuration and the given `graph`.
    pub fn new(graph: Arc<dyn PathGraph>) -> Self {
        Self {
            graph,
            context: ExecutionContext::default(),
            options: PathEvaluationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PathEvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn graph(&self) -> &Arc<dyn PathGraph> {
        &self.graph
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn options(&self) -> &PathEvaluationOptions {
        &self.options
    }

    //
    // Querying
    //

    /// Compiles `path` with the options of this instance.
    pub fn compile(
        &self,
        path: &PropertyPathExpression,
    ) -> Result<CompiledPropertyPath, PathEvaluationError> {
        CompiledPropertyPath::compile(path, &self.options)
    }

    /// Evaluates the pattern `subject path object`.
    pub fn evaluate(
        &self,
        subject: impl Into<PathEndpoint>,
        path: &PropertyPathExpression,
        object: impl Into<PathEndpoint>,
    ) -> Result<PathSolutionStream, PathEvaluationError> {
        let path = self.compile(path)?;
        Ok(self.evaluate_compiled(subject, &path, object))
    }

    /// Evaluates the pattern `subject path object` for a path that has already been compiled.
    pub fn evaluate_compiled(
        &self,
        subject: impl Into<PathEndpoint>,
        path: &CompiledPropertyPath,
        object: impl Into<PathEndpoint>,
    ) -> PathSolutionStream {
        evaluate_property_path(
            Arc::clone(&self.graph),
            self.context.clone(),
            subject.into(),
            path,
            object.into(),
            self.options.clone(),
        )
    }

    /// Checks whether `object` can be reached from `subject` via `path`.
    pub async fn contains(
        &self,
        subject: Term,
        path: &PropertyPathExpression,
        object: Term,
    ) -> Result<bool, PathEvaluationError> {
        let options = self.options.clone().with_early_termination(true);
        let path = CompiledPropertyPath::compile(path, &options)?;
        let mut solutions = evaluate_property_path(
            Arc::clone(&self.graph),
            self.context.clone(),
            subject.into(),
            &path,
            object.into(),
            options,
        );
        match solutions.next().await {
            None => Ok(false),
            Some(solution) => solution.map(|_| true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use rdf_paths_model::{NamedNode, Triple, Variable};
    use rdf_paths_storage::memory::MemGraph;

    fn nn(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex/{name}"))
    }

    fn engine() -> PathEngine {
        let graph = MemGraph::from_triples([
            Triple::new(nn("a"), nn("p"), nn("b")),
            Triple::new(nn("b"), nn("p"), nn("c")),
        ]);
        PathEngine::new(Arc::new(graph))
    }

    #[tokio::test]
    async fn evaluate_path() {
        let path =
            PropertyPathExpression::OneOrMore(Box::new(PropertyPathExpression::NamedNode(nn("p"))));

        let solutions = engine()
            .evaluate(nn("a"), &path, Variable::new_unchecked("x"))
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(solutions.len(), 2);
    }

    #[tokio::test]
    async fn contains_reachable_nodes() {
        let engine = engine();
        let path =
            PropertyPathExpression::OneOrMore(Box::new(PropertyPathExpression::NamedNode(nn("p"))));

        assert!(engine
            .contains(nn("a").into(), &path, nn("c").into())
            .await
            .unwrap());
        assert!(!engine
            .contains(nn("c").into(), &path, nn("a").into())
            .await
            .unwrap());
    }
}
