use crate::error::PathEvaluationError;
use crate::PathEvaluationOptions;
use rdf_paths_automaton::{preprocess, Automaton, AutomatonOptimizer, GlushkovBuilder, SyntaxTree};
use rdf_paths_model::PropertyPathExpression;
use std::sync::Arc;

/// A property path that has been compiled into automata.
///
/// The forward automaton is used when the search starts at the subject of a path pattern, the
/// backward automaton when it starts at the object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledPropertyPath {
    tree: SyntaxTree,
    forward: Arc<Automaton>,
    backward: Arc<Automaton>,
}

impl CompiledPropertyPath {
    /// Compiles a property path of the SPARQL algebra.
    pub fn compile(
        path: &PropertyPathExpression,
        options: &PathEvaluationOptions,
    ) -> Result<Self, PathEvaluationError> {
        Self::compile_tree(SyntaxTree::try_from(path)?, options)
    }

    /// Compiles a [SyntaxTree].
    pub fn compile_tree(
        tree: SyntaxTree,
        options: &PathEvaluationOptions,
    ) -> Result<Self, PathEvaluationError> {
        let forward = build_automaton(&tree, true, options)?;
        let backward = build_automaton(&tree, false, options)?;
        Ok(Self {
            tree,
            forward,
            backward,
        })
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn forward(&self) -> &Arc<Automaton> {
        &self.forward
    }

    pub fn backward(&self) -> &Arc<Automaton> {
        &self.backward
    }

    /// Returns true if the path matches the empty path.
    pub fn is_nullable(&self) -> bool {
        self.forward.is_nullable()
    }
}

fn build_automaton(
    tree: &SyntaxTree,
    forward: bool,
    options: &PathEvaluationOptions,
) -> Result<Arc<Automaton>, PathEvaluationError> {
    let normalized = preprocess(tree, forward)?;
    let automaton = GlushkovBuilder::build(&normalized)?;
    let automaton = if options.optimize {
        AutomatonOptimizer::default().optimize(&automaton)?
    } else {
        automaton
    };
    tracing::debug!(
        "Compiled {} automaton for {tree}: {} states, {} transitions",
        if forward { "forward" } else { "backward" },
        automaton.states().len(),
        automaton.transitions().len()
    );
    Ok(Arc::new(automaton))
}
