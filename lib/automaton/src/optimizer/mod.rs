//! Passes that rewrite an [Automaton] into an equivalent, more compact one.

mod compression;
mod distinct_paths;
mod paths_merging;
mod states_merging;

pub use compression::PathsCompression;
pub use distinct_paths::DistinctPaths;
pub use paths_merging::PathsMerging;
pub use states_merging::StatesMerging;

use crate::{Automaton, AutomatonResult};
use std::fmt::Debug;
use std::sync::Arc;

/// A rewrite of an [Automaton] that preserves the set of accepted paths.
///
/// Passes are pure: they never modify their input and always return a new automaton.
pub trait AutomatonPass: Debug + Send + Sync {
    /// The name of the pass, used for logging.
    fn name(&self) -> &str;

    /// Rewrites the top-level structure of `automaton`.
    fn rewrite_automaton(&self, automaton: &Automaton) -> AutomatonResult<Automaton>;

    /// Rewrites `automaton` including the automata of its transitive transitions.
    fn rewrite(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let automaton = automaton.try_map_nested(|nested| self.rewrite(nested))?;
        self.rewrite_automaton(&automaton)
    }
}

/// Applies a list of [AutomatonPass]es in order.
#[derive(Clone, Debug)]
pub struct AutomatonOptimizer {
    passes: Vec<Arc<dyn AutomatonPass>>,
}

impl AutomatonOptimizer {
    /// Creates an optimizer without any passes.
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// Appends `pass` to the list of passes.
    #[must_use]
    pub fn with_pass(mut self, pass: Arc<dyn AutomatonPass>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn passes(&self) -> &[Arc<dyn AutomatonPass>] {
        &self.passes
    }

    /// Runs all passes on `automaton`.
    pub fn optimize(&self, automaton: &Automaton) -> AutomatonResult<Automaton> {
        let mut current = automaton.clone();
        for pass in &self.passes {
            let next = pass.rewrite(&current)?;
            next.validate()?;
            tracing::debug!(
                "Pass {}: {} -> {} states, {} -> {} transitions",
                pass.name(),
                current.states().len(),
                next.states().len(),
                current.transitions().len(),
                next.transitions().len()
            );
            current = next;
        }
        Ok(current)
    }
}

impl Default for AutomatonOptimizer {
    /// Creates the default chain: [PathsCompression], [StatesMerging], [PathsMerging], and
    /// [DistinctPaths].
    fn default() -> Self {
        Self::empty()
            .with_pass(Arc::new(PathsCompression))
            .with_pass(Arc::new(StatesMerging))
            .with_pass(Arc::new(PathsMerging))
            .with_pass(Arc::new(DistinctPaths))
    }
}
