//! Compiles SPARQL property path expressions into finite automata.
//!
//! The compilation consists of three steps:
//! 1. [preprocess] normalizes a [SyntaxTree]: inverse operators are pushed to the leaves and
//!    negated property sets are rewritten into negated property leaves.
//! 2. [GlushkovBuilder] computes the Glushkov position automaton of the normalized tree.
//! 3. [AutomatonOptimizer] compresses the automaton with a fixed chain of [AutomatonPass]es.

mod error;
mod glushkov;
mod model;
pub mod optimizer;
mod preprocess;
mod syntax;

pub use error::AutomatonError;
pub use glushkov::{GlushkovAttributes, GlushkovBuilder};
pub use model::*;
pub use optimizer::{AutomatonOptimizer, AutomatonPass};
pub use preprocess::preprocess;
pub use syntax::*;

/// The result type of automaton construction.
pub type AutomatonResult<T> = Result<T, AutomatonError>;
