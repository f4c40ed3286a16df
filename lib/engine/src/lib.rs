//! Evaluates compiled property paths against a [PathGraph](rdf_paths_common::PathGraph).
//!
//! A path is first compiled into a [CompiledPropertyPath] that holds one automaton for each
//! evaluation direction. [evaluate_property_path] then walks the automaton against the graph in
//! breadth-first order and streams every distinct `(subject, object)` pair that is connected by
//! the path.

mod compile;
mod engine;
pub mod error;
mod options;
mod search;

pub use compile::CompiledPropertyPath;
pub use engine::PathEngine;
pub use options::PathEvaluationOptions;
pub use search::{evaluate_property_path, PathSolutionStream, SearchState, VisitedSet};
