//! Contains the interfaces that the property path core consumes from its environment.
//!
//! The property path engine does not own any data. It accesses a graph through the [PathGraph]
//! trait and forwards an opaque [ExecutionContext] with every request.

mod context;
pub mod error;
mod graph;
mod query;

pub use context::ExecutionContext;
pub use graph::{BindingStream, PathGraph};
pub use query::{FilterMode, PathPattern, PathQuery, PredicatePattern, PropertyFilter};
