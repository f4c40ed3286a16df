//! The data model shared by all RDF Paths crates.
//!
//! Most RDF types are re-exported from Oxigraph's `oxrdf` and `spargebra` crates so that the rest
//! of the workspace does not depend on them directly.

mod bindings;
mod endpoint;
mod solution;
pub mod vocab;

pub use bindings::Bindings;
pub use endpoint::PathEndpoint;
pub use solution::PathTriple;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Subject, SubjectRef,
    Term, TermRef, Triple, TripleRef, Variable, VariableRef,
};

// Re-export the property path algebra of spargebra.
pub use spargebra::algebra::PropertyPathExpression;
