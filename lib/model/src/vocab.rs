//! Common RDF vocabularies (`rdf`, `rdfs`, `xsd`) re-exported from `oxrdf`.

pub use oxrdf::vocab::*;
