//! An in-memory graph that implements [PathGraph](rdf_paths_common::PathGraph).
mod graph;
mod matcher;

pub use graph::MemGraph;
