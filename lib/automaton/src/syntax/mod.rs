mod convert;
mod operator;
mod tree;

pub use operator::PathOperator;
pub use tree::{
    NodeId, PathNode, PropertyNode, SyntaxNode, SyntaxTree, SyntaxTreeBuilder, MAX_TREE_NODES,
};
