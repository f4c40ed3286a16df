use crate::{AutomatonError, NodeId, PathOperator, PropertyNode, SyntaxTree, SyntaxTreeBuilder};
use rdf_paths_model::PropertyPathExpression;

impl TryFrom<&PropertyPathExpression> for SyntaxTree {
    type Error = AutomatonError;

    /// Converts a property path of the SPARQL algebra into a [SyntaxTree].
    ///
    /// Binary sequences and alternatives are flattened into n-ary nodes. Negated property sets
    /// become a `!` node over a single forward property leaf; an inverse negated property set
    /// (`!(^p)`) is represented by spargebra as `^!(p)` and converted accordingly.
    fn try_from(value: &PropertyPathExpression) -> Result<Self, Self::Error> {
        let mut builder = SyntaxTreeBuilder::default();
        let root = convert(&mut builder, value);
        builder.finish(root)
    }
}

fn convert(builder: &mut SyntaxTreeBuilder, expression: &PropertyPathExpression) -> NodeId {
    match expression {
        PropertyPathExpression::NamedNode(node) => {
            builder.property(PropertyNode::forward(node.clone()))
        }
        PropertyPathExpression::Reverse(inner) => {
            let inner = convert(builder, inner);
            builder.path(PathOperator::Inverse, vec![inner])
        }
        PropertyPathExpression::Sequence(lhs, rhs) => {
            let lhs = convert(builder, lhs);
            let rhs = convert(builder, rhs);
            builder.flattened(PathOperator::Sequence, vec![lhs, rhs])
        }
        PropertyPathExpression::Alternative(lhs, rhs) => {
            let lhs = convert(builder, lhs);
            let rhs = convert(builder, rhs);
            builder.flattened(PathOperator::Alternative, vec![lhs, rhs])
        }
        PropertyPathExpression::ZeroOrMore(inner) => {
            let inner = convert(builder, inner);
            builder.path(PathOperator::ZeroOrMore, vec![inner])
        }
        PropertyPathExpression::OneOrMore(inner) => {
            let inner = convert(builder, inner);
            builder.path(PathOperator::OneOrMore, vec![inner])
        }
        PropertyPathExpression::ZeroOrOne(inner) => {
            let inner = convert(builder, inner);
            builder.path(PathOperator::ZeroOrOne, vec![inner])
        }
        PropertyPathExpression::NegatedPropertySet(nodes) => {
            let properties = builder.property(PropertyNode::new(nodes.iter().cloned(), false, false));
            builder.path(PathOperator::Negation, vec![properties])
        }
    }
}
