use crate::{
    AutomatonError, AutomatonResult, NodeId, PathOperator, PropertyNode, SyntaxNode, SyntaxTree,
    SyntaxTreeBuilder,
};
use rdf_paths_model::NamedNode;
use std::collections::BTreeSet;

/// Normalizes a [SyntaxTree] for the Glushkov construction.
///
/// The resulting tree only contains property leaves, sequences, alternatives, and closures:
/// - Inverse operators (`^`) are pushed down to the property leaves. Inverting a sequence reverses
///   the order of its items and a double inversion cancels out.
/// - Negated property sets (`!`) are rewritten into (at most) two negated property leaves, one for
///   the forward properties and one for the backward properties.
///
/// If `forward` is false, the whole path is inverted. Evaluating the resulting tree from the
/// object of a path pattern yields the same solutions as evaluating the original tree from its
/// subject.
pub fn preprocess(tree: &SyntaxTree, forward: bool) -> AutomatonResult<SyntaxTree> {
    let mut builder = SyntaxTreeBuilder::default();
    let root = rewrite(tree, tree.root(), !forward, &mut builder)?;
    builder.finish(root)
}

fn rewrite(
    tree: &SyntaxTree,
    id: NodeId,
    inverted: bool,
    builder: &mut SyntaxTreeBuilder,
) -> AutomatonResult<NodeId> {
    let path = match tree.node(id) {
        SyntaxNode::Property(property) => {
            let inverse = property.inverse() ^ inverted;
            return Ok(builder.property(property.with_inverse(inverse)));
        }
        SyntaxNode::Path(path) => path,
    };

    match path.operator() {
        PathOperator::Inverse => {
            let [item] = path.items() else {
                return AutomatonError::malformed(id.index() + 1, "'^' requires one operand");
            };
            rewrite(tree, *item, !inverted, builder)
        }
        PathOperator::Negation => rewrite_negation(tree, id, path.items(), inverted, builder),
        PathOperator::Sequence => {
            let mut items = rewrite_items(tree, path.items(), inverted, builder)?;
            if inverted {
                items.reverse();
            }
            Ok(builder.flattened(PathOperator::Sequence, items))
        }
        PathOperator::Alternative => {
            let items = rewrite_items(tree, path.items(), inverted, builder)?;
            Ok(builder.flattened(PathOperator::Alternative, items))
        }
        operator @ (PathOperator::ZeroOrMore | PathOperator::OneOrMore | PathOperator::ZeroOrOne) => {
            let items = rewrite_items(tree, path.items(), inverted, builder)?;
            Ok(builder.path(operator, items))
        }
    }
}

fn rewrite_items(
    tree: &SyntaxTree,
    items: &[NodeId],
    inverted: bool,
    builder: &mut SyntaxTreeBuilder,
) -> AutomatonResult<Vec<NodeId>> {
    items
        .iter()
        .map(|item| rewrite(tree, *item, inverted, builder))
        .collect()
}

/// Rewrites `!(p1 | ... | ^q1 | ...)` into `!(p1|...) | ^!(q1|...)`.
fn rewrite_negation(
    tree: &SyntaxTree,
    id: NodeId,
    items: &[NodeId],
    inverted: bool,
    builder: &mut SyntaxTreeBuilder,
) -> AutomatonResult<NodeId> {
    let mut forward = BTreeSet::new();
    let mut backward = BTreeSet::new();
    for item in items {
        collect_negated(tree, *item, false, &mut forward, &mut backward)?;
    }

    let mut leaves = Vec::with_capacity(2);
    if !forward.is_empty() {
        leaves.push(builder.property(PropertyNode::new(forward, inverted, true)));
    }
    if !backward.is_empty() {
        leaves.push(builder.property(PropertyNode::new(backward, !inverted, true)));
    }

    if leaves.is_empty() {
        return AutomatonError::malformed(id.index() + 1, "negated property set is empty");
    }
    Ok(builder.flattened(PathOperator::Alternative, leaves))
}

/// Collects the properties of a negated property set, split by direction.
fn collect_negated(
    tree: &SyntaxTree,
    id: NodeId,
    inverse: bool,
    forward: &mut BTreeSet<NamedNode>,
    backward: &mut BTreeSet<NamedNode>,
) -> AutomatonResult<()> {
    match tree.node(id) {
        SyntaxNode::Property(property) => {
            if property.negation() {
                return AutomatonError::malformed(
                    id.index() + 1,
                    "a negated property set must not contain negated properties",
                );
            }

            let target = if property.inverse() ^ inverse {
                backward
            } else {
                forward
            };
            target.extend(property.properties().iter().cloned());
            Ok(())
        }
        SyntaxNode::Path(path) => match path.operator() {
            PathOperator::Alternative => {
                for item in path.items() {
                    collect_negated(tree, *item, inverse, forward, backward)?;
                }
                Ok(())
            }
            PathOperator::Inverse => {
                for item in path.items() {
                    collect_negated(tree, *item, !inverse, forward, backward)?;
                }
                Ok(())
            }
            operator => AutomatonError::malformed(
                id.index() + 1,
                format!("operator '{operator}' is not allowed in a negated property set"),
            ),
        },
    }
}
