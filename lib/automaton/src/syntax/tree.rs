use crate::{AutomatonError, AutomatonResult, PathOperator};
use itertools::Itertools;
use rdf_paths_model::NamedNode;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// The maximum number of nodes of a [SyntaxTree]. Position `0` and `u32::MAX` are never used by a
/// node.
pub const MAX_TREE_NODES: usize = (u32::MAX - 1) as usize;

/// Identifies a node within a [SyntaxTree].
///
/// Nodes are stored in post-order. The position of a node (see [NodeId::position]) is its index
/// plus one, as position `0` is reserved for the initial state of the Glushkov automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the index of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns the Glushkov position of this node.
    ///
    /// [SyntaxTreeBuilder::finish] rejects trees with more than [MAX_TREE_NODES] nodes, so the
    /// position of a node in a [SyntaxTree] always fits into a `u32`.
    pub fn position(self) -> u32 {
        u32::try_from(self.0 + 1).unwrap_or(u32::MAX)
    }

    /// Returns the node that has the given Glushkov position.
    pub fn from_position(position: u32) -> Option<Self> {
        let position = usize::try_from(position).ok()?;
        position.checked_sub(1).map(NodeId)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.position())
    }
}

/// A leaf that matches a single edge whose predicate is one of `properties`.
///
/// If `negation` is set, the leaf matches any edge whose predicate is *not* one of `properties`.
/// If `inverse` is set, the edge is traversed from its object to its subject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyNode {
    properties: BTreeSet<NamedNode>,
    inverse: bool,
    negation: bool,
}

impl PropertyNode {
    /// Creates a new [PropertyNode].
    pub fn new(properties: impl IntoIterator<Item = NamedNode>, inverse: bool, negation: bool) -> Self {
        Self {
            properties: properties.into_iter().collect(),
            inverse,
            negation,
        }
    }

    /// Creates a leaf that traverses `property` in forward direction.
    pub fn forward(property: NamedNode) -> Self {
        Self::new([property], false, false)
    }

    /// Creates a leaf that traverses `property` in backward direction.
    pub fn backward(property: NamedNode) -> Self {
        Self::new([property], true, false)
    }

    pub fn properties(&self) -> &BTreeSet<NamedNode> {
        &self.properties
    }

    pub fn inverse(&self) -> bool {
        self.inverse
    }

    pub fn negation(&self) -> bool {
        self.negation
    }

    /// Returns a copy of this leaf with the given direction.
    #[must_use]
    pub fn with_inverse(&self, inverse: bool) -> Self {
        Self {
            properties: self.properties.clone(),
            inverse,
            negation: self.negation,
        }
    }
}

impl Display for PropertyNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        if self.negation {
            f.write_str("!")?;
        }
        if self.properties.len() == 1 {
            write!(f, "{}", self.properties.iter().join("|"))
        } else {
            write!(f, "({})", self.properties.iter().join("|"))
        }
    }
}

/// An inner node of the syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathNode {
    operator: PathOperator,
    items: Vec<NodeId>,
}

impl PathNode {
    pub fn operator(&self) -> PathOperator {
        self.operator
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }
}

/// A node of a property path syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxNode {
    Property(PropertyNode),
    Path(PathNode),
}

impl SyntaxNode {
    /// Returns the operator of the node or `None` for a property leaf.
    pub fn operator(&self) -> Option<PathOperator> {
        match self {
            SyntaxNode::Property(_) => None,
            SyntaxNode::Path(path) => Some(path.operator),
        }
    }

    /// Returns the children of the node.
    pub fn items(&self) -> &[NodeId] {
        match self {
            SyntaxNode::Property(_) => &[],
            SyntaxNode::Path(path) => &path.items,
        }
    }
}

/// A property path expression stored as an arena of [SyntaxNode]s.
///
/// The nodes are stored in post-order, i.e., children always precede their parent and the root is
/// the last node. Trees are immutable; rewriting a tree creates a new one with a
/// [SyntaxTreeBuilder].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    /// Creates a tree that consists of a single property leaf.
    pub fn property(node: PropertyNode) -> Self {
        Self {
            nodes: vec![SyntaxNode::Property(node)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given `id`.
    ///
    /// Panics if `id` has not been created for this tree.
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    /// Iterates over all nodes in post-order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns false, as a tree always has a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if any node uses `operator`.
    pub fn contains_operator(&self, operator: PathOperator) -> bool {
        self.nodes
            .iter()
            .any(|node| node.operator() == Some(operator))
    }

    fn fmt_node(&self, id: NodeId, f: &mut Formatter<'_>) -> std::fmt::Result {
        let path = match self.node(id) {
            SyntaxNode::Property(property) => return write!(f, "{property}"),
            SyntaxNode::Path(path) => path,
        };

        match path.operator {
            PathOperator::Inverse => {
                f.write_str("^")?;
                self.fmt_items(path, "", f)
            }
            PathOperator::ZeroOrMore | PathOperator::OneOrMore | PathOperator::ZeroOrOne => {
                self.fmt_items(path, "", f)?;
                f.write_str(path.operator.symbol())
            }
            PathOperator::Negation => {
                f.write_str("!(")?;
                self.fmt_items(path, "|", f)?;
                f.write_str(")")
            }
            PathOperator::Sequence | PathOperator::Alternative => {
                f.write_str("(")?;
                self.fmt_items(path, path.operator.symbol(), f)?;
                f.write_str(")")
            }
        }
    }

    fn fmt_items(&self, path: &PathNode, separator: &str, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, item) in path.items.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            self.fmt_node(*item, f)?;
        }
        Ok(())
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_node(self.root, f)
    }
}

/// Creates [SyntaxTree]s.
///
/// Nodes can be added in any order as long as children are added before their parents.
/// [SyntaxTreeBuilder::finish] renumbers the nodes reachable from the root in post-order and drops
/// all other nodes.
#[derive(Clone, Debug, Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTreeBuilder {
    /// Adds a property leaf.
    pub fn property(&mut self, node: PropertyNode) -> NodeId {
        self.push(SyntaxNode::Property(node))
    }

    /// Adds an inner node.
    pub fn path(&mut self, operator: PathOperator, items: Vec<NodeId>) -> NodeId {
        self.push(SyntaxNode::Path(PathNode { operator, items }))
    }

    /// Adds an n-ary node while splicing children that use the same operator into the new node.
    ///
    /// A single item is returned as is.
    pub fn flattened(&mut self, operator: PathOperator, items: Vec<NodeId>) -> NodeId {
        if items.len() == 1 {
            return items[0];
        }

        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match self.node(item) {
                Some(SyntaxNode::Path(path)) if path.operator == operator => {
                    flat.extend_from_slice(&path.items);
                }
                _ => flat.push(item),
            }
        }
        self.path(operator, flat)
    }

    /// Returns a node that has already been added.
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    /// Copies the subtree of `tree` rooted at `root` into this builder.
    pub fn copy_subtree(&mut self, tree: &SyntaxTree, root: NodeId) -> NodeId {
        match tree.node(root) {
            SyntaxNode::Property(property) => self.property(property.clone()),
            SyntaxNode::Path(path) => {
                let items = path
                    .items
                    .iter()
                    .map(|item| self.copy_subtree(tree, *item))
                    .collect();
                self.path(path.operator, items)
            }
        }
    }

    /// Validates the nodes reachable from `root` and returns them as a [SyntaxTree].
    pub fn finish(self, root: NodeId) -> AutomatonResult<SyntaxTree> {
        self.finish_with_limit(root, MAX_TREE_NODES)
    }

    fn finish_with_limit(self, root: NodeId, limit: usize) -> AutomatonResult<SyntaxTree> {
        let mut nodes = Vec::new();
        let root = self.renumber(root, None, limit, &mut nodes)?;
        Ok(SyntaxTree { nodes, root })
    }

    fn renumber(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        limit: usize,
        nodes: &mut Vec<SyntaxNode>,
    ) -> AutomatonResult<NodeId> {
        if parent.is_some_and(|parent| id >= parent) {
            return AutomatonError::malformed(
                id.index() + 1,
                "children must be created before their parent",
            );
        }

        let Some(node) = self.node(id) else {
            return AutomatonError::malformed(id.index() + 1, "unknown node");
        };

        let node = match node {
            SyntaxNode::Property(property) => {
                if property.properties.is_empty() {
                    return AutomatonError::malformed(
                        id.index() + 1,
                        "property set must not be empty",
                    );
                }
                SyntaxNode::Property(property.clone())
            }
            SyntaxNode::Path(path) => {
                if path.operator.is_unary() && path.items.len() != 1 {
                    return AutomatonError::malformed(
                        id.index() + 1,
                        format!(
                            "operator '{}' requires exactly one operand, got {}",
                            path.operator,
                            path.items.len()
                        ),
                    );
                }
                if path.items.is_empty() {
                    return AutomatonError::malformed(
                        id.index() + 1,
                        format!("operator '{}' requires at least one operand", path.operator),
                    );
                }

                let items = path
                    .items
                    .iter()
                    .map(|item| self.renumber(*item, Some(id), limit, nodes))
                    .collect::<AutomatonResult<Vec<_>>>()?;
                SyntaxNode::Path(PathNode {
                    operator: path.operator,
                    items,
                })
            }
        };

        if nodes.len() >= limit {
            return AutomatonError::malformed(
                id.index() + 1,
                format!("a path must not have more than {limit} nodes"),
            );
        }
        nodes.push(node);
        Ok(NodeId(nodes.len() - 1))
    }

    fn push(&mut self, node: SyntaxNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nn(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    #[test]
    fn finish_renumbers_in_post_order() {
        let mut builder = SyntaxTreeBuilder::default();
        let a = builder.property(PropertyNode::forward(nn("a")));
        let unused = builder.property(PropertyNode::forward(nn("unused")));
        let b = builder.property(PropertyNode::forward(nn("b")));
        let plus = builder.path(PathOperator::OneOrMore, vec![b]);
        let seq = builder.path(PathOperator::Sequence, vec![a, plus]);
        assert_ne!(unused, seq);

        let tree = builder.finish(seq).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().position(), 4);
        assert_eq!(tree.node(tree.root()).items().len(), 2);
        assert_eq!(
            tree.to_string(),
            "(<http://example.com/a>/<http://example.com/b>+)"
        );
    }

    #[test]
    fn finish_rejects_wrong_arity() {
        let mut builder = SyntaxTreeBuilder::default();
        let a = builder.property(PropertyNode::forward(nn("a")));
        let b = builder.property(PropertyNode::forward(nn("b")));
        let inverse = builder.path(PathOperator::Inverse, vec![a, b]);

        let result = builder.finish(inverse);
        assert!(matches!(result, Err(AutomatonError::MalformedNode { .. })));
    }

    #[test]
    fn finish_rejects_too_many_nodes() {
        let mut builder = SyntaxTreeBuilder::default();
        let a = builder.property(PropertyNode::forward(nn("a")));
        let b = builder.property(PropertyNode::forward(nn("b")));
        let seq = builder.path(PathOperator::Sequence, vec![a, b]);

        let result = builder.clone().finish_with_limit(seq, 2);
        assert!(matches!(
            result,
            Err(AutomatonError::MalformedNode { id: 3, .. })
        ));
        assert_eq!(builder.finish_with_limit(seq, 3).unwrap().len(), 3);
    }

    #[test]
    fn finish_rejects_empty_property_sets() {
        let mut builder = SyntaxTreeBuilder::default();
        let empty = builder.property(PropertyNode::new([], false, true));

        let result = builder.finish(empty);
        assert!(matches!(result, Err(AutomatonError::MalformedNode { .. })));
    }

    #[test]
    fn flattened_splices_nested_sequences() {
        let mut builder = SyntaxTreeBuilder::default();
        let a = builder.property(PropertyNode::forward(nn("a")));
        let b = builder.property(PropertyNode::forward(nn("b")));
        let c = builder.property(PropertyNode::backward(nn("c")));
        let inner = builder.flattened(PathOperator::Sequence, vec![a, b]);
        let outer = builder.flattened(PathOperator::Sequence, vec![inner, c]);

        let tree = builder.finish(outer).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(
            tree.to_string(),
            "(<http://example.com/a>/<http://example.com/b>/^<http://example.com/c>)"
        );
    }
}
