use crate::{
    Automaton, AutomatonError, AutomatonResult, ClosureKind, Instruction, NodeId, PathOperator,
    PropertyTransition, State, StateId, SyntaxNode, SyntaxTree, SyntaxTreeBuilder, Transition,
    TransitiveTransition,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The Glushkov attributes of every node of a preprocessed [SyntaxTree].
///
/// Positions are the property leaves and the closures (`*`, `+`, `?`) below the root. The subtree
/// of a closure position is not analyzed, as it is compiled into an automaton of its own. All
/// position sets contain [NodeId::position]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlushkovAttributes {
    nullable: Vec<bool>,
    first: Vec<BTreeSet<u32>>,
    last: Vec<BTreeSet<u32>>,
    follow: Vec<BTreeSet<u32>>,
    positions: Vec<NodeId>,
}

impl GlushkovAttributes {
    /// Computes the attributes of `tree`.
    ///
    /// The tree must be preprocessed, i.e., it must not contain `^` or `!` nodes.
    pub fn compute(tree: &SyntaxTree) -> AutomatonResult<Self> {
        let mut attributes = Self {
            nullable: vec![false; tree.len()],
            first: vec![BTreeSet::new(); tree.len()],
            last: vec![BTreeSet::new(); tree.len()],
            follow: vec![BTreeSet::new(); tree.len()],
            positions: Vec::new(),
        };
        attributes.visit(tree, tree.root(), true)?;
        attributes.positions.sort();
        Ok(attributes)
    }

    pub fn nullable(&self, id: NodeId) -> bool {
        self.nullable[id.index()]
    }

    pub fn first(&self, id: NodeId) -> &BTreeSet<u32> {
        &self.first[id.index()]
    }

    pub fn last(&self, id: NodeId) -> &BTreeSet<u32> {
        &self.last[id.index()]
    }

    /// Returns the positions that may directly follow the position `id`.
    pub fn follow(&self, id: NodeId) -> &BTreeSet<u32> {
        &self.follow[id.index()]
    }

    /// Returns all positions in ascending order.
    pub fn positions(&self) -> &[NodeId] {
        &self.positions
    }

    fn visit(&mut self, tree: &SyntaxTree, id: NodeId, is_root: bool) -> AutomatonResult<()> {
        let path = match tree.node(id) {
            SyntaxNode::Property(_) => {
                self.add_position(id, false);
                return Ok(());
            }
            SyntaxNode::Path(path) => path,
        };

        match path.operator() {
            operator @ (PathOperator::Inverse | PathOperator::Negation) => {
                AutomatonError::malformed(
                    id.index() + 1,
                    format!("operator '{operator}' must be removed by preprocessing"),
                )
            }
            operator if operator.is_closure() && !is_root => {
                let nullable = operator != PathOperator::OneOrMore || is_nullable(tree, id);
                self.add_position(id, nullable);
                Ok(())
            }
            operator @ (PathOperator::ZeroOrMore
            | PathOperator::OneOrMore
            | PathOperator::ZeroOrOne) => {
                let [child] = path.items() else {
                    return AutomatonError::malformed(
                        id.index() + 1,
                        "a closure requires one operand",
                    );
                };
                self.visit(tree, *child, false)?;

                let i = id.index();
                let c = child.index();
                self.nullable[i] = operator != PathOperator::OneOrMore || self.nullable[c];
                self.first[i] = self.first[c].clone();
                self.last[i] = self.last[c].clone();
                if operator != PathOperator::ZeroOrOne {
                    let (last, first) = (self.last[c].clone(), self.first[c].clone());
                    self.add_follow(&last, &first);
                }
                Ok(())
            }
            PathOperator::Alternative => {
                for item in path.items() {
                    self.visit(tree, *item, false)?;
                }

                let i = id.index();
                for item in path.items() {
                    let c = item.index();
                    let nullable = self.nullable[c];
                    self.nullable[i] |= nullable;
                    let (first, last) = (self.first[c].clone(), self.last[c].clone());
                    self.first[i].extend(first);
                    self.last[i].extend(last);
                }
                Ok(())
            }
            PathOperator::Sequence => {
                for item in path.items() {
                    self.visit(tree, *item, false)?;
                }
                self.visit_sequence(id, path.items());
                Ok(())
            }
        }
    }

    fn visit_sequence(&mut self, id: NodeId, items: &[NodeId]) {
        let i = id.index();
        self.nullable[i] = items.iter().all(|item| self.nullable[item.index()]);

        let mut first = BTreeSet::new();
        for item in items {
            first.extend(self.first[item.index()].iter().copied());
            if !self.nullable[item.index()] {
                break;
            }
        }
        self.first[i] = first;

        let mut last = BTreeSet::new();
        for item in items.iter().rev() {
            last.extend(self.last[item.index()].iter().copied());
            if !self.nullable[item.index()] {
                break;
            }
        }
        self.last[i] = last;

        for (index, item) in items.iter().enumerate() {
            let mut successors = BTreeSet::new();
            for next in &items[index + 1..] {
                successors.extend(self.first[next.index()].iter().copied());
                if !self.nullable[next.index()] {
                    break;
                }
            }
            let last = self.last[item.index()].clone();
            self.add_follow(&last, &successors);
        }
    }

    fn add_position(&mut self, id: NodeId, nullable: bool) {
        let i = id.index();
        self.nullable[i] = nullable;
        self.first[i] = BTreeSet::from([id.position()]);
        self.last[i] = BTreeSet::from([id.position()]);
        self.positions.push(id);
    }

    fn add_follow(&mut self, from: &BTreeSet<u32>, to: &BTreeSet<u32>) {
        for position in from {
            if let Some(node) = NodeId::from_position(*position) {
                self.follow[node.index()].extend(to.iter().copied());
            }
        }
    }
}

/// Returns whether the subtree rooted at `id` accepts the empty path.
fn is_nullable(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.node(id) {
        SyntaxNode::Property(_) => false,
        SyntaxNode::Path(path) => match path.operator() {
            PathOperator::ZeroOrMore | PathOperator::ZeroOrOne => true,
            PathOperator::Sequence => path.items().iter().all(|item| is_nullable(tree, *item)),
            PathOperator::Alternative => path.items().iter().any(|item| is_nullable(tree, *item)),
            PathOperator::OneOrMore | PathOperator::Inverse => {
                path.items().iter().all(|item| is_nullable(tree, *item))
            }
            PathOperator::Negation => false,
        },
    }
}

/// What a transition into a position matches.
enum PositionLabel {
    Instruction(Instruction),
    Closure(ClosureKind, Arc<Automaton>),
}

impl PositionLabel {
    fn transition(&self, from: StateId, to: StateId) -> Transition {
        match self {
            PositionLabel::Instruction(instruction) => Transition::Property(PropertyTransition {
                from,
                to,
                instruction: instruction.clone(),
            }),
            PositionLabel::Closure(kind, automaton) => {
                Transition::Transitive(TransitiveTransition {
                    from,
                    to,
                    kind: *kind,
                    automaton: Arc::clone(automaton),
                })
            }
        }
    }
}

/// Builds Glushkov position automata from preprocessed [SyntaxTree]s.
///
/// The automaton has one initial state (`0`) and one state per position, named after the
/// position. Every transition into a position matches the position's label: the instruction of a
/// property leaf or the nested automaton of a closure.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlushkovBuilder;

impl GlushkovBuilder {
    /// Builds the automaton of a top-level path.
    pub fn build(tree: &SyntaxTree) -> AutomatonResult<Automaton> {
        Self::build_automaton(tree, false)
    }

    /// Builds the automaton of a nested closure. The initial state of such an automaton is never
    /// final, as the empty path is handled by the enclosing automaton.
    pub fn build_embedded(tree: &SyntaxTree) -> AutomatonResult<Automaton> {
        Self::build_automaton(tree, true)
    }

    fn build_automaton(tree: &SyntaxTree, embedded: bool) -> AutomatonResult<Automaton> {
        let attributes = GlushkovAttributes::compute(tree)?;
        let root = tree.root();

        let labels = attributes
            .positions()
            .iter()
            .map(|position| Ok((*position, position_label(tree, *position)?)))
            .collect::<AutomatonResult<Vec<_>>>()?;
        let label = |position: u32| {
            labels
                .iter()
                .find(|(id, _)| id.position() == position)
                .map(|(_, label)| label)
                .ok_or_else(|| AutomatonError::UnknownState(StateId::new(position)))
        };

        let mut states = vec![State::initial(
            attributes.nullable(root) && !embedded,
        )];
        states.extend(attributes.positions().iter().map(|position| {
            State::new(
                StateId::new(position.position()),
                false,
                attributes.last(root).contains(&position.position()),
            )
        }));

        let mut transitions = Vec::new();
        for target in attributes.first(root) {
            transitions.push(label(*target)?.transition(StateId::INITIAL, StateId::new(*target)));
        }
        for position in attributes.positions() {
            let from = StateId::new(position.position());
            for target in attributes.follow(*position) {
                transitions.push(label(*target)?.transition(from, StateId::new(*target)));
            }
        }

        tracing::trace!(
            "Built Glushkov automaton with {} states and {} transitions for {tree}",
            states.len(),
            transitions.len()
        );
        Automaton::try_new(states, transitions)
    }
}

fn position_label(tree: &SyntaxTree, id: NodeId) -> AutomatonResult<PositionLabel> {
    let path = match tree.node(id) {
        SyntaxNode::Property(property) => {
            return Ok(PositionLabel::Instruction(Instruction::try_from(property)?));
        }
        SyntaxNode::Path(path) => path,
    };

    let [child] = path.items() else {
        return AutomatonError::malformed(id.index() + 1, "a closure requires one operand");
    };

    let mut builder = SyntaxTreeBuilder::default();
    let inner = builder.copy_subtree(tree, *child);
    let (kind, root) = match path.operator() {
        PathOperator::ZeroOrMore => (
            ClosureKind::ZeroOrMore,
            builder.path(PathOperator::OneOrMore, vec![inner]),
        ),
        PathOperator::OneOrMore => (
            ClosureKind::OneOrMore,
            builder.path(PathOperator::OneOrMore, vec![inner]),
        ),
        PathOperator::ZeroOrOne => (ClosureKind::ZeroOrOne, inner),
        operator => {
            return AutomatonError::malformed(
                id.index() + 1,
                format!("operator '{operator}' is not a position"),
            );
        }
    };

    let automaton = GlushkovBuilder::build_embedded(&builder.finish(root)?)?;
    Ok(PositionLabel::Closure(kind, Arc::new(automaton)))
}
