use crate::{AutomatonError, AutomatonResult, PropertyNode};
use itertools::Itertools;
use rdf_paths_model::NamedNode;
use std::fmt::{Display, Formatter};

/// A single edge-matching rule.
///
/// An instruction matches an edge whose predicate is one of `properties`. If `negation` is set,
/// it matches edges whose predicate is *not* one of `properties` instead. If `inverse` is set, the
/// edge is traversed from its object to its subject.
///
/// The properties are kept sorted and free of duplicates such that equal rules compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instruction {
    properties: Vec<NamedNode>,
    inverse: bool,
    negation: bool,
}

impl Instruction {
    /// Creates a new [Instruction].
    ///
    /// Returns an error if `properties` is empty.
    pub fn try_new(
        properties: impl IntoIterator<Item = NamedNode>,
        inverse: bool,
        negation: bool,
    ) -> AutomatonResult<Self> {
        let properties = properties.into_iter().sorted().dedup().collect_vec();
        if properties.is_empty() {
            return Err(AutomatonError::EmptyInstruction);
        }

        Ok(Self {
            properties,
            inverse,
            negation,
        })
    }

    /// Creates an instruction that traverses a single property in forward direction.
    pub fn forward(property: NamedNode) -> Self {
        Self {
            properties: vec![property],
            inverse: false,
            negation: false,
        }
    }

    /// Creates an instruction that traverses a single property in backward direction.
    pub fn backward(property: NamedNode) -> Self {
        Self {
            properties: vec![property],
            inverse: true,
            negation: false,
        }
    }

    pub fn properties(&self) -> &[NamedNode] {
        &self.properties
    }

    pub fn inverse(&self) -> bool {
        self.inverse
    }

    pub fn negation(&self) -> bool {
        self.negation
    }

    /// Returns the property if this instruction matches exactly one predicate.
    pub fn single_property(&self) -> Option<&NamedNode> {
        match self.properties.as_slice() {
            [property] if !self.negation => Some(property),
            _ => None,
        }
    }
}

impl TryFrom<&PropertyNode> for Instruction {
    type Error = AutomatonError;

    fn try_from(value: &PropertyNode) -> Result<Self, Self::Error> {
        Self::try_new(
            value.properties().iter().cloned(),
            value.inverse(),
            value.negation(),
        )
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        if self.negation {
            f.write_str("!")?;
        }
        match self.properties.as_slice() {
            [property] => write!(f, "{property}"),
            properties => write!(f, "({})", properties.iter().join("|")),
        }
    }
}
