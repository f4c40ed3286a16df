use itertools::Itertools;
use rdf_paths_model::{NamedNode, PathEndpoint, Term, Variable};
use std::fmt::{Display, Formatter};

/// The predicate position of a [PathPattern].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredicatePattern {
    /// A constant predicate.
    NamedNode(NamedNode),
    /// A variable that binds the predicate of the matched triple.
    Variable(Variable),
}

impl Display for PredicatePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicatePattern::NamedNode(node) => write!(f, "{node}"),
            PredicatePattern::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

/// A single triple pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathPattern {
    pub subject: PathEndpoint,
    pub predicate: PredicatePattern,
    pub object: PathEndpoint,
}

impl PathPattern {
    /// Creates a new [PathPattern].
    pub fn new(
        subject: impl Into<PathEndpoint>,
        predicate: PredicatePattern,
        object: impl Into<PathEndpoint>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// Whether a [PropertyFilter] keeps or removes the listed properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// The bound predicate must be one of the properties.
    OneOf,
    /// The bound predicate must not be any of the properties. This is used for negated property
    /// sets.
    NoneOf,
}

/// Restricts the values of a predicate variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyFilter {
    pub variable: Variable,
    pub properties: Vec<NamedNode>,
    pub mode: FilterMode,
}

impl PropertyFilter {
    /// Returns whether `term` passes this filter.
    pub fn accepts(&self, term: &Term) -> bool {
        let contained = self
            .properties
            .iter()
            .any(|property| *term == Term::NamedNode(property.clone()));
        match self.mode {
            FilterMode::OneOf => contained,
            FilterMode::NoneOf => !contained,
        }
    }
}

impl Display for PropertyFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operator = match self.mode {
            FilterMode::OneOf => "IN",
            FilterMode::NoneOf => "NOT IN",
        };
        write!(
            f,
            "{} {operator} ({})",
            self.variable,
            self.properties.iter().join(", ")
        )
    }
}

/// A conjunctive query over a graph.
///
/// All patterns must match jointly and every filter must accept the value of its variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathQuery {
    pub patterns: Vec<PathPattern>,
    pub filters: Vec<PropertyFilter>,
}

impl PathQuery {
    /// Returns true if the query has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Display for PathQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.patterns.iter().join(" . "))?;
        if !self.filters.is_empty() {
            write!(f, " FILTER {}", self.filters.iter().join(" && "))?;
        }
        Ok(())
    }
}
