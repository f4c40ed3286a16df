use oxrdf::{Term, Variable};
use std::fmt::{Display, Formatter};

/// One end of a property path pattern (`subject path object`).
///
/// An endpoint is either a constant term that must match exactly or a variable that is bound by
/// the path evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathEndpoint {
    /// A constant RDF term.
    Term(Term),
    /// A free variable.
    Variable(Variable),
}

impl PathEndpoint {
    /// Returns the bound term, if this endpoint is a constant.
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            PathEndpoint::Term(term) => Some(term),
            PathEndpoint::Variable(_) => None,
        }
    }

    /// Returns the variable, if this endpoint is free.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            PathEndpoint::Term(_) => None,
            PathEndpoint::Variable(variable) => Some(variable),
        }
    }
}

impl Display for PathEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathEndpoint::Term(term) => write!(f, "{term}"),
            PathEndpoint::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

impl From<Term> for PathEndpoint {
    fn from(value: Term) -> Self {
        PathEndpoint::Term(value)
    }
}

impl From<oxrdf::NamedNode> for PathEndpoint {
    fn from(value: oxrdf::NamedNode) -> Self {
        PathEndpoint::Term(value.into())
    }
}

impl From<Variable> for PathEndpoint {
    fn from(value: Variable) -> Self {
        PathEndpoint::Variable(value)
    }
}
