use oxrdf::Term;
use std::fmt::{Display, Formatter};

/// A solution of a property path evaluation.
///
/// Property path results describe an implicit, derived edge between `subject` and `object`. Hence,
/// there is no single RDF predicate and the triple only carries both endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathTriple {
    /// The start of the path.
    pub subject: Term,
    /// The end of the path.
    pub object: Term,
}

impl PathTriple {
    /// Creates a new [PathTriple].
    pub fn new(subject: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
        }
    }

    /// Returns a triple with `subject` and `object` swapped.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            subject: self.object,
            object: self.subject,
        }
    }
}

impl Display for PathTriple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.subject, self.object)
    }
}
