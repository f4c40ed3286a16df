use crate::AutomatonError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The operators of SPARQL property paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathOperator {
    /// `a / b`
    Sequence,
    /// `a | b`
    Alternative,
    /// `^a`
    Inverse,
    /// `!(a | ^b)`
    Negation,
    /// `a*`
    ZeroOrMore,
    /// `a+`
    OneOrMore,
    /// `a?`
    ZeroOrOne,
}

impl PathOperator {
    /// Returns the SPARQL symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            PathOperator::Sequence => "/",
            PathOperator::Alternative => "|",
            PathOperator::Inverse => "^",
            PathOperator::Negation => "!",
            PathOperator::ZeroOrMore => "*",
            PathOperator::OneOrMore => "+",
            PathOperator::ZeroOrOne => "?",
        }
    }

    /// Returns true for `*`, `+`, and `?`.
    pub fn is_closure(self) -> bool {
        matches!(
            self,
            PathOperator::ZeroOrMore | PathOperator::OneOrMore | PathOperator::ZeroOrOne
        )
    }

    /// Returns true if the operator takes exactly one operand.
    pub fn is_unary(self) -> bool {
        self.is_closure() || self == PathOperator::Inverse
    }
}

impl FromStr for PathOperator {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "/" => PathOperator::Sequence,
            "|" => PathOperator::Alternative,
            "^" => PathOperator::Inverse,
            "!" => PathOperator::Negation,
            "*" => PathOperator::ZeroOrMore,
            "+" => PathOperator::OneOrMore,
            "?" => PathOperator::ZeroOrOne,
            _ => return Err(AutomatonError::UnknownPathOperator(s.to_owned())),
        })
    }
}

impl Display for PathOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
