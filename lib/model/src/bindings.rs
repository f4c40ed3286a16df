use oxrdf::{Term, Variable};
use rustc_hash::FxHashMap;

/// A set of variable bindings produced by a graph query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    values: FxHashMap<Variable, Term>,
}

impl Bindings {
    /// Returns the term bound to `variable`.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.values.get(variable)
    }

    /// Tries to bind `variable` to `term`.
    ///
    /// Returns false if the variable is already bound to a different term. In this case, the
    /// bindings are left untouched.
    pub fn bind(&mut self, variable: Variable, term: Term) -> bool {
        match self.values.get(&variable) {
            Some(existing) => existing == &term,
            None => {
                self.values.insert(variable, term);
                true
            }
        }
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    #[test]
    fn bind_rejects_conflicting_values() {
        let variable = Variable::new_unchecked("x");
        let a = Term::from(NamedNode::new_unchecked("http://example.com/a"));
        let b = Term::from(NamedNode::new_unchecked("http://example.com/b"));

        let mut bindings = Bindings::default();
        assert!(bindings.bind(variable.clone(), a.clone()));
        assert!(bindings.bind(variable.clone(), a.clone()));
        assert!(!bindings.bind(variable.clone(), b));
        assert_eq!(bindings.get(&variable), Some(&a));
        assert_eq!(bindings.len(), 1);
    }
}
