/// Options for property path evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathEvaluationOptions {
    /// Whether the optimizer passes run after the automaton construction.
    pub optimize: bool,
    /// Whether the search of an origin stops once a bound object has been reached.
    pub early_termination: bool,
    /// The maximum number of transitions that a search follows from its origin. Deeper states
    /// are not expanded.
    pub max_search_depth: Option<usize>,
    /// The maximum number of closures that are evaluated within each other.
    pub max_nesting_depth: usize,
    /// The maximum number of entries in the visited set of a single search.
    pub max_visited: Option<usize>,
}

impl PathEvaluationOptions {
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    #[must_use]
    pub fn with_early_termination(mut self, early_termination: bool) -> Self {
        self.early_termination = early_termination;
        self
    }

    #[must_use]
    pub fn with_max_search_depth(mut self, max_search_depth: Option<usize>) -> Self {
        self.max_search_depth = max_search_depth;
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    #[must_use]
    pub fn with_max_visited(mut self, max_visited: Option<usize>) -> Self {
        self.max_visited = max_visited;
        self
    }
}

impl Default for PathEvaluationOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            early_termination: true,
            max_search_depth: None,
            max_nesting_depth: 32,
            max_visited: None,
        }
    }
}
