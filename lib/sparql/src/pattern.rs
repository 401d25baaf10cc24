use graphql_ld_model::{Expression, GraphPattern, TriplePattern, Variable};

/// Collects the patterns of one (possibly optional) group of fields.
#[derive(Debug, Default)]
pub(crate) struct PatternBuilder {
    pub triples: Vec<TriplePattern>,
    /// Patterns that must be joined with the triples, e.g. `VALUES` clauses.
    pub joins: Vec<GraphPattern>,
    /// Patterns that are left-joined onto the group.
    pub optionals: Vec<GraphPattern>,
    /// Variables that are bound to the value of another variable.
    pub binds: Vec<(Variable, Variable)>,
}

impl PatternBuilder {
    pub fn build(self) -> GraphPattern {
        let mut pattern = GraphPattern::Bgp {
            patterns: self.triples,
        };
        for right in self.joins {
            pattern = GraphPattern::Join {
                left: Box::new(pattern),
                right: Box::new(right),
            };
        }
        for right in self.optionals {
            pattern = GraphPattern::LeftJoin {
                left: Box::new(pattern),
                right: Box::new(right),
                expression: None,
            };
        }
        for (variable, source) in self.binds {
            pattern = GraphPattern::Extend {
                inner: Box::new(pattern),
                variable,
                expression: Expression::Variable(source),
            };
        }
        pattern
    }
}
