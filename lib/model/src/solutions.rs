use oxrdf::{Term, Variable};
use sparesults::{
    QueryResultsFormat, QueryResultsParseError, QueryResultsParser, QuerySolution,
    ReaderQueryResultsParserOutput,
};
use std::io::Read;
use std::sync::Arc;

/// A flat, tabular set of [SPARQL solutions](https://www.w3.org/TR/sparql11-query/#defn_sparqlSolutionSequence).
///
/// This is what a query engine returns before the solutions are reshaped into a tree.
#[derive(Debug, PartialEq, Eq)]
pub struct QuerySolutions {
    variables: Arc<[Variable]>,
    solutions: Vec<QuerySolution>,
}

impl QuerySolutions {
    /// Creates a new set of solutions. Every solution should be bound to `variables`.
    pub fn new(variables: impl Into<Arc<[Variable]>>, solutions: Vec<QuerySolution>) -> Self {
        Self {
            variables: variables.into(),
            solutions,
        }
    }

    /// Creates a new set of solutions from rows of values, one value per variable.
    ///
    /// ```
    /// use graphql_ld_model::{Literal, QuerySolutions, Variable};
    ///
    /// let solutions = QuerySolutions::from_rows(
    ///     [Variable::new_unchecked("name")],
    ///     [vec![Some(Literal::new_simple_literal("Alice").into())]],
    /// );
    /// assert_eq!(solutions.len(), 1);
    /// ```
    pub fn from_rows(
        variables: impl Into<Arc<[Variable]>>,
        rows: impl IntoIterator<Item = Vec<Option<Term>>>,
    ) -> Self {
        let variables = variables.into();
        let solutions = rows
            .into_iter()
            .map(|row| QuerySolution::from((Arc::clone(&variables), row)))
            .collect();
        Self {
            variables,
            solutions,
        }
    }

    /// Reads a SPARQL query results serialization.
    ///
    /// Returns [`None`] if the serialization holds a boolean result instead of solutions.
    pub fn read(
        reader: impl Read,
        format: QueryResultsFormat,
    ) -> Result<Option<Self>, QueryResultsParseError> {
        match QueryResultsParser::from_format(format).for_reader(reader)? {
            ReaderQueryResultsParserOutput::Solutions(parser) => {
                let variables: Arc<[Variable]> = parser.variables().into();
                let solutions = parser.collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Self {
                    variables,
                    solutions,
                }))
            }
            ReaderQueryResultsParserOutput::Boolean(_) => Ok(None),
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuerySolution> {
        self.solutions.iter()
    }
}

impl<'a> IntoIterator for &'a QuerySolutions {
    type Item = &'a QuerySolution;
    type IntoIter = std::slice::Iter<'a, QuerySolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for QuerySolutions {
    type Item = QuerySolution;
    type IntoIter = std::vec::IntoIter<QuerySolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}
