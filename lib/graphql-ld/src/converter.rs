use async_trait::async_trait;
use graphql_ld_context::JsonLdContext;
use graphql_ld_model::{Query, QuerySolutions, ResultTree, SingularizeVariables};
use graphql_ld_sparql::{ConversionError, ConvertOptions, GraphQlQuery};
use graphql_ld_tree::TreeError;

/// Converts a GraphQL query into SPARQL algebra.
///
/// Implementations must record the result paths that have to be singularized in
/// `options.singularize_variables`.
#[async_trait]
pub trait GraphQlToSparqlConverter: Send + Sync {
    async fn graphql_to_sparql_algebra(
        &self,
        query: &GraphQlQuery,
        context: &JsonLdContext,
        options: &mut ConvertOptions,
    ) -> Result<Query, ConversionError>;
}

#[async_trait]
impl GraphQlToSparqlConverter for graphql_ld_sparql::Converter {
    async fn graphql_to_sparql_algebra(
        &self,
        query: &GraphQlQuery,
        context: &JsonLdContext,
        options: &mut ConvertOptions,
    ) -> Result<Query, ConversionError> {
        graphql_ld_sparql::Converter::graphql_to_sparql_algebra(self, query, context, options)
    }
}

/// Reshapes flat query solutions into a [`ResultTree`].
pub trait SparqlResultsToTreeConverter: Send + Sync {
    fn sparql_results_to_tree(
        &self,
        solutions: &QuerySolutions,
        singularize: &SingularizeVariables,
    ) -> Result<ResultTree, TreeError>;
}

impl SparqlResultsToTreeConverter for graphql_ld_tree::Converter {
    fn sparql_results_to_tree(
        &self,
        solutions: &QuerySolutions,
        singularize: &SingularizeVariables,
    ) -> Result<ResultTree, TreeError> {
        graphql_ld_tree::Converter::sparql_results_to_tree(self, solutions, singularize)
    }
}
