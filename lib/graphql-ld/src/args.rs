use crate::ClientError;
use graphql_ld_model::{EngineOptions, Query, ResultTree, SingularizeVariables, Variables};
use graphql_ld_sparql::GraphQlQuery;
use serde::{Deserialize, Serialize};

/// The arguments of [`Client::query`](crate::Client::query).
#[derive(Clone, Debug)]
pub enum QueryArgs {
    /// A GraphQL query that is converted into SPARQL algebra before it is executed.
    BySource {
        query: GraphQlQuery,
        variables: Variables,
        query_engine_options: Option<EngineOptions>,
    },
    /// SPARQL algebra that is executed directly, e.g., the result of
    /// [`Client::graphql_to_sparql`](crate::Client::graphql_to_sparql).
    ByAlgebra {
        algebra: Query,
        singularize_variables: SingularizeVariables,
        query_engine_options: Option<EngineOptions>,
    },
}

impl QueryArgs {
    /// Creates arguments for a GraphQL query without variables.
    pub fn by_source(query: impl Into<GraphQlQuery>) -> Self {
        Self::BySource {
            query: query.into(),
            variables: Variables::new(),
            query_engine_options: None,
        }
    }

    /// Sets the options that are passed to the query engine.
    #[must_use]
    pub fn with_query_engine_options(mut self, options: EngineOptions) -> Self {
        match &mut self {
            Self::BySource {
                query_engine_options,
                ..
            }
            | Self::ByAlgebra {
                query_engine_options,
                ..
            } => *query_engine_options = Some(options),
        }
        self
    }
}

impl From<GraphQlToSparqlResult> for QueryArgs {
    fn from(result: GraphQlToSparqlResult) -> Self {
        Self::ByAlgebra {
            algebra: result.algebra,
            singularize_variables: result.singularize_variables,
            query_engine_options: None,
        }
    }
}

/// A loosely typed query request, e.g., deserialized from JSON.
///
/// ```json
/// { "query": "{ name }", "variables": {}, "queryEngineOptions": {} }
/// ```
///
/// Converting a request into [`QueryArgs`] fails if neither `query` nor `sparqlAlgebra` is given.
/// If both are given, `query` is used. The algebra is given in SPARQL syntax and requires
/// `singularizeVariables`, which may be an empty object.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: Option<String>,
    pub variables: Option<Variables>,
    pub sparql_algebra: Option<String>,
    pub singularize_variables: Option<SingularizeVariables>,
    pub query_engine_options: Option<EngineOptions>,
}

impl TryFrom<QueryRequest> for QueryArgs {
    type Error = ClientError;

    fn try_from(request: QueryRequest) -> Result<Self, Self::Error> {
        if let Some(query) = request.query {
            return Ok(Self::BySource {
                query: query.into(),
                variables: request.variables.unwrap_or_default(),
                query_engine_options: request.query_engine_options,
            });
        }
        let Some(algebra) = request.sparql_algebra else {
            return Err(ClientError::InvalidArgument(
                "Either a GraphQL query or SPARQL algebra must be given".to_owned(),
            ));
        };
        let Some(singularize_variables) = request.singularize_variables else {
            return Err(ClientError::InvalidArgument(
                "SPARQL algebra must be given together with singularizeVariables".to_owned(),
            ));
        };
        let algebra = Query::parse(&algebra, None).map_err(|error| {
            ClientError::InvalidArgument(format!("Invalid SPARQL algebra: {error}"))
        })?;
        Ok(Self::ByAlgebra {
            algebra,
            singularize_variables,
            query_engine_options: request.query_engine_options,
        })
    }
}

/// The arguments of [`Client::graphql_to_sparql`](crate::Client::graphql_to_sparql).
#[derive(Clone, Debug)]
pub struct GraphQlQueryArgs {
    pub query: GraphQlQuery,
    pub variables: Variables,
}

impl GraphQlQueryArgs {
    pub fn new(query: impl Into<GraphQlQuery>) -> Self {
        Self {
            query: query.into(),
            variables: Variables::new(),
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }
}

/// SPARQL algebra together with the result paths that must be singularized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphQlToSparqlResult {
    pub algebra: Query,
    pub singularize_variables: SingularizeVariables,
}

/// The result of [`Client::query`](crate::Client::query).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub data: ResultTree,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> QueryRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_requests_are_invalid() {
        assert!(matches!(
            QueryArgs::try_from(QueryRequest::default()),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn query_wins_over_algebra() {
        let args = QueryArgs::try_from(request(json!({
            "query": "{ name }",
            "variables": { "limit": 3 },
            "sparqlAlgebra": "SELECT * WHERE { ?s ?p ?o }",
        })));
        assert!(matches!(
            args,
            Ok(QueryArgs::BySource { variables, .. }) if variables.contains_key("limit")
        ));
    }

    #[test]
    fn algebra_is_parsed() {
        let args = QueryArgs::try_from(request(json!({
            "sparqlAlgebra": "SELECT ?name WHERE { ?s <http://ex.org/name> ?name }",
            "singularizeVariables": { "name": true },
            "queryEngineOptions": { "sources": [] },
        })));
        let Ok(QueryArgs::ByAlgebra {
            singularize_variables,
            query_engine_options,
            ..
        }) = args
        else {
            panic!("expected algebra arguments");
        };
        assert!(singularize_variables.is_singular("name"));
        assert_eq!(query_engine_options, Some(json!({ "sources": [] })));
    }

    #[test]
    fn invalid_algebra_is_an_invalid_argument() {
        let args = QueryArgs::try_from(request(json!({
            "sparqlAlgebra": "SELECT",
            "singularizeVariables": {},
        })));
        assert!(matches!(args, Err(ClientError::InvalidArgument(_))));
    }

    #[test]
    fn algebra_requires_singularize_variables() {
        let args = QueryArgs::try_from(request(json!({
            "sparqlAlgebra": "SELECT ?name WHERE { ?s <http://ex.org/name> ?name }",
        })));
        assert!(matches!(
            args,
            Err(ClientError::InvalidArgument(message)) if message.contains("singularizeVariables")
        ));

        let args = QueryArgs::try_from(request(json!({
            "sparqlAlgebra": "SELECT ?name WHERE { ?s <http://ex.org/name> ?name }",
            "singularizeVariables": {},
        })));
        assert!(matches!(
            args,
            Ok(QueryArgs::ByAlgebra { singularize_variables, .. }) if singularize_variables.is_empty()
        ));
    }
}
