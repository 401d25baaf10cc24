use crate::{
    ClientError, ContextParser, ExecutionResult, GraphQlQueryArgs, GraphQlToSparqlConverter,
    GraphQlToSparqlResult, QueryArgs, QueryEngine, SparqlResultsToTreeConverter,
};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use graphql_ld_context::{ContextError, JsonLdContext};
use graphql_ld_sparql::{ConvertOptions, ConverterSettings};
use graphql_ld_tree::TreeConverterSettings;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The memoized resolution of the JSON-LD context.
type ContextFuture = Shared<BoxFuture<'static, Result<Arc<JsonLdContext>, Arc<ContextError>>>>;

/// A GraphQL-LD client.
///
/// The client resolves its JSON-LD context once, converts GraphQL queries into SPARQL algebra
/// using that context, executes the algebra with a [`QueryEngine`] and reshapes the solutions
/// into a tree that mirrors the GraphQL query.
///
/// ```no_run
/// use graphql_ld::{Client, QueryArgs, SparqlEndpointEngine};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let client = Client::new(
///     json!({ "name": "http://xmlns.com/foaf/0.1/name" }),
///     SparqlEndpointEngine::new("https://dbpedia.org/sparql"),
/// );
/// let result = client.query(QueryArgs::by_source("{ name @single }")).await?;
/// println!("{}", serde_json::to_string(&result)?);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
///
/// Clones of a client share the resolution of the context.
#[derive(Clone)]
pub struct Client {
    context: ContextFuture,
    converter: Arc<dyn GraphQlToSparqlConverter>,
    engine: Arc<dyn QueryEngine>,
    tree_converter: Arc<dyn SparqlResultsToTreeConverter>,
}

impl Client {
    /// Creates a client with the default collaborators.
    pub fn new(context: Value, engine: impl QueryEngine + 'static) -> Self {
        Self::builder(context, engine).build()
    }

    pub fn builder(context: Value, engine: impl QueryEngine + 'static) -> ClientBuilder {
        ClientBuilder {
            context,
            base_iri: None,
            engine: Arc::new(engine),
            context_parser: None,
            converter: None,
            tree_converter: None,
            eager: true,
        }
    }

    /// Returns the resolved JSON-LD context.
    ///
    /// The context is resolved at most once. All calls share the outcome of that resolution,
    /// including failures.
    pub async fn context(&self) -> Result<Arc<JsonLdContext>, ClientError> {
        self.context.clone().await.map_err(ClientError::Context)
    }

    /// Executes a query.
    ///
    /// GraphQL queries ([`QueryArgs::BySource`]) are converted into SPARQL algebra first. Algebra
    /// ([`QueryArgs::ByAlgebra`]) is executed as is, without resolving the context.
    pub async fn query(
        &self,
        args: impl TryInto<QueryArgs, Error = impl Into<ClientError>>,
    ) -> Result<ExecutionResult, ClientError> {
        let args = args.try_into().map_err(Into::into)?;
        let (algebra, singularize_variables, query_engine_options) = match args {
            QueryArgs::BySource {
                query,
                variables,
                query_engine_options,
            } => {
                let result = self
                    .graphql_to_sparql(GraphQlQueryArgs { query, variables })
                    .await?;
                (
                    result.algebra,
                    result.singularize_variables,
                    query_engine_options,
                )
            }
            QueryArgs::ByAlgebra {
                algebra,
                singularize_variables,
                query_engine_options,
            } => (algebra, singularize_variables, query_engine_options),
        };

        let solutions = self
            .engine
            .query(&algebra, query_engine_options.as_ref())
            .await?;
        debug!(solutions = solutions.len(), "Query engine returned solutions");

        let data = self
            .tree_converter
            .sparql_results_to_tree(&solutions, &singularize_variables)?;
        Ok(ExecutionResult { data })
    }

    /// Converts a GraphQL query into SPARQL algebra without executing it.
    ///
    /// The result can be executed later on by passing it to [`Client::query`].
    pub async fn graphql_to_sparql(
        &self,
        args: GraphQlQueryArgs,
    ) -> Result<GraphQlToSparqlResult, ClientError> {
        let context = self.context().await?;
        let mut options = ConvertOptions::new(args.variables);
        let algebra = self
            .converter
            .graphql_to_sparql_algebra(&args.query, &context, &mut options)
            .await?;
        debug!(%algebra, "Converted GraphQL query into SPARQL");
        Ok(GraphQlToSparqlResult {
            algebra,
            singularize_variables: options.singularize_variables,
        })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("context", &self.context.peek())
            .finish_non_exhaustive()
    }
}

/// Configures a [`Client`].
pub struct ClientBuilder {
    context: Value,
    base_iri: Option<String>,
    engine: Arc<dyn QueryEngine>,
    context_parser: Option<Arc<dyn ContextParser>>,
    converter: Option<Arc<dyn GraphQlToSparqlConverter>>,
    tree_converter: Option<Arc<dyn SparqlResultsToTreeConverter>>,
    eager: bool,
}

impl ClientBuilder {
    /// Sets the IRI that relative IRIs in the context are resolved against.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    #[must_use]
    pub fn with_context_parser(mut self, parser: impl ContextParser + 'static) -> Self {
        self.context_parser = Some(Arc::new(parser));
        self
    }

    #[must_use]
    pub fn with_converter(mut self, converter: impl GraphQlToSparqlConverter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    #[must_use]
    pub fn with_tree_converter(
        mut self,
        converter: impl SparqlResultsToTreeConverter + 'static,
    ) -> Self {
        self.tree_converter = Some(Arc::new(converter));
        self
    }

    /// Whether the context is resolved in the background as soon as the client is built.
    ///
    /// This requires a Tokio runtime. Without one, or if disabled, the context is resolved by the
    /// first call that needs it. Enabled by default.
    #[must_use]
    pub fn with_eager_resolution(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn build(self) -> Client {
        let parser = self
            .context_parser
            .unwrap_or_else(|| Arc::new(graphql_ld_context::ContextParser::new()));
        let raw_context = self.context;
        let base_iri = self.base_iri;
        let context = async move {
            let context = parser
                .parse(&raw_context, base_iri.as_deref())
                .await
                .map(Arc::new)
                .map_err(Arc::new);
            match &context {
                Ok(_) => debug!("Resolved JSON-LD context"),
                Err(error) => debug!(%error, "Failed to resolve JSON-LD context"),
            }
            context
        }
        .boxed()
        .shared();

        if self.eager {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(context.clone());
            }
        }

        Client {
            context,
            converter: self.converter.unwrap_or_else(|| {
                Arc::new(graphql_ld_sparql::Converter::new(ConverterSettings {
                    require_context: true,
                    ..ConverterSettings::default()
                }))
            }),
            engine: self.engine,
            tree_converter: self.tree_converter.unwrap_or_else(|| {
                Arc::new(graphql_ld_tree::Converter::new(TreeConverterSettings {
                    materialize_terms: true,
                    ..TreeConverterSettings::default()
                }))
            }),
        }
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("context", &self.context)
            .field("base_iri", &self.base_iri)
            .field("eager", &self.eager)
            .finish_non_exhaustive()
    }
}
