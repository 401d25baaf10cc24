#![cfg(test)]
#![allow(clippy::panic_in_result_fn, reason = "Tests")]

use async_trait::async_trait;
use graphql_ld::jsonld::{ContextError, JsonLdContext};
use graphql_ld::model::{
    EngineOptions, GraphPattern, Literal, NamedNode, Query, QuerySolutions, ResultTree,
    SingularizeVariables, Term, Variable,
};
use graphql_ld::sparql::{ConversionError, ConvertOptions, GraphQlQuery};
use graphql_ld::tree::TreeError;
use graphql_ld::{
    Client, ClientError, ContextParser, EngineError, GraphQlQueryArgs, GraphQlToSparqlConverter,
    QueryArgs, QueryEngine, QueryRequest, SparqlResultsToTreeConverter,
};
use insta::assert_snapshot;
use serde_json::{json, Value};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Counts how often each collaborator is invoked.
#[derive(Clone, Default)]
struct Calls {
    parser: Arc<AtomicUsize>,
    converter: Arc<AtomicUsize>,
    engine: Arc<AtomicUsize>,
    tree: Arc<AtomicUsize>,
}

impl Calls {
    fn get(&self) -> [usize; 4] {
        [
            self.parser.load(Ordering::SeqCst),
            self.converter.load(Ordering::SeqCst),
            self.engine.load(Ordering::SeqCst),
            self.tree.load(Ordering::SeqCst),
        ]
    }
}

struct CountingParser {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl ContextParser for CountingParser {
    async fn parse(
        &self,
        context: &Value,
        base_iri: Option<&str>,
    ) -> Result<JsonLdContext, ContextError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            return Err(ContextError::Other("The context is unreachable".into()));
        }
        graphql_ld::jsonld::ContextParser::new().parse(context, base_iri)
    }
}

/// Wraps the default converter and records whether it received fresh options.
struct CountingConverter {
    calls: Arc<AtomicUsize>,
    fresh_options: Arc<Mutex<Vec<bool>>>,
    fail: bool,
}

#[async_trait]
impl GraphQlToSparqlConverter for CountingConverter {
    async fn graphql_to_sparql_algebra(
        &self,
        query: &GraphQlQuery,
        context: &JsonLdContext,
        options: &mut ConvertOptions,
    ) -> Result<Query, ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fresh_options.lock().unwrap().push(
            options.singularize_variables.is_empty() && options.variables_dict.is_empty(),
        );
        if self.fail {
            return Err(ConversionError::Other("The query is not supported".into()));
        }
        graphql_ld::sparql::Converter::default().graphql_to_sparql_algebra(query, context, options)
    }
}

/// A translator that always produces the same algebra and singularizes `name`.
struct FixedConverter;

#[async_trait]
impl GraphQlToSparqlConverter for FixedConverter {
    async fn graphql_to_sparql_algebra(
        &self,
        _query: &GraphQlQuery,
        _context: &JsonLdContext,
        options: &mut ConvertOptions,
    ) -> Result<Query, ConversionError> {
        options.singularize_variables.insert("name", true);
        Ok(name_algebra())
    }
}

struct CountingEngine {
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<Query>>>,
    fail: bool,
}

#[async_trait]
impl QueryEngine for CountingEngine {
    async fn query(
        &self,
        algebra: &Query,
        _options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(algebra.clone());
        if self.fail {
            return Err(EngineError::Other("The endpoint is down".into()));
        }
        Ok(alice())
    }
}

/// Binds every projected variable of the query to the same IRI in a single solution.
struct ProjectingEngine;

#[async_trait]
impl QueryEngine for ProjectingEngine {
    async fn query(
        &self,
        algebra: &Query,
        _options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError> {
        let variables = match algebra {
            Query::Select {
                pattern: GraphPattern::Project { variables, .. },
                ..
            } => variables.clone(),
            _ => return Err(EngineError::Other("Expected a projection".into())),
        };
        let alice = Term::from(NamedNode::new_unchecked("http://ex.org/alice"));
        let row = vec![Some(alice); variables.len()];
        Ok(QuerySolutions::from_rows(variables, [row]))
    }
}

struct CountingTreeConverter {
    calls: Arc<AtomicUsize>,
}

impl SparqlResultsToTreeConverter for CountingTreeConverter {
    fn sparql_results_to_tree(
        &self,
        solutions: &QuerySolutions,
        singularize: &SingularizeVariables,
    ) -> Result<ResultTree, TreeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        graphql_ld::tree::Converter::default().sparql_results_to_tree(solutions, singularize)
    }
}

#[derive(Default)]
struct Setup {
    failing_parser: bool,
    failing_converter: bool,
    failing_engine: bool,
    eager: bool,
}

struct Harness {
    client: Client,
    calls: Calls,
    queries: Arc<Mutex<Vec<Query>>>,
    fresh_options: Arc<Mutex<Vec<bool>>>,
}

fn harness(setup: Setup) -> Harness {
    let calls = Calls::default();
    let queries = Arc::default();
    let fresh_options = Arc::default();
    let client = Client::builder(
        context(),
        CountingEngine {
            calls: Arc::clone(&calls.engine),
            queries: Arc::clone(&queries),
            fail: setup.failing_engine,
        },
    )
    .with_context_parser(CountingParser {
        calls: Arc::clone(&calls.parser),
        fail: setup.failing_parser,
    })
    .with_converter(CountingConverter {
        calls: Arc::clone(&calls.converter),
        fresh_options: Arc::clone(&fresh_options),
        fail: setup.failing_converter,
    })
    .with_tree_converter(CountingTreeConverter {
        calls: Arc::clone(&calls.tree),
    })
    .with_eager_resolution(setup.eager)
    .build();
    Harness {
        client,
        calls,
        queries,
        fresh_options,
    }
}

fn context() -> Value {
    json!({ "name": "http://ex.org/name" })
}

fn name_algebra() -> Query {
    Query::parse("SELECT ?name WHERE { ?s <http://ex.org/name> ?name }", None).unwrap()
}

fn alice() -> QuerySolutions {
    QuerySolutions::from_rows(
        [Variable::new_unchecked("name")],
        [vec![Some(Literal::new_simple_literal("Alice").into())]],
    )
}

fn by_algebra() -> QueryArgs {
    QueryArgs::ByAlgebra {
        algebra: name_algebra(),
        singularize_variables: SingularizeVariables::from([("name", true)]),
        query_engine_options: None,
    }
}

#[tokio::test]
async fn context_is_resolved_once() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup::default());

    harness.client.query(QueryArgs::by_source("{ name }")).await?;
    harness.client.query(QueryArgs::by_source("{ name @single }")).await?;
    harness
        .client
        .graphql_to_sparql(GraphQlQueryArgs::new("{ name }"))
        .await?;

    assert_eq!(harness.calls.get(), [1, 3, 2, 2]);
    Ok(())
}

#[tokio::test]
async fn concurrent_calls_share_one_resolution() {
    let harness = harness(Setup {
        failing_parser: true,
        ..Setup::default()
    });

    let (first, second) = tokio::join!(
        harness.client.query(QueryArgs::by_source("{ name }")),
        harness.client.query(QueryArgs::by_source("{ name }")),
    );

    let (Err(ClientError::Context(first)), Err(ClientError::Context(second))) = (first, second)
    else {
        panic!("expected both calls to fail with the context error");
    };
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(harness.calls.get(), [1, 0, 0, 0]);
}

#[tokio::test]
async fn failed_resolution_is_memoized() {
    let harness = harness(Setup {
        failing_parser: true,
        ..Setup::default()
    });

    let first = harness.client.context().await;
    let second = harness.client.query(QueryArgs::by_source("{ name }")).await;

    let (Err(ClientError::Context(first)), Err(ClientError::Context(second))) = (first, second)
    else {
        panic!("expected both calls to fail with the context error");
    };
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        first.to_string(),
        ContextError::Other("The context is unreachable".into()).to_string()
    );
    assert_eq!(harness.calls.get(), [1, 0, 0, 0]);
}

#[tokio::test]
async fn eager_resolution_starts_at_construction() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup {
        eager: true,
        ..Setup::default()
    });

    for _ in 0..100 {
        if harness.calls.get()[0] == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(harness.calls.get(), [1, 0, 0, 0]);

    harness.client.query(QueryArgs::by_source("{ name }")).await?;
    assert_eq!(harness.calls.get(), [1, 1, 1, 1]);
    Ok(())
}

#[test]
fn eager_resolution_without_runtime_is_lazy() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup {
        eager: true,
        ..Setup::default()
    });
    assert_eq!(harness.calls.get(), [0, 0, 0, 0]);

    let context = tokio_test::block_on(harness.client.context())?;
    assert_eq!(context.expand_term("name").as_deref(), Some("http://ex.org/name"));
    assert_eq!(harness.calls.get(), [1, 0, 0, 0]);
    Ok(())
}

#[tokio::test]
async fn algebra_skips_resolution_and_translation() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup {
        failing_parser: true,
        ..Setup::default()
    });

    let result = harness.client.query(by_algebra()).await?;

    assert_eq!(result.data.to_json(), json!({ "name": "Alice" }));
    assert_eq!(harness.calls.get(), [0, 0, 1, 1]);
    Ok(())
}

#[tokio::test]
async fn translated_algebra_is_equivalent_to_source() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup::default());
    let query = "{ name @single }";

    let translated = harness
        .client
        .graphql_to_sparql(GraphQlQueryArgs::new(query))
        .await?;
    let by_algebra = harness.client.query(translated).await?;
    let by_source = harness.client.query(QueryArgs::by_source(query)).await?;

    assert_eq!(by_algebra, by_source);
    let queries = harness.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], queries[1]);
    Ok(())
}

#[tokio::test]
async fn translator_failures_are_passed_through() {
    let harness = harness(Setup {
        failing_converter: true,
        ..Setup::default()
    });

    let result = harness.client.query(QueryArgs::by_source("{ name }")).await;

    assert!(matches!(
        result,
        Err(ClientError::Conversion(ConversionError::Other(error)))
            if error.to_string() == "The query is not supported"
    ));
    assert_eq!(harness.calls.get(), [1, 1, 0, 0]);
}

#[tokio::test]
async fn engine_failures_are_passed_through() {
    let harness = harness(Setup {
        failing_engine: true,
        ..Setup::default()
    });

    let result = harness.client.query(QueryArgs::by_source("{ name }")).await;

    assert!(matches!(
        result,
        Err(ClientError::Engine(EngineError::Other(error)))
            if error.to_string() == "The endpoint is down"
    ));
    assert_eq!(harness.calls.get(), [1, 1, 1, 0]);
}

#[tokio::test]
async fn each_translation_gets_fresh_options() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup::default());

    harness
        .client
        .query(QueryArgs::by_source("query($x: String) { name @single }"))
        .await?;
    harness
        .client
        .query(QueryArgs::by_source("query($y: Int) { name @single }"))
        .await?;

    assert_eq!(*harness.fresh_options.lock().unwrap(), vec![true, true]);
    Ok(())
}

#[tokio::test]
async fn singular_name_scenario() -> Result<(), Box<dyn Error>> {
    let engine = CountingEngine {
        calls: Arc::default(),
        queries: Arc::default(),
        fail: false,
    };
    let client = Client::builder(context(), engine)
        .with_converter(FixedConverter)
        .build();

    let result = client.query(QueryArgs::by_source("{ name }")).await?;

    assert_snapshot!(serde_json::to_string(&result)?, @r#"{"data":{"name":"Alice"}}"#);
    Ok(())
}

#[tokio::test]
async fn default_collaborators() -> Result<(), Box<dyn Error>> {
    let queries = Arc::default();
    let engine = CountingEngine {
        calls: Arc::default(),
        queries: Arc::clone(&queries),
        fail: false,
    };
    let client = Client::new(context(), engine);

    let result = client.query(QueryArgs::by_source("{ name @single }")).await?;
    assert_snapshot!(serde_json::to_string(&result)?, @r#"{"data":{"name":"Alice"}}"#);

    let result = client.query(QueryArgs::by_source("{ name }")).await?;
    assert_snapshot!(serde_json::to_string(&result)?, @r#"{"data":{"name":["Alice"]}}"#);

    let missing = client.query(QueryArgs::by_source("{ name age }")).await;
    assert!(matches!(
        missing,
        Err(ClientError::Conversion(ConversionError::MissingContextEntry(term))) if term == "age"
    ));
    assert_eq!(queries.lock().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn id_fields_in_fragments_and_aliases_keep_their_keys() -> Result<(), Box<dyn Error>> {
    let client = Client::new(json!({ "@vocab": "http://ex.org/" }), ProjectingEngine);

    let result = client
        .query(QueryArgs::by_source("{ ... on Person { id } name }"))
        .await?;
    assert_snapshot!(
        serde_json::to_string(&result)?,
        @r#"{"data":{"id":["http://ex.org/alice"],"name":["http://ex.org/alice"]}}"#
    );

    let result = client
        .query(QueryArgs::by_source(
            "{ knows { ...Identified } } fragment Identified on Person { id }",
        ))
        .await?;
    assert_snapshot!(
        serde_json::to_string(&result)?,
        @r#"{"data":{"knows":[{"id":["http://ex.org/alice"]}]}}"#
    );

    let result = client.query(QueryArgs::by_source("{ a: id b: id }")).await?;
    assert_snapshot!(
        serde_json::to_string(&result)?,
        @r#"{"data":{"a":["http://ex.org/alice"],"b":["http://ex.org/alice"]}}"#
    );
    Ok(())
}

#[tokio::test]
async fn empty_requests_fail_before_any_collaborator() {
    let harness = harness(Setup {
        eager: false,
        ..Setup::default()
    });

    let result = harness.client.query(QueryRequest::default()).await;

    assert!(matches!(result, Err(ClientError::InvalidArgument(_))));
    assert_eq!(harness.calls.get(), [0, 0, 0, 0]);
}

#[tokio::test]
async fn json_requests() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup::default());

    let request: QueryRequest = serde_json::from_value(json!({
        "query": "query($n: String) { name(_: $n) @single }",
        "variables": { "n": "Alice" },
    }))?;
    let result = harness.client.query(request).await?;
    assert_eq!(result.data.to_json(), json!({ "name": "Alice" }));

    let request: QueryRequest = serde_json::from_value(json!({
        "sparqlAlgebra": "SELECT ?name WHERE { ?s <http://ex.org/name> ?name }",
        "singularizeVariables": { "name": true },
    }))?;
    let result = harness.client.query(request).await?;
    assert_eq!(result.data.to_json(), json!({ "name": "Alice" }));

    assert_eq!(harness.calls.get(), [1, 1, 2, 2]);
    Ok(())
}

#[tokio::test]
async fn graphql_to_sparql_returns_singularization() -> Result<(), Box<dyn Error>> {
    let harness = harness(Setup::default());

    let result = harness
        .client
        .graphql_to_sparql(GraphQlQueryArgs::new("{ name @single }"))
        .await?;

    assert!(result.singularize_variables.is_singular("name"));
    assert!(result.algebra.to_string().contains("<http://ex.org/name>"));
    assert_eq!(harness.calls.get(), [1, 1, 0, 0]);
    Ok(())
}
