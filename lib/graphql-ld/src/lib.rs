//! [GraphQL-LD](https://comunica.github.io/Article-ISWC2018-Demo-GraphQlLD/) querying of Linked
//! Data.
//!
//! A [`Client`] translates GraphQL queries into SPARQL using a
//! [JSON-LD context](https://www.w3.org/TR/json-ld11/#the-context), executes them with a pluggable
//! [`QueryEngine`] and reshapes the solutions into a tree that mirrors the GraphQL query.
//!
//! ```
//! use async_trait::async_trait;
//! use graphql_ld::model::{EngineOptions, Literal, Query, QuerySolutions, Variable};
//! use graphql_ld::{Client, EngineError, QueryArgs, QueryEngine};
//! use serde_json::json;
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl QueryEngine for Fixed {
//!     async fn query(
//!         &self,
//!         _algebra: &Query,
//!         _options: Option<&EngineOptions>,
//!     ) -> Result<QuerySolutions, EngineError> {
//!         Ok(QuerySolutions::from_rows(
//!             [Variable::new_unchecked("name")],
//!             [vec![Some(Literal::new_simple_literal("Alice").into())]],
//!         ))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let client = Client::new(json!({ "name": "http://ex.org/name" }), Fixed);
//! let result = client.query(QueryArgs::by_source("{ name @single }")).await?;
//! assert_eq!(result.data.to_json(), json!({ "name": "Alice" }));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! # }).unwrap();
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod args;
mod client;
mod context;
mod converter;
pub mod engine;
mod error;

pub use args::{ExecutionResult, GraphQlQueryArgs, GraphQlToSparqlResult, QueryArgs, QueryRequest};
pub use client::{Client, ClientBuilder};
pub use context::ContextParser;
pub use converter::{GraphQlToSparqlConverter, SparqlResultsToTreeConverter};
#[cfg(feature = "http-client")]
pub use engine::SparqlEndpointEngine;
pub use engine::{EngineError, QueryEngine};
pub use error::ClientError;

pub mod model {
    pub use graphql_ld_model::*;
}

pub mod jsonld {
    pub use graphql_ld_context::*;
}

pub mod sparql {
    pub use graphql_ld_sparql::*;
}

pub mod tree {
    pub use graphql_ld_tree::*;
}
