//! Execution of SPARQL algebra.

#[cfg(feature = "http-client")]
mod endpoint;

#[cfg(feature = "http-client")]
pub use endpoint::SparqlEndpointEngine;

use async_trait::async_trait;
use graphql_ld_model::{EngineOptions, Query, QueryResultsParseError, QuerySolutions};
use std::error::Error;
use std::sync::Arc;

/// Executes SPARQL queries and returns their solutions.
///
/// The `options` are passed through from the caller of
/// [`Client::query`](crate::Client::query) without any interpretation.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(
        &self,
        algebra: &Query,
        options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError>;
}

#[async_trait]
impl<T: QueryEngine + ?Sized> QueryEngine for Arc<T> {
    async fn query(
        &self,
        algebra: &Query,
        options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError> {
        self.as_ref().query(algebra, options).await
    }
}

/// An error raised by a [`QueryEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request to a SPARQL endpoint failed.
    #[cfg(feature = "http-client")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The query results could not be parsed.
    #[error(transparent)]
    ResultsParsing(#[from] QueryResultsParseError),
    /// The engine returned something else than solutions, e.g., a boolean.
    #[error("Expected query solutions but the engine returned {0}")]
    UnexpectedResults(String),
    /// The engine options are not understood by the engine.
    #[error("Invalid query engine options: {0}")]
    InvalidOptions(String),
    /// Any other error of a custom engine.
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}
