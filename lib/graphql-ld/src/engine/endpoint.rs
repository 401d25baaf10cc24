use crate::engine::{EngineError, QueryEngine};
use async_trait::async_trait;
use graphql_ld_model::{EngineOptions, Query, QueryResultsFormat, QuerySolutions};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::trace;

/// A [`QueryEngine`] that sends queries to a remote
/// [SPARQL endpoint](https://www.w3.org/TR/sparql11-protocol/).
///
/// Queries are sent as `POST` requests. The engine options may hold a `headers` object whose
/// entries are added to every request:
/// ```json
/// { "headers": { "Authorization": "Bearer ..." } }
/// ```
#[derive(Clone, Debug)]
pub struct SparqlEndpointEngine {
    client: reqwest::Client,
    endpoint: String,
}

impl SparqlEndpointEngine {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Creates an engine that uses a pre-configured HTTP client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryEngine for SparqlEndpointEngine {
    async fn query(
        &self,
        algebra: &Query,
        options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError> {
        let mut request = self
            .client
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, "application/sparql-query")
            .header(ACCEPT, "application/sparql-results+json")
            .body(algebra.to_string());

        if let Some(headers) = options.and_then(|options| options.get("headers")) {
            let headers = headers.as_object().ok_or_else(|| {
                EngineError::InvalidOptions("headers must be an object".to_owned())
            })?;
            for (name, value) in headers {
                let Value::String(value) = value else {
                    return Err(EngineError::InvalidOptions(format!(
                        "the value of the header {name} must be a string"
                    )));
                };
                request = request.header(name.as_str(), value.as_str());
            }
        }

        trace!(endpoint = %self.endpoint, query = %algebra, "Sending SPARQL query");
        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        QuerySolutions::read(body.as_ref(), QueryResultsFormat::Json)?
            .ok_or_else(|| EngineError::UnexpectedResults("a boolean".to_owned()))
    }
}
