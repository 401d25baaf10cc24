use async_trait::async_trait;
use graphql_ld_context::{ContextError, JsonLdContext};
use serde_json::Value;

/// Resolves a raw JSON-LD context document into a [`JsonLdContext`].
#[async_trait]
pub trait ContextParser: Send + Sync {
    /// Parses `context`, resolving relative IRIs against `base_iri`.
    async fn parse(
        &self,
        context: &Value,
        base_iri: Option<&str>,
    ) -> Result<JsonLdContext, ContextError>;
}

#[async_trait]
impl ContextParser for graphql_ld_context::ContextParser {
    async fn parse(
        &self,
        context: &Value,
        base_iri: Option<&str>,
    ) -> Result<JsonLdContext, ContextError> {
        graphql_ld_context::ContextParser::parse(self, context, base_iri)
    }
}
