use crate::engine::EngineError;
use graphql_ld_context::ContextError;
use graphql_ld_sparql::ConversionError;
use graphql_ld_tree::TreeError;
use std::convert::Infallible;
use std::sync::Arc;

/// An error raised by a [`Client`](crate::Client).
///
/// Errors of the collaborators are passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The JSON-LD context could not be resolved.
    ///
    /// The outcome of the resolution is shared by all calls of a client, hence the [`Arc`].
    #[error(transparent)]
    Context(Arc<ContextError>),
    /// The GraphQL query could not be converted into SPARQL algebra.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The query engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The solutions could not be reshaped into a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// The arguments of a call are invalid, e.g., neither a query nor algebra was given.
    #[error("{0}")]
    InvalidArgument(String),
}

impl From<Infallible> for ClientError {
    #[inline]
    fn from(error: Infallible) -> Self {
        match error {}
    }
}
