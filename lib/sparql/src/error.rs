use graphql_ld_model::{IriParseError, VariableNameParseError};
use std::error::Error;

/// An error raised while converting a GraphQL query into SPARQL algebra.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The GraphQL query is syntactically invalid.
    #[error("Invalid GraphQL query: {0}")]
    Syntax(String),
    /// The document does not contain an operation.
    #[error("The GraphQL document does not contain an operation")]
    NoOperation,
    /// The document contains more than one operation.
    #[error("The GraphQL document contains multiple operations, only a single one is supported")]
    MultipleOperations,
    /// The operation is not a query.
    #[error("The GraphQL operation type {0} is not supported")]
    UnsupportedOperation(&'static str),
    /// A field or argument has no entry in the JSON-LD context.
    #[error("No context entry was found for '{0}'")]
    MissingContextEntry(String),
    /// An IRI produced by the context is invalid.
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    /// A value could not be converted into an RDF literal.
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
    /// A result variable name is not a valid SPARQL variable name.
    #[error("Invalid variable name '{name}': {error}")]
    InvalidVariableName {
        name: String,
        #[source]
        error: VariableNameParseError,
    },
    /// A GraphQL variable is used without a value or a default value.
    #[error("The variable ${0} is not defined")]
    UndefinedVariable(String),
    /// A GraphQL value has no RDF counterpart.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
    /// A fragment spread references an unknown fragment.
    #[error("Unknown fragment '{0}'")]
    UnknownFragment(String),
    /// A fragment spreads itself.
    #[error("The fragment '{0}' spreads itself")]
    FragmentCycle(String),
    /// A directive is used with invalid arguments.
    #[error("Invalid usage of the @{directive} directive: {reason}")]
    InvalidDirective {
        directive: String,
        reason: &'static str,
    },
    /// An error raised by a custom converter.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}
