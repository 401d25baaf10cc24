use oxiri::IriParseError;
use std::error::Error;

/// An error raised while processing a JSON-LD context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ContextError {
    /// The context could not be read as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The context references a remote context.
    #[error("The remote context <{0}> can not be loaded, only inline contexts are supported")]
    RemoteContext(String),
    /// The context is neither an object, an array nor `null`.
    #[error("Invalid local context: {0}")]
    InvalidLocalContext(String),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    /// A keyword has a value of the wrong kind.
    #[error("Invalid value for {keyword}: {value}")]
    InvalidKeywordValue {
        keyword: &'static str,
        value: String,
    },
    /// The context declares an unsupported `@version`.
    #[error("Unsupported JSON-LD version {0}, only 1.1 is supported")]
    InvalidVersion(String),
    /// The context uses a keyword that is not supported.
    #[error("The keyword {0} is not supported")]
    UnsupportedKeyword(&'static str),
    /// The definition of a term is neither `null`, a string nor an object.
    #[error("Invalid term definition for '{0}'")]
    InvalidTermDefinition(String),
    /// The `@type` of a term definition is invalid.
    #[error("Invalid type mapping for '{0}'")]
    InvalidTypeMapping(String),
    /// A value could not be expanded to an IRI.
    #[error("Could not expand '{0}' to an IRI")]
    InvalidIriMapping(String),
    /// The definition of a term depends on itself.
    #[error("Cyclic IRI mapping detected for term '{0}'")]
    CyclicIriMapping(String),
    /// An error raised by a custom context parser.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}
