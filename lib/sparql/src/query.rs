use crate::ConversionError;
use apollo_compiler::ast::Document;
use std::borrow::Cow;

/// A GraphQL query, either as source text or as an already parsed document.
#[derive(Clone, Debug)]
pub enum GraphQlQuery {
    Text(String),
    Document(Document),
}

impl GraphQlQuery {
    /// Returns the parsed document, parsing the source text if necessary.
    pub fn document(&self) -> Result<Cow<'_, Document>, ConversionError> {
        match self {
            Self::Text(text) => Document::parse(text.as_str(), "query.graphql")
                .map(Cow::Owned)
                .map_err(|invalid| ConversionError::Syntax(invalid.errors.to_string())),
            Self::Document(document) => Ok(Cow::Borrowed(document)),
        }
    }
}

impl From<&str> for GraphQlQuery {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for GraphQlQuery {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Document> for GraphQlQuery {
    fn from(document: Document) -> Self {
        Self::Document(document)
    }
}
