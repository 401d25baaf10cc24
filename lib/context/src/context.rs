use oxiri::Iri;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A processed JSON-LD context.
///
/// Besides the processed term definitions, the context keeps the raw (merged) context object
/// that it was created from.
#[derive(Clone, Debug, Default)]
pub struct JsonLdContext {
    pub(crate) raw: Map<String, Value>,
    pub(crate) base_iri: Option<Iri<String>>,
    pub(crate) vocab: Option<String>,
    pub(crate) language: Option<String>,
    /// A `None` definition marks a term that was explicitly mapped to `null`.
    pub(crate) terms: HashMap<String, Option<TermDefinition>>,
}

impl JsonLdContext {
    /// Returns the raw context. If multiple contexts were processed, later entries override
    /// earlier ones.
    pub fn context_raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn base_iri(&self) -> Option<&Iri<String>> {
        self.base_iri.as_ref()
    }

    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    /// Returns the default language of the context.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns the definition of `term`, if the term is defined and not mapped to `null`.
    pub fn term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term).and_then(Option::as_ref)
    }

    /// Returns the language that applies to string values of `term`.
    pub fn language_of(&self, term: &str) -> Option<&str> {
        match self.term(term).map(|definition| &definition.language) {
            Some(LanguageMapping::Tag(language)) => Some(language),
            Some(LanguageMapping::NoLanguage) => None,
            Some(LanguageMapping::Default) | None => self.language(),
        }
    }

    /// Expands `term` to an IRI.
    ///
    /// Terms are looked up in the term definitions first. Compact IRIs (`prefix:suffix`) are
    /// expanded using the definition of their prefix. Otherwise, the term is appended to the
    /// vocabulary mapping (`@vocab`), if there is one. Terms that are explicitly mapped to `null`
    /// are never expanded.
    pub fn expand_term(&self, term: &str) -> Option<String> {
        if let Some(definition) = self.terms.get(term) {
            return definition.as_ref().map(|d| d.iri.clone());
        }
        if let Some((prefix, suffix)) = term.split_once(':') {
            if let Some(Some(definition)) = self.terms.get(prefix) {
                return Some(format!("{}{suffix}", definition.iri));
            }
            if prefix != "_" {
                return Some(term.to_owned());
            }
        }
        self.vocab.as_ref().map(|vocab| format!("{vocab}{term}"))
    }
}

/// The definition of a single term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermDefinition {
    pub(crate) iri: String,
    pub(crate) reverse: bool,
    pub(crate) type_mapping: Option<TypeMapping>,
    pub(crate) language: LanguageMapping,
    pub(crate) container: Vec<String>,
}

impl TermDefinition {
    pub(crate) fn new(iri: String) -> Self {
        Self {
            iri,
            reverse: false,
            type_mapping: None,
            language: LanguageMapping::Default,
            container: Vec::new(),
        }
    }

    /// The IRI the term maps to.
    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// Whether the term was defined with `@reverse`.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn type_mapping(&self) -> Option<&TypeMapping> {
        self.type_mapping.as_ref()
    }

    pub fn container(&self) -> &[String] {
        &self.container
    }
}

/// The `@type` of a term definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeMapping {
    /// `@id`: string values are IRIs.
    Id,
    /// `@vocab`: string values are terms or IRIs.
    Vocab,
    /// `@json`
    Json,
    /// `@none`
    None,
    /// String values are literals of the given datatype.
    Datatype(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LanguageMapping {
    Default,
    NoLanguage,
    Tag(String),
}
