use crate::context::{LanguageMapping, TermDefinition, TypeMapping};
use crate::{ContextError, JsonLdContext};
use oxiri::Iri;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Tracks which terms of a local context are being defined (`false`) or are defined (`true`).
type Defined = HashMap<String, bool>;

/// Processes JSON-LD contexts into a [`JsonLdContext`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextParser;

impl ContextParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a serialized JSON-LD context.
    pub fn parse_str(
        &self,
        context: &str,
        base_iri: Option<&str>,
    ) -> Result<JsonLdContext, ContextError> {
        self.parse(&serde_json::from_str(context)?, base_iri)
    }

    /// Processes `context`.
    ///
    /// The context can be a context object, an object with a `@context` entry, or an array of
    /// those. Relative IRIs are resolved against `base_iri`.
    pub fn parse(
        &self,
        context: &Value,
        base_iri: Option<&str>,
    ) -> Result<JsonLdContext, ContextError> {
        let base_iri = base_iri
            .map(|iri| {
                Iri::parse(iri.to_owned()).map_err(|error| ContextError::InvalidBaseIri {
                    iri: iri.to_owned(),
                    error,
                })
            })
            .transpose()?;

        let mut active = JsonLdContext {
            base_iri: base_iri.clone(),
            ..JsonLdContext::default()
        };
        self.process(&mut active, context, base_iri.as_ref())?;
        Ok(active)
    }

    fn process(
        &self,
        active: &mut JsonLdContext,
        context: &Value,
        base_iri: Option<&Iri<String>>,
    ) -> Result<(), ContextError> {
        match context {
            Value::Null => {
                *active = JsonLdContext {
                    base_iri: base_iri.cloned(),
                    ..JsonLdContext::default()
                };
                Ok(())
            }
            Value::Array(contexts) => contexts
                .iter()
                .try_for_each(|context| self.process(active, context, base_iri)),
            Value::Object(local) => match local.get("@context") {
                Some(inner) => self.process(active, inner, base_iri),
                None => self.process_local(active, local),
            },
            Value::String(iri) => Err(ContextError::RemoteContext(iri.clone())),
            other => Err(ContextError::InvalidLocalContext(other.to_string())),
        }
    }

    fn process_local(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
    ) -> Result<(), ContextError> {
        if let Some(version) = local.get("@version") {
            if version.as_f64() != Some(1.1) {
                return Err(ContextError::InvalidVersion(version.to_string()));
            }
        }
        if local.contains_key("@import") {
            return Err(ContextError::UnsupportedKeyword("@import"));
        }

        if let Some(base) = local.get("@base") {
            active.base_iri = match base {
                Value::Null => None,
                Value::String(iri) => Some(resolve_iri(active.base_iri.as_ref(), iri)?),
                other => return Err(invalid_keyword_value("@base", other)),
            };
        }
        if let Some(vocab) = local.get("@vocab") {
            active.vocab = match vocab {
                Value::Null => None,
                Value::String(vocab) => Some(expand_vocab_mapping(active, vocab)?),
                other => return Err(invalid_keyword_value("@vocab", other)),
            };
        }
        if let Some(language) = local.get("@language") {
            active.language = match language {
                Value::Null => None,
                Value::String(language) => Some(language.to_ascii_lowercase()),
                other => return Err(invalid_keyword_value("@language", other)),
            };
        }
        for keyword in ["@protected", "@propagate"] {
            match local.get(keyword) {
                None | Some(Value::Bool(_)) => {}
                Some(other) => return Err(invalid_keyword_value(keyword, other)),
            }
        }

        let mut defined = Defined::new();
        for term in local.keys().filter(|key| !key.starts_with('@')) {
            self.create_term_definition(active, local, term, &mut defined)?;
        }

        for (key, value) in local {
            active.raw.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn create_term_definition(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut Defined,
    ) -> Result<(), ContextError> {
        match defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => return Err(ContextError::CyclicIriMapping(term.to_owned())),
            None => {}
        }
        defined.insert(term.to_owned(), false);

        let definition = match local.get(term) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(TermDefinition::new(
                self.expand_id(active, local, term, id, defined)?,
            )),
            Some(Value::Object(definition)) => {
                self.create_expanded_term_definition(active, local, term, definition, defined)?
            }
            Some(_) => return Err(ContextError::InvalidTermDefinition(term.to_owned())),
        };

        active.terms.insert(term.to_owned(), definition);
        defined.insert(term.to_owned(), true);
        Ok(())
    }

    fn create_expanded_term_definition(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
        term: &str,
        definition: &Map<String, Value>,
        defined: &mut Defined,
    ) -> Result<Option<TermDefinition>, ContextError> {
        let mut result = if let Some(reverse) = definition.get("@reverse") {
            if definition.contains_key("@id") {
                return Err(ContextError::InvalidTermDefinition(term.to_owned()));
            }
            let Value::String(reverse) = reverse else {
                return Err(invalid_keyword_value("@reverse", reverse));
            };
            let mut result = TermDefinition::new(self.expand_iri(active, local, reverse, defined)?);
            result.reverse = true;
            result
        } else {
            match definition.get("@id") {
                Some(Value::Null) => return Ok(None),
                Some(Value::String(id)) => {
                    TermDefinition::new(self.expand_id(active, local, term, id, defined)?)
                }
                Some(other) => return Err(invalid_keyword_value("@id", other)),
                None => TermDefinition::new(self.expand_implicit_id(active, local, term, defined)?),
            }
        };

        if let Some(type_mapping) = definition.get("@type") {
            let Value::String(type_mapping) = type_mapping else {
                return Err(ContextError::InvalidTypeMapping(term.to_owned()));
            };
            result.type_mapping = Some(match type_mapping.as_str() {
                "@id" => TypeMapping::Id,
                "@vocab" => TypeMapping::Vocab,
                "@json" => TypeMapping::Json,
                "@none" => TypeMapping::None,
                keyword if keyword.starts_with('@') => {
                    return Err(ContextError::InvalidTypeMapping(term.to_owned()))
                }
                datatype => {
                    TypeMapping::Datatype(self.expand_iri(active, local, datatype, defined)?)
                }
            });
        }

        if let Some(language) = definition.get("@language") {
            result.language = match language {
                Value::Null => LanguageMapping::NoLanguage,
                Value::String(language) => LanguageMapping::Tag(language.to_ascii_lowercase()),
                other => return Err(invalid_keyword_value("@language", other)),
            };
        }

        if let Some(container) = definition.get("@container") {
            result.container = match container {
                Value::Null => Vec::new(),
                Value::String(container) => vec![container.clone()],
                Value::Array(containers) => containers
                    .iter()
                    .map(|container| match container {
                        Value::String(container) => Ok(container.clone()),
                        other => Err(invalid_keyword_value("@container", other)),
                    })
                    .collect::<Result<_, _>>()?,
                other => return Err(invalid_keyword_value("@container", other)),
            };
        }

        Ok(Some(result))
    }

    /// Expands the `@id` of `term`. A term may map to itself if a vocabulary mapping exists.
    fn expand_id(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
        term: &str,
        id: &str,
        defined: &mut Defined,
    ) -> Result<String, ContextError> {
        if id == term && !id.contains(':') {
            return active
                .vocab
                .as_ref()
                .map(|vocab| format!("{vocab}{term}"))
                .ok_or_else(|| ContextError::InvalidIriMapping(term.to_owned()));
        }
        self.expand_iri(active, local, id, defined)
    }

    /// Derives the IRI of a term without an `@id`.
    fn expand_implicit_id(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut Defined,
    ) -> Result<String, ContextError> {
        if term.contains(':') {
            return self.expand_iri(active, local, term, defined);
        }
        active
            .vocab
            .as_ref()
            .map(|vocab| format!("{vocab}{term}"))
            .ok_or_else(|| ContextError::InvalidIriMapping(term.to_owned()))
    }

    /// Vocabulary-relative IRI expansion.
    fn expand_iri(
        &self,
        active: &mut JsonLdContext,
        local: &Map<String, Value>,
        value: &str,
        defined: &mut Defined,
    ) -> Result<String, ContextError> {
        if value.starts_with('@') {
            return Ok(value.to_owned());
        }

        if local.contains_key(value) {
            self.create_term_definition(active, local, value, defined)?;
        }
        if let Some(definition) = active.terms.get(value) {
            return definition
                .as_ref()
                .map(|definition| definition.iri.clone())
                .ok_or_else(|| ContextError::InvalidIriMapping(value.to_owned()));
        }

        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Ok(value.to_owned());
            }
            if local.contains_key(prefix) {
                self.create_term_definition(active, local, prefix, defined)?;
            }
            if let Some(Some(definition)) = active.terms.get(prefix) {
                return Ok(format!("{}{suffix}", definition.iri));
            }
            return Ok(value.to_owned());
        }

        active
            .vocab
            .as_ref()
            .map(|vocab| format!("{vocab}{value}"))
            .ok_or_else(|| ContextError::InvalidIriMapping(value.to_owned()))
    }
}

/// Expands the value of `@vocab` using the current active context.
fn expand_vocab_mapping(active: &JsonLdContext, vocab: &str) -> Result<String, ContextError> {
    if let Some((prefix, suffix)) = vocab.split_once(':') {
        if let Some(Some(definition)) = active.terms.get(prefix) {
            return Ok(format!("{}{suffix}", definition.iri));
        }
        if Iri::parse(vocab).is_ok() {
            return Ok(vocab.to_owned());
        }
    }
    if let Some(current) = &active.vocab {
        return Ok(format!("{current}{vocab}"));
    }
    if let Some(base) = &active.base_iri {
        return base
            .resolve(vocab)
            .map(Iri::into_inner)
            .map_err(|_| ContextError::InvalidIriMapping(vocab.to_owned()));
    }
    Err(ContextError::InvalidIriMapping(vocab.to_owned()))
}

fn resolve_iri(base: Option<&Iri<String>>, iri: &str) -> Result<Iri<String>, ContextError> {
    match base {
        Some(base) => base.resolve(iri),
        None => Iri::parse(iri.to_owned()),
    }
    .map_err(|error| ContextError::InvalidBaseIri {
        iri: iri.to_owned(),
        error,
    })
}

fn invalid_keyword_value(keyword: &'static str, value: &Value) -> ContextError {
    ContextError::InvalidKeywordValue {
        keyword,
        value: value.to_string(),
    }
}
