use crate::pattern::PatternBuilder;
use crate::value::ArgumentValue;
use crate::{ConversionError, ConvertOptions, GraphQlQuery, VariableDefinition};
use apollo_compiler::ast::{
    self, Definition, DirectiveList, Field, FragmentDefinition, OperationType, Selection,
};
use graphql_ld_context::{JsonLdContext, TermDefinition, TypeMapping};
use graphql_ld_model::vocab::{rdf, xsd};
use graphql_ld_model::{
    GraphPattern, GroundTerm, Literal, NamedNode, NamedNodePattern, NamedNodeRef, Query,
    SingularizeVariables, TermPattern, TriplePattern, Variable, Variables,
};
use std::collections::HashMap;

/// The variable holding the subject of the root selection set if it has no `id` field. It starts
/// with a digit so that it can not clash with a variable derived from GraphQL names.
const ROOT_SUBJECT: &str = "0";
const ID_FIELD: &str = "id";
const TYPENAME_FIELD: &str = "__typename";
const VALUE_ARGUMENT: &str = "_";

/// Settings of a [`Converter`].
#[derive(Clone, Debug)]
pub struct ConverterSettings {
    /// Whether a field without an entry in the context fails the conversion. Otherwise, the field
    /// name itself must be an absolute IRI.
    pub require_context: bool,
    /// Joins the path segments of result variables.
    pub variable_delimiter: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            require_context: false,
            variable_delimiter: "_".to_owned(),
        }
    }
}

/// Converts GraphQL queries into SPARQL `SELECT` queries.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    settings: ConverterSettings,
}

impl Converter {
    pub fn new(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    /// Converts `query` into SPARQL algebra.
    ///
    /// The result paths that must be singularized and the variable definitions of the operation
    /// are written into `options`.
    pub fn graphql_to_sparql_algebra(
        &self,
        query: &GraphQlQuery,
        context: &JsonLdContext,
        options: &mut ConvertOptions,
    ) -> Result<Query, ConversionError> {
        let document = query.document()?;

        let mut operations = document.definitions.iter().filter_map(|definition| match definition {
            Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        });
        let operation = operations.next().ok_or(ConversionError::NoOperation)?;
        if operations.next().is_some() {
            return Err(ConversionError::MultipleOperations);
        }
        match operation.operation_type {
            OperationType::Query => {}
            OperationType::Mutation => return Err(ConversionError::UnsupportedOperation("mutation")),
            OperationType::Subscription => {
                return Err(ConversionError::UnsupportedOperation("subscription"))
            }
        }

        for definition in &operation.variables {
            options.variables_dict.insert(
                definition.name.as_str().to_owned(),
                VariableDefinition {
                    ty: definition.ty.to_string(),
                    default_value: definition.default_value.clone(),
                },
            );
        }

        let fragments = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::FragmentDefinition(fragment) => {
                    Some((fragment.name.as_str(), &**fragment))
                }
                _ => None,
            })
            .collect();

        let mut conversion = Conversion {
            settings: &self.settings,
            context,
            fragments,
            variables: &options.variables,
            variables_dict: &options.variables_dict,
            singularize: &mut options.singularize_variables,
            projection: Vec::new(),
            spreads: Vec::new(),
        };

        let mut builder = PatternBuilder::default();
        let subject = TermPattern::Variable(conversion.subject(&[], &operation.selection_set)?);
        conversion.selection_set(&mut builder, &subject, &[], &operation.selection_set, false)?;

        Ok(Query::Select {
            dataset: None,
            pattern: GraphPattern::Project {
                inner: Box::new(builder.build()),
                variables: conversion.projection,
            },
            base_iri: context.base_iri().cloned(),
        })
    }
}

/// The state of a single conversion.
struct Conversion<'a> {
    settings: &'a ConverterSettings,
    context: &'a JsonLdContext,
    fragments: HashMap<&'a str, &'a FragmentDefinition>,
    variables: &'a Variables,
    variables_dict: &'a HashMap<String, VariableDefinition>,
    singularize: &'a mut SingularizeVariables,
    projection: Vec<Variable>,
    /// The fragments that are currently being spread.
    spreads: Vec<&'a str>,
}

impl<'a> Conversion<'a> {
    fn selection_set(
        &mut self,
        builder: &mut PatternBuilder,
        subject: &TermPattern,
        path: &[String],
        selections: &'a [Selection],
        default_singular: bool,
    ) -> Result<(), ConversionError> {
        for selection in selections {
            match selection {
                Selection::Field(field) => {
                    self.field(builder, subject, path, field, default_singular)?;
                }
                Selection::InlineFragment(fragment) => {
                    if !self.is_included(&fragment.directives)? {
                        continue;
                    }
                    if let Some(type_condition) = &fragment.type_condition {
                        builder
                            .triples
                            .push(self.type_pattern(subject, type_condition.as_str())?);
                    }
                    self.selection_set(
                        builder,
                        subject,
                        path,
                        &fragment.selection_set,
                        default_singular,
                    )?;
                }
                Selection::FragmentSpread(spread) => {
                    if !self.is_included(&spread.directives)? {
                        continue;
                    }
                    let name = spread.fragment_name.as_str();
                    let fragment = *self
                        .fragments
                        .get(name)
                        .ok_or_else(|| ConversionError::UnknownFragment(name.to_owned()))?;
                    if self.spreads.contains(&name) {
                        return Err(ConversionError::FragmentCycle(name.to_owned()));
                    }
                    self.spreads.push(name);
                    builder
                        .triples
                        .push(self.type_pattern(subject, fragment.type_condition.as_str())?);
                    self.selection_set(
                        builder,
                        subject,
                        path,
                        &fragment.selection_set,
                        default_singular,
                    )?;
                    self.spreads.pop();
                }
            }
        }
        Ok(())
    }

    fn field(
        &mut self,
        builder: &mut PatternBuilder,
        subject: &TermPattern,
        path: &[String],
        field: &'a Field,
        default_singular: bool,
    ) -> Result<(), ConversionError> {
        if !self.is_included(&field.directives)? {
            return Ok(());
        }

        let key = field.alias.as_ref().unwrap_or(&field.name).as_str();
        let mut field_path = path.to_vec();
        field_path.push(key.to_owned());

        let (singular, children_singular) = singularity(&field.directives, default_singular)?;
        if singular {
            let path = self.join(&field_path);
            self.singularize.insert(path, true);
        }

        let name = field.name.as_str();
        if is_id_field(field) {
            // The subject is bound to the variable of the first id field, later aliases copy it.
            if let TermPattern::Variable(subject) = subject {
                let variable = self.variable(&field_path)?;
                if variable != *subject {
                    builder.binds.push((variable.clone(), subject.clone()));
                }
                self.project(variable);
            }
            return Ok(());
        }

        let variable = self.subject(&field_path, &field.selection_set)?;
        let object = TermPattern::Variable(variable.clone());
        let triple = if name == TYPENAME_FIELD {
            TriplePattern {
                subject: subject.clone(),
                predicate: NamedNodePattern::NamedNode(rdf::TYPE.into_owned()),
                object: object.clone(),
            }
        } else {
            let predicate = NamedNodePattern::NamedNode(self.expand(name)?);
            if self.context.term(name).is_some_and(TermDefinition::is_reverse) {
                TriplePattern {
                    subject: object.clone(),
                    predicate,
                    object: subject.clone(),
                }
            } else {
                TriplePattern {
                    subject: subject.clone(),
                    predicate,
                    object: object.clone(),
                }
            }
        };

        let optional = field.directives.get("optional").is_some();
        let mut group = PatternBuilder::default();
        let target = if optional { &mut group } else { &mut *builder };
        target.triples.push(triple);
        self.arguments(target, &variable, field)?;
        if field.selection_set.is_empty() {
            self.project(variable);
        } else {
            self.selection_set(
                target,
                &object,
                &field_path,
                &field.selection_set,
                children_singular,
            )?;
        }

        if optional {
            builder.optionals.push(group.build());
        }
        Ok(())
    }

    /// Adds the constraints expressed by the arguments of `field` on its `object`.
    fn arguments(
        &self,
        builder: &mut PatternBuilder,
        object: &Variable,
        field: &Field,
    ) -> Result<(), ConversionError> {
        for argument in &field.arguments {
            let items = self.argument_value(&argument.value)?.into_items();
            match argument.name.as_str() {
                ID_FIELD => {
                    let bindings = items
                        .into_iter()
                        .map(|item| match item {
                            ArgumentValue::String(iri) => {
                                Ok(vec![Some(GroundTerm::NamedNode(self.iri(&iri)?))])
                            }
                            _ => Err(ConversionError::UnsupportedValue(
                                "the id argument only accepts IRI strings".to_owned(),
                            )),
                        })
                        .collect::<Result<_, _>>()?;
                    builder.joins.push(GraphPattern::Values {
                        variables: vec![object.clone()],
                        bindings,
                    });
                }
                VALUE_ARGUMENT => {
                    let bindings = items
                        .into_iter()
                        .map(|item| {
                            self.constant(field.name.as_str(), item)
                                .map(|constant| vec![Some(constant.into_ground_term())])
                        })
                        .collect::<Result<_, _>>()?;
                    builder.joins.push(GraphPattern::Values {
                        variables: vec![object.clone()],
                        bindings,
                    });
                }
                name => {
                    let predicate = NamedNodePattern::NamedNode(self.expand(name)?);
                    for item in items {
                        builder.triples.push(TriplePattern {
                            subject: TermPattern::Variable(object.clone()),
                            predicate: predicate.clone(),
                            object: self.constant(name, item)?.into_term_pattern(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the variable that holds the subject of `selections`.
    fn subject(
        &self,
        path: &[String],
        selections: &'a [Selection],
    ) -> Result<Variable, ConversionError> {
        match self.id_key(selections, &mut Vec::new())? {
            Some(key) => {
                let mut id_path = path.to_vec();
                id_path.push(key.to_owned());
                self.variable(&id_path)
            }
            None if path.is_empty() => self.variable(&[ROOT_SUBJECT.to_owned()]),
            None => self.variable(path),
        }
    }

    /// Returns the key of the first included `id` field of `selections`, including the fields of
    /// inline fragments and fragment spreads.
    fn id_key(
        &self,
        selections: &'a [Selection],
        spreads: &mut Vec<&'a str>,
    ) -> Result<Option<&'a str>, ConversionError> {
        for selection in selections {
            let key = match selection {
                Selection::Field(field) => {
                    if !is_id_field(field) || !self.is_included(&field.directives)? {
                        continue;
                    }
                    Some(field.alias.as_ref().unwrap_or(&field.name).as_str())
                }
                Selection::InlineFragment(fragment) => {
                    if !self.is_included(&fragment.directives)? {
                        continue;
                    }
                    self.id_key(&fragment.selection_set, spreads)?
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    if spreads.contains(&name) || !self.is_included(&spread.directives)? {
                        continue;
                    }
                    // Unknown fragments are reported when the selection set is converted.
                    let Some(fragment) = self.fragments.get(name).copied() else {
                        continue;
                    };
                    spreads.push(name);
                    self.id_key(&fragment.selection_set, spreads)?
                }
            };
            if key.is_some() {
                return Ok(key);
            }
        }
        Ok(None)
    }

    fn variable(&self, path: &[String]) -> Result<Variable, ConversionError> {
        let name = self.join(path);
        Variable::new(name.as_str())
            .map_err(|error| ConversionError::InvalidVariableName { name, error })
    }

    fn type_pattern(
        &self,
        subject: &TermPattern,
        type_name: &str,
    ) -> Result<TriplePattern, ConversionError> {
        Ok(TriplePattern {
            subject: subject.clone(),
            predicate: NamedNodePattern::NamedNode(rdf::TYPE.into_owned()),
            object: TermPattern::NamedNode(self.expand(type_name)?),
        })
    }

    fn is_included(&self, directives: &DirectiveList) -> Result<bool, ConversionError> {
        if let Some(skip) = directives.get("skip") {
            if self.condition(skip)? {
                return Ok(false);
            }
        }
        if let Some(include) = directives.get("include") {
            return self.condition(include);
        }
        Ok(true)
    }

    fn condition(&self, directive: &ast::Directive) -> Result<bool, ConversionError> {
        let value = directive_argument(directive, "if")
            .ok_or_else(|| invalid_directive(directive, "the if argument is required"))?;
        match self.argument_value(value)? {
            ArgumentValue::Boolean(value) => Ok(value),
            _ => Err(invalid_directive(
                directive,
                "the if argument must be a boolean",
            )),
        }
    }

    /// Resolves variables and converts `value` into an [`ArgumentValue`].
    fn argument_value(&self, value: &ast::Value) -> Result<ArgumentValue, ConversionError> {
        match value {
            ast::Value::Variable(name) => {
                if let Some(value) = self.variables.get(name.as_str()) {
                    return ArgumentValue::from_json(value);
                }
                match self
                    .variables_dict
                    .get(name.as_str())
                    .and_then(|definition| definition.default_value.as_ref())
                {
                    Some(default_value) => self.argument_value(default_value),
                    None => Err(ConversionError::UndefinedVariable(name.as_str().to_owned())),
                }
            }
            ast::Value::String(value) => Ok(ArgumentValue::String(value.clone())),
            ast::Value::Int(value) => Ok(ArgumentValue::Int(value.as_str().to_owned())),
            ast::Value::Float(value) => Ok(ArgumentValue::Float(value.as_str().to_owned())),
            ast::Value::Boolean(value) => Ok(ArgumentValue::Boolean(*value)),
            ast::Value::Enum(value) => Ok(ArgumentValue::Enum(value.as_str().to_owned())),
            ast::Value::List(values) => values
                .iter()
                .map(|value| self.argument_value(value))
                .collect::<Result<_, _>>()
                .map(ArgumentValue::List),
            ast::Value::Null => Err(ConversionError::UnsupportedValue("null".to_owned())),
            ast::Value::Object(_) => Err(ConversionError::UnsupportedValue(
                "input objects".to_owned(),
            )),
        }
    }

    /// Converts a value of `term` into an RDF term, respecting the term's definition.
    fn constant(&self, term: &str, value: ArgumentValue) -> Result<Constant, ConversionError> {
        let type_mapping = self.context.term(term).and_then(TermDefinition::type_mapping);
        Ok(match value {
            ArgumentValue::String(value) => match type_mapping {
                Some(TypeMapping::Id) => Constant::Iri(self.iri(&value)?),
                Some(TypeMapping::Vocab) => Constant::Iri(self.expand(&value)?),
                Some(TypeMapping::Datatype(datatype)) => Constant::Literal(
                    Literal::new_typed_literal(value, named_node(datatype)?),
                ),
                _ => match self.context.language_of(term) {
                    Some(language) => Constant::Literal(
                        Literal::new_language_tagged_literal(value, language)
                            .map_err(|error| ConversionError::InvalidLiteral(error.to_string()))?,
                    ),
                    None => Constant::Literal(Literal::new_simple_literal(value)),
                },
            },
            ArgumentValue::Int(value) => {
                Constant::Literal(typed_literal(value, type_mapping, xsd::INTEGER)?)
            }
            ArgumentValue::Float(value) => {
                Constant::Literal(typed_literal(value, type_mapping, xsd::DOUBLE)?)
            }
            ArgumentValue::Boolean(value) => {
                Constant::Literal(typed_literal(value.to_string(), type_mapping, xsd::BOOLEAN)?)
            }
            ArgumentValue::Enum(value) => Constant::Iri(self.expand(&value)?),
            ArgumentValue::List(_) => {
                return Err(ConversionError::UnsupportedValue("nested lists".to_owned()))
            }
        })
    }

    /// Expands a GraphQL name into an IRI using the context.
    fn expand(&self, term: &str) -> Result<NamedNode, ConversionError> {
        match self.context.expand_term(term) {
            Some(iri) => named_node(&iri),
            None if self.settings.require_context => {
                Err(ConversionError::MissingContextEntry(term.to_owned()))
            }
            None => named_node(term),
        }
    }

    /// Parses an IRI, resolving it against the base IRI of the context.
    fn iri(&self, iri: &str) -> Result<NamedNode, ConversionError> {
        match self.context.base_iri() {
            Some(base) => base
                .resolve(iri)
                .map(|iri| NamedNode::new_unchecked(iri.into_inner()))
                .map_err(|error| ConversionError::InvalidIri {
                    iri: iri.to_owned(),
                    error,
                }),
            None => named_node(iri),
        }
    }

    fn join(&self, path: &[String]) -> String {
        path.join(&self.settings.variable_delimiter)
    }

    fn project(&mut self, variable: Variable) {
        if !self.projection.contains(&variable) {
            self.projection.push(variable);
        }
    }
}

/// A constant in a triple pattern or a `VALUES` clause.
enum Constant {
    Iri(NamedNode),
    Literal(Literal),
}

impl Constant {
    fn into_term_pattern(self) -> TermPattern {
        match self {
            Self::Iri(iri) => TermPattern::NamedNode(iri),
            Self::Literal(literal) => TermPattern::Literal(literal),
        }
    }

    fn into_ground_term(self) -> GroundTerm {
        match self {
            Self::Iri(iri) => GroundTerm::NamedNode(iri),
            Self::Literal(literal) => GroundTerm::Literal(literal),
        }
    }
}

fn is_id_field(field: &Field) -> bool {
    field.name.as_str() == ID_FIELD && field.selection_set.is_empty() && field.arguments.is_empty()
}

/// Returns whether a field is singular and whether its children are singular by default.
fn singularity(
    directives: &DirectiveList,
    default_singular: bool,
) -> Result<(bool, bool), ConversionError> {
    if let Some(plural) = directives.get("plural") {
        let children = if scope_is_all(plural)? {
            false
        } else {
            default_singular
        };
        return Ok((false, children));
    }
    if let Some(single) = directives.get("single") {
        let children = scope_is_all(single)? || default_singular;
        return Ok((true, children));
    }
    Ok((default_singular, default_singular))
}

fn scope_is_all(directive: &ast::Directive) -> Result<bool, ConversionError> {
    match directive_argument(directive, "scope") {
        None => Ok(false),
        Some(ast::Value::Enum(scope)) if scope.as_str() == "all" => Ok(true),
        Some(_) => Err(invalid_directive(directive, "the scope must be all")),
    }
}

fn directive_argument<'d>(directive: &'d ast::Directive, name: &str) -> Option<&'d ast::Value> {
    directive
        .arguments
        .iter()
        .find(|argument| argument.name.as_str() == name)
        .map(|argument| &*argument.value)
}

fn invalid_directive(directive: &ast::Directive, reason: &'static str) -> ConversionError {
    ConversionError::InvalidDirective {
        directive: directive.name.as_str().to_owned(),
        reason,
    }
}

fn named_node(iri: &str) -> Result<NamedNode, ConversionError> {
    NamedNode::new(iri).map_err(|error| ConversionError::InvalidIri {
        iri: iri.to_owned(),
        error,
    })
}

fn typed_literal(
    value: String,
    type_mapping: Option<&TypeMapping>,
    default_datatype: NamedNodeRef<'_>,
) -> Result<Literal, ConversionError> {
    let datatype = match type_mapping {
        Some(TypeMapping::Datatype(datatype)) => named_node(datatype)?,
        _ => default_datatype.into_owned(),
    };
    Ok(Literal::new_typed_literal(value, datatype))
}
