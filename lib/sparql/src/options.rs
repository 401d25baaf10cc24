use apollo_compiler::ast;
use apollo_compiler::Node;
use graphql_ld_model::{SingularizeVariables, Variables};
use std::collections::HashMap;

/// Per-conversion options.
///
/// Besides the `variables` that are substituted into the query, the options hold two records
/// that are populated *by* the conversion. A fresh instance must be used for every conversion.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Values for the variables of the operation.
    pub variables: Variables,
    /// Populated with the result paths that must be singularized.
    pub singularize_variables: SingularizeVariables,
    /// Populated with the variable definitions of the converted operation.
    pub variables_dict: HashMap<String, VariableDefinition>,
}

impl ConvertOptions {
    /// Creates fresh options with the given `variables`.
    pub fn new(variables: Variables) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }
}

/// The definition of a variable of a GraphQL operation.
#[derive(Clone, Debug)]
pub struct VariableDefinition {
    /// The declared GraphQL type, e.g. `String!`.
    pub ty: String,
    pub default_value: Option<Node<ast::Value>>,
}
