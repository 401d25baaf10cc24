//! Converts GraphQL queries into [SPARQL algebra](https://www.w3.org/TR/sparql11-query/#sparqlAlgebra).
//!
//! Every field of a GraphQL query is mapped to an RDF predicate using a JSON-LD context. Nested
//! selection sets become triple patterns that share the variable of their parent field.
//!
//! ```
//! use graphql_ld_context::ContextParser;
//! use graphql_ld_sparql::{ConvertOptions, Converter, GraphQlQuery};
//! use serde_json::json;
//!
//! let context = ContextParser::new().parse(&json!({ "name": "http://ex.org/name" }), None)?;
//! let mut options = ConvertOptions::default();
//! let query = Converter::default().graphql_to_sparql_algebra(
//!     &GraphQlQuery::from("{ name @single }"),
//!     &context,
//!     &mut options,
//! )?;
//! assert!(query.to_string().contains("<http://ex.org/name>"));
//! assert!(options.singularize_variables.is_singular("name"));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod converter;
mod error;
mod options;
mod pattern;
mod query;
mod value;

pub use converter::{Converter, ConverterSettings};
pub use error::ConversionError;
pub use options::{ConvertOptions, VariableDefinition};
pub use query::GraphQlQuery;

pub use apollo_compiler::ast::Document;
