//! Processing of [JSON-LD contexts](https://www.w3.org/TR/json-ld11/#the-context).
//!
//! GraphQL-LD uses a JSON-LD context to map GraphQL field names to RDF predicates. This crate
//! implements the subset of the
//! [context processing algorithm](https://www.w3.org/TR/json-ld11-api/#context-processing-algorithm)
//! that is relevant for this purpose. Remote contexts are not supported.
//!
//! ```
//! use graphql_ld_context::ContextParser;
//! use serde_json::json;
//!
//! let context = ContextParser::new().parse(
//!     &json!({
//!         "ex": "http://example.org/",
//!         "name": "ex:name",
//!         "knows": { "@id": "ex:knows", "@type": "@id" }
//!     }),
//!     None,
//! )?;
//! assert_eq!(context.expand_term("name").as_deref(), Some("http://example.org/name"));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod context;
mod error;
mod parser;

pub use context::{JsonLdContext, TermDefinition, TypeMapping};
pub use error::ContextError;
pub use parser::ContextParser;
