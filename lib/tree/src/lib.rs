//! Reshapes flat [SPARQL solutions](graphql_ld_model::QuerySolutions) into a
//! [`ResultTree`](graphql_ld_model::ResultTree).
//!
//! Variable names are interpreted as paths: `books_author_name` is the `name` of the `author` of
//! the `books`. Solutions that agree on the values of an object are merged into a single object.
//!
//! ```
//! use graphql_ld_model::{Literal, QuerySolutions, SingularizeVariables, Variable};
//! use graphql_ld_tree::Converter;
//!
//! let solutions = QuerySolutions::from_rows(
//!     [Variable::new_unchecked("name")],
//!     [vec![Some(Literal::new_simple_literal("Alice").into())]],
//! );
//! let tree = Converter::default()
//!     .sparql_results_to_tree(&solutions, &SingularizeVariables::from([("name", true)]))?;
//! assert_eq!(tree.to_json(), serde_json::json!({ "name": "Alice" }));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod converter;
mod error;

pub use converter::{Converter, TreeConverterSettings};
pub use error::TreeError;
