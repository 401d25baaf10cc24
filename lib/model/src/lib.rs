mod singularize;
mod solutions;
mod tree;

pub use singularize::SingularizeVariables;
pub use solutions::QuerySolutions;
pub use tree::ResultTree;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef, Variable,
    VariableNameParseError, VariableRef,
};

// Re-export the SPARQL algebra and results model.
pub use sparesults::{QueryResultsFormat, QueryResultsParseError, QuerySolution};
pub use spargebra::algebra::{Expression, GraphPattern};
pub use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};
pub use spargebra::{Query, SparqlSyntaxError};

/// Options that are passed verbatim to a query engine.
pub type EngineOptions = serde_json::Value;

/// Values for the variables of a GraphQL operation.
pub type Variables = std::collections::HashMap<String, serde_json::Value>;
