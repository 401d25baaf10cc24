use indexmap::IndexMap;
use oxrdf::vocab::xsd;
use oxrdf::{Literal, Term};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// A nested result that mirrors the selection set of a GraphQL query.
///
/// Leaves are either [RDF terms](Term) (if the terms were materialized during reshaping) or
/// their plain lexical values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResultTree {
    /// No value. Used for singular paths without any binding.
    #[default]
    Null,
    /// A materialized RDF term.
    Term(Term),
    /// The plain lexical value of an RDF term.
    Plain(String),
    /// The values of a plural path.
    List(Vec<ResultTree>),
    /// A nested object.
    Object(IndexMap<String, ResultTree>),
}

impl ResultTree {
    /// Returns the entry for `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&ResultTree> {
        match self {
            Self::Object(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Term(term) => Some(term),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResultTree]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts the tree into plain JSON.
    ///
    /// IRIs become strings, blank nodes become `_:`-prefixed strings and literals with a numeric
    /// or boolean datatype become JSON numbers or booleans. All other literals become strings.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Term(term) => term_to_json(term),
            Self::Plain(value) => Value::String(value.clone()),
            Self::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            Self::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ResultTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Term(term) => term_to_json(term).serialize(serializer),
            Self::Plain(value) => serializer.serialize_str(value),
            Self::List(values) => serializer.collect_seq(values),
            Self::Object(entries) => serializer.collect_map(entries),
        }
    }
}

impl From<Term> for ResultTree {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

fn term_to_json(term: &Term) -> Value {
    match term {
        Term::NamedNode(node) => Value::String(node.as_str().to_owned()),
        Term::BlankNode(node) => Value::String(format!("_:{}", node.as_str())),
        Term::Literal(literal) => literal_to_json(literal),
        #[allow(unreachable_patterns, reason = "Triple terms only exist with RDF-star")]
        _ => Value::String(term.to_string()),
    }
}

fn literal_to_json(literal: &Literal) -> Value {
    let value = literal.value();
    let datatype = literal.datatype();
    if datatype == xsd::INTEGER {
        if let Ok(number) = value.parse::<i64>() {
            return Value::Number(number.into());
        }
    } else if datatype == xsd::DECIMAL || datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
        if let Some(number) = value.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    } else if datatype == xsd::BOOLEAN {
        match value {
            "true" | "1" => return Value::Bool(true),
            "false" | "0" => return Value::Bool(false),
            _ => {}
        }
    }
    Value::String(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, NamedNode};
    use serde_json::json;

    #[test]
    fn to_json_converts_literals_by_datatype() {
        let tree = ResultTree::Object(IndexMap::from([
            (
                "name".to_owned(),
                ResultTree::Term(Literal::new_simple_literal("Alice").into()),
            ),
            (
                "age".to_owned(),
                ResultTree::Term(Literal::new_typed_literal("42", xsd::INTEGER).into()),
            ),
            (
                "score".to_owned(),
                ResultTree::Term(Literal::new_typed_literal("1.5", xsd::DECIMAL).into()),
            ),
            (
                "active".to_owned(),
                ResultTree::Term(Literal::from(true).into()),
            ),
            (
                "knows".to_owned(),
                ResultTree::List(vec![
                    ResultTree::Term(NamedNode::new_unchecked("http://ex.org/bob").into()),
                    ResultTree::Term(BlankNode::new_unchecked("b1").into()),
                ]),
            ),
            ("nickname".to_owned(), ResultTree::Null),
        ]));

        assert_eq!(
            tree.to_json(),
            json!({
                "name": "Alice",
                "age": 42,
                "score": 1.5,
                "active": true,
                "knows": ["http://ex.org/bob", "_:b1"],
                "nickname": null,
            })
        );
    }

    #[test]
    fn serialize_matches_to_json() {
        let tree = ResultTree::Object(IndexMap::from([(
            "name".to_owned(),
            ResultTree::List(vec![
                ResultTree::Plain("Alice".to_owned()),
                ResultTree::Term(Literal::new_language_tagged_literal_unchecked("Alicia", "es").into()),
            ]),
        )]));
        assert_eq!(serde_json::to_value(&tree).unwrap(), tree.to_json());
    }
}
