use crate::ConversionError;
use serde_json::Value;

/// An argument value after all GraphQL variables have been substituted.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ArgumentValue {
    String(String),
    Int(String),
    Float(String),
    Boolean(bool),
    Enum(String),
    List(Vec<ArgumentValue>),
}

impl ArgumentValue {
    pub fn from_json(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(value) => Ok(Self::String(value.clone())),
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                Ok(Self::Int(number.to_string()))
            }
            Value::Number(number) => Ok(Self::Float(number.to_string())),
            Value::Bool(value) => Ok(Self::Boolean(*value)),
            Value::Array(values) => values
                .iter()
                .map(Self::from_json)
                .collect::<Result<_, _>>()
                .map(Self::List),
            Value::Null | Value::Object(_) => Err(ConversionError::UnsupportedValue(value.to_string())),
        }
    }

    /// Flattens (nested) lists into their items.
    pub fn into_items(self) -> Vec<ArgumentValue> {
        match self {
            Self::List(values) => values.into_iter().flat_map(Self::into_items).collect(),
            value => vec![value],
        }
    }
}
