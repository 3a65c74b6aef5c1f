//! Scalar values and the tagged query-value forms accepted by translators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A raw scalar cell value as produced by a row source or supplied in a
/// query condition.
///
/// Equality and hashing are bitwise for floats so values can key the
/// exporter's format cache without losing hash consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Maps a JSON scalar onto a `Value`. Arrays and objects have no scalar
    /// representation and return `None`.
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        match raw {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::from(s.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bitwise so equality stays consistent with Hash.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A query-condition value as supplied by a caller.
///
/// Replaces the upstream duck-typed dict-or-scalar parameter with an
/// explicit tagged variant. Only the value payload ever participates in
/// translation; a label is carried through solely for the human-readable
/// echo and must not affect the produced condition.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Scalar(Value),
    List(Vec<Value>),
    Labeled { value: Box<QueryValue>, label: String },
}

impl QueryValue {
    pub fn scalar(value: impl Into<Value>) -> Self {
        QueryValue::Scalar(value.into())
    }

    pub fn list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn labeled(value: QueryValue, label: impl Into<String>) -> Self {
        QueryValue::Labeled {
            value: Box::new(value),
            label: label.into(),
        }
    }

    /// Unwraps any `Labeled` layers down to the participating payload.
    pub fn payload(&self) -> &QueryValue {
        match self {
            QueryValue::Labeled { value, .. } => value.payload(),
            other => other,
        }
    }

    /// Outermost label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            QueryValue::Labeled { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.payload(), QueryValue::Null | QueryValue::Scalar(Value::Null))
    }

    /// Maps raw JSON into the tagged variant. A `{"value": ..., "label": ...}`
    /// object becomes `Labeled`; an array becomes `List`; anything else must
    /// be a scalar. Returns `None` for unrecognized shapes.
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        match raw {
            serde_json::Value::Null => Some(QueryValue::Null),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Option<Vec<_>>>()
                .map(QueryValue::List),
            serde_json::Value::Object(map) => {
                let inner = QueryValue::from_json(map.get("value")?)?;
                let label = match map.get("label") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Some(QueryValue::Labeled {
                    value: Box::new(inner),
                    label,
                })
            }
            other => Value::from_json(other).map(QueryValue::Scalar),
        }
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => QueryValue::Null,
            other => QueryValue::Scalar(other),
        }
    }
}
