//! Translators convert (field, operator, value) into a normalized,
//! backend-neutral filter condition.
//!
//! Translation is pure: the same field, operator, and value payload always
//! produce the same condition. A label wrapped around a value feeds only
//! the human-readable echo.

use super::condition::{Condition, Predicate, PredicateValue, TranslatedCondition};
use super::operators::{Lookup, Operator};
use crate::models::{DataField, DataType, QueryValue, Value};
use crate::registry::{Registry, RegistryError};
use std::collections::HashMap;
use thiserror::Error;

/// Translation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// Operator string did not parse
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),
    /// Value cannot be coerced to the field's declared datatype
    #[error("Cannot coerce {value:?} to {datatype:?} for field '{field}'")]
    Coercion {
        field: String,
        value: String,
        datatype: DataType,
    },
    /// Value shape is wrong for the operator
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Execution context passed through translation. `root_model` names the
/// model the query is rooted at; `params` carries free-form context for
/// custom translators.
#[derive(Debug, Clone, Default)]
pub struct TranslateContext {
    pub root_model: Option<String>,
    pub params: HashMap<String, serde_json::Value>,
}

impl TranslateContext {
    pub fn for_model(root_model: impl Into<String>) -> Self {
        Self {
            root_model: Some(root_model.into()),
            params: HashMap::new(),
        }
    }
}

/// Pure transformer from a query condition to a backend-neutral filter.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        field: &DataField,
        operator: Option<&str>,
        value: &QueryValue,
        ctx: &TranslateContext,
    ) -> Result<TranslatedCondition, TranslateError>;
}

/// Default translator used when a field declares none.
///
/// Implements the null policy (IS NULL plus a not-null guard on the
/// relation key for joined fields), numeric coercion of string values,
/// and list handling for `in`/`range` lookups.
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn translate(
        &self,
        field: &DataField,
        operator: Option<&str>,
        value: &QueryValue,
        _ctx: &TranslateContext,
    ) -> Result<TranslatedCondition, TranslateError> {
        let operator = Operator::parse(operator)?;
        let label = value.label().map(str::to_string);
        let payload = value.payload();

        let joins = match &field.relation {
            Some(relation) => vec![relation.name.clone()],
            None => Vec::new(),
        };

        // Null values take the null policy regardless of the lookup: an
        // IS NULL predicate, guarded for joined fields so an outer join
        // producing nulls for unrelated rows does not satisfy it.
        if payload.is_null() {
            return Ok(null_condition(field, operator.negated, joins));
        }

        // An explicit isnull lookup carries a boolean flag instead of a
        // comparable value.
        if operator.lookup == Lookup::IsNull {
            return match payload {
                QueryValue::Scalar(Value::Bool(expected)) => {
                    Ok(null_condition(field, *expected == operator.negated, joins))
                }
                _ => Err(TranslateError::InvalidValue {
                    field: field.name.clone(),
                    reason: "'isnull' requires a boolean value".to_string(),
                }),
            };
        }

        let (condition, display) = match payload {
            QueryValue::Scalar(raw) => {
                if operator.lookup.takes_list() {
                    return Err(TranslateError::InvalidValue {
                        field: field.name.clone(),
                        reason: format!("'{:?}' requires a list of values", operator.lookup),
                    });
                }
                let coerced = coerce(field, raw)?;
                let display = raw.to_string();
                let predicate = Predicate {
                    path: field.path(),
                    lookup: operator.lookup,
                    negated: operator.negated,
                    value: PredicateValue::Single(coerced),
                };
                (Condition::Predicate(predicate), display)
            }
            QueryValue::List(raw_values) => {
                if !operator.lookup.takes_list() {
                    return Err(TranslateError::InvalidValue {
                        field: field.name.clone(),
                        reason: format!("'{:?}' does not accept a list value", operator.lookup),
                    });
                }
                if operator.lookup == Lookup::Range && raw_values.len() != 2 {
                    return Err(TranslateError::InvalidValue {
                        field: field.name.clone(),
                        reason: format!(
                            "'range' requires exactly two values, got {}",
                            raw_values.len()
                        ),
                    });
                }
                let coerced = raw_values
                    .iter()
                    .map(|v| coerce(field, v))
                    .collect::<Result<Vec<_>, _>>()?;
                let display = format!(
                    "[{}]",
                    raw_values
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                let predicate = Predicate {
                    path: field.path(),
                    lookup: operator.lookup,
                    negated: operator.negated,
                    value: PredicateValue::Multiple(coerced),
                };
                (Condition::Predicate(predicate), display)
            }
            // Null and Labeled are unwrapped above.
            _ => unreachable!("payload() yields a scalar, list, or null"),
        };

        let shown = label.unwrap_or(display);
        let language = format!("{} {} {}", field.name, operator.verb(), shown);

        Ok(TranslatedCondition {
            condition,
            joins,
            language: Some(language),
        })
    }
}

fn null_condition(field: &DataField, negated: bool, joins: Vec<String>) -> TranslatedCondition {
    let is_null = Predicate::is_null(field.path(), !negated);

    // The not-null guard on the relation key only matters when expecting
    // null, where an outer join would otherwise match unrelated rows.
    let condition = match field.relation_key_path() {
        Some(key_path) if !negated => Condition::And(vec![
            Condition::Predicate(is_null),
            Condition::Predicate(Predicate::is_null(key_path, false)),
        ]),
        _ => Condition::Predicate(is_null),
    };

    let verb = if negated { "is not null" } else { "is null" };

    TranslatedCondition {
        condition,
        joins,
        language: Some(format!("{} {}", field.name, verb)),
    }
}

/// Coerces a raw value to the field's declared datatype. Numeric strings
/// become numbers; mismatches that cannot be represented are errors, never
/// silent re-typings.
fn coerce(field: &DataField, value: &Value) -> Result<Value, TranslateError> {
    let err = || TranslateError::Coercion {
        field: field.name.clone(),
        value: value.to_string(),
        datatype: field.datatype,
    };

    match (field.datatype, value) {
        (DataType::Integer, Value::Int(_)) => Ok(value.clone()),
        (DataType::Integer, Value::Float(f)) if f.fract() == 0.0 => Ok(Value::Int(*f as i64)),
        (DataType::Integer, Value::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| err()),

        (DataType::Float, Value::Float(_)) => Ok(value.clone()),
        (DataType::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
        (DataType::Float, Value::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| err()),

        (DataType::Boolean, Value::Bool(_)) => Ok(value.clone()),
        (DataType::Boolean, Value::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "f" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(err()),
        },

        (DataType::Text, Value::Text(_)) => Ok(value.clone()),
        (DataType::Text, other) => Ok(Value::Text(other.to_string())),

        // Dates and timestamps pass through for the backend to interpret.
        (DataType::Date | DataType::Timestamp, Value::Text(_) | Value::Int(_)) => {
            Ok(value.clone())
        }

        _ => Err(err()),
    }
}

/// Registry of translators plus the implicit defaults used when a field
/// declares no translator.
pub struct TranslatorRegistry {
    registry: Registry<Box<dyn Translator>>,
    default: Box<dyn Translator>,
    datatype_defaults: HashMap<DataType, String>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new("translator"),
            default: Box::new(DefaultTranslator),
            datatype_defaults: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        label: impl Into<String>,
        translator: Box<dyn Translator>,
    ) {
        self.registry.register(identifier, label, translator);
    }

    /// Routes fields of `datatype` with no declared translator to a
    /// registered one instead of the built-in default.
    pub fn set_datatype_default(&mut self, datatype: DataType, identifier: impl Into<String>) {
        self.datatype_defaults.insert(datatype, identifier.into());
    }

    pub fn choices(&self) -> Vec<(String, String)> {
        self.registry.choices()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.registry.contains(identifier)
    }

    /// Resolves the translator for a field: its declared identifier if
    /// set (unknown identifiers are fatal), otherwise the datatype default.
    pub fn resolve(&self, field: &DataField) -> Result<&dyn Translator, RegistryError> {
        if let Some(identifier) = field.translator.as_deref().filter(|t| !t.is_empty()) {
            return self.registry.get(identifier).map(|t| t.as_ref());
        }
        if let Some(identifier) = self.datatype_defaults.get(&field.datatype) {
            return self.registry.get(identifier).map(|t| t.as_ref());
        }
        Ok(self.default.as_ref())
    }

    pub fn translate(
        &self,
        field: &DataField,
        operator: Option<&str>,
        value: &QueryValue,
        ctx: &TranslateContext,
    ) -> Result<TranslatedCondition, TranslateError> {
        let translator = self.resolve(field)?;
        translator.translate(field, operator, value, ctx)
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
