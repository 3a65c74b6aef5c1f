//! Backend-neutral filter conditions and JSON condition-tree handling.
//!
//! A condition tree arrives as JSON: branch nodes
//! `{"type": "and"|"or", "children": [...]}` and leaf nodes
//! `{"field": <name>, "operator": <str?>, "value": <json>}` (a leaf may
//! reference its field by `"id"` instead). Leaves are translated
//! independently and combined per the node's logical type. An empty or
//! missing tree is vacuously valid.

use super::operators::Lookup;
use super::translators::{TranslateContext, TranslateError, TranslatorRegistry};
use crate::models::{FieldProvider, QueryValue, Value};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Condition-tree validation and translation errors.
///
/// `Structure` and `UnknownField` are distinct so callers can tell a
/// malformed request from a reference to a field outside the current
/// metadata; permission filtering happens elsewhere, after this check.
#[derive(Error, Debug)]
pub enum TreeError {
    /// Node is not a recognized leaf or logical-combinator shape
    #[error("Malformed condition node: {0}")]
    Structure(String),
    /// Structurally valid leaf referencing an unresolvable field
    #[error("Unknown field reference: '{0}'")]
    UnknownField(String),
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// The value side of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Single(Value),
    Multiple(Vec<Value>),
}

/// A single normalized filter predicate: lookup path, operator, coerced
/// value. The backend predicate sink applies it to an actual query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub path: String,
    pub lookup: Lookup,
    pub negated: bool,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn new(path: impl Into<String>, lookup: Lookup, value: PredicateValue) -> Self {
        Self {
            path: path.into(),
            lookup,
            negated: false,
            value,
        }
    }

    pub fn is_null(path: impl Into<String>, expected: bool) -> Self {
        Self::new(path, Lookup::IsNull, PredicateValue::Single(Value::Bool(expected)))
    }
}

/// A predicate or a logical combination of conditions. `And(vec![])` is
/// vacuously satisfied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Predicate(Predicate),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// True for an empty combinator with nothing to satisfy.
    pub fn is_vacuous(&self) -> bool {
        match self {
            Condition::And(children) | Condition::Or(children) => children.is_empty(),
            Condition::Predicate(_) => false,
        }
    }
}

/// The result of translating a condition: the normalized filter, any join
/// requirements, and an optional human-readable echo. The echo never
/// affects the condition itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedCondition {
    pub condition: Condition,
    pub joins: Vec<String>,
    pub language: Option<String>,
}

impl TranslatedCondition {
    /// A condition that is always satisfied.
    pub fn vacuous() -> Self {
        Self {
            condition: Condition::And(Vec::new()),
            joins: Vec::new(),
            language: None,
        }
    }
}

enum Node<'a> {
    Vacuous,
    Branch {
        conjunction: bool,
        children: &'a [serde_json::Value],
    },
    Leaf {
        reference: String,
        operator: Option<&'a str>,
        value: QueryValue,
    },
}

/// Classifies a JSON node without resolving fields or translating, so
/// structural errors surface first and independently.
fn classify(node: &serde_json::Value) -> Result<Node<'_>, TreeError> {
    let map = match node {
        serde_json::Value::Null => return Ok(Node::Vacuous),
        serde_json::Value::Object(map) => map,
        other => {
            return Err(TreeError::Structure(format!(
                "expected an object node, got {other}"
            )));
        }
    };

    if map.is_empty() {
        return Ok(Node::Vacuous);
    }

    if let Some(kind) = map.get("type") {
        let kind = kind
            .as_str()
            .ok_or_else(|| TreeError::Structure("'type' must be a string".to_string()))?;
        let conjunction = match kind.to_lowercase().as_str() {
            "and" => true,
            "or" => false,
            other => {
                return Err(TreeError::Structure(format!(
                    "unknown logical type '{other}'"
                )));
            }
        };
        let children = match map.get("children") {
            None => &[],
            Some(serde_json::Value::Array(children)) => children.as_slice(),
            Some(_) => {
                return Err(TreeError::Structure(
                    "'children' must be an array".to_string(),
                ));
            }
        };
        return Ok(Node::Branch {
            conjunction,
            children,
        });
    }

    let reference = match (map.get("field"), map.get("id")) {
        (Some(serde_json::Value::String(name)), _) => name.clone(),
        (None, Some(serde_json::Value::String(id))) => id.clone(),
        (Some(other), _) => {
            return Err(TreeError::Structure(format!(
                "'field' must be a string, got {other}"
            )));
        }
        (None, Some(other)) => {
            return Err(TreeError::Structure(format!(
                "'id' must be a string, got {other}"
            )));
        }
        (None, None) => {
            return Err(TreeError::Structure(
                "node has neither a logical 'type' nor a 'field'/'id' reference".to_string(),
            ));
        }
    };

    let operator = match map.get("operator") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(op)) => Some(op.as_str()),
        Some(other) => {
            return Err(TreeError::Structure(format!(
                "'operator' must be a string, got {other}"
            )));
        }
    };

    let raw_value = map.get("value").unwrap_or(&serde_json::Value::Null);
    let value = QueryValue::from_json(raw_value)
        .ok_or_else(|| TreeError::Structure(format!("unrecognized value shape: {raw_value}")))?;

    Ok(Node::Leaf {
        reference,
        operator,
        value,
    })
}

fn resolve<'a>(
    reference: &str,
    fields: &'a dyn FieldProvider,
) -> Result<&'a crate::models::DataField, TreeError> {
    if let Ok(id) = Uuid::parse_str(reference)
        && let Some(field) = fields.field_by_id(id)
    {
        return Ok(field);
    }
    fields
        .field_by_name(reference)
        .ok_or_else(|| TreeError::UnknownField(reference.to_string()))
}

/// Checks a condition tree for structural validity and resolvable field
/// references without translating any values.
pub fn validate_tree(
    node: &serde_json::Value,
    fields: &dyn FieldProvider,
) -> Result<(), TreeError> {
    match classify(node)? {
        Node::Vacuous => Ok(()),
        Node::Branch { children, .. } => {
            for child in children {
                validate_tree(child, fields)?;
            }
            Ok(())
        }
        Node::Leaf { reference, .. } => {
            resolve(&reference, fields)?;
            Ok(())
        }
    }
}

/// Walks a condition tree, translating each leaf through the registry and
/// combining per the node's logical type.
pub fn translate_tree(
    node: &serde_json::Value,
    fields: &dyn FieldProvider,
    translators: &TranslatorRegistry,
    ctx: &TranslateContext,
) -> Result<TranslatedCondition, TreeError> {
    match classify(node)? {
        Node::Vacuous => Ok(TranslatedCondition::vacuous()),
        Node::Branch {
            conjunction,
            children,
        } => {
            let mut conditions = Vec::with_capacity(children.len());
            let mut joins: Vec<String> = Vec::new();
            let mut languages = Vec::new();

            for child in children {
                let translated = translate_tree(child, fields, translators, ctx)?;
                conditions.push(translated.condition);
                for join in translated.joins {
                    if !joins.contains(&join) {
                        joins.push(join);
                    }
                }
                if let Some(language) = translated.language {
                    languages.push(language);
                }
            }

            let condition = if conjunction {
                Condition::And(conditions)
            } else {
                Condition::Or(conditions)
            };
            let connector = if conjunction { " and " } else { " or " };
            let language = if languages.is_empty() {
                None
            } else {
                Some(languages.join(connector))
            };

            Ok(TranslatedCondition {
                condition,
                joins,
                language,
            })
        }
        Node::Leaf {
            reference,
            operator,
            value,
        } => {
            let field = resolve(&reference, fields)?;
            Ok(translators.translate(field, operator, &value, ctx)?)
        }
    }
}
