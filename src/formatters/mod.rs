//! Formatters convert fixed-width slices of raw values into fixed-width
//! slices of display values.
//!
//! A formatter declares its output field names up front; that width drives
//! row slicing in the exporter and aggregate header construction. A
//! formatter must accept any value its fields' datatypes can take,
//! including null - "no value" maps to a formatter-specific default
//! encoding, never an error.

pub mod builtin;

pub use builtin::{ConceptFormatter, RawFormatter};

use crate::models::{Concept, OutputFormat, Value};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Formatter construction and invocation errors.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatError {
    /// Formatter was constructed without a concept or an explicit key list
    #[error("Formatter requires a concept or an explicit key list")]
    MissingKeys,
    /// Input or output slice width disagrees with the declared field names
    #[error("Formatter '{formatter}' expected {expected} values, got {actual}")]
    Width {
        formatter: String,
        expected: usize,
        actual: usize,
    },
    /// A value could not be rendered for a field
    #[error("Failed to format value for '{field}': {reason}")]
    Value { field: String, reason: String },
}

/// Per-call keyword context passed through to formatters.
pub type FormatParams = HashMap<String, serde_json::Value>;

/// Formatter metadata exposed without invoking the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatterMeta {
    pub header: Vec<String>,
}

/// A pure value-slice transformer with a fixed output width.
pub trait Formatter: Send + Sync {
    /// Ordered output field names. The length is fixed per instance and
    /// equals the number of values consumed and produced per call.
    fn field_names(&self) -> &[String];

    /// Formats one slice of raw values. Output length must equal
    /// `field_names().len()`. Must not fail on null values.
    fn format(
        &self,
        values: &[Value],
        params: Option<&FormatParams>,
    ) -> Result<Vec<Value>, FormatError>;

    /// Metadata for the named exporter, letting it build its aggregate
    /// header without formatting anything.
    fn get_meta(&self, _exporter: &str) -> FormatterMeta {
        FormatterMeta {
            header: self.field_names().to_vec(),
        }
    }
}

/// Construction options handed to a formatter factory. A formatter is
/// bound to a concept, or to an explicit key list when it is not tied to
/// schema metadata (e.g. a raw pass-through for ordering columns).
pub struct FormatterOptions<'a> {
    pub concept: Option<&'a Concept>,
    pub keys: Option<Vec<String>>,
    pub formats: Vec<OutputFormat>,
}

impl<'a> FormatterOptions<'a> {
    pub fn for_concept(concept: &'a Concept, formats: Vec<OutputFormat>) -> Self {
        Self {
            concept: Some(concept),
            keys: None,
            formats,
        }
    }

    pub fn for_keys(keys: Vec<String>, formats: Vec<OutputFormat>) -> Self {
        Self {
            concept: None,
            keys: Some(keys),
            formats,
        }
    }
}

/// Builds a formatter instance from construction options.
pub type FormatterFactory =
    fn(FormatterOptions<'_>) -> Result<Box<dyn Formatter>, FormatError>;

pub type FormatterRegistry = Registry<FormatterFactory>;

/// Registry pre-populated with the built-in formatters.
pub fn default_registry() -> FormatterRegistry {
    let mut registry = Registry::new("formatter");
    registry.register(
        "concept",
        "Concept formatter",
        ConceptFormatter::factory as FormatterFactory,
    );
    registry.register(
        "raw",
        "Raw formatter",
        RawFormatter::factory as FormatterFactory,
    );
    registry
}
