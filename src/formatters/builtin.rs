//! Built-in formatter implementations.

use super::{FormatError, FormatParams, Formatter, FormatterOptions};
use crate::models::{DataType, OutputFormat, Value};

/// Passes raw values through unchanged. Used for columns that need no
/// display treatment, such as primary keys prepended for bookkeeping.
pub struct RawFormatter {
    field_names: Vec<String>,
}

impl RawFormatter {
    pub fn new(keys: Vec<String>) -> Self {
        Self { field_names: keys }
    }

    pub fn factory(options: FormatterOptions<'_>) -> Result<Box<dyn Formatter>, FormatError> {
        let keys = match (options.keys, options.concept) {
            (Some(keys), _) => keys,
            (None, Some(concept)) => concept
                .ordered_fields()
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            (None, None) => return Err(FormatError::MissingKeys),
        };
        Ok(Box::new(RawFormatter::new(keys)))
    }
}

impl Formatter for RawFormatter {
    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn format(
        &self,
        values: &[Value],
        _params: Option<&FormatParams>,
    ) -> Result<Vec<Value>, FormatError> {
        if values.len() != self.field_names.len() {
            return Err(FormatError::Width {
                formatter: "raw".to_string(),
                expected: self.field_names.len(),
                actual: values.len(),
            });
        }
        Ok(values.to_vec())
    }
}

/// Formats a concept's fields according to their declared datatypes and
/// the preferred output formats.
pub struct ConceptFormatter {
    field_names: Vec<String>,
    datatypes: Vec<DataType>,
    formats: Vec<OutputFormat>,
}

impl ConceptFormatter {
    pub fn factory(options: FormatterOptions<'_>) -> Result<Box<dyn Formatter>, FormatError> {
        let concept = options.concept.ok_or(FormatError::MissingKeys)?;
        let fields = concept.ordered_fields();

        Ok(Box::new(ConceptFormatter {
            field_names: fields.iter().map(|f| f.name.clone()).collect(),
            datatypes: fields.iter().map(|f| f.datatype).collect(),
            formats: options.formats,
        }))
    }

    fn preferred(&self) -> OutputFormat {
        self.formats.first().copied().unwrap_or(OutputFormat::Machine)
    }

    fn format_value(&self, value: &Value, datatype: DataType) -> Value {
        match self.preferred() {
            OutputFormat::Machine => value.clone(),
            OutputFormat::Human => match value {
                // "No value" renders as empty text, consistently.
                Value::Null => Value::Text(String::new()),
                Value::Bool(b) => Value::Text(if *b { "Yes" } else { "No" }.to_string()),
                Value::Text(s) if datatype.is_numeric() => {
                    // Numeric data occasionally arrives as text; keep the
                    // display numeric when it parses cleanly.
                    match s.trim().parse::<f64>() {
                        Ok(parsed) if datatype == DataType::Integer => {
                            Value::Text(format!("{}", parsed as i64))
                        }
                        Ok(parsed) => Value::Text(format!("{parsed}")),
                        Err(_) => value.clone(),
                    }
                }
                other => Value::Text(other.to_string()),
            },
        }
    }
}

impl Formatter for ConceptFormatter {
    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn format(
        &self,
        values: &[Value],
        _params: Option<&FormatParams>,
    ) -> Result<Vec<Value>, FormatError> {
        if values.len() != self.field_names.len() {
            return Err(FormatError::Width {
                formatter: "concept".to_string(),
                expected: self.field_names.len(),
                actual: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(self.datatypes.iter())
            .map(|(value, datatype)| self.format_value(value, *datatype))
            .collect())
    }
}
