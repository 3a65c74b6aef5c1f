use serde::{Deserialize, Serialize};

/// Declared datatype of a data field.
///
/// This drives value coercion during translation and display rendering
/// during formatting. Dates and timestamps are carried as text/integer
/// values and compared by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Text,
    Date,
    Timestamp,
}

impl DataType {
    /// Whether values of this datatype compare numerically.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

/// Output rendering preference for formatters.
///
/// `Machine` keeps values as close to the raw data as possible;
/// `Human` renders display encodings (Yes/No booleans, empty nulls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Machine,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "machine" => Ok(OutputFormat::Machine),
            "human" => Ok(OutputFormat::Human),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}
