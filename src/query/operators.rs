use super::translators::TranslateError;
use serde::{Deserialize, Serialize};

/// Backend-neutral comparison lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    In,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    Range,
    IsNull,
}

impl Lookup {
    /// Whether this lookup takes a list of values rather than a scalar.
    pub fn takes_list(self) -> bool {
        matches!(self, Lookup::In | Lookup::Range)
    }
}

/// A parsed operator: a lookup plus negation.
///
/// Parsed from the string form callers supply with conditions, e.g.
/// `"exact"`, `"-exact"`, `"in"`, `"gte"`. An omitted or empty operator
/// defaults to exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub lookup: Lookup,
    pub negated: bool,
}

impl Operator {
    pub fn exact() -> Self {
        Self {
            lookup: Lookup::Exact,
            negated: false,
        }
    }

    pub fn parse(raw: Option<&str>) -> Result<Self, TranslateError> {
        let raw = match raw {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => return Ok(Self::exact()),
        };

        let (negated, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let lookup = match name {
            "exact" => Lookup::Exact,
            "iexact" => Lookup::IExact,
            "contains" | "icontains" => Lookup::Contains,
            "in" => Lookup::In,
            "lt" => Lookup::LessThan,
            "lte" => Lookup::LessThanOrEqual,
            "gt" => Lookup::GreaterThan,
            "gte" => Lookup::GreaterThanOrEqual,
            "range" => Lookup::Range,
            "isnull" => Lookup::IsNull,
            _ => return Err(TranslateError::UnknownOperator(raw.to_string())),
        };

        Ok(Self { lookup, negated })
    }

    /// Human-readable verb for the language echo.
    pub fn verb(&self) -> &'static str {
        match (self.lookup, self.negated) {
            (Lookup::Exact, false) => "is equal to",
            (Lookup::Exact, true) => "is not equal to",
            (Lookup::IExact, false) => "matches",
            (Lookup::IExact, true) => "does not match",
            (Lookup::Contains, false) => "contains",
            (Lookup::Contains, true) => "does not contain",
            (Lookup::In, false) => "is in",
            (Lookup::In, true) => "is not in",
            (Lookup::LessThan, false) => "is less than",
            (Lookup::LessThan, true) => "is not less than",
            (Lookup::LessThanOrEqual, false) => "is less than or equal to",
            (Lookup::LessThanOrEqual, true) => "is not less than or equal to",
            (Lookup::GreaterThan, false) => "is greater than",
            (Lookup::GreaterThan, true) => "is not greater than",
            (Lookup::GreaterThanOrEqual, false) => "is greater than or equal to",
            (Lookup::GreaterThanOrEqual, true) => "is not greater than or equal to",
            (Lookup::Range, false) => "is between",
            (Lookup::Range, true) => "is not between",
            (Lookup::IsNull, false) => "is null",
            (Lookup::IsNull, true) => "is not null",
        }
    }
}
