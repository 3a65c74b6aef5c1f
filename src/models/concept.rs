use super::field::DataField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Associates a field with a concept at a display position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptField {
    pub field: DataField,
    pub order: f64,
}

/// An ordered grouping of fields presented together and formatted as a
/// unit. The concept's formatter identifier is resolved against the
/// formatter registry when an exporter is built; an unknown identifier is
/// a fatal configuration error at that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub formatter: String,
    #[serde(default)]
    pub fields: Vec<ConceptField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Concept {
    pub fn new(name: impl Into<String>, formatter: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            formatter: formatter.into(),
            fields: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn add_field(&mut self, field: DataField, order: f64) {
        self.fields.push(ConceptField { field, order });
        self.updated_at = Utc::now();
    }

    /// Fields sorted by their declared display order.
    pub fn ordered_fields(&self) -> Vec<&DataField> {
        let mut fields: Vec<&ConceptField> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.order.total_cmp(&b.order));
        fields.into_iter().map(|cf| &cf.field).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
