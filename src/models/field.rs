use super::enums::DataType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marks a field as reached through a relationship rather than living on
/// the root model. `key_field` is the identifying column of the join target
/// and backs the not-null guard emitted for null-value conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    #[serde(default = "default_key_field")]
    pub key_field: String,
}

impl Relation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: default_key_field(),
        }
    }
}

fn default_key_field() -> String {
    "id".to_string()
}

/// Describes the significance of a unit of data and where it lives, e.g.
/// the `salary` column of the `title` table. Immutable during a
/// translation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataField {
    pub id: Uuid,
    /// Display name, exposed in headers and the language echo.
    pub name: String,
    pub model_name: String,
    pub field_name: String,
    pub datatype: DataType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Whether the field holds a discrete vocabulary suitable for choices.
    #[serde(default)]
    pub enumerable: bool,
    /// Identifier of a registered translator. Unset fields use the
    /// datatype-appropriate default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl DataField {
    pub fn new(
        model_name: impl Into<String>,
        field_name: impl Into<String>,
        datatype: DataType,
    ) -> Self {
        let field_name = field_name.into();
        Self {
            id: Uuid::new_v4(),
            name: field_name.clone(),
            model_name: model_name.into(),
            field_name,
            datatype,
            nullable: true,
            enumerable: false,
            translator: None,
            relation: None,
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Natural key, used when fields are referenced across systems.
    pub fn natural_key(&self) -> (&str, &str) {
        (&self.model_name, &self.field_name)
    }

    /// Dotted lookup path for the backend predicate, e.g. `title.salary`
    /// for a related field or `first_name` for a root-model column.
    pub fn path(&self) -> String {
        match &self.relation {
            Some(relation) => format!("{}.{}", relation.name, self.field_name),
            None => self.field_name.clone(),
        }
    }

    /// Lookup path of the relation's identifying column, e.g. `title.id`.
    /// `None` for fields that are not reached through a relationship.
    pub fn relation_key_path(&self) -> Option<String> {
        self.relation
            .as_ref()
            .map(|relation| format!("{}.{}", relation.name, relation.key_field))
    }

    /// Convenience method for translating a query condition against this
    /// field through a translator registry.
    pub fn translate(
        &self,
        translators: &crate::query::TranslatorRegistry,
        operator: Option<&str>,
        value: &crate::models::QueryValue,
        ctx: &crate::query::TranslateContext,
    ) -> Result<crate::query::TranslatedCondition, crate::query::TranslateError> {
        translators.translate(self, operator, value, ctx)
    }
}

/// Boundary contract for resolving field references in condition trees.
/// Implemented here over an in-memory catalog; an embedding application
/// may back it with its own metadata store.
pub trait FieldProvider {
    fn field_by_name(&self, name: &str) -> Option<&DataField>;
    fn field_by_id(&self, id: Uuid) -> Option<&DataField>;
}

/// In-memory field catalog.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<DataField>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: DataField) {
        self.fields.push(field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldProvider for FieldCatalog {
    /// Resolves a bare field name or a dotted `model.field` natural key.
    fn field_by_name(&self, name: &str) -> Option<&DataField> {
        if let Some((model_name, field_name)) = name.split_once('.') {
            return self
                .fields
                .iter()
                .find(|f| f.model_name == model_name && f.field_name == field_name);
        }
        self.fields.iter().find(|f| f.field_name == name)
    }

    fn field_by_id(&self, id: Uuid) -> Option<&DataField> {
        self.fields.iter().find(|f| f.id == id)
    }
}
