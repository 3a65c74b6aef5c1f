// Models module - contains DataField, Concept, Value, and enums

pub mod concept;
pub mod enums;
pub mod field;
pub mod value;

pub use concept::{Concept, ConceptField};
pub use enums::{DataType, OutputFormat};
pub use field::{DataField, FieldCatalog, FieldProvider, Relation};
pub use value::{QueryValue, Value};
