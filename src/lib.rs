//! Metadata-driven query translation and row export.
//!
//! Fields and concepts describe backing data; translators turn
//! (field, operator, value) conditions into backend-neutral filters;
//! formatters and exporters turn raw rows into exportable output.

pub mod config;
pub mod export;
pub mod formatters;
pub mod models;
pub mod query;
pub mod registry;

// Re-export the main entry points at the crate root
pub use config::Settings;
pub use export::{CsvExporter, ExportError, Exporter, JsonExporter, ManualReadOptions};
pub use formatters::{FormatError, Formatter, FormatterRegistry, default_registry};
pub use models::{Concept, DataField, DataType, OutputFormat, QueryValue, Value};
pub use query::{TranslateContext, TranslatedCondition, TranslatorRegistry};
pub use registry::{Registry, RegistryError};
