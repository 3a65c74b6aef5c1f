//! Export module: the row pipeline plus output sinks.

pub mod csv;
pub mod exporter;
pub mod json;

// Re-export for convenience
pub use csv::CsvExporter;
pub use exporter::{ExportError, Exporter, ManualReadOptions, Row, RowResult};
pub use json::JsonExporter;
