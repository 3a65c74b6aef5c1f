//! JSON export sink.

use super::exporter::{Exporter, ExportError, Row};
use crate::formatters::FormatParams;
use anyhow::Context;
use serde_json::{Map, Value as JsonValue};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serializes formatted rows as a JSON array of header-keyed objects.
pub struct JsonExporter;

impl JsonExporter {
    /// Collects all rows into header-keyed objects. Duplicate header names
    /// keep the last value, matching object-key semantics.
    pub fn to_objects<I>(
        exporter: &Exporter,
        rows: I,
        params: Option<&FormatParams>,
    ) -> Result<Vec<JsonValue>, ExportError>
    where
        I: IntoIterator<Item = Row>,
    {
        let header = exporter.header();
        let mut objects = Vec::new();

        for row in exporter.read(rows, params) {
            let row = row?;
            let mut object = Map::with_capacity(header.len());
            for (name, value) in header.iter().zip(&row) {
                object.insert(name.clone(), value.to_json());
            }
            objects.push(JsonValue::Object(object));
        }

        Ok(objects)
    }

    pub fn write<W, I>(
        exporter: &Exporter,
        rows: I,
        params: Option<&FormatParams>,
        out: &mut W,
    ) -> Result<usize, ExportError>
    where
        W: Write,
        I: IntoIterator<Item = Row>,
    {
        let objects = Self::to_objects(exporter, rows, params)?;
        let count = objects.len();
        serde_json::to_writer_pretty(out, &objects)?;
        Ok(count)
    }

    pub fn write_file<I>(
        exporter: &Exporter,
        rows: I,
        params: Option<&FormatParams>,
        path: &Path,
    ) -> anyhow::Result<usize>
    where
        I: IntoIterator<Item = Row>,
    {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);

        let count = Self::write(exporter, rows, params, &mut writer)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush JSON file: {}", path.display()))?;

        info!("Wrote {} JSON rows to {}", count, path.display());
        Ok(count)
    }
}
