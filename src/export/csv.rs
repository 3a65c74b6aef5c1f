//! CSV export sink.

use super::exporter::{Exporter, ExportError, Row};
use crate::formatters::FormatParams;
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Streams formatted rows as RFC 4180 style CSV: header line first, fields
/// quoted only when they contain a delimiter, quote, or newline.
pub struct CsvExporter;

impl CsvExporter {
    /// Writes the header and all rows to `out`, returning the number of
    /// data rows written.
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
        write_line(out, exporter.header().iter().map(String::as_str))?;

        let mut count = 0;
        for row in exporter.read(rows, params) {
            let row = row?;
            let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            write_line(out, fields.iter().map(String::as_str))?;
            count += 1;
        }

        Ok(count)
    }

    /// Writes CSV output to a file path.
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
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);

        let count = Self::write(exporter, rows, params, &mut writer)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;

        info!("Wrote {} CSV rows to {}", count, path.display());
        Ok(count)
    }
}

fn write_line<'a, W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> std::io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(b",")?;
        }
        first = false;
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            out.write_all(b"\"")?;
            out.write_all(field.replace('"', "\"\"").as_bytes())?;
            out.write_all(b"\"")?;
        } else {
            out.write_all(field.as_bytes())?;
        }
    }
    out.write_all(b"\r\n")
}
