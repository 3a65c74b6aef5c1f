//! The row pipeline: composes formatters in declaration order and streams
//! raw rows through them.
//!
//! Every read strategy consumes its input iterable once and yields a
//! finite, ordered, non-restartable sequence of formatted rows. The
//! format cache belongs to one exporter instance, is reset at the start of
//! each cached read, and is unbounded for the duration of that read.
//! Concurrent reads against the same instance are unsupported; construct
//! separate exporters for concurrent jobs.

use crate::formatters::{FormatError, FormatParams, Formatter, FormatterOptions, FormatterRegistry};
use crate::models::{Concept, OutputFormat, Value};
use crate::registry::RegistryError;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Export pipeline errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Concept references a formatter identifier that is not registered
    #[error(transparent)]
    UnknownFormatter(#[from] RegistryError),
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Row is narrower than the exporter's declared row width
    #[error("Row has {actual} values, exporter expects {expected}")]
    RowWidth { expected: usize, actual: usize },
    #[error("Failed to start worker pool: {0}")]
    Pool(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A formatted output row.
pub type Row = Vec<Value>;

/// One result row or the error that produced it. Pooled reads carry
/// per-row errors through in order rather than swallowing them.
pub type RowResult = Result<Row, ExportError>;

/// Options for `manual_read`.
#[derive(Debug, Clone, Copy)]
pub struct ManualReadOptions {
    /// De-duplicate rows by their truncated value tuple, first seen wins.
    pub force_distinct: bool,
    /// Skip rows whose original enumeration index is below this.
    pub offset: Option<usize>,
    /// Stop after this many rows have been emitted.
    pub limit: Option<usize>,
}

impl Default for ManualReadOptions {
    fn default() -> Self {
        Self {
            force_distinct: true,
            offset: None,
            limit: None,
        }
    }
}

struct ExportParam {
    formatter: Box<dyn Formatter>,
    length: usize,
}

type CacheKey = (usize, Vec<Value>);

/// Composes formatters into a header and a row-formatting pipeline.
pub struct Exporter {
    params: Vec<ExportParam>,
    row_length: usize,
    header: Vec<String>,
    format_cache: HashMap<CacheKey, Vec<Value>>,
    /// Name passed to formatters via `get_meta`, letting them specialize
    /// per sink.
    pub short_name: String,
}

impl Exporter {
    /// Builds an exporter from an ordered concept list. An unknown
    /// formatter identifier fails here, not at the first row: silently
    /// skipping it would silently drop columns from the output.
    pub fn new(
        concepts: &[Concept],
        registry: &FormatterRegistry,
        formats: &[OutputFormat],
    ) -> Result<Self, ExportError> {
        let mut exporter = Self::empty();

        for concept in concepts {
            let factory = registry.get(&concept.formatter)?;
            let formatter = factory(FormatterOptions::for_concept(concept, formats.to_vec()))?;
            exporter.add_formatter(formatter, None);
        }

        info!(
            "Built exporter with {} formatters, row length {}",
            exporter.params.len(),
            exporter.row_length
        );

        Ok(exporter)
    }

    /// An exporter with no formatters; add them with `add_formatter`.
    pub fn empty() -> Self {
        Self {
            params: Vec::new(),
            row_length: 0,
            header: Vec::new(),
            format_cache: HashMap::new(),
            short_name: "base".to_string(),
        }
    }

    /// Adds a formatter, updating row width, header, and params in place.
    /// `index` inserts at a position instead of appending.
    pub fn add_formatter(&mut self, formatter: Box<dyn Formatter>, index: Option<usize>) {
        let length = formatter.field_names().len();
        let meta = formatter.get_meta(&self.short_name);

        self.row_length += length;

        match index {
            Some(index) => {
                // Header offset is the sum of the widths before the
                // insertion point.
                let offset: usize = self.params[..index].iter().map(|p| p.length).sum();
                self.params.insert(index, ExportParam { formatter, length });
                let tail = self.header.split_off(offset);
                self.header.extend(meta.header);
                self.header.extend(tail);
            }
            None => {
                self.params.push(ExportParam { formatter, length });
                self.header.extend(meta.header);
            }
        }
    }

    /// Aggregate header in declaration order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Total number of raw values consumed per row.
    pub fn row_length(&self) -> usize {
        self.row_length
    }

    fn format_row(&self, row: &[Value], params: Option<&FormatParams>) -> RowResult {
        if row.len() < self.row_length {
            return Err(ExportError::RowWidth {
                expected: self.row_length,
                actual: row.len(),
            });
        }

        let mut formatted = Vec::with_capacity(self.row_length);
        let mut rest = row;

        for param in &self.params {
            let (values, tail) = rest.split_at(param.length);
            rest = tail;
            formatted.extend(param.formatter.format(values, params)?);
        }

        Ok(formatted)
    }

    fn cache_format_row(&mut self, row: &[Value], params: Option<&FormatParams>) -> RowResult {
        if row.len() < self.row_length {
            return Err(ExportError::RowWidth {
                expected: self.row_length,
                actual: row.len(),
            });
        }

        let mut formatted = Vec::with_capacity(self.row_length);
        let mut rest = row;

        for (index, param) in self.params.iter().enumerate() {
            let (values, tail) = rest.split_at(param.length);
            rest = tail;

            let key = (index, values.to_vec());
            if let Some(segment) = self.format_cache.get(&key) {
                formatted.extend(segment.iter().cloned());
            } else {
                let segment = param.formatter.format(values, params)?;
                formatted.extend(segment.iter().cloned());
                self.format_cache.insert(key, segment);
            }
        }

        Ok(formatted)
    }

    fn cache_format_row_shared(
        &self,
        row: &[Value],
        params: Option<&FormatParams>,
        cache: &Mutex<HashMap<CacheKey, Vec<Value>>>,
    ) -> RowResult {
        if row.len() < self.row_length {
            return Err(ExportError::RowWidth {
                expected: self.row_length,
                actual: row.len(),
            });
        }

        let mut formatted = Vec::with_capacity(self.row_length);
        let mut rest = row;

        for (index, param) in self.params.iter().enumerate() {
            let (values, tail) = rest.split_at(param.length);
            rest = tail;

            let key = (index, values.to_vec());
            let cached = cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key)
                .cloned();

            match cached {
                Some(segment) => formatted.extend(segment),
                None => {
                    let segment = param.formatter.format(values, params)?;
                    formatted.extend(segment.iter().cloned());
                    cache
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(key, segment);
                }
            }
        }

        Ok(formatted)
    }

    /// Formats each row independently: sequential, no caching. The
    /// baseline correctness reference for the other strategies.
    pub fn read<'a, I>(
        &'a self,
        rows: I,
        params: Option<&'a FormatParams>,
    ) -> impl Iterator<Item = RowResult>
    where
        I: IntoIterator<Item = Row>,
    {
        rows.into_iter().map(move |row| self.format_row(&row, params))
    }

    /// Like `read`, but memoizes formatted segments per (formatter,
    /// value-slice) for the duration of this call. Pays memory for speed
    /// on repetitive data; output is identical to `read` for any input.
    pub fn cached_read<'a, I>(
        &'a mut self,
        rows: I,
        params: Option<&'a FormatParams>,
    ) -> CachedRead<'a, I::IntoIter>
    where
        I: IntoIterator<Item = Row>,
    {
        debug!("Resetting format cache for cached read");
        self.format_cache.clear();
        CachedRead {
            exporter: self,
            rows: rows.into_iter(),
            params,
        }
    }

    /// Formats rows on a bounded worker pool. Output order matches input
    /// order; the input is collected up front (pool map semantics), so
    /// this trades eagerness for parallelism.
    pub fn threaded_read<I>(
        &self,
        rows: I,
        threads: Option<usize>,
        params: Option<&FormatParams>,
    ) -> Result<std::vec::IntoIter<RowResult>, ExportError>
    where
        I: IntoIterator<Item = Row>,
    {
        let pool = build_pool(threads)?;
        let rows: Vec<Row> = rows.into_iter().collect();

        let results: Vec<RowResult> = pool.install(|| {
            rows.par_iter()
                .map(|row| self.format_row(row, params))
                .collect()
        });

        Ok(results.into_iter())
    }

    /// Combines `cached_read` and `threaded_read`: pooled formatting with
    /// a shared memoization cache for the duration of the call.
    pub fn cached_threaded_read<I>(
        &mut self,
        rows: I,
        threads: Option<usize>,
        params: Option<&FormatParams>,
    ) -> Result<std::vec::IntoIter<RowResult>, ExportError>
    where
        I: IntoIterator<Item = Row>,
    {
        debug!("Resetting format cache for cached threaded read");
        self.format_cache.clear();

        let pool = build_pool(threads)?;
        let rows: Vec<Row> = rows.into_iter().collect();
        let cache = Mutex::new(std::mem::take(&mut self.format_cache));

        let this: &Exporter = self;
        let results: Vec<RowResult> = pool.install(|| {
            rows.par_iter()
                .map(|row| this.cache_format_row_shared(row, params, &cache))
                .collect()
        });

        self.format_cache = cache.into_inner().unwrap_or_else(PoisonError::into_inner);

        Ok(results.into_iter())
    }

    /// Reads rows that carry extra trailing columns used only for backend
    /// ordering. Each row is truncated to the declared row width before
    /// formatting and before any distinctness, offset, or limit handling,
    /// so ordering columns never leak into the output or affect
    /// de-duplication.
    ///
    /// Offset compares against the original enumeration index; limit
    /// counts emitted rows. Rows removed by distinctness still advance the
    /// enumeration index.
    pub fn manual_read<'a, I>(
        &'a self,
        rows: I,
        options: ManualReadOptions,
        params: Option<&'a FormatParams>,
    ) -> ManualRead<'a, I::IntoIter>
    where
        I: IntoIterator<Item = Row>,
    {
        ManualRead {
            exporter: self,
            rows: rows.into_iter(),
            options,
            params,
            index: 0,
            emitted: 0,
            seen: HashSet::new(),
        }
    }
}

fn build_pool(threads: Option<usize>) -> Result<rayon::ThreadPool, ExportError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    builder.build().map_err(|e| ExportError::Pool(e.to_string()))
}

/// Lazy iterator behind `Exporter::cached_read`.
pub struct CachedRead<'a, I> {
    exporter: &'a mut Exporter,
    rows: I,
    params: Option<&'a FormatParams>,
}

impl<'a, I> Iterator for CachedRead<'a, I>
where
    I: Iterator<Item = Row>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(self.exporter.cache_format_row(&row, self.params))
    }
}

/// Lazy iterator behind `Exporter::manual_read`.
pub struct ManualRead<'a, I> {
    exporter: &'a Exporter,
    rows: I,
    options: ManualReadOptions,
    params: Option<&'a FormatParams>,
    index: usize,
    emitted: usize,
    seen: HashSet<u64>,
}

impl<'a, I> Iterator for ManualRead<'a, I>
where
    I: Iterator<Item = Row>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(limit) = self.options.limit
                && self.emitted >= limit
            {
                return None;
            }

            let mut row = self.rows.next()?;
            let index = self.index;
            self.index += 1;

            // Ordering-only trailing columns are cut before anything else.
            row.truncate(self.exporter.row_length);

            if row.len() < self.exporter.row_length {
                self.emitted += 1;
                return Some(Err(ExportError::RowWidth {
                    expected: self.exporter.row_length,
                    actual: row.len(),
                }));
            }

            if self.options.force_distinct {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                row.hash(&mut hasher);
                if !self.seen.insert(hasher.finish()) {
                    continue;
                }
            }

            // Offset counts the original enumeration index, not survivors.
            if self.options.offset.is_none_or(|offset| index >= offset) {
                self.emitted += 1;
                return Some(self.exporter.format_row(&row, self.params));
            }
        }
    }
}
