//! CSV export of list views.
//!
//! ```
//! use horizon_grid::file::export_csv;
//! use horizon_grid::model::Record;
//!
//! let records = vec![
//!     Record::new("P001").with("name", "Acme Corporation").with("city", "New York"),
//!     Record::new("P002").with("name", "Globex"),
//! ];
//!
//! let mut out = Vec::<u8>::new();
//! export_csv(&mut out, &records, &["id", "name", "city"])?;
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "id,name,city\nP001,Acme Corporation,New York\nP002,Globex,\n"
//! );
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use super::preferences::write_atomic;
use crate::error::{GridError, Result};
use crate::model::{ID_FIELD, Record};

/// Options for CSV export.
#[derive(Debug, Clone, Copy)]
pub struct CsvExportOptions {
    delimiter: u8,
    headers: bool,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            headers: true,
        }
    }
}

impl CsvExportOptions {
    /// Creates default options: comma-delimited with a header row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Omits the header row.
    pub fn no_headers(mut self) -> Self {
        self.headers = false;
        self
    }

    fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.delimiter);
        builder
    }
}

/// Column names for exporting `records` when none are given: `id` first,
/// then every other field name in lexicographic order.
pub fn default_columns<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let names: BTreeSet<&str> = records
        .into_iter()
        .flat_map(|r| r.field_names())
        .filter(|name| *name != ID_FIELD)
        .collect();
    std::iter::once(ID_FIELD)
        .chain(names)
        .map(str::to_string)
        .collect()
}

/// Writes `records` as CSV with a header row.
///
/// An empty `columns` list exports every field (see [`default_columns`]).
/// Missing and null values become empty cells.
pub fn export_csv<'a, W, I, S>(writer: W, records: I, columns: &[S]) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    export_csv_with_options(writer, records, columns, &CsvExportOptions::default())
}

/// Writes `records` as CSV using the given options.
pub fn export_csv_with_options<'a, W, I, S>(
    writer: W,
    records: I,
    columns: &[S],
    options: &CsvExportOptions,
) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    let records: Vec<&Record> = records.into_iter().collect();
    let columns: Vec<String> = if columns.is_empty() {
        default_columns(records.iter().copied())
    } else {
        columns.iter().map(|c| c.as_ref().to_string()).collect()
    };
    if columns.iter().any(|c| c.trim().is_empty()) {
        return Err(GridError::invalid_argument("export column name is empty"));
    }

    let mut csv_writer = options.writer_builder().from_writer(writer);
    if options.headers {
        csv_writer.write_record(&columns)?;
    }
    for record in &records {
        csv_writer.write_record(columns.iter().map(|c| record.value(c).text().into_owned()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| GridError::Csv(csv::Error::from(e)))?;

    tracing::debug!(
        target: "horizon_grid::file",
        rows = records.len(),
        columns = columns.len(),
        "exported csv"
    );
    Ok(())
}

/// Writes `records` as CSV to a file, atomically.
pub fn export_csv_file<'a, I, S>(path: impl AsRef<Path>, records: I, columns: &[S]) -> Result<()>
where
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    let mut buffer = Vec::new();
    export_csv(&mut buffer, records, columns)?;
    write_atomic(path.as_ref(), &buffer)
}
