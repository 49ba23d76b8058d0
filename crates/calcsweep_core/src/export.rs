//! Delimited text export of calculation rows.
//!
//! Format: one header line, then one line per row. Fields are joined by a
//! single delimiter with no trailing delimiter and no quoting. Numbers use
//! Rust's shortest round-trip float formatting, switching to exponent form for
//! very large or small magnitudes, so reading a file back gives the exact
//! values that were written. Rows with no fields produce no line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::model::RowResult;
use crate::sweep::RowSink;

/// Join `row` with `delimiter`.
#[must_use]
pub fn format_row(row: &[f64], delimiter: &str) -> String {
    let fields: Vec<String> = row.iter().map(|x| format!("{x:?}")).collect();
    fields.join(delimiter)
}

/// Buffered writer for a single export file.
///
/// The header line is written on creation. Call [`finish`](Self::finish) to
/// flush and observe errors; dropping the writer also flushes, but silently.
#[derive(Debug)]
pub struct ExportWriter {
    path: PathBuf,
    delimiter: String,
    out: BufWriter<File>,
    rows_written: usize,
}

impl ExportWriter {
    pub fn create<S: AsRef<str>>(
        path: impl Into<PathBuf>,
        delimiter: &str,
        headers: &[S],
    ) -> Result<Self, ExportError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| ExportError::io(&path, e))?;
        let mut out = BufWriter::new(file);

        let header_line: Vec<&str> = headers.iter().map(AsRef::as_ref).collect();
        writeln!(out, "{}", header_line.join(delimiter)).map_err(|e| ExportError::io(&path, e))?;

        Ok(Self {
            path,
            delimiter: delimiter.to_string(),
            out,
            rows_written: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered rows and close the file.
    pub fn finish(mut self) -> Result<usize, ExportError> {
        self.out
            .flush()
            .map_err(|e| ExportError::io(&self.path, e))?;
        Ok(self.rows_written)
    }
}

impl RowSink for ExportWriter {
    fn write_row(&mut self, row: &[f64]) -> io::Result<()> {
        if row.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{}", format_row(row, &self.delimiter))?;
        self.rows_written += 1;
        Ok(())
    }
}

/// Write a complete table in one go.
pub fn write_delimited<S: AsRef<str>>(
    path: impl Into<PathBuf>,
    delimiter: &str,
    headers: &[S],
    rows: &[RowResult],
) -> Result<usize, ExportError> {
    let mut writer = ExportWriter::create(path, delimiter, headers)?;
    for row in rows {
        writer
            .write_row(row)
            .map_err(|e| ExportError::io(writer.path(), e))?;
    }
    writer.finish()
}

/// Headers and rows read back from an export file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DelimitedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RowResult>,
}

/// Parse an export file written with `delimiter`.
pub fn read_delimited(path: impl AsRef<Path>, delimiter: &str) -> Result<DelimitedTable, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let mut lines = BufReader::new(file).lines();

    let header_line = match lines.next() {
        Some(line) => line.map_err(|e| ExportError::io(path, e))?,
        None => {
            return Err(ExportError::MissingHeader {
                path: path.to_path_buf(),
            });
        }
    };
    let headers = split_fields(&header_line, delimiter)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line.map_err(|e| ExportError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = split_fields(&line, delimiter)
            .map(|field| {
                field.trim().parse::<f64>().map_err(|_| ExportError::Parse {
                    path: path.to_path_buf(),
                    line: offset + 2,
                    field: field.to_string(),
                })
            })
            .collect::<Result<RowResult, _>>()?;
        rows.push(row);
    }

    Ok(DelimitedTable { headers, rows })
}

fn split_fields<'a>(line: &'a str, delimiter: &'a str) -> impl Iterator<Item = &'a str> {
    line.split(delimiter).filter(|field| !field.is_empty())
}
