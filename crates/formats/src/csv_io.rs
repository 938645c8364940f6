//! CSV reading and writing for finding tables
//!
//! Empty cells are read as null and nulls are written back as empty cells.
//! Writes go through a temporary file in the destination directory, so the
//! target path either receives the complete table or is left untouched.

use crate::{Error, Result, Row, Table};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Read a CSV file with a header row into a [`Table`]
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Reading table: {:?}", path);
    read_table_from(file)
}

/// Read CSV data with a header row from any reader
pub fn read_table_from<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    reject_duplicate_columns(&columns)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(classify)?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let mut row = Row::new(line);
        for (column, value) in columns.iter().zip(record.iter()) {
            if !value.is_empty() {
                row.set(column.as_str(), value);
            }
        }
        rows.push(row);
    }

    debug!("Read {} rows across {} columns", rows.len(), columns.len());
    Ok(Table::from_parts(columns, rows))
}

/// Write a table to `path`, replacing the file only once every row is written
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_table_to(table, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    info!("Wrote {} rows to {:?}", table.len(), path);
    Ok(())
}

/// Write a table as CSV to any writer
pub fn write_table_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    if !table.columns().is_empty() {
        csv_writer.write_record(table.columns())?;
    }
    for row in table.rows() {
        csv_writer.write_record(table.columns().iter().map(|c| row.get(c).unwrap_or("")))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Cells are keyed by column name, so a repeated header would drop values
fn reject_duplicate_columns(columns: &[String]) -> Result<()> {
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(Error::MalformedRow {
                line: 1,
                reason: format!("duplicate column `{}` in header", column),
            });
        }
    }
    Ok(())
}

/// Turn ragged rows into a line-tagged error, pass everything else through
fn classify(err: csv::Error) -> Error {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => Error::MalformedRow {
            line: pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
            reason: format!("expected {} fields, found {}", expected_len, len),
        },
        _ => Error::Csv(err),
    }
}
