//! Ordered table of rows

use crate::Row;

/// An ordered sequence of rows plus the ordered list of column names.
///
/// The column list is the union of every row's columns. Row order is kept
/// exactly as pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with a fixed header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Assemble a table from a header and rows already known to fit it
    pub fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Split into header and rows
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Append a row, extending the header with any column it introduces
    pub fn push(&mut self, row: Row) {
        let mut unknown: Vec<String> = row
            .columns()
            .filter(|c| !self.has_column(c))
            .map(str::to_string)
            .collect();
        // Row columns come out of a hash map; sort so the header is stable.
        unknown.sort();
        self.columns.extend(unknown);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a column to the header; no-op if it already exists
    pub fn add_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
