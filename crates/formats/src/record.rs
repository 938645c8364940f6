//! Row data structure for a single finding record

use ahash::AHashMap;

/// A single row of a table.
///
/// Null cells are not stored, so [`Row::get`] returns `None` both for a null
/// value and for a column the row never had.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: AHashMap<String, String>,
    /// Line in the source file, header being line 1 (0 for rows built in memory)
    pub source_line: usize,
}

impl Row {
    /// Create an empty row
    pub fn new(source_line: usize) -> Self {
        Self {
            values: AHashMap::new(),
            source_line,
        }
    }

    /// Build an in-memory row from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values,
            source_line: 0,
        }
    }

    /// Get a non-null value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Null out a column
    pub fn clear(&mut self, column: &str) {
        self.values.remove(column);
    }

    /// Names of the columns holding a non-null value, in arbitrary order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

// Rows compare by content only; where they came from does not matter.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Row {}
