//! Tabular data model and CSV readers/writers for finding exports
//!
//! This crate owns the in-memory [`Table`] that the deduplication engine
//! transforms, plus the CSV plumbing that loads and stores it.

pub mod csv_io;
pub mod error;
pub mod record;
pub mod table;

pub use csv_io::{read_table, read_table_from, write_table, write_table_to};
pub use error::{Error, Result};
pub use record::Row;
pub use table::Table;
