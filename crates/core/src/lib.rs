//! Core deduplication logic for CVE finding exports
//!
//! Rows whose title names a CVE are collapsed onto the first row seen for the
//! same resource (and, optionally, the same title), accumulating the merged
//! rows' identifiers. Everything else passes through untouched.

pub mod config;
pub mod dedup;
pub mod error;
pub mod key;

pub use config::{ColumnNames, DedupConfig};
pub use dedup::{dedupe, DedupStats, Deduplicator};
pub use error::{Error, Result};
pub use key::{derive_key, KeyPolicy};
