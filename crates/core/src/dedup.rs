//! CVE row deduplication
//!
//! The fold keeps an owned list of canonical rows in first-seen order and a
//! map from dedupe key to that row's index. Later rows with the same key are
//! merged into the canonical row instead of being emitted.

use crate::config::DedupConfig;
use crate::key::KeyPolicy;
use crate::{Error, Result};
use ahash::AHashMap;
use cvedup_formats::{Row, Table};
use tracing::{debug, info};

/// Statistics for a deduplication run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Rows in the input table
    pub total_rows: usize,
    /// Non-CVE rows copied through untouched
    pub passthrough_rows: usize,
    /// Rows whose title marks them as CVE findings
    pub cve_rows: usize,
    /// Distinct dedupe keys, i.e. CVE rows in the output
    pub unique_keys: usize,
    /// CVE rows folded into an earlier row
    pub merged_rows: usize,
}

impl DedupStats {
    /// Percentage of CVE rows that were merged away
    pub fn dedup_rate(&self) -> f64 {
        if self.cve_rows == 0 {
            0.0
        } else {
            (self.merged_rows as f64 / self.cve_rows as f64) * 100.0
        }
    }

    /// Rows in the output table
    pub fn output_rows(&self) -> usize {
        self.passthrough_rows + self.unique_keys
    }
}

/// Collapses CVE rows sharing a dedupe key onto the first such row
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DedupConfig,
}

impl Deduplicator {
    /// Create a deduplicator, rejecting invalid settings
    pub fn new(config: DedupConfig) -> Result<Self> {
        config.validate()?;
        info!("Creating Deduplicator with policy {}", config.policy);
        Ok(Self { config })
    }

    /// Default column names and markers with the given key policy
    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            config: DedupConfig::with_policy(policy),
        }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Whether the row's title starts with the CVE prefix (exact, untrimmed)
    pub fn is_cve(&self, row: &Row) -> bool {
        row.get(&self.config.columns.title)
            .is_some_and(|t| t.starts_with(self.config.cve_prefix.as_str()))
    }

    /// Dedupe key of a CVE row
    pub fn key_for(&self, row: &Row) -> Result<String> {
        let cols = &self.config.columns;
        let resource_id = row
            .get(&cols.resource_id)
            .ok_or_else(|| Error::MissingField {
                column: cols.resource_id.clone(),
                line: Some(row.source_line),
            })?;
        let title = row.get(&cols.title).unwrap_or_default();

        Ok(self
            .config
            .policy
            .derive_key(resource_id, title, &self.config.hash_marker))
    }

    /// Deduplicate a table, discarding statistics
    pub fn dedupe(&self, table: Table) -> Result<Table> {
        self.run(table).map(|(table, _)| table)
    }

    /// Deduplicate a table.
    ///
    /// Output is every non-CVE row in input order followed by one row per
    /// dedupe key in first-seen order.
    pub fn run(&self, table: Table) -> Result<(Table, DedupStats)> {
        let mut stats = DedupStats::default();

        let (columns, rows) = table.into_parts();
        self.check_schema(&columns)?;

        let tracks_resources = self.config.policy.tracks_resource_ids();
        let appended_col = &self.config.columns.appended_resource_ids;

        let mut passthrough: Vec<Row> = Vec::new();
        let mut canonical: Vec<Row> = Vec::new();
        let mut slots: AHashMap<String, usize> = AHashMap::new();

        for mut row in rows {
            stats.total_rows += 1;

            if !self.is_cve(&row) {
                passthrough.push(row);
                continue;
            }
            stats.cve_rows += 1;

            let key = self.key_for(&row)?;
            match slots.get(&key) {
                Some(&slot) => {
                    debug!(
                        "Merging line {} into line {} (key {:?})",
                        row.source_line, canonical[slot].source_line, key
                    );
                    self.merge_into(&mut canonical[slot], &row)?;
                    stats.merged_rows += 1;
                }
                None => {
                    // Rows from an earlier run already carry their tracked ids.
                    if tracks_resources && row.get(appended_col).is_none() {
                        if let Some(resource_id) = row.get(&self.config.columns.resource_id) {
                            let resource_id = resource_id.to_string();
                            row.set(appended_col.as_str(), resource_id);
                        }
                    }
                    slots.insert(key, canonical.len());
                    canonical.push(row);
                }
            }
        }

        stats.passthrough_rows = passthrough.len();
        stats.unique_keys = canonical.len();

        info!(
            "Deduplicated {} CVE rows into {} ({} merged, {} passed through)",
            stats.cve_rows, stats.unique_keys, stats.merged_rows, stats.passthrough_rows
        );

        passthrough.extend(canonical);
        let mut output = Table::from_parts(columns, passthrough);
        if tracks_resources {
            output.add_column(appended_col);
        }
        Ok((output, stats))
    }

    fn check_schema(&self, columns: &[String]) -> Result<()> {
        for required in self.config.columns.required() {
            if !columns.iter().any(|c| c == required) {
                return Err(Error::MissingField {
                    column: required.to_string(),
                    line: None,
                });
            }
        }
        Ok(())
    }

    /// Fold `incoming` into the canonical row for its key
    fn merge_into(&self, canonical: &mut Row, incoming: &Row) -> Result<()> {
        let cols = &self.config.columns;
        let sep = &self.config.separator;

        let merged_gis = {
            let current = canonical
                .get(&cols.gis_id)
                .ok_or_else(|| null_merge(canonical, &cols.gis_id))?;
            let extra = incoming
                .get(&cols.gis_id)
                .ok_or_else(|| null_merge(incoming, &cols.gis_id))?;
            format!("{}{}{}", current, sep, extra)
        };
        canonical.set(cols.gis_id.as_str(), merged_gis);

        if self.config.policy.tracks_resource_ids() {
            let extra = incoming
                .get(&cols.resource_id)
                .ok_or_else(|| Error::MissingField {
                    column: cols.resource_id.clone(),
                    line: Some(incoming.source_line),
                })?;
            let merged = match canonical.get(&cols.appended_resource_ids) {
                Some(current) => format!("{}{}{}", current, sep, extra),
                None => extra.to_string(),
            };
            canonical.set(cols.appended_resource_ids.as_str(), merged);
        }

        Ok(())
    }
}

fn null_merge(row: &Row, column: &str) -> Error {
    Error::MalformedRow {
        line: row.source_line,
        reason: format!("null `{}` cannot be merged", column),
    }
}

/// Deduplicate `table` with default column names under `policy`
pub fn dedupe(table: Table, policy: KeyPolicy) -> Result<Table> {
    Deduplicator::with_policy(policy).dedupe(table)
}
