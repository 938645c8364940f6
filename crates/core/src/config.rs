//! Deduplication settings

use crate::key::{KeyPolicy, DEFAULT_HASH_MARKER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Names of the columns the engine reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub title: String,
    pub resource_id: String,
    pub gis_id: String,
    /// Written only under [`KeyPolicy::ResourceTitle`]
    pub appended_resource_ids: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            resource_id: "Resource ID".to_string(),
            gis_id: "GIS ID".to_string(),
            appended_resource_ids: "Appended Resource IDs".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns that must exist in the input header
    pub fn required(&self) -> [&str; 3] {
        [
            self.title.as_str(),
            self.resource_id.as_str(),
            self.gis_id.as_str(),
        ]
    }
}

/// Deduplication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub policy: KeyPolicy,
    pub columns: ColumnNames,
    /// Literal, case-sensitive title prefix marking a CVE row
    pub cve_prefix: String,
    /// Literal, case-sensitive marker where the resource hash suffix starts
    pub hash_marker: String,
    /// Joins accumulated identifiers
    pub separator: String,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            policy: KeyPolicy::default(),
            columns: ColumnNames::default(),
            cve_prefix: "CVE".to_string(),
            hash_marker: DEFAULT_HASH_MARKER.to_string(),
            separator: ", ".to_string(),
        }
    }
}

impl DedupConfig {
    /// Default settings with the given key policy
    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Reject settings that would make every row collide or vanish
    pub fn validate(&self) -> Result<()> {
        if self.cve_prefix.is_empty() {
            return Err(Error::InvalidConfig("cve_prefix must not be empty".to_string()));
        }
        if self.hash_marker.is_empty() {
            return Err(Error::InvalidConfig("hash_marker must not be empty".to_string()));
        }

        let cols = &self.columns;
        let names = [
            &cols.title,
            &cols.resource_id,
            &cols.gis_id,
            &cols.appended_resource_ids,
        ];
        if names.iter().any(|n| n.is_empty()) {
            return Err(Error::InvalidConfig("column names must not be empty".to_string()));
        }
        for (i, a) in names.iter().enumerate() {
            if names[i + 1..].contains(a) {
                return Err(Error::InvalidConfig(format!(
                    "column `{}` is configured for more than one role",
                    a
                )));
            }
        }

        Ok(())
    }
}
