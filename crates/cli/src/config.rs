//! Configuration file support for deduplication runs

use anyhow::{Context, Result};
use cvedup_core::DedupConfig;
use std::path::Path;

/// Load dedupe settings from a YAML or TOML file
pub fn load(path: &Path) -> Result<DedupConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    match extension {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
        _ => Err(anyhow::anyhow!(
            "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
            extension
        )),
    }
}
