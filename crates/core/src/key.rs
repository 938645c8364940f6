//! Dedupe key derivation
//!
//! Resource identifiers from container scanners often carry a content hash
//! (`...sha256:<digest>`) that changes on every rebuild of the same artifact.
//! The key keeps only what precedes the hash marker so re-scans group
//! together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker that starts the content-hash suffix of a resource identifier
pub const DEFAULT_HASH_MARKER: &str = "sha256";

/// How the dedupe key is built from a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Stripped resource identifier only
    #[default]
    ResourceOnly,
    /// Stripped resource identifier followed by the lower-cased title,
    /// so distinct CVEs on one resource stay separate
    ResourceTitle,
}

impl KeyPolicy {
    /// Whether merged rows also track their original resource identifiers
    pub fn tracks_resource_ids(self) -> bool {
        matches!(self, KeyPolicy::ResourceTitle)
    }

    /// Build the key for a resource/title pair using `marker` as the hash marker
    pub fn derive_key(self, resource_id: &str, title: &str, marker: &str) -> String {
        let resource = strip_hash_suffix(resource_id, marker);
        match self {
            KeyPolicy::ResourceOnly => resource.to_string(),
            KeyPolicy::ResourceTitle => {
                let mut key = String::with_capacity(resource.len() + title.len());
                key.push_str(resource);
                key.push_str(&title.to_lowercase());
                key
            }
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::ResourceOnly => write!(f, "resource-only"),
            KeyPolicy::ResourceTitle => write!(f, "resource-title"),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resource-only" | "a" | "A" => Ok(KeyPolicy::ResourceOnly),
            "resource-title" | "b" | "B" => Ok(KeyPolicy::ResourceTitle),
            _ => Err(format!(
                "unknown key policy '{}' (expected resource-only or resource-title)",
                s
            )),
        }
    }
}

/// Everything before the first `marker`, or the whole identifier if absent
pub fn strip_hash_suffix<'a>(resource_id: &'a str, marker: &str) -> &'a str {
    match resource_id.find(marker) {
        Some(idx) => &resource_id[..idx],
        None => resource_id,
    }
}

/// Derive a dedupe key with the default `sha256` marker
pub fn derive_key(resource_id: &str, title: &str, policy: KeyPolicy) -> String {
    policy.derive_key(resource_id, title, DEFAULT_HASH_MARKER)
}
