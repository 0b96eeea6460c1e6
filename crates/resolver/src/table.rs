//! Static redirect table
//!
//! The table is loaded once at process start from a JSON file shaped as
//!
//! ```json
//! {
//!   "redirects": { "go": { "ww": ["https://a.com", "https://b.com/{tenant}"] } },
//!   "alias": { "g": "go" }
//! }
//! ```
//!
//! and is immutable afterwards. Unknown cloud keys and malformed target
//! lists are rejected at load time rather than discovered per request.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::cloud::CloudEnvironment;
use crate::error::TableError;

/// Raw on-disk shape, prior to validation.
#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    redirects: HashMap<String, HashMap<String, Vec<String>>>,
    #[serde(default)]
    alias: HashMap<String, String>,
}

/// Validated target templates for one short under one cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    /// Tenant-agnostic destination (list index 0).
    pub primary: String,
    /// Tenant-aware destination template (list index 1), expected to
    /// carry a `{tenant}` or `{tenantId}` placeholder.
    pub tenant_template: Option<String>,
}

/// Immutable mapping from short keys to per-cloud targets, plus a
/// single-indirection alias map. All keys are lowercase.
#[derive(Debug, Default)]
pub struct RedirectTable {
    entries: HashMap<String, HashMap<CloudEnvironment, TargetSet>>,
    aliases: HashMap<String, String>,
}

impl RedirectTable {
    /// Load and validate the table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate the table from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, TableError> {
        let raw: RawTable = serde_json::from_str(content)?;

        let mut entries: HashMap<String, HashMap<CloudEnvironment, TargetSet>> = HashMap::new();
        for (short, clouds) in raw.redirects {
            let short = short.to_lowercase();
            let mut per_cloud = HashMap::new();
            for (cloud_key, targets) in clouds {
                let cloud = CloudEnvironment::from_code(&cloud_key).ok_or_else(|| {
                    TableError::UnknownCloud {
                        short: short.clone(),
                        cloud: cloud_key.clone(),
                    }
                })?;
                let target_set = match targets.as_slice() {
                    [primary] => TargetSet {
                        primary: primary.clone(),
                        tenant_template: None,
                    },
                    [primary, tenant_template] => TargetSet {
                        primary: primary.clone(),
                        tenant_template: Some(tenant_template.clone()),
                    },
                    _ => {
                        return Err(TableError::InvalidTargets {
                            short,
                            cloud: cloud_key,
                            len: targets.len(),
                        })
                    }
                };
                per_cloud.insert(cloud, target_set);
            }
            entries.insert(short, per_cloud);
        }

        let mut aliases = HashMap::new();
        for (alias, canonical) in raw.alias {
            let alias = alias.to_lowercase();
            let canonical = canonical.to_lowercase();
            if !entries.contains_key(&canonical) {
                // Kept, not rejected: it simply resolves to not-found,
                // which also keeps alias chains from being followed.
                tracing::warn!(
                    alias = %alias,
                    canonical = %canonical,
                    "alias points at a short with no redirect entry"
                );
            }
            aliases.insert(alias, canonical);
        }

        Ok(Self { entries, aliases })
    }

    /// Look up a short key, following at most one alias indirection.
    ///
    /// The alias target is re-looked only in the redirect map, so an
    /// alias pointing at another alias is not found.
    pub fn lookup(&self, short: &str) -> Option<&HashMap<CloudEnvironment, TargetSet>> {
        if let Some(entry) = self.entries.get(short) {
            return Some(entry);
        }
        self.aliases
            .get(short)
            .and_then(|canonical| self.entries.get(canonical))
    }

    /// Number of redirect entries (not counting aliases).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
