//! Shared application state

use std::sync::Arc;

use navms_resolver::{CloudResolver, RedirectTable, Resolver, TableError};

use crate::config::Config;

/// State shared by all request handlers. The redirect table is loaded
/// once and never mutated, so handlers share it without locks.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub fallback_url: Arc<str>,
}

impl AppState {
    /// Build state from config, loading the redirect table from disk.
    pub fn from_config(config: &Config) -> Result<Self, TableError> {
        let table = Arc::new(RedirectTable::load(&config.redirects_path)?);
        tracing::info!(
            path = %config.redirects_path,
            shorts = table.len(),
            "redirect table loaded"
        );
        Ok(Self::new(table, config))
    }

    /// Build state around an already-loaded table (used by tests).
    pub fn new(table: Arc<RedirectTable>, config: &Config) -> Self {
        let directory = CloudResolver::new(&config.directory_endpoint, config.directory_timeout);
        Self {
            resolver: Resolver::new(table, directory),
            fallback_url: config.fallback_url.as_str().into(),
        }
    }
}
