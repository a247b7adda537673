//! Show details cache in front of a content source.
//!
//! Resolved content is kept for a long TTL since published notes rarely
//! change. Shows that cannot be resolved get an empty placeholder with a short
//! TTL, so a missing post is not re-scraped on every request.
//!
//! There is no single-flight: concurrent misses for the same show may both
//! reach the source, and the last write wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::key::cache_key;
use super::store::CacheStore;
use crate::model::SHOW_DETAILS_KIND;
use crate::{ContentSource, Error, ShowDetails};

/// TTLs assigned at write time, by resolution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub found: Duration,
    pub missing: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self { found: Duration::from_secs(24 * 60 * 60), missing: Duration::from_secs(60 * 60) }
    }
}

/// Caching front for the active [`ContentSource`].
#[derive(Clone)]
pub struct ShowDetailsCache {
    source: Arc<dyn ContentSource>,
    store: Arc<dyn CacheStore>,
    ttl: CacheTtl,
}

impl ShowDetailsCache {
    pub fn new(source: Arc<dyn ContentSource>, store: Arc<dyn CacheStore>) -> Self {
        Self { source, store, ttl: CacheTtl::default() }
    }

    pub fn with_ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> CacheTtl {
        self.ttl
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    fn key(&self, show_id: &str) -> String {
        cache_key(self.source.name(), SHOW_DETAILS_KIND, show_id)
    }

    /// Load details for a show, resolving and caching on a miss.
    ///
    /// Never fails. Store errors are logged: a failed read counts as a miss
    /// and a failed write still returns the resolved value.
    pub async fn load(&self, show_id: &str, show_date: Option<DateTime<Utc>>) -> ShowDetails {
        let key = self.key(show_id);

        match self.store.get(&key).await {
            Ok(Some(details)) => {
                tracing::debug!(%key, "show details cache hit");
                return details;
            }
            Ok(None) => tracing::debug!(%key, "show details cache miss"),
            Err(e) => tracing::warn!(%key, error = %e, "show details cache read failed; resolving"),
        }

        let (details, ttl) = match self.source.resolve(show_id, show_date).await {
            Some(details) => (details, self.ttl.found),
            None => {
                tracing::debug!(%key, source = self.source.name(), "show details not found; caching placeholder");
                (ShowDetails::empty(show_id), self.ttl.missing)
            }
        };

        if let Err(e) = self.store.set(&key, &details, ttl).await {
            tracing::warn!(%key, error = %e, "show details cache write failed");
        }

        details
    }

    /// Always fails with [`Error::NotImplemented`]; sources are read-only.
    pub async fn save(&self, details: &ShowDetails) -> Result<(), Error> {
        self.source.save(details).await
    }

    /// Always fails with [`Error::NotImplemented`]; sources are read-only.
    pub async fn delete(&self, show_id: &str) -> Result<(), Error> {
        self.source.delete(show_id).await
    }

    /// Sweep expired entries from the underlying store.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        self.store.purge_expired().await
    }
}
