//! In-process cache store.
//!
//! A bounded moka cache with a per-entry expiry policy, so each entry keeps
//! the TTL it was written with. Expired entries are evicted by moka's
//! housekeeping, which runs alongside reads and writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;

use super::store::{CacheStore, check_ttl};
use crate::{Error, ShowDetails};

/// Default entry bound.
pub const DEFAULT_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    value: ShowDetails,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, entry: &Entry, _updated_at: Instant, _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache store shared by every request in the process.
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, Entry>,
    expired: Arc<AtomicU64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding at most `max_entries`; the least useful entries are
    /// evicted first once the bound is reached.
    pub fn with_capacity(max_entries: u64) -> Self {
        let expired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&expired);

        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .eviction_listener(move |_key, _entry, cause| {
                if cause == RemovalCause::Expired {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })
            .build();

        Self { cache, expired }
    }

    /// Number of live entries, after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<ShowDetails>, Error> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &ShowDetails, ttl: Duration) -> Result<(), Error> {
        check_ttl(ttl)?;
        self.cache
            .insert(key.to_string(), Entry { value: value.clone(), ttl })
            .await;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        let before = self.expired.load(Ordering::Relaxed);
        self.cache.run_pending_tasks().await;
        Ok(self.expired.load(Ordering::Relaxed).saturating_sub(before))
    }
}
