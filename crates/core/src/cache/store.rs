//! Cache storage contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Error, ShowDetails};

/// Longest TTL a store accepts.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Reject TTLs a store cannot represent.
pub(crate) fn check_ttl(ttl: Duration) -> Result<(), Error> {
    if ttl > MAX_TTL {
        return Err(Error::InvalidInput(format!("ttl of {}s exceeds {}s", ttl.as_secs(), MAX_TTL.as_secs())));
    }
    Ok(())
}

/// Key-value storage with per-entry expiry.
///
/// Implementations own eviction: an entry whose TTL has elapsed must read as
/// absent. Writes to an existing key replace it in place.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry.
    async fn get(&self, key: &str) -> Result<Option<ShowDetails>, Error>;

    /// Insert or replace an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: &ShowDetails, ttl: Duration) -> Result<(), Error>;

    /// Drop every expired entry, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, Error>;
}
