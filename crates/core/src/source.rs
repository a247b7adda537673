//! Content source capability.
//!
//! A content source resolves a show identifier (and, for some sources, the
//! show date) to a [`ShowDetails`] record from one specific upstream. Sources
//! are chosen at composition time and sit behind [`crate::ShowDetailsCache`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Error, ShowDetails};

/// A strategy that resolves show details from one upstream.
///
/// `resolve` is best-effort: every network, decode, or parse failure is
/// reported as `None` so the cache never needs source-specific handling.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short, stable name used as the first segment of cache keys.
    fn name(&self) -> &str;

    /// Resolve the details for `show_id`, or `None` when they cannot be found.
    async fn resolve(&self, show_id: &str, show_date: Option<DateTime<Utc>>) -> Option<ShowDetails>;

    /// Persist details upstream. No shipped source supports this.
    async fn save(&self, details: &ShowDetails) -> Result<(), Error> {
        Err(Error::NotImplemented(format!("{}: save {}", self.name(), details.show_id)))
    }

    /// Remove details upstream. No shipped source supports this.
    async fn delete(&self, show_id: &str) -> Result<(), Error> {
        Err(Error::NotImplemented(format!("{}: delete {show_id}", self.name())))
    }
}
