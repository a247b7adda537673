//! Show details entries in the SQLite store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, TimeDelta, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::SqliteStore;
use super::store::{CacheStore, check_ttl};
use crate::{Error, ShowDetails};

/// Fixed-width RFC 3339 so string comparison in SQL orders correctly.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<ShowDetails>, Error> {
        let key = key.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<ShowDetails>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT show_id, description FROM show_details_cache
                     WHERE cache_key = ?1 AND expires_at > ?2",
                )?;

                let result = stmt.query_row(params![key, now], |row| {
                    Ok(ShowDetails { show_id: row.get(0)?, description: row.get(1)? })
                });

                match result {
                    Ok(details) => Ok(Some(details)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn set(&self, key: &str, value: &ShowDetails, ttl: Duration) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.clone();
        check_ttl(ttl)?;
        let ttl = TimeDelta::from_std(ttl).map_err(|e| Error::InvalidInput(format!("ttl out of range: {e}")))?;

        let stored_at = Utc::now();
        let expires_at = stored_at
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::InvalidInput("ttl overflows the expiry timestamp".into()))?;
        let expires_at = timestamp(expires_at);
        let stored_at = timestamp(stored_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO show_details_cache (cache_key, show_id, description, stored_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(cache_key) DO UPDATE SET
                        show_id = excluded.show_id,
                        description = excluded.description,
                        stored_at = excluded.stored_at,
                        expires_at = excluded.expires_at",
                    params![key, value.show_id, value.description, stored_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM show_details_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
