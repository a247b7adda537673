//! Show details caching.
//!
//! This module provides:
//!
//! - The `CacheStore` contract (`get`, `set` with TTL, `purge_expired`)
//! - An in-process `MemoryStore` backed by moka
//! - A `SqliteStore` with automatic schema migrations and WAL mode
//! - The `ShowDetailsCache` service with outcome-dependent TTLs

pub mod connection;
pub mod entries;
pub mod key;
pub mod memory;
pub mod migrations;
pub mod service;
pub mod store;

pub use crate::Error;

pub use connection::SqliteStore;
pub use key::cache_key;
pub use memory::MemoryStore;
pub use service::{CacheTtl, ShowDetailsCache};
pub use store::{CacheStore, MAX_TTL};
