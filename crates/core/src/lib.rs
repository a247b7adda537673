//! Core types and shared functionality for show-details.
//!
//! This crate provides:
//! - The `ShowDetails` record and the `ContentSource` capability
//! - Cache stores (in-memory and SQLite) and the caching service
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod source;

pub use cache::{CacheStore, CacheTtl, MemoryStore, ShowDetailsCache, SqliteStore};
pub use config::AppConfig;
pub use error::Error;
pub use model::ShowDetails;
pub use source::ContentSource;
