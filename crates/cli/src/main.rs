//! show-details entry point.
//!
//! Loads layered configuration, wires the configured content source and cache
//! store into a [`ShowDetailsCache`], and runs a single command.
//! Logging goes to stderr so stdout carries only command output.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use showdetails_client::{BlogSource, RepositorySource};
use showdetails_core::config::{CacheBackend, SourceKind};
use showdetails_core::{
    AppConfig, CacheStore, CacheTtl, ContentSource, MemoryStore, ShowDetails, ShowDetailsCache, SqliteStore,
};

#[derive(Parser)]
#[command(name = "show-details")]
#[command(about = "Resolve and cache community standup show details", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load details for a show, resolving on a cache miss
    Load {
        /// Show identifier
        show_id: String,
        /// Show date (YYYY-MM-DD or RFC 3339); required by the blog source
        #[arg(long, value_parser = parse_show_date)]
        date: Option<DateTime<Utc>>,
    },

    /// Save details for a show
    Save {
        show_id: String,
        description: String,
    },

    /// Delete details for a show
    Delete { show_id: String },

    /// Sweep expired entries from the cache store
    Purge,
}

/// Parse a show date to midnight UTC of the show's own calendar day.
///
/// Sources compare calendar days in UTC, so an RFC 3339 time keeps the day
/// of its written offset rather than the day it falls on in UTC.
fn parse_show_date(value: &str) -> Result<DateTime<Utc>, String> {
    let date = match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.date_naive())
            .map_err(|e| format!("invalid date {value:?}: {e}"))?,
    };

    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date: {value}"))
}

fn build_source(config: &AppConfig) -> Result<Arc<dyn ContentSource>> {
    let source: Arc<dyn ContentSource> = match config.source {
        SourceKind::Blog => Arc::new(
            BlogSource::from_settings(&config.blog, config.timeout(), config.max_bytes)
                .context("failed to build blog source")?,
        ),
        SourceKind::Repository => Arc::new(
            RepositorySource::from_settings(&config.repository, config.timeout(), config.max_bytes)
                .context("failed to build repository source")?,
        ),
    };
    Ok(source)
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryStore::with_capacity(config.cache.memory_capacity)),
        CacheBackend::Sqlite => Arc::new(
            SqliteStore::open(&config.cache.db_path)
                .await
                .with_context(|| format!("failed to open cache database {}", config.cache.db_path.display()))?,
        ),
    };
    Ok(store)
}

fn print_json(details: &ShowDetails) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(details)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    let source = build_source(&config)?;
    let store = build_store(&config).await?;
    let cache = ShowDetailsCache::new(source, store)
        .with_ttl(CacheTtl { found: config.cache.found_ttl(), missing: config.cache.missing_ttl() });

    tracing::info!(source = cache.source_name(), backend = ?config.cache.backend, "show-details ready");

    match cli.command {
        Commands::Load { show_id, date } => {
            let details = cache.load(&show_id, date).await;
            print_json(&details)?;
        }
        Commands::Save { show_id, description } => {
            cache.save(&ShowDetails::new(show_id, description)).await?;
        }
        Commands::Delete { show_id } => cache.delete(&show_id).await?,
        Commands::Purge => {
            let removed = cache.purge_expired().await?;
            println!("{removed}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plain_date() {
        let date = parse_show_date("2017-03-21").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 3, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_date() {
        let date = parse_show_date("2017-03-21T10:30:00-07:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 3, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_day() {
        let date = parse_show_date("2017-03-21T18:00:00-07:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 3, 21, 0, 0, 0).unwrap());

        let date = parse_show_date("2017-03-22T01:00:00+09:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 3, 22, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_show_date("March 21").is_err());
        assert!(parse_show_date("2017-13-01").is_err());
    }

    #[test]
    fn test_parse_load_command() {
        let cli = Cli::try_parse_from(["show-details", "load", "42", "--date", "2017-03-21"]).unwrap();
        match cli.command {
            Commands::Load { show_id, date } => {
                assert_eq!(show_id, "42");
                assert!(date.is_some());
            }
            _ => panic!("expected load command"),
        }
    }

    #[test]
    fn test_build_source_by_kind() {
        let mut config = AppConfig::default();
        assert_eq!(build_source(&config).unwrap().name(), "repository");

        config.source = SourceKind::Blog;
        assert_eq!(build_source(&config).unwrap().name(), "blog");
    }

    #[tokio::test]
    async fn test_build_memory_store() {
        let store = build_store(&AppConfig::default()).await.unwrap();
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
