//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::MAX_TTL;
use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - a user agent, URL, owner, repository or branch is empty
    /// - the blog acceptance window is empty or `max_pages` is 0
    /// - either cache TTL is 0 or longer than a year
    /// - `cache.memory_capacity` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        let blog = &self.blog;
        if blog.archive_url.trim().is_empty() {
            return Err(invalid("blog.archive_url", "must not be empty"));
        }
        if blog.user_agent.is_empty() {
            return Err(invalid("blog.user_agent", "must not be empty"));
        }
        if blog.max_pages == 0 {
            return Err(invalid("blog.max_pages", "must be at least 1"));
        }
        if blog.min_days >= blog.max_days {
            return Err(invalid("blog.max_days", "must be greater than blog.min_days"));
        }

        let repo = &self.repository;
        for (field, value) in [
            ("repository.api_base_url", &repo.api_base_url),
            ("repository.owner", &repo.owner),
            ("repository.repository", &repo.repository),
            ("repository.branch", &repo.branch),
            ("repository.user_agent", &repo.user_agent),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if self.cache.found_ttl_secs == 0 {
            return Err(invalid("cache.found_ttl_secs", "must be greater than 0"));
        }
        if self.cache.missing_ttl_secs == 0 {
            return Err(invalid("cache.missing_ttl_secs", "must be greater than 0"));
        }
        for (field, secs) in [
            ("cache.found_ttl_secs", self.cache.found_ttl_secs),
            ("cache.missing_ttl_secs", self.cache.missing_ttl_secs),
        ] {
            if secs > MAX_TTL.as_secs() {
                return Err(invalid(field, "must not exceed 365 days (31536000s)"));
            }
        }
        if self.cache.memory_capacity == 0 {
            return Err(invalid("cache.memory_capacity", "must be greater than 0"));
        }

        if self.cache.missing_ttl_secs > self.cache.found_ttl_secs {
            tracing::warn!(
                found_ttl_secs = self.cache.found_ttl_secs,
                missing_ttl_secs = self.cache.missing_ttl_secs,
                "Placeholders for missing shows outlive resolved content"
            );
        }

        Ok(())
    }
}
