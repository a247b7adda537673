//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHOW_DETAILS_*, nested keys separated by `__`)
//! 2. TOML config file (if SHOW_DETAILS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which upstream backs the show details cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Blog,
    Repository,
}

/// Heading remapping applied by the blog content extractor.
///
/// `Legacy` collapses levels 1 through 4 onto level 5 and is what published
/// content has always been rendered with. `Decrement` shifts every level down
/// by exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingMode {
    #[default]
    Legacy,
    Decrement,
}

/// Storage used for cached show details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHOW_DETAILS_*)
/// 2. TOML config file (if SHOW_DETAILS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Active content source.
    ///
    /// Set via SHOW_DETAILS_SOURCE environment variable.
    #[serde(default = "default_source")]
    pub source: SourceKind,

    /// HTTP request timeout in milliseconds, applied to every outbound call.
    ///
    /// Set via SHOW_DETAILS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per response.
    ///
    /// Set via SHOW_DETAILS_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default)]
    pub blog: BlogSettings,

    #[serde(default)]
    pub repository: RepositorySettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

/// Settings for the blog archive source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogSettings {
    /// First page of the tag-filtered archive listing.
    pub archive_url: String,
    /// Browser-like User-Agent; the blog serves reduced markup to unknown agents.
    pub user_agent: String,
    /// Upper bound on listing pages visited per lookup.
    pub max_pages: u32,
    /// Earliest accepted post date, in days after the show.
    pub min_days: i64,
    /// Exclusive upper bound on the post date, in days after the show.
    pub max_days: i64,
    pub heading_mode: HeadingMode,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            archive_url: "https://blogs.msdn.microsoft.com/webdev/tag/community-standup/".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .into(),
            max_pages: 50,
            min_days: 0,
            max_days: 2,
            heading_mode: HeadingMode::Legacy,
        }
    }
}

/// Settings for the content repository source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    pub api_base_url: String,
    pub owner: String,
    pub repository: String,
    pub branch: String,
    /// Folder holding `ShowDetails_{id}.json` documents. May be empty.
    pub folder: String,
    pub user_agent: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".into(),
            owner: "aspnet".into(),
            repository: "StandupShowDetails".into(),
            branch: "main".into(),
            folder: "ShowDetails".into(),
            user_agent: "show-details/0.1".into(),
        }
    }
}

/// Cache storage and expiry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// SQLite database path, used when `backend` is `sqlite`.
    pub db_path: PathBuf,
    /// Entry bound for the `memory` backend.
    pub memory_capacity: u64,
    /// Lifetime of resolved content.
    pub found_ttl_secs: u64,
    /// Lifetime of the empty placeholder stored for unresolved shows.
    pub missing_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            db_path: PathBuf::from("./show-details-cache.sqlite"),
            memory_capacity: 10_000,
            found_ttl_secs: 24 * 60 * 60,
            missing_ttl_secs: 60 * 60,
        }
    }
}

impl CacheSettings {
    pub fn found_ttl(&self) -> Duration {
        Duration::from_secs(self.found_ttl_secs)
    }

    pub fn missing_ttl(&self) -> Duration {
        Duration::from_secs(self.missing_ttl_secs)
    }
}

fn default_source() -> SourceKind {
    SourceKind::Repository
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            blog: BlogSettings::default(),
            repository: RepositorySettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHOW_DETAILS_`
    /// 2. TOML file from `SHOW_DETAILS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHOW_DETAILS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SHOW_DETAILS_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate configuration from an arbitrary provider stack.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if extraction fails, or the
    /// validation error if a value is out of range.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
