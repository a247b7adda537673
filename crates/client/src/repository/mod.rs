//! Content repository source.
//!
//! Reads `ShowDetails_{id}.json` documents from a hosted git repository
//! through its contents API.
//!
//! ### Contents API
//!
//! - **Endpoint**: `{api_base}/repos/{owner}/{repo}/contents/{folder}/ShowDetails_{id}.json?ref={branch}`
//! - **Authentication**: none; the API requires a User-Agent header.
//! - **Response**: JSON envelope whose `content` is the base64 document.
//! - **Writes**: not supported; they would need privileged credentials.

pub mod error;
pub mod response;

pub use error::RepositoryError;
pub use response::ContentEnvelope;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use showdetails_core::config::RepositorySettings;
use showdetails_core::{ContentSource, ShowDetails};

use crate::telemetry;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default response body cap.
const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Media type for the contents API JSON envelope.
const API_ACCEPT: &str = "application/vnd.github+json";

/// Content repository client configuration.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// API base URL (default: https://api.github.com).
    pub api_base_url: String,
    pub owner: String,
    pub repository: String,
    pub branch: String,
    /// Folder holding the documents; empty for the repository root.
    pub folder: String,
    /// User-agent string (default: show-details/0.1).
    pub user_agent: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// Maximum response body size in bytes (default: 5MB).
    pub max_bytes: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::from_settings(&RepositorySettings::default(), DEFAULT_TIMEOUT, DEFAULT_MAX_BYTES)
    }
}

impl RepositoryConfig {
    pub fn from_settings(settings: &RepositorySettings, timeout: Duration, max_bytes: usize) -> Self {
        Self {
            api_base_url: settings.api_base_url.clone(),
            owner: settings.owner.clone(),
            repository: settings.repository.clone(),
            branch: settings.branch.clone(),
            folder: settings.folder.clone(),
            user_agent: settings.user_agent.clone(),
            timeout,
            max_bytes,
        }
    }
}

/// Contents API client.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    http: reqwest::Client,
    config: RepositoryConfig,
}

impl RepositoryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RepositoryConfig) -> Result<Self, RepositoryError> {
        Url::parse(&config.api_base_url).map_err(|e| RepositoryError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepositoryError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Contents API URL for a show's document.
    pub fn content_url(&self, show_id: &str) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| RepositoryError::InvalidUrl(e.to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RepositoryError::InvalidUrl(format!("cannot be a base: {}", self.config.api_base_url)))?;
            segments
                .pop_if_empty()
                .extend(["repos", self.config.owner.as_str(), self.config.repository.as_str(), "contents"])
                .extend(self.config.folder.split('/').filter(|s| !s.is_empty()))
                .push(&format!("ShowDetails_{show_id}.json"));
        }

        url.query_pairs_mut().append_pair("ref", &self.config.branch);
        Ok(url)
    }

    /// Fetch and decode the document for `show_id`.
    pub async fn fetch(&self, show_id: &str) -> Result<ShowDetails, RepositoryError> {
        let url = self.content_url(show_id)?;
        let started_at = Utc::now();
        let start = Instant::now();

        let result = self.request(&url).await;

        telemetry::record_dependency("repository.contents", url.as_str(), started_at, start.elapsed(), result.is_ok());

        let envelope = result?;
        tracing::debug!(
            path = envelope.path.as_deref().unwrap_or_default(),
            sha = envelope.sha.as_deref().unwrap_or_default(),
            "fetched show details document in {:?}",
            start.elapsed()
        );

        envelope.into_show_details()
    }

    async fn request(&self, url: &Url) -> Result<ContentEnvelope, RepositoryError> {
        let http_response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, API_ACCEPT)
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("contents API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(url.path().to_string()));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RepositoryError::AccessDenied { status: status.as_u16() });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(RepositoryError::HttpError { status: status.as_u16() });
        }

        let max_bytes = self.config.max_bytes;
        if let Some(len) = http_response.content_length()
            && len as usize > max_bytes
        {
            return Err(RepositoryError::TooLarge { size: len as usize, max_bytes });
        }

        let bytes = http_response.bytes().await?;
        if bytes.len() > max_bytes {
            return Err(RepositoryError::TooLarge { size: bytes.len(), max_bytes });
        }

        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Parse(e.to_string()))
    }
}

/// Content source backed by the content repository.
#[derive(Debug, Clone)]
pub struct RepositorySource {
    client: RepositoryClient,
}

impl RepositorySource {
    pub fn new(client: RepositoryClient) -> Self {
        Self { client }
    }

    pub fn from_settings(
        settings: &RepositorySettings, timeout: Duration, max_bytes: usize,
    ) -> Result<Self, RepositoryError> {
        Ok(Self::new(RepositoryClient::new(RepositoryConfig::from_settings(settings, timeout, max_bytes))?))
    }
}

#[async_trait]
impl ContentSource for RepositorySource {
    fn name(&self) -> &str {
        "repository"
    }

    async fn resolve(&self, show_id: &str, _show_date: Option<DateTime<Utc>>) -> Option<ShowDetails> {
        match self.client.fetch(show_id).await {
            Ok(details) => Some(details),
            Err(e) if e.is_not_found() => {
                tracing::debug!(show_id, "no show details document");
                None
            }
            Err(e) => {
                telemetry::record_exception("repository.resolve", &e);
                None
            }
        }
    }
}
