//! HTTP fetch pipeline for upstream content.
//!
//! - One shared `reqwest::Client` per source, with a bounded timeout
//! - Non-2xx statuses, timeouts and oversized bodies are errors
//! - Every request is reported through [`crate::telemetry`]

use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use showdetails_core::Error;

use crate::telemetry;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "show-details/0.1")
    pub user_agent: String,

    /// Accept header sent with every request (default: HTML)
    pub accept: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "show-details/0.1".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

/// Response body and status from a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client with size limits and telemetry.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// GET a URL and return its body as text.
    ///
    /// `operation` names the call in telemetry.
    pub async fn get_text(&self, operation: &str, url: &str) -> Result<String, Error> {
        let started_at = chrono::Utc::now();
        let start = Instant::now();

        let result = self.send(url).await;

        telemetry::record_dependency(operation, url, started_at, start.elapsed(), result.is_ok());
        if let Ok(response) = &result {
            tracing::debug!("fetched {} ({}) in {:?}, {} bytes", url, response.status, start.elapsed(), response.body.len());
        }

        result.map(|response| response.body)
    }

    async fn send(&self, url: &str) -> Result<FetchResponse, Error> {
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, &self.config.accept)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{url}: {e}"))
                } else {
                    Error::HttpError(format!("network error: {e}"))
                }
            })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} for {url}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{url}: {e}"))
            } else {
                Error::HttpError(format!("failed to read response: {e}"))
            }
        })?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        Ok(FetchResponse { status, body: String::from_utf8_lossy(&bytes).into_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "show-details/0.1");
        assert!(config.accept.starts_with("text/html"));
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_get_text_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "test-agent"))
            .and(header("accept", "text/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig {
            user_agent: "test-agent".into(),
            accept: "text/html".into(),
            ..Default::default()
        })
        .unwrap();

        let body = client.get_text("test", &format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_get_text_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.get_text("test", &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_text_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.get_text("test", &server.uri()).await;
        assert!(matches!(result, Err(Error::HttpError(_))));
    }

    #[tokio::test]
    async fn test_get_text_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig { max_bytes: 16, ..Default::default() }).unwrap();
        let result = client.get_text("test", &server.uri()).await;
        assert!(matches!(result, Err(Error::FetchTooLarge(_))));
    }

    #[tokio::test]
    async fn test_get_text_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig { timeout: Duration::from_millis(100), ..Default::default() }).unwrap();
        let result = client.get_text("test", &server.uri()).await;
        assert!(matches!(result, Err(Error::FetchTimeout(_))));
    }
}
