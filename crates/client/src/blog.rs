//! Blog archive content source.
//!
//! Finds the community standup recap post for a show in the blog's tag
//! archive and extracts its body as the show description. Scraping is
//! best-effort: any failure resolves to "not found".
//!
//! The show date is compared by its UTC calendar day; callers holding a
//! local show time pass midnight UTC of the local day.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use showdetails_core::config::BlogSettings;
use showdetails_core::{ContentSource, Error, ShowDetails};

use crate::archive::{ArchiveLocator, PageFetcher, PostWindow};
use crate::extract::ContentExtractor;
use crate::fetch::{FetchClient, FetchConfig};
use crate::telemetry;

/// Accept header the blog needs to serve full post markup.
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Content source backed by the blog's tag archive.
#[derive(Debug, Clone)]
pub struct BlogSource {
    fetch: FetchClient,
    archive_url: Url,
    locator: ArchiveLocator,
    extractor: ContentExtractor,
}

impl BlogSource {
    pub fn new(fetch: FetchClient, archive_url: Url, locator: ArchiveLocator, extractor: ContentExtractor) -> Self {
        Self { fetch, archive_url, locator, extractor }
    }

    /// Build a blog source from configuration.
    pub fn from_settings(settings: &BlogSettings, timeout: Duration, max_bytes: usize) -> Result<Self, Error> {
        let archive_url = Url::parse(&settings.archive_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", settings.archive_url)))?;

        let fetch = FetchClient::new(FetchConfig {
            user_agent: settings.user_agent.clone(),
            accept: HTML_ACCEPT.to_string(),
            max_bytes,
            timeout,
            ..Default::default()
        })?;

        let window = PostWindow { min_days: settings.min_days, max_days: settings.max_days };

        Ok(Self::new(
            fetch,
            archive_url,
            ArchiveLocator::new(window, settings.max_pages),
            ContentExtractor::new(settings.heading_mode),
        ))
    }

    async fn try_resolve(&self, show_id: &str, show_date: DateTime<Utc>) -> Result<Option<ShowDetails>, Error> {
        let listing = self.fetch.get_text("blog.listing", self.archive_url.as_str()).await?;

        let Some(link) = self
            .locator
            .locate(show_date.date_naive(), &self.archive_url, listing, self)
            .await?
        else {
            return Ok(None);
        };

        let post = self.fetch.get_text("blog.post", &link.target_url).await?;
        let description = self.extractor.extract(&post, &link.target_url);

        Ok(Some(ShowDetails::new(show_id, description)))
    }
}

#[async_trait]
impl PageFetcher for BlogSource {
    async fn fetch_page(&self, page_number: u32, url: &Url) -> Result<String, Error> {
        tracing::debug!(page = page_number, %url, "fetching archive page");
        self.fetch.get_text("blog.listing", url.as_str()).await
    }
}

#[async_trait]
impl ContentSource for BlogSource {
    fn name(&self) -> &str {
        "blog"
    }

    async fn resolve(&self, show_id: &str, show_date: Option<DateTime<Utc>>) -> Option<ShowDetails> {
        let Some(show_date) = show_date else {
            tracing::debug!(show_id, "blog lookup needs a show date");
            return None;
        };

        match self.try_resolve(show_id, show_date).await {
            Ok(Some(details)) => Some(details),
            Ok(None) => {
                tracing::debug!(show_id, %show_date, "no recap post found");
                None
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(show_id, error = %e, "archive or recap page missing");
                None
            }
            Err(e) => {
                telemetry::record_exception("blog.resolve", &e);
                None
            }
        }
    }
}
