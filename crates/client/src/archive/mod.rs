//! Archive locator.
//!
//! Walks the tag-filtered listing of the blog archive, page by page, looking
//! for the recap post of a given show. Recap posts go up on the day of the
//! show or shortly after, so a post is accepted when its slug date falls in
//! a small window after the show date (see [`PostWindow`]).
//!
//! Pagination only ever follows the link for `current + 1`. The archive
//! decides where traversal ends; `max_pages` caps it in case the archive
//! never stops offering a next page.

pub mod links;

use async_trait::async_trait;
use chrono::NaiveDate;
use url::Url;

use showdetails_core::Error;

pub use links::{BlogLink, PageLinks, scan_page};

/// Accepted range of `post_date - show_date`, in days: `min_days <= d < max_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostWindow {
    pub min_days: i64,
    pub max_days: i64,
}

impl Default for PostWindow {
    fn default() -> Self {
        Self { min_days: 0, max_days: 2 }
    }
}

impl PostWindow {
    pub fn contains(&self, days_since_show: i64) -> bool {
        self.min_days <= days_since_show && days_since_show < self.max_days
    }
}

/// Fetches listing pages beyond the first.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page_number: u32, url: &Url) -> Result<String, Error>;
}

/// Current position in the listing.
#[derive(Debug)]
struct PageState {
    number: u32,
    url: Url,
    html: String,
}

/// Finds the recap post for a show date in a paginated archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveLocator {
    window: PostWindow,
    max_pages: u32,
}

impl Default for ArchiveLocator {
    fn default() -> Self {
        Self { window: PostWindow::default(), max_pages: 50 }
    }
}

impl ArchiveLocator {
    pub fn new(window: PostWindow, max_pages: u32) -> Self {
        Self { window, max_pages: max_pages.max(1) }
    }

    /// First post, in document order, whose slug date is inside the window.
    fn match_post(&self, target: NaiveDate, posts: Vec<BlogLink>) -> Option<BlogLink> {
        posts.into_iter().find(|link| match link.post_date() {
            Some(post_date) => self.window.contains((post_date - target).num_days()),
            None => {
                tracing::debug!(url = %link.target_url, "skipping post with unparseable slug date");
                false
            }
        })
    }

    /// Locate the recap post for `target`, starting from the already fetched
    /// first listing page at `listing_url`.
    ///
    /// Returns `Ok(None)` when the archive runs out of pages or `max_pages`
    /// is reached. Page fetch failures are returned as errors.
    pub async fn locate<F>(
        &self, target: NaiveDate, listing_url: &Url, first_page: String, fetcher: &F,
    ) -> Result<Option<BlogLink>, Error>
    where
        F: PageFetcher + ?Sized,
    {
        let mut state = PageState { number: 1, url: listing_url.clone(), html: first_page };

        loop {
            let PageLinks { posts, next_page } = scan_page(&state.html, &state.url, state.number);
            tracing::debug!(page = state.number, candidates = posts.len(), "scanned archive page");

            if let Some(link) = self.match_post(target, posts) {
                tracing::debug!(page = state.number, url = %link.target_url, "found recap post");
                return Ok(Some(link));
            }

            let Some(next_url) = next_page else {
                tracing::debug!(page = state.number, %target, "archive exhausted without a match");
                return Ok(None);
            };

            if state.number >= self.max_pages {
                tracing::warn!(max_pages = self.max_pages, %target, "archive page limit reached");
                return Ok(None);
            }

            let number = state.number + 1;
            let html = fetcher.fetch_page(number, &next_url).await?;
            state = PageState { number, url: next_url, html };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const LISTING_URL: &str = "https://blogs.example.com/webdev/tag/community-standup/";

    fn post(date: &str) -> String {
        let (y, m, d) = (&date[0..4], &date[5..7], &date[8..10]);
        let month = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"]
            [m.parse::<usize>().unwrap() - 1];
        format!(
            r#"<h2 class="entry-title"><a rel="bookmark" href="/webdev/{y}/{m}/{d}/notes-from-the-asp-net-community-standup-{month}-{d}-{y}/">{date}</a></h2>"#
        )
    }

    fn page(posts: &[&str], next: Option<u32>) -> String {
        let mut html = String::from("<html><body>");
        for date in posts {
            html.push_str(&post(date));
        }
        if let Some(n) = next {
            html.push_str(&format!(r#"<a class="page-numbers" href="/webdev/tag/community-standup/page/{n}/">{n}</a>"#));
        }
        html.push_str("</body></html>");
        html
    }

    #[derive(Default)]
    struct StubPages {
        pages: HashMap<u32, String>,
        requested: Mutex<Vec<(u32, String)>>,
    }

    #[async_trait]
    impl PageFetcher for StubPages {
        async fn fetch_page(&self, page_number: u32, url: &Url) -> Result<String, Error> {
            self.requested.lock().unwrap().push((page_number, url.to_string()));
            self.pages
                .get(&page_number)
                .cloned()
                .ok_or_else(|| Error::NotFound(url.to_string()))
        }
    }

    fn show_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 3, 21).unwrap()
    }

    fn listing_url() -> Url {
        Url::parse(LISTING_URL).unwrap()
    }

    #[test]
    fn test_window_contains() {
        let window = PostWindow::default();
        assert!(!window.contains(-1));
        assert!(window.contains(0));
        assert!(window.contains(1));
        assert!(!window.contains(2));
    }

    #[tokio::test]
    async fn test_first_match_in_document_order() {
        let first = page(&["2017-03-22", "2017-03-21"], None);
        let stub = StubPages::default();

        let link = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &stub)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(link.day_token, "22");
        assert!(stub.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_day_post_matches() {
        let first = page(&["2017-03-28", "2017-03-21", "2017-03-14"], None);

        let link = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &StubPages::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(link.day_token, "21");
    }

    #[tokio::test]
    async fn test_post_two_days_late_not_found() {
        let first = page(&["2017-03-23"], None);

        let result = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &StubPages::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_post_before_show_not_accepted() {
        let first = page(&["2017-03-20"], None);

        let result = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &StubPages::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_follows_pagination() {
        let first = page(&["2017-04-04", "2017-03-28"], Some(2));
        let mut stub = StubPages::default();
        stub.pages.insert(2, page(&["2017-03-22", "2017-03-14"], Some(3)));

        let link = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &stub)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(link.day_token, "22");
        let requested = stub.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![(2, "https://blogs.example.com/webdev/tag/community-standup/page/2/".to_string())]
        );
    }

    #[tokio::test]
    async fn test_ignores_non_consecutive_page_links() {
        let first = page(&["2017-04-04"], Some(3));
        let stub = StubPages::default();

        let result = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &stub)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(stub.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stops_at_max_pages() {
        let first = page(&["2017-05-01"], Some(2));
        let mut stub = StubPages::default();
        stub.pages.insert(2, page(&["2017-04-20"], Some(3)));
        stub.pages.insert(3, page(&["2017-03-21"], None));

        let result = ArchiveLocator::new(PostWindow::default(), 2)
            .locate(show_date(), &listing_url(), first, &stub)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(stub.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_window() {
        let first = page(&["2017-03-20"], None);
        let window = PostWindow { min_days: -1, max_days: 1 };

        let link = ArchiveLocator::new(window, 10)
            .locate(show_date(), &listing_url(), first, &StubPages::default())
            .await
            .unwrap();

        assert!(link.is_some());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let first = page(&["2017-04-04"], Some(2));

        let result = ArchiveLocator::default()
            .locate(show_date(), &listing_url(), first, &StubPages::default())
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
