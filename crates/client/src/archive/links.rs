//! Post and pagination link harvesting from archive listing pages.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::dates::{parse_day, parse_month};

static POST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"h2.entry-title a[rel~="bookmark"][href]"#).expect("invalid selector"));

static PAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.page-numbers[href]").expect("invalid selector"));

/// Standup recap slugs: `/{yyyy}/{mm}/{dd}/notes-from-the-asp-net-community-standup-{month}-{day}-{year}`.
static POST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/\d{4}/\d{1,2}/\d{1,2}/notes-from-the-asp-net-community-standup-([a-z0-9]+)-([a-z0-9]+)-(\d{4})")
        .expect("invalid post url regex")
});

static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/(\d+)").expect("invalid page number regex"));

/// A candidate recap post found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogLink {
    pub target_url: String,
    pub month_token: String,
    pub day_token: String,
    pub year_token: String,
}

impl BlogLink {
    /// The publication date spelled out in the slug, if every token parses.
    pub fn post_date(&self) -> Option<NaiveDate> {
        let year: i32 = self.year_token.parse().ok()?;
        let month = u32::try_from(parse_month(&self.month_token)?).ok()?;
        let day = u32::try_from(parse_day(&self.day_token)?).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Links harvested from one listing page.
#[derive(Debug, Clone, Default)]
pub struct PageLinks {
    /// Recap posts in document order.
    pub posts: Vec<BlogLink>,
    /// Resolved URL of the pagination link for `current + 1`, if present.
    pub next_page: Option<Url>,
}

/// Harvest recap posts and the next-page link from a listing page.
///
/// Relative hrefs are resolved against `base_url`; hrefs that fail to
/// resolve are skipped.
pub fn scan_page(html: &str, base_url: &Url, current_page: u32) -> PageLinks {
    let document = Html::parse_document(html);

    let posts = document
        .select(&POST_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base_url.join(href).ok())
        .filter_map(|url| {
            let caps = POST_URL_RE.captures(url.as_str())?;
            Some(BlogLink {
                target_url: url.to_string(),
                month_token: caps[1].to_string(),
                day_token: caps[2].to_string(),
                year_token: caps[3].to_string(),
            })
        })
        .collect();

    let wanted = current_page.checked_add(1);
    let next_page = document
        .select(&PAGE_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .find(|href| {
            PAGE_NUMBER_RE
                .captures(href)
                .and_then(|caps| caps[1].parse::<u32>().ok())
                .is_some_and(|number| Some(number) == wanted)
        })
        .and_then(|href| base_url.join(href).ok());

    PageLinks { posts, next_page }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://blogs.example.com/webdev/tag/community-standup/").unwrap()
    }

    const LISTING: &str = r#"
        <html><body>
          <article>
            <h2 class="entry-title"><a href="https://blogs.example.com/webdev/2017/03/22/notes-from-the-asp-net-community-standup-march-21-2017/" rel="bookmark">Notes – March 21</a></h2>
          </article>
          <article>
            <h2 class="entry-title"><a href="/webdev/2017/03/15/notes-from-the-asp-net-community-standup-mar-14th-2017/" rel="bookmark">Notes – March 14</a></h2>
          </article>
          <article>
            <h2 class="entry-title"><a href="https://blogs.example.com/webdev/2017/03/10/announcing-something/" rel="bookmark">Other post</a></h2>
          </article>
          <p><a href="https://blogs.example.com/webdev/2017/03/01/notes-from-the-asp-net-community-standup-feb-28-2017/">Not a title link</a></p>
          <nav>
            <span class="page-numbers current">1</span>
            <a class="page-numbers" href="/webdev/tag/community-standup/page/2/">2</a>
            <a class="page-numbers" href="/webdev/tag/community-standup/page/3/">3</a>
            <a class="next page-numbers" href="/webdev/tag/community-standup/page/2/">Next</a>
          </nav>
        </body></html>
    "#;

    #[test]
    fn test_scan_posts_in_document_order() {
        let links = scan_page(LISTING, &base(), 1);

        assert_eq!(links.posts.len(), 2);
        assert_eq!(links.posts[0].month_token, "march");
        assert_eq!(links.posts[0].day_token, "21");
        assert_eq!(links.posts[0].year_token, "2017");
        assert_eq!(
            links.posts[1].target_url,
            "https://blogs.example.com/webdev/2017/03/15/notes-from-the-asp-net-community-standup-mar-14th-2017/"
        );
    }

    #[test]
    fn test_scan_next_page() {
        let links = scan_page(LISTING, &base(), 1);
        assert_eq!(
            links.next_page.map(|u| u.to_string()).as_deref(),
            Some("https://blogs.example.com/webdev/tag/community-standup/page/2/")
        );
    }

    #[test]
    fn test_scan_next_page_must_be_consecutive() {
        let links = scan_page(LISTING, &base(), 3);
        assert!(links.next_page.is_none());
    }

    #[test]
    fn test_scan_empty_page() {
        let links = scan_page("<html></html>", &base(), 1);
        assert!(links.posts.is_empty());
        assert!(links.next_page.is_none());
    }

    #[test]
    fn test_post_date() {
        let links = scan_page(LISTING, &base(), 1);
        assert_eq!(links.posts[0].post_date(), NaiveDate::from_ymd_opt(2017, 3, 21));
        assert_eq!(links.posts[1].post_date(), NaiveDate::from_ymd_opt(2017, 3, 14));
    }

    #[test]
    fn test_post_date_invalid_tokens() {
        let link = BlogLink {
            target_url: String::new(),
            month_token: "13".into(),
            day_token: "1".into(),
            year_token: "2017".into(),
        };
        assert_eq!(link.post_date(), None);

        let link = BlogLink { month_token: "smarch".into(), ..link };
        assert_eq!(link.post_date(), None);
    }
}
