//! Blog post content extraction.
//!
//! Narrows a full blog post page down to the article body. This is a fixed
//! sequence of string heuristics tuned to the archive's WordPress markup, not
//! an HTML parser. Each step returns its input unchanged when its pattern is
//! absent.
//!
//! ### Steps
//! 1. Drop `<script>` blocks
//! 2. Demote headings (see [`HeadingMode`])
//! 3. Keep the inside of `<article>`
//! 4. Keep the inside of `<div class="entry-content">`, up to its closing comment
//! 5. Keep what follows the first `<iframe>` (the embedded show video)
//! 6. Strip dangling closing tags at the start
//! 7. Remove the "back to top" widget
//! 8. Prepend an attribution line pointing at the source post

mod headings;

use std::sync::LazyLock;

use regex::Regex;

pub use headings::demote_headings;
pub use showdetails_core::config::HeadingMode;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("invalid script regex"));

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*?)</article\s*>").expect("invalid article regex"));

static ENTRY_CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\s+class="entry-content"\s*>(.*?)</div>\s*<!--\s*\.entry-content\s*-->"#)
        .expect("invalid entry-content regex")
});

static IFRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe\b.*?</iframe\s*>").expect("invalid iframe regex"));

static BACK_TO_TOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\s+class="back-to-top-wrap"[^>]*>.*?</div>"#).expect("invalid back-to-top regex")
});

/// Blog post extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentExtractor {
    heading_mode: HeadingMode,
}

impl ContentExtractor {
    pub fn new(heading_mode: HeadingMode) -> Self {
        Self { heading_mode }
    }

    /// Reduce `raw_html` to the post body, attributed to `source_url`.
    pub fn extract(&self, raw_html: &str, source_url: &str) -> String {
        let content = remove_scripts(raw_html);
        let content = demote_headings(&content, self.heading_mode);
        let content = article_body(&content);
        let content = entry_content(&content);
        let content = after_iframe(&content);
        let content = strip_leading_close_tags(&content);
        let content = remove_back_to_top(&content);
        attribute(&content, source_url)
    }
}

/// Extract with the legacy heading mapping.
pub fn extract(raw_html: &str, source_url: &str) -> String {
    ContentExtractor::default().extract(raw_html, source_url)
}

fn remove_scripts(content: &str) -> String {
    SCRIPT_RE.replace_all(content, "").into_owned()
}

fn article_body(content: &str) -> String {
    match ARTICLE_RE.captures(content) {
        Some(caps) => caps[1].to_string(),
        None => content.to_string(),
    }
}

fn entry_content(content: &str) -> String {
    match ENTRY_CONTENT_RE.captures(content) {
        Some(caps) => caps[1].to_string(),
        None => content.to_string(),
    }
}

fn after_iframe(content: &str) -> String {
    match IFRAME_RE.find(content) {
        Some(m) => content[m.end()..].to_string(),
        None => content.to_string(),
    }
}

/// Drop closing tags left dangling at the start of the fragment.
///
/// A fragment that does not start with `</` is returned untouched.
pub fn strip_leading_close_tags(content: &str) -> String {
    let mut rest = content;
    while rest.trim_start().starts_with("</") {
        rest = match rest.find('>') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        };
        if rest.trim().is_empty() {
            return String::new();
        }
    }
    rest.to_string()
}

fn remove_back_to_top(content: &str) -> String {
    match BACK_TO_TOP_RE.find(content) {
        Some(m) => content.replace(m.as_str(), ""),
        None => content.to_string(),
    }
}

fn attribute(content: &str, source_url: &str) -> String {
    if source_url.is_empty() || content.is_empty() {
        return content.to_string();
    }
    format!("<p><em>Content grabbed from <a href=\"{source_url}\">{source_url}</a></em></p>\n{content}")
}
