//! Heading demotion.
//!
//! The post title becomes the page heading on the show page, so headings
//! inside the body are pushed down. Levels are rewritten deepest first so a
//! tag is never shifted twice.

use std::sync::LazyLock;

use regex::Regex;

use super::HeadingMode;

/// Opening or closing tag of heading levels 1 through 5, indexed by level - 1.
static HEADING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=5)
        .map(|level| Regex::new(&format!(r"(?i)<(/?)h{level}\b")).expect("invalid heading regex"))
        .collect()
});

/// `(from, to)` rewrites, deepest level first.
///
/// Legacy sends levels 1-4 to 5 rather than decrementing them. Published show
/// pages are styled around that, so it stays the default.
const LEGACY: [(usize, usize); 5] = [(5, 6), (4, 5), (3, 5), (2, 5), (1, 5)];
const DECREMENT: [(usize, usize); 5] = [(5, 6), (4, 5), (3, 4), (2, 3), (1, 2)];

/// Rewrite `<hN>`/`</hN>` tags according to `mode`. Level 6 is left alone.
pub fn demote_headings(content: &str, mode: HeadingMode) -> String {
    let plan = match mode {
        HeadingMode::Legacy => &LEGACY,
        HeadingMode::Decrement => &DECREMENT,
    };

    let mut content = content.to_string();
    for &(from, to) in plan {
        let replacement = format!("<${{1}}h{to}");
        content = HEADING_RES[from - 1].replace_all(&content, replacement.as_str()).into_owned();
    }
    content
}
