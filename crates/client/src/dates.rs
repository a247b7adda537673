//! Month and day tokens from archive post slugs.
//!
//! Slugs are written by hand, so tokens show up as `march`, `Mar`, `3`,
//! `21st` and so on.

const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];

/// Parse a month token: an integer, or a name matched on its first three letters.
///
/// Integers are returned as-is, without checking they fall in 1..=12. An
/// out-of-range month cannot form a calendar date, so callers end up
/// skipping the candidate.
pub fn parse_month(token: &str) -> Option<i32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Ok(month) = token.parse::<i32>() {
        return Some(month);
    }

    let lower = token.to_lowercase();
    let prefix = lower.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|idx| idx as i32 + 1)
}

/// Parse a day token from its first run of ASCII digits (`"3rd"` is 3).
pub fn parse_day(token: &str) -> Option<i32> {
    if token.trim().is_empty() {
        return None;
    }

    let start = token.find(|c: char| c.is_ascii_digit())?;
    let rest = &token[start..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_abbreviations() {
        for (idx, name) in MONTHS.iter().enumerate() {
            let expected = Some(idx as i32 + 1);
            assert_eq!(parse_month(name), expected, "{name}");
            assert_eq!(parse_month(&name.to_uppercase()), expected, "{name}");
            assert_eq!(parse_month(&format!("  {name}  ")), expected, "{name}");
        }
    }

    #[test]
    fn test_parse_month_full_names() {
        assert_eq!(parse_month("March"), Some(3));
        assert_eq!(parse_month("september"), Some(9));
        assert_eq!(parse_month("DECEMBER"), Some(12));
        assert_eq!(parse_month("Sept"), Some(9));
    }

    #[test]
    fn test_parse_month_numeric_passthrough() {
        assert_eq!(parse_month("3"), Some(3));
        assert_eq!(parse_month(" 11 "), Some(11));
        assert_eq!(parse_month("13"), Some(13));
        assert_eq!(parse_month("0"), Some(0));
    }

    #[test]
    fn test_parse_month_rejects() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("   "), None);
        assert_eq!(parse_month("ma"), None);
        assert_eq!(parse_month("foo"), None);
        assert_eq!(parse_month("3rd"), None);
    }

    #[test]
    fn test_parse_month_non_ascii() {
        assert_eq!(parse_month("mä"), None);
        assert_eq!(parse_month("été"), None);
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("3rd"), Some(3));
        assert_eq!(parse_day("  12 "), Some(12));
        assert_eq!(parse_day("21st"), Some(21));
        assert_eq!(parse_day("day-5-of"), Some(5));
        assert_eq!(parse_day("7"), Some(7));
    }

    #[test]
    fn test_parse_day_first_run_only() {
        assert_eq!(parse_day("2nd-and-3rd"), Some(2));
    }

    #[test]
    fn test_parse_day_rejects() {
        assert_eq!(parse_day("abc"), None);
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("  "), None);
        assert_eq!(parse_day("99999999999999"), None);
    }
}
