//! Display helpers shared by every view of users, posts and communities.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;
const MONTH: i64 = 2_592_000;

/// Relative age like `"3 hours ago"`. Future instants read as `"just now"`.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    match seconds {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{} minutes ago", s / MINUTE),
        s if s < DAY => format!("{} hours ago", s / HOUR),
        s if s < WEEK => format!("{} days ago", s / DAY),
        s if s < MONTH => format!("{} weeks ago", s / WEEK),
        s => format!("{} months ago", s / MONTH),
    }
}

/// Compact count: `999`, `1.2k`, `3.4M`
#[allow(clippy::cast_precision_loss)]
pub fn format_count(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Placeholder image keyed on the first letter of `name`
pub fn placeholder_image(name: &str, fallback: char) -> String {
    let letter = name
        .chars()
        .next()
        .map_or(fallback, |c| c.to_ascii_uppercase());
    format!("https://placehold.co/100/ff4500/white?text={letter}")
}

/// `Jan 5, 2025`
pub fn short_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Cut `s` to at most `max` characters, marking the cut with `...`
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(5), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(7), now), "7 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(time_ago(now - Duration::days(15), now), "2 weeks ago");
        assert_eq!(time_ago(now - Duration::days(95), now), "3 months ago");
        assert_eq!(time_ago(now + Duration::hours(1), now), "just now");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.0k");
        assert_eq!(format_count(15_300), "15.3k");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn test_placeholder_image() {
        assert_eq!(
            placeholder_image("rustacean", 'U'),
            "https://placehold.co/100/ff4500/white?text=R"
        );
        assert_eq!(
            placeholder_image("", 'C'),
            "https://placehold.co/100/ff4500/white?text=C"
        );
    }

    #[test]
    fn test_short_date() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(short_date(at), "Mar 7, 2025");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 50), "short");
        let long = "a".repeat(60);
        let cut = truncate_with_ellipsis(&long, 50);
        assert_eq!(cut.len(), 53);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_with_ellipsis("héllo wörld", 5), "héllo...");
    }
}
