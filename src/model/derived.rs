//! Read-only values computed from stored fields.
//!
//! Everything here is pure: no clock, no I/O. Callers pass the current time explicitly.

use chrono::{DateTime, Utc};

/// Number of characters kept by [`short_description`].
pub const SHORT_DESCRIPTION_LENGTH: usize = 40;

/// Line break markup stored in place of raw newlines.
pub const LINE_BREAK: &str = "<br />";

/// Truncates a description for list views.
///
/// Descriptions shorter than 40 characters are returned unchanged; anything longer is cut
/// to its first 40 characters followed by `...`. Lengths are counted in characters, never
/// bytes, so multi-byte text is not split inside a code point.
pub fn short_description(description: &str) -> String {
    match description.char_indices().nth(SHORT_DESCRIPTION_LENGTH) {
        // A 41st character exists, so the text is longer than 40.
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None if description.chars().count() < SHORT_DESCRIPTION_LENGTH => description.to_string(),
        // Exactly 40 characters.
        None => format!("{description}..."),
    }
}

/// Replaces each line break sequence (`\r\n`, `\n\r`, `\n` or `\r`) with `<br />`.
pub fn normalize_description_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str(LINE_BREAK);
            }
            '\n' => {
                chars.next_if_eq(&'\r');
                out.push_str(LINE_BREAK);
            }
            other => out.push(other),
        }
    }
    out
}

const UNITS: [(&str, i64); 7] = [
    ("year", 365 * 24 * 3600),
    ("month", 30 * 24 * 3600),
    ("week", 7 * 24 * 3600),
    ("day", 24 * 3600),
    ("hour", 3600),
    ("minute", 60),
    ("second", 1),
];

/// Describes how far `created_at` lies from `now`, e.g. `"3 hours ago"`.
///
/// The largest unit with a non-zero count is used and the count is truncated. A timestamp
/// in the future reads `"<n> <unit> from now"`; identical instants give `"0 seconds ago"`.
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(created_at).num_seconds();
    let seconds = delta.abs();
    let (unit, count) = UNITS
        .iter()
        .map(|(unit, size)| (*unit, seconds / size))
        .find(|(_, count)| *count > 0)
        .unwrap_or(("second", 0));
    let plural = if count == 1 { "" } else { "s" };
    if delta < 0 {
        format!("{count} {unit}{plural} from now")
    } else {
        format!("{count} {unit}{plural} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn short_description_keeps_short_text() {
        let text = "a".repeat(39);
        assert_eq!(short_description(&text), text);
        assert_eq!(short_description(""), "");
    }

    #[test]
    fn short_description_truncates_at_forty() {
        let text = "abcdefghij".repeat(5);
        let short = short_description(&text);
        assert_eq!(short.chars().count(), 43);
        assert!(short.ends_with("..."));
        assert_eq!(&short[..40], &text[..40]);
    }

    #[test]
    fn short_description_of_exactly_forty_gets_marker() {
        let text = "x".repeat(40);
        assert_eq!(short_description(&text), format!("{text}..."));
    }

    #[test]
    fn short_description_counts_characters() {
        let text = "é".repeat(45);
        let short = short_description(&text);
        assert_eq!(short, format!("{}...", "é".repeat(40)));
    }

    #[test]
    fn normalizes_every_line_break_style() {
        assert_eq!(normalize_description_input("a\nb"), "a<br />b");
        assert_eq!(normalize_description_input("a\r\nb"), "a<br />b");
        assert_eq!(normalize_description_input("a\rb"), "a<br />b");
        assert_eq!(normalize_description_input("a\n\rb"), "a<br />b");
        assert_eq!(normalize_description_input("a\n\nb"), "a<br /><br />b");
    }

    #[test]
    fn text_without_breaks_is_untouched() {
        let text = "Creamy <b>brie</b> & friends";
        assert_eq!(normalize_description_input(text), text);
    }

    #[test]
    fn relative_age_picks_largest_unit() {
        assert_eq!(relative_age(at(0), at(0)), "0 seconds ago");
        assert_eq!(relative_age(at(0), at(1)), "1 second ago");
        assert_eq!(relative_age(at(0), at(59)), "59 seconds ago");
        assert_eq!(relative_age(at(0), at(60)), "1 minute ago");
        assert_eq!(relative_age(at(0), at(3 * 3600 + 59)), "3 hours ago");
        assert_eq!(relative_age(at(0), at(2 * 86_400)), "2 days ago");
        assert_eq!(relative_age(at(0), at(15 * 86_400)), "2 weeks ago");
        assert_eq!(relative_age(at(0), at(61 * 86_400)), "2 months ago");
        assert_eq!(relative_age(at(0), at(400 * 86_400)), "1 year ago");
    }

    #[test]
    fn relative_age_of_future_timestamp() {
        let now = at(0);
        assert_eq!(relative_age(now + Duration::hours(2), now), "2 hours from now");
    }
}
