//! Publish-date parsing for the heterogeneous formats found in the wild.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
enum Layout {
    /// Full layout ending in a numeric offset such as `+0900`.
    NumericZone(&'static str),
    /// Layout whose trailing token is a zone abbreviation such as `GMT`.
    NamedZone(&'static str),
    Rfc3339,
    /// No zone at all; interpreted as UTC.
    Naive(&'static str),
    /// Date only; midnight UTC.
    DateOnly(&'static str),
}

/// A layout, optionally preceded by a `Mon, ` weekday prefix.
///
/// The weekday is checked for shape only. Feeds routinely publish weekdays
/// that disagree with the date, and chrono would reject those outright.
#[derive(Debug, Clone, Copy)]
struct Pattern {
    weekday: bool,
    layout: Layout,
}

const fn with_weekday(layout: Layout) -> Pattern {
    Pattern { weekday: true, layout }
}

const fn bare(layout: Layout) -> Pattern {
    Pattern { weekday: false, layout }
}

/// Attempted in order; the first successful parse wins.
const PATTERNS: [Pattern; 9] = [
    // RFC 1123 with numeric offset
    with_weekday(Layout::NumericZone("%d %b %Y %H:%M:%S %z")),
    // RFC 1123
    with_weekday(Layout::NamedZone("%d %b %Y %H:%M:%S")),
    // RFC 822 with numeric offset
    bare(Layout::NumericZone("%d %b %y %H:%M %z")),
    // RFC 822
    bare(Layout::NamedZone("%d %b %y %H:%M")),
    bare(Layout::Rfc3339),
    with_weekday(Layout::Naive("%d %b %Y %H:%M:%S")),
    bare(Layout::Naive("%Y-%m-%d %H:%M:%S")),
    bare(Layout::Naive("%d %b %Y %H:%M:%S")),
    bare(Layout::DateOnly("%Y-%m-%d")),
];

/// Parse a raw publish date, returning `None` when no known layout matches.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let parsed = PATTERNS.iter().find_map(|pattern| try_pattern(*pattern, raw));

    if parsed.is_none() {
        warn!(raw, "Failed to parse pubDate");
    }
    parsed
}

/// Instant used to order items; unparseable dates collapse to the Unix epoch
/// so they sort after everything else in a descending listing.
pub fn sort_timestamp(raw: &str) -> DateTime<Utc> {
    parse_pub_date(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn try_pattern(pattern: Pattern, raw: &str) -> Option<DateTime<FixedOffset>> {
    if pattern.weekday {
        try_layout(pattern.layout, strip_weekday(raw)?)
    } else {
        try_layout(pattern.layout, raw)
    }
}

/// `"Tue, 02 Jan 2024 ..."` -> `"02 Jan 2024 ..."`.
fn strip_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(',')?;
    if day.len() < 3 || !day.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(rest.trim_start())
}

fn try_layout(layout: Layout, raw: &str) -> Option<DateTime<FixedOffset>> {
    match layout {
        Layout::NumericZone(fmt) => DateTime::parse_from_str(raw, fmt).ok(),
        Layout::NamedZone(fmt) => {
            let (head, zone) = raw.rsplit_once(' ')?;
            let offset = named_zone_offset(zone)?;
            let naive = NaiveDateTime::parse_from_str(head, fmt).ok()?;
            offset.from_local_datetime(&naive).single()
        }
        Layout::Rfc3339 => DateTime::parse_from_rfc3339(raw).ok(),
        Layout::Naive(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset()),
        Layout::DateOnly(fmt) => NaiveDate::parse_from_str(raw, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc().fixed_offset()),
    }
}

/// RFC 822 zone names. Any other purely alphabetic abbreviation is taken
/// as UTC, the same leniency most feed readers apply.
fn named_zone_offset(zone: &str) -> Option<FixedOffset> {
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let hours = match zone.to_ascii_uppercase().as_str() {
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600)
}
