//! Provider date formatting.
//!
//! The provider's legacy endpoints take dates as `DD-Mon-YYYY`
//! (e.g. `26-Mar-2025`), not ISO.

use chrono::{DateTime, NaiveDate, Utc};

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Render a date as `DD-Mon-YYYY` with a zero-padded day and a 3-letter
/// English month abbreviation.
pub fn format_provider_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// Parse an ISO-ish date string and render it in provider format.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. On unparseable input
/// this substitutes today's date rather than failing; the original system
/// relied on this lenient behavior, so callers wanting strictness must
/// validate before calling. Note this silently hides bad input.
pub fn parse_provider_date(input: &str) -> String {
    format_provider_date(parse_iso(input).unwrap_or_else(today))
}

/// Parse `YYYY-MM-DD` (possibly the prefix of a timestamp) or RFC 3339.
pub fn parse_iso(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
