//! Event date parsing and canonicalization.
//!
//! # Invariants
//! - Canonical storage form is UTC, millisecond precision, `Z` suffix
//!   (`2024-01-01T00:00:00.000Z`).
//! - Inputs without an offset are interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NAIVE_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Date input could not be interpreted as a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    Empty,
    Unparsable(String),
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "event date cannot be empty"),
            Self::Unparsable(raw) => write!(f, "unparsable event date: `{raw}`"),
        }
    }
}

impl Error for DateError {}

/// Parses any accepted date input into a UTC timestamp.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 with any offset (`2024-01-01T09:30:00+02:00`)
/// - naive date-time (`2024-01-01T09:30:00`, fractional seconds allowed)
/// - naive date-time without seconds (`2024-01-01T09:30`, as sent by
///   `datetime-local` pickers)
/// - bare calendar date (`2024-01-01`, midnight)
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, DateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, NAIVE_DATETIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, NAIVE_MINUTE_FORMAT) {
        return Ok(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, NAIVE_DATE_FORMAT) {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(DateError::Unparsable(trimmed.to_string()))
}

/// Converts a date input to canonical ISO-8601 storage form.
pub fn normalize_event_date(raw: &str) -> Result<String, DateError> {
    parse_event_date(raw).map(|parsed| parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Short human-readable rendering for a timeline row (`Jan 1, 2024`).
///
/// Falls back to the raw input when it cannot be parsed, so a legacy row
/// still renders something.
pub fn format_display_date(raw: &str) -> String {
    match parse_event_date(raw) {
        Ok(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_display_date, normalize_event_date, DateError};

    #[test]
    fn normalize_converts_offsets_to_utc_millis() {
        assert_eq!(
            normalize_event_date("2024-01-01T09:30:00+02:00").unwrap(),
            "2024-01-01T07:30:00.000Z"
        );
        assert_eq!(
            normalize_event_date("2024-01-01T00:00:00Z").unwrap(),
            "2024-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn normalize_accepts_naive_shapes_as_utc() {
        assert_eq!(
            normalize_event_date("2024-03-05").unwrap(),
            "2024-03-05T00:00:00.000Z"
        );
        assert_eq!(
            normalize_event_date("2024-03-05T12:00:00.25").unwrap(),
            "2024-03-05T12:00:00.250Z"
        );
    }

    #[test]
    fn normalize_accepts_minute_precision_picker_values() {
        assert_eq!(
            normalize_event_date("2024-01-01T09:30").unwrap(),
            "2024-01-01T09:30:00.000Z"
        );
        assert_eq!(format_display_date("2024-01-01T09:30"), "Jan 1, 2024");
    }

    #[test]
    fn normalize_is_stable_on_canonical_input() {
        let canonical = normalize_event_date("2024-06-30T23:59:59.999Z").unwrap();
        assert_eq!(normalize_event_date(&canonical).unwrap(), canonical);
    }

    #[test]
    fn normalize_rejects_empty_and_garbage() {
        assert_eq!(normalize_event_date("   ").unwrap_err(), DateError::Empty);
        assert!(matches!(
            normalize_event_date("next tuesday").unwrap_err(),
            DateError::Unparsable(raw) if raw == "next tuesday"
        ));
    }

    #[test]
    fn display_date_uses_short_month() {
        assert_eq!(format_display_date("2024-01-01T00:00:00Z"), "Jan 1, 2024");
        assert_eq!(format_display_date("not a date"), "not a date");
    }
}
