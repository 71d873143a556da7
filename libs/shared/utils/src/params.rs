//! Parsing of query-string parameters shared by the read endpoints.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

use shared_models::timestamp;

/// Window used by the recent-appointments report when no usable value is given.
pub const DEFAULT_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { name: &'static str, value: String },

    #[error("startDate must not be after endDate")]
    ReversedRange,
}

/// Inclusive `[start, end]` interval over appointment timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ParamError> {
        let start = required_text("startDate", start)?;
        let end = required_text("endDate", end)?;

        let range = Self {
            start: parse_date_bound("startDate", start)?,
            end: parse_date_bound("endDate", end)?,
        };

        if range.start > range.end {
            return Err(ParamError::ReversedRange);
        }

        Ok(range)
    }
}

/// A bare date means midnight UTC of that day.
pub fn parse_date_bound(name: &'static str, raw: &str) -> Result<DateTime<Utc>, ParamError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
    }

    timestamp::parse(raw).ok_or_else(|| ParamError::InvalidDate {
        name,
        value: raw.to_string(),
    })
}

/// Value of a required parameter, passed through unchanged when it is not blank.
pub fn required_text<'a>(name: &'static str, raw: Option<&'a str>) -> Result<&'a str, ParamError> {
    match raw {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ParamError::Missing(name)),
    }
}

/// Month count for the recent-appointments window. Absent, non-numeric and
/// non-positive input all fall back to [`DEFAULT_MONTHS`].
pub fn months_or_default(raw: Option<&str>) -> u32 {
    match raw.map(str::trim).and_then(|value| value.parse::<u32>().ok()) {
        Some(months) if months > 0 => months,
        _ => {
            debug!("Using default month window for input {:?}", raw);
            DEFAULT_MONTHS
        }
    }
}

/// Start of the window: midnight of the reference day, `months` months back.
/// `None` when the window reaches before year 1, i.e. it has no lower bound.
pub fn months_before(now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0)?;
    midnight
        .checked_sub_months(Months::new(months))
        .filter(|start| start.year() >= 1)
        .map(|start| start.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn test_date_only_bound_is_midnight() {
        let bound = parse_date_bound("startDate", "2024-03-05").unwrap();
        assert_eq!(bound, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_bound_is_normalized_to_utc() {
        let bound = parse_date_bound("endDate", "2024-03-05T10:00:00+05:00").unwrap();
        assert_eq!(bound, Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_form_datetime_bound() {
        let bound = parse_date_bound("endDate", "2024-03-05T14:30").unwrap();
        assert_eq!(bound, Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_bound() {
        assert_matches!(
            parse_date_bound("startDate", "05/03/2024"),
            Err(ParamError::InvalidDate { name: "startDate", .. })
        );
    }

    #[test]
    fn test_range_requires_both_bounds() {
        assert_eq!(DateRange::parse(None, Some("2024-01-31")), Err(ParamError::Missing("startDate")));
        assert_eq!(DateRange::parse(Some("2024-01-01"), Some("  ")), Err(ParamError::Missing("endDate")));
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        assert_eq!(
            DateRange::parse(Some("2024-02-01"), Some("2024-01-01")),
            Err(ParamError::ReversedRange)
        );
    }

    #[test]
    fn test_range_keeps_fractional_start() {
        let range = DateRange::parse(Some("2024-01-01T10:00:00.750Z"), Some("2024-01-02")).unwrap();
        assert_eq!(
            range.start,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap() + chrono::Duration::milliseconds(750)
        );
    }

    #[test]
    fn test_equal_bounds_are_a_valid_range() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-01")).unwrap();
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn test_months_coercion() {
        assert_eq!(months_or_default(None), DEFAULT_MONTHS);
        assert_eq!(months_or_default(Some("abc")), DEFAULT_MONTHS);
        assert_eq!(months_or_default(Some("0")), DEFAULT_MONTHS);
        assert_eq!(months_or_default(Some("-3")), DEFAULT_MONTHS);
        assert_eq!(months_or_default(Some(" 12 ")), 12);
    }

    #[test]
    fn test_months_before_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 15, 45, 0).unwrap();
        assert_eq!(months_before(now, 6), Some(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_oversized_window_has_no_lower_bound() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 15, 45, 0).unwrap();
        assert_eq!(months_or_default(Some("5000000")), 5_000_000);
        assert_eq!(months_before(now, 5_000_000), None);
        assert_eq!(months_before(now, u32::MAX), None);
        assert_eq!(months_before(now, 2024 * 12), None);
        assert_eq!(months_before(now, 2023 * 12), Some(Utc.with_ymd_and_hms(1, 8, 31, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_required_text_is_passed_through() {
        assert_eq!(required_text("kasallik", Some(" astma")), Ok(" astma"));
        assert_eq!(required_text("keyword", Some("  ")), Err(ParamError::Missing("keyword")));
        assert_eq!(required_text("keyword", Some("")), Err(ParamError::Missing("keyword")));
    }
}
