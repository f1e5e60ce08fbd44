// Date utils

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Formats carrying a time of day, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats; parsed to midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a, %d %b %Y",
];

/// Parses a date string the way a forgiving spreadsheet would: ISO 8601 with or without
/// time and offset, RFC 2822, US slashed dates and spelled-out month names.
///
/// Offsets are converted to UTC and dropped; naive inputs are taken as UTC.
/// Returns None for anything it does not recognise.
pub fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Week bucket key: the Sunday on or before `date`, as `YYYY-MM-DD`.
pub fn week_key(date: NaiveDate) -> Option<String> {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset))
        .map(|start| start.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_lenient("2025-06-01"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_lenient("  2025-06-01  "), Some(ymd(2025, 6, 1)));
    }

    #[test]
    fn test_parse_iso_datetime_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_lenient("2025-06-01T14:30:00"), Some(expected));
        assert_eq!(parse_lenient("2025-06-01 14:30:00"), Some(expected));
        assert_eq!(parse_lenient("2025-06-01T14:30"), Some(expected));
        assert_eq!(parse_lenient("2025-06-01T14:30:00Z"), Some(expected));
        assert_eq!(parse_lenient("2025-06-01T16:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_textual_dates() {
        assert_eq!(parse_lenient("June 1, 2025"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_lenient("Jun 1, 2025"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_lenient("1 June 2025"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_lenient("06/01/2025"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_lenient("2025/06/01"), Some(ymd(2025, 6, 1)));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("   "), None);
        assert_eq!(parse_lenient("N/A"), None);
        assert_eq!(parse_lenient("2025-13-45"), None);
    }

    #[test]
    fn test_week_key_uses_preceding_sunday() {
        // 2025-06-01 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        let next_sunday = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();

        assert_eq!(week_key(sunday).as_deref(), Some("2025-06-01"));
        assert_eq!(week_key(tuesday).as_deref(), Some("2025-06-01"));
        assert_eq!(week_key(saturday).as_deref(), Some("2025-06-01"));
        assert_eq!(week_key(next_sunday).as_deref(), Some("2025-06-08"));
    }

    #[test]
    fn test_week_key_crosses_month_boundary() {
        // Wednesday 2025-07-02 belongs to the week starting Sunday 2025-06-29.
        let wednesday = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
        assert_eq!(week_key(wednesday).as_deref(), Some("2025-06-29"));
    }
}
