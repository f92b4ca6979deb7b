//! Date and time combination.
//!
//! Kor writes the date and time of a reading as two columns whose layout
//! follows the desktop locale. The pair is joined with a single space and
//! parsed as a naive timestamp. The date alone also becomes a calendar day.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Layout of the date column on its own.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Accepted layouts of `"<date> <time>"`, tried in order.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Parses a combined date-time string.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parses the date column as a calendar day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Days since 1970-01-01, the physical value of a polars `Date`.
pub fn to_epoch_days(value: NaiveDate) -> i32 {
    value.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Joins a date and a time; `None` when either part is missing.
pub fn combine(date: Option<&str>, time: Option<&str>) -> Option<String> {
    match (date.map(str::trim), time.map(str::trim)) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => {
            Some(format!("{date} {time}"))
        }
        _ => None,
    }
}

/// Epoch milliseconds of a naive timestamp read as UTC.
pub fn to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_us_layout() {
        assert_eq!(
            parse_timestamp("06/01/2024 09:15:30"),
            Some(at(2024, 6, 1, 9, 15, 30))
        );
        assert_eq!(parse_timestamp("6/1/2024 9:15"), Some(at(2024, 6, 1, 9, 15, 0)));
        assert_eq!(
            parse_timestamp("06/01/2024 01:15:30 PM"),
            Some(at(2024, 6, 1, 13, 15, 30))
        );
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed = parse_timestamp("06/01/2024 09:15:30.250").unwrap();
        assert_eq!(to_millis(parsed) % 1000, 250);
    }

    #[test]
    fn test_iso_layouts() {
        assert_eq!(
            parse_timestamp("2024-06-01 09:15:30"),
            Some(at(2024, 6, 1, 9, 15, 30))
        );
        assert_eq!(
            parse_timestamp("2024/06/01 09:15:30"),
            Some(at(2024, 6, 1, 9, 15, 30))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("13/45/2024 10:00:00"), None);
        assert_eq!(parse_timestamp("TBD TBD"), None);
    }

    #[test]
    fn test_combine() {
        assert_eq!(
            combine(Some("06/01/2024"), Some(" 09:00:00")),
            Some("06/01/2024 09:00:00".to_string())
        );
        assert_eq!(combine(Some("06/01/2024"), None), None);
        assert_eq!(combine(Some(""), Some("09:00:00")), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("06/01/2024"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(parse_date("2024-06-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 19_875);
    }

    #[test]
    fn test_to_millis_epoch() {
        assert_eq!(to_millis(at(1970, 1, 1, 0, 0, 1)), 1000);
    }
}
