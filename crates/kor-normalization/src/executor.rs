//! DataFrame normalization execution.
//!
//! Turns the unified table from the assembler into the clean dataset the
//! viewer consumes.

use polars::prelude::*;
use tracing::{debug, info, warn};

use kor_common::column_strings;
use kor_model::columns::{
    ACTIVITY_DATE, ACTIVITY_DATE_TIME, DATE, FILE_NAME, SERIAL_NUMBER, SITE_NAME, TIME,
};
use kor_model::{NormalizeOptions, ParseWarning, TimestampPolicy};

use crate::error::{NormalizationError, Result};
use crate::rename::canonical_names;
use crate::timestamp::{combine, parse_date, parse_timestamp, to_epoch_days, to_millis};

/// Clean dataset plus what normalization recovered from.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    pub frame: DataFrame,
    pub sentinel_rows_dropped: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Normalize a unified table.
///
/// An input without columns yields an empty dataset.
pub fn normalize(source: &DataFrame, options: &NormalizeOptions) -> Result<NormalizedFrame> {
    if source.width() == 0 {
        debug!("empty table, nothing to normalize");
        return Ok(NormalizedFrame {
            frame: DataFrame::empty(),
            sentinel_rows_dropped: 0,
            warnings: Vec::new(),
        });
    }

    let mut df = source.clone();
    let names = canonical_names(df.get_column_names_str(), options)?;
    df.set_column_names(names.iter().map(String::as_str))?;

    let (mut df, sentinel_rows_dropped) = drop_sentinel_rows(df, options)?;

    let (timestamps, warnings) = derive_timestamps(&df, options.timestamp_policy)?;
    df.with_column(timestamps)?;
    let days = derive_activity_date(&df)?;
    df.with_column(days)?;
    let mut df = df.drop(DATE)?.drop(TIME)?;

    let serial = df
        .column(SERIAL_NUMBER)?
        .cast(&DataType::from_categories(Categories::global()))?;
    df.with_column(serial)?;
    if df.get_column_index(SITE_NAME).is_some() {
        let site = df.column(SITE_NAME)?.cast(&DataType::String)?;
        df.with_column(site)?;
    }

    let frame = df.select(column_order(&df))?;
    info!(
        rows = frame.height(),
        columns = frame.width(),
        sentinel_rows_dropped,
        timestamp_warnings = warnings.len(),
        "normalized dataset"
    );
    Ok(NormalizedFrame {
        frame,
        sentinel_rows_dropped,
        warnings,
    })
}

/// Removes rows whose serial is a placeholder.
pub fn drop_sentinel_rows(
    df: DataFrame,
    options: &NormalizeOptions,
) -> Result<(DataFrame, usize)> {
    let serials = column_strings(&df, SERIAL_NUMBER)?
        .ok_or_else(|| NormalizationError::MissingColumn(SERIAL_NUMBER.to_string()))?;
    let keep: Vec<bool> = serials
        .iter()
        .map(|serial| !options.sentinel.is_sentinel(serial.as_deref().unwrap_or_default()))
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok((df, 0));
    }
    debug!(dropped, "dropping placeholder serial rows");
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}

/// Builds the millisecond `Activity_Date_Time` column from `Date` and `Time`.
pub fn derive_timestamps(
    df: &DataFrame,
    policy: TimestampPolicy,
) -> Result<(Column, Vec<ParseWarning>)> {
    let dates = column_strings(df, DATE)?
        .ok_or_else(|| NormalizationError::MissingColumn(DATE.to_string()))?;
    let times = column_strings(df, TIME)?
        .ok_or_else(|| NormalizationError::MissingColumn(TIME.to_string()))?;

    let mut warnings = Vec::new();
    let mut millis = Vec::with_capacity(dates.len());
    for (row, (date, time)) in dates.iter().zip(&times).enumerate() {
        let combined = combine(date.as_deref(), time.as_deref());
        let parsed = combined.as_deref().and_then(parse_timestamp);
        if parsed.is_none() {
            let value = combined.unwrap_or_else(|| {
                format!(
                    "{} {}",
                    date.as_deref().unwrap_or_default(),
                    time.as_deref().unwrap_or_default()
                )
            });
            match policy {
                TimestampPolicy::FailOnError => {
                    return Err(NormalizationError::Timestamp { row, value });
                }
                TimestampPolicy::NullOnError => {
                    let warning = ParseWarning::Timestamp { row, value };
                    warn!(%warning, "timestamp set to null");
                    warnings.push(warning);
                }
            }
        }
        millis.push(parsed.map(to_millis));
    }

    let column = Int64Chunked::new(ACTIVITY_DATE_TIME.into(), &millis)
        .into_datetime(TimeUnit::Milliseconds, None)
        .into_column();
    Ok((column, warnings))
}

/// Builds the calendar-day `Activity_Date` column from `Date`.
///
/// Dates that do not match `%m/%d/%Y` become null.
pub fn derive_activity_date(df: &DataFrame) -> Result<Column> {
    let dates = column_strings(df, DATE)?
        .ok_or_else(|| NormalizationError::MissingColumn(DATE.to_string()))?;
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|date| date.as_deref().and_then(parse_date).map(to_epoch_days))
        .collect();
    Ok(Int32Chunked::new(ACTIVITY_DATE.into(), &days)
        .into_date()
        .into_column())
}

/// `Activity_Date_Time` first, then passthrough columns, then `FILE_NAME`
/// and `SITE_NAME`.
pub fn column_order(df: &DataFrame) -> Vec<String> {
    let names: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    let trailing = [FILE_NAME, SITE_NAME];

    let mut order = Vec::with_capacity(names.len());
    if names.iter().any(|n| n == ACTIVITY_DATE_TIME) {
        order.push(ACTIVITY_DATE_TIME.to_string());
    }
    order.extend(
        names
            .iter()
            .filter(|n| n.as_str() != ACTIVITY_DATE_TIME && !trailing.contains(&n.as_str()))
            .cloned(),
    );
    order.extend(
        trailing
            .iter()
            .filter(|t| names.iter().any(|n| n == *t))
            .map(|t| t.to_string()),
    );
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use kor_model::SentinelPolicy;

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(SERIAL_NUMBER.into(), &["S1", "TBD", "S2"]),
            Column::new("DATE (MM/DD/YYYY)".into(), &["06/01/2024", "06/01/2024", "06/02/2024"]),
            Column::new("TIME (HH:MM:SS)".into(), &["09:00:00", "09:15:00", "bad"]),
            Column::new("SITE NAME".into(), &["Dock", "Dock", "Weir"]),
            Column::new("FILE NAME".into(), &["a.sonde", "a.sonde", "b.sonde"]),
            Column::new("TEMP °C".into(), &[20.5f64, 21.0, 19.5]),
            Column::new("LATITUDE".into(), &[44.1f64, 44.1, 0.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_normalize_column_contract() {
        let out = normalize(&raw_frame(), &NormalizeOptions::default()).unwrap();
        let names: Vec<&str> = out.frame.get_column_names_str();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "Activity_Date_Time",
            "SERIAL_NUMBER",
            "TEMP_°C",
            "Latitude",
            "Activity_Date",
            "FILE_NAME",
            "SITE_NAME",
        ]
        "#);
    }

    #[test]
    fn test_sentinel_rows_dropped() {
        let out = normalize(&raw_frame(), &NormalizeOptions::default()).unwrap();
        assert_eq!(out.frame.height(), 2);
        assert_eq!(out.sentinel_rows_dropped, 1);
        let serials = column_strings(&out.frame, SERIAL_NUMBER).unwrap().unwrap();
        assert_eq!(serials, vec![Some("S1".to_string()), Some("S2".to_string())]);
    }

    #[test]
    fn test_sentinel_filter_disabled() {
        let options = NormalizeOptions {
            sentinel: SentinelPolicy::Keep,
            ..NormalizeOptions::default()
        };
        let out = normalize(&raw_frame(), &options).unwrap();
        assert_eq!(out.frame.height(), 3);
        assert_eq!(out.sentinel_rows_dropped, 0);
    }

    #[test]
    fn test_null_on_error_policy() {
        let out = normalize(&raw_frame(), &NormalizeOptions::default()).unwrap();
        let ts = out
            .frame
            .column(ACTIVITY_DATE_TIME)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let ts: Vec<Option<i64>> = ts.i64().unwrap().into_iter().collect();
        assert!(ts[0].is_some());
        assert!(ts[1].is_none());
        assert_eq!(
            out.warnings,
            vec![ParseWarning::Timestamp {
                row: 1,
                value: "06/02/2024 bad".to_string(),
            }]
        );
    }

    #[test]
    fn test_fail_on_error_policy() {
        let options = NormalizeOptions {
            timestamp_policy: TimestampPolicy::FailOnError,
            ..NormalizeOptions::default()
        };
        let err = normalize(&raw_frame(), &options).unwrap_err();
        assert!(matches!(err, NormalizationError::Timestamp { row: 1, .. }));
    }

    #[test]
    fn test_types_after_normalize() {
        let out = normalize(&raw_frame(), &NormalizeOptions::default()).unwrap();
        let df = out.frame;
        assert!(matches!(
            df.column(SERIAL_NUMBER).unwrap().dtype(),
            DataType::Categorical(..)
        ));
        assert!(matches!(
            df.column(ACTIVITY_DATE_TIME).unwrap().dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));
        assert_eq!(df.column(SITE_NAME).unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Latitude").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_activity_date_days() {
        let out = normalize(&raw_frame(), &NormalizeOptions::default()).unwrap();
        let day = out.frame.column(ACTIVITY_DATE).unwrap();
        assert_eq!(day.dtype(), &DataType::Date);
        let days: Vec<Option<i32>> = day
            .cast(&DataType::Int32)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(days, vec![Some(19_875), Some(19_876)]);
    }

    #[test]
    fn test_missing_time_column() {
        let df = raw_frame().drop("TIME (HH:MM:SS)").unwrap();
        let err = normalize(&df, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizationError::MissingColumn(ref c) if c == TIME));
    }

    #[test]
    fn test_empty_input() {
        let out = normalize(&DataFrame::empty(), &NormalizeOptions::default()).unwrap();
        assert_eq!(out.frame.width(), 0);
        assert_eq!(out.frame.height(), 0);
    }

    #[test]
    fn test_column_order_without_trailing_columns() {
        let df = DataFrame::new(vec![
            Column::new("B".into(), &[1i64]),
            Column::new(ACTIVITY_DATE_TIME.into(), &[1i64]),
            Column::new("A".into(), &[1i64]),
        ])
        .unwrap();
        assert_eq!(column_order(&df), vec![ACTIVITY_DATE_TIME, "B", "A"]);
    }
}
