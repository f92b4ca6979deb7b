//! Polars helpers for reading clean Kor datasets.
//!
//! Downstream consumers (map, report, CLI) look columns up by name and read
//! them as plain strings, floats or epoch milliseconds regardless of the
//! physical dtype the normalizer chose.

use polars::prelude::*;

/// Formats a float without trailing zeros after the decimal point.
///
/// # Examples
///
/// ```
/// use kor_common::format_numeric;
///
/// assert_eq!(format_numeric(12.0), "12");
/// assert_eq!(format_numeric(7.250), "7.25");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Reads a column as optional strings, casting categorical, numeric and
/// temporal columns first. Returns `None` when the column does not exist.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<Option<String>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let values = match column.dtype() {
        DataType::Float32 | DataType::Float64 => column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(format_numeric))
            .collect(),
        _ => column
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect(),
    };
    Ok(Some(values))
}

/// Reads a column as optional floats; values that do not convert become null.
pub fn column_f64(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let values = if column.dtype() == &DataType::String {
        column
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_f64))
            .collect()
    } else {
        column.cast(&DataType::Float64)?.f64()?.into_iter().collect()
    };
    Ok(Some(values))
}

/// Reads a millisecond datetime column as epoch milliseconds.
pub fn column_timestamp_millis(
    df: &DataFrame,
    name: &str,
) -> PolarsResult<Option<Vec<Option<i64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let values = column.cast(&DataType::Int64)?.i64()?.into_iter().collect();
    Ok(Some(values))
}
