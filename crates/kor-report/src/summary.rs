//! Summary metrics over a clean dataset.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::DataFrame;
use serde::Serialize;

use kor_common::{column_f64, column_strings, column_timestamp_millis};
use kor_map::is_plottable;
use kor_model::NormalizeOptions;
use kor_model::columns::{ACTIVITY_DATE_TIME, SERIAL_NUMBER, SITE_NAME};

use crate::error::Result;

/// Headline numbers shown above the data table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_measurements: usize,
    /// Distinct non-null serials.
    pub unique_sensors: usize,
    /// Distinct non-null site names.
    pub unique_sites: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    /// Rows the map would plot.
    pub with_coordinates: usize,
}

/// Computes [`Summary`] for `df`. Absent columns count as zero.
pub fn summarize(df: &DataFrame, options: &NormalizeOptions) -> Result<Summary> {
    let unique_sensors = distinct_count(df, SERIAL_NUMBER)?;
    let unique_sites = distinct_count(df, SITE_NAME)?;

    let timestamps: Vec<NaiveDateTime> = column_timestamp_millis(df, ACTIVITY_DATE_TIME)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(DateTime::from_timestamp_millis)
        .map(|ts| ts.naive_utc())
        .collect();

    let with_coordinates = match (
        column_f64(df, options.latitude_column())?,
        column_f64(df, options.longitude_column())?,
    ) {
        (Some(lat), Some(lon)) => lat
            .into_iter()
            .zip(lon)
            .filter(|(lat, lon)| is_plottable(*lat, *lon))
            .count(),
        _ => 0,
    };

    Ok(Summary {
        total_measurements: df.height(),
        unique_sensors,
        unique_sites,
        first_timestamp: timestamps.iter().min().copied(),
        last_timestamp: timestamps.iter().max().copied(),
        with_coordinates,
    })
}

fn distinct_count(df: &DataFrame, name: &str) -> Result<usize> {
    let values = column_strings(df, name)?.unwrap_or_default();
    Ok(values.iter().flatten().collect::<HashSet<_>>().len())
}
