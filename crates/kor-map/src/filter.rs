//! Coordinate pre-filter.
//!
//! Sondes that never got a GPS fix write `0` for both coordinates. Those rows
//! stay in the dataset but must not be plotted at null island.

use polars::prelude::*;
use tracing::debug;

use kor_common::column_f64;
use kor_model::NormalizeOptions;

use crate::error::{MapError, Result};

/// True when both coordinates are present and neither is exactly zero.
pub fn is_plottable(latitude: Option<f64>, longitude: Option<f64>) -> bool {
    matches!(
        (latitude, longitude),
        (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 && lat.is_finite() && lon.is_finite()
    )
}

/// Rows of `df` whose coordinates can be plotted.
pub fn valid_coordinates(df: &DataFrame, options: &NormalizeOptions) -> Result<DataFrame> {
    let lat_name = options.latitude_column();
    let lon_name = options.longitude_column();
    let lat = column_f64(df, lat_name)?.ok_or_else(|| MapError::MissingColumn(lat_name.into()))?;
    let lon = column_f64(df, lon_name)?.ok_or_else(|| MapError::MissingColumn(lon_name.into()))?;

    let keep: Vec<bool> = lat
        .iter()
        .zip(&lon)
        .map(|(lat, lon)| is_plottable(*lat, *lon))
        .collect();
    let mask = BooleanChunked::from_slice("plottable".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!(
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "filtered coordinates"
    );
    Ok(filtered)
}
