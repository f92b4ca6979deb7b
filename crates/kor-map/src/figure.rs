//! Map figure built from a clean dataset.
//!
//! The figure describes a scatter map: one point per reading, coloured by
//! sensor serial, with a fixed set of hover fields. It can be written out as
//! a GeoJSON `FeatureCollection` for any web map or GIS tool.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use polars::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::info;

use kor_common::{column_f64, column_strings, column_timestamp_millis};
use kor_model::NormalizeOptions;
use kor_model::columns::{ACTIVITY_DATE_TIME, DEPTH_M, HOVER_READINGS, SERIAL_NUMBER, SITE_NAME};

use crate::error::{MapError, Result};
use crate::filter::valid_coordinates;

/// Base map style.
pub const MAP_STYLE: &str = "carto-positron";
pub const DEFAULT_ZOOM: u8 = 10;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Qualitative palette cycled over serials in order of first appearance.
pub const SERIAL_PALETTE: &[&str] = &[
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Dataset row index carried through the coordinate filter.
const ROW_INDEX: &str = "row";
const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub title: String,
    pub style: &'static str,
    pub zoom: u8,
    pub height: u32,
    /// Top margin leaves room for the title; the other sides are flush.
    pub margin_top: u32,
    /// `[latitude, longitude]` of the mean point.
    pub center: Option<[f64; 2]>,
}

/// One plotted reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    /// Row index in the dataset passed to [`build_map`].
    pub row: usize,
    pub serial: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: &'static str,
    pub hover: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFigure {
    pub layout: MapLayout,
    /// Legend entries in order of first appearance.
    pub serials: Vec<String>,
    pub points: Vec<MapPoint>,
}

/// Hover columns, in display order, that exist in `df`.
pub fn hover_columns(df: &DataFrame) -> Vec<&'static str> {
    [SERIAL_NUMBER, SITE_NAME, DEPTH_M, ACTIVITY_DATE_TIME]
        .into_iter()
        .chain(HOVER_READINGS.iter().copied())
        .filter(|name| df.get_column_index(name).is_some())
        .collect()
}

/// Filters `df` to plottable rows and builds the figure.
pub fn build_map(df: &DataFrame, title: &str, options: &NormalizeOptions) -> Result<MapFigure> {
    let indexed = df.with_row_index(ROW_INDEX.into(), None)?;
    let plottable = valid_coordinates(&indexed, options)?;
    MapFigure::from_dataset(&plottable, title, options)
}

impl MapFigure {
    /// Builds a figure from rows that already passed the coordinate filter.
    ///
    /// Rows with a null coordinate are skipped.
    pub fn from_dataset(df: &DataFrame, title: &str, options: &NormalizeOptions) -> Result<Self> {
        let lat_name = options.latitude_column();
        let lon_name = options.longitude_column();
        let lat = column_f64(df, lat_name)?.ok_or_else(|| MapError::MissingColumn(lat_name.into()))?;
        let lon = column_f64(df, lon_name)?.ok_or_else(|| MapError::MissingColumn(lon_name.into()))?;
        let serials = column_strings(df, SERIAL_NUMBER)?
            .ok_or_else(|| MapError::MissingColumn(SERIAL_NUMBER.into()))?;
        if df.get_column_index(SITE_NAME).is_none() {
            return Err(MapError::MissingColumn(SITE_NAME.into()));
        }

        let hover = hover_values(df)?;
        let rows = source_rows(df)?;
        let mut legend: Vec<String> = Vec::new();
        let mut points = Vec::with_capacity(df.height());
        for (row, ((lat, lon), serial)) in lat.iter().zip(&lon).zip(&serials).enumerate() {
            let (Some(latitude), Some(longitude)) = (*lat, *lon) else {
                continue;
            };
            let serial = serial.clone().unwrap_or_default();
            let slot = match legend.iter().position(|s| *s == serial) {
                Some(slot) => slot,
                None => {
                    legend.push(serial.clone());
                    legend.len() - 1
                }
            };
            let hover = hover
                .iter()
                .map(|(name, values)| (name.to_string(), values[row].clone()))
                .collect();
            points.push(MapPoint {
                row: rows[row],
                serial,
                latitude,
                longitude,
                color: SERIAL_PALETTE[slot % SERIAL_PALETTE.len()],
                hover,
            });
        }

        let center = mean_center(&points);
        info!(
            points = points.len(),
            serials = legend.len(),
            "built map figure"
        );
        Ok(Self {
            layout: MapLayout {
                title: title.to_string(),
                style: MAP_STYLE,
                zoom: DEFAULT_ZOOM,
                height: DEFAULT_HEIGHT,
                margin_top: 30,
                center,
            },
            serials: legend,
            points,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON `FeatureCollection` with one `Point` feature per reading.
    ///
    /// Coordinates are `[longitude, latitude]`; hover fields, the serial colour
    /// and the figure layout go into `properties`.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .points
            .iter()
            .map(|point| {
                let mut properties = point.hover.clone();
                properties.insert(ROW_INDEX.to_string(), json!(point.row));
                properties.insert("marker-color".to_string(), json!(point.color));
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [point.longitude, point.latitude],
                    },
                    "properties": properties,
                })
            })
            .collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
            "properties": {
                "title": self.layout.title,
                "style": self.layout.style,
                "zoom": self.layout.zoom,
                "height": self.layout.height,
                "center": self.layout.center,
                "serials": self.serials,
            },
        })
    }

    /// Writes the GeoJSON rendering to `path`.
    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_geojson())?;
        fs::write(path, text).map_err(|source| MapError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), points = self.points.len(), "wrote GeoJSON");
        Ok(())
    }
}

/// Original row of each frame row; positions when the index column is absent.
fn source_rows(df: &DataFrame) -> Result<Vec<usize>> {
    let Ok(column) = df.column(ROW_INDEX) else {
        return Ok((0..df.height()).collect());
    };
    let rows = column
        .cast(&DataType::UInt64)?
        .u64()?
        .into_iter()
        .enumerate()
        .map(|(pos, row)| row.map_or(pos, |row| row as usize))
        .collect();
    Ok(rows)
}

/// Per-column hover values as JSON, one entry per row.
fn hover_values(df: &DataFrame) -> Result<Vec<(&'static str, Vec<Value>)>> {
    let mut out = Vec::new();
    for name in hover_columns(df) {
        let column = df.column(name)?;
        let values: Vec<Value> = match column.dtype() {
            DataType::Datetime(..) => column_timestamp_millis(df, name)?
                .unwrap_or_default()
                .into_iter()
                .map(|millis| {
                    millis
                        .and_then(DateTime::from_timestamp_millis)
                        .map_or(Value::Null, |ts| {
                            Value::String(ts.naive_utc().format(TIMESTAMP_DISPLAY).to_string())
                        })
                })
                .collect(),
            DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => column_f64(df, name)?
                .unwrap_or_default()
                .into_iter()
                .map(|v| v.map_or(Value::Null, |v| json!(v)))
                .collect(),
            _ => column_strings(df, name)?
                .unwrap_or_default()
                .into_iter()
                .map(|v| v.map_or(Value::Null, Value::String))
                .collect(),
        };
        out.push((name, values));
    }
    Ok(out)
}

fn mean_center(points: &[MapPoint]) -> Option<[f64; 2]> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    Some([lat, lon])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> DataFrame {
        let ts = Int64Chunked::new(
            ACTIVITY_DATE_TIME.into(),
            &[Some(1_717_232_400_000i64), Some(1_717_232_400_000), None],
        )
        .into_datetime(TimeUnit::Milliseconds, None)
        .into_column();
        DataFrame::new(vec![
            ts,
            Column::new(SERIAL_NUMBER.into(), &["S1", "S2", "S1"]),
            Column::new("PH".into(), &[Some(7.9f64), None, Some(8.1)]),
            Column::new("Latitude".into(), &[44.0f64, 45.0, 0.0]),
            Column::new("Longitude".into(), &[-68.0f64, -69.0, 0.0]),
            Column::new(SITE_NAME.into(), &["Dock", "Weir", "Bench"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_hover_columns_present_only() {
        assert_eq!(
            hover_columns(&dataset()),
            vec![SERIAL_NUMBER, SITE_NAME, ACTIVITY_DATE_TIME, "PH"]
        );
    }

    #[test]
    fn test_build_map_excludes_zero_coordinates() {
        let figure = build_map(&dataset(), "Kor Measurements Map", &NormalizeOptions::default())
            .unwrap();
        assert_eq!(figure.points.len(), 2);
        assert_eq!(figure.serials, vec!["S1", "S2"]);
        assert_eq!(figure.points[0].color, SERIAL_PALETTE[0]);
        assert_eq!(figure.points[1].color, SERIAL_PALETTE[1]);
        assert_eq!(figure.layout.style, "carto-positron");
        assert_eq!(figure.layout.zoom, 10);
        assert_eq!(figure.layout.center, Some([44.5, -68.5]));
    }

    #[test]
    fn test_points_keep_dataset_rows() {
        let df = dataset().reverse();
        let figure = build_map(&df, "Map", &NormalizeOptions::default()).unwrap();
        let rows: Vec<usize> = figure.points.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert!(!figure.points[0].hover.contains_key("row"));
        let geojson = figure.to_geojson();
        assert_eq!(geojson["features"][1]["properties"]["row"], 2);
    }

    #[test]
    fn test_hover_values() {
        let figure =
            build_map(&dataset(), "Map", &NormalizeOptions::default()).unwrap();
        let hover = &figure.points[0].hover;
        assert_eq!(hover["Activity_Date_Time"], json!("2024-06-01 09:00:00"));
        assert_eq!(hover["PH"], json!(7.9));
        assert_eq!(hover["SITE_NAME"], json!("Dock"));
        assert_eq!(figure.points[1].hover["PH"], Value::Null);
    }

    #[test]
    fn test_geojson_shape() {
        let figure = build_map(&dataset(), "Map", &NormalizeOptions::default()).unwrap();
        let geojson = figure.to_geojson();
        assert_eq!(geojson["type"], "FeatureCollection");
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([-68.0, 44.0]));
        assert_eq!(features[0]["properties"]["SERIAL_NUMBER"], "S1");
        assert_eq!(features[0]["properties"]["marker-color"], SERIAL_PALETTE[0]);
        assert_eq!(geojson["properties"]["title"], "Map");
    }

    #[test]
    fn test_site_name_required() {
        let df = dataset().drop(SITE_NAME).unwrap();
        let err = build_map(&df, "Map", &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, MapError::MissingColumn(ref c) if c == SITE_NAME));
    }
}
