//! The `view` flow with explicit stages.
//!
//! 1. **Parse**: decode, segment, assemble and normalize the export
//! 2. **Filter**: keep the requested calendar dates
//! 3. **Summarize**: headline metrics over the selection
//! 4. **Map**: plot readings with a usable GPS fix, optionally to GeoJSON

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use kor_core::{KorError, ParsedDataset, parse_kor_bytes, parse_kor_file};
use kor_ingest::IngestError;
use kor_map::{MapFigure, build_map};
use kor_model::columns::{SERIAL_NUMBER, SITE_NAME};
use kor_model::{NormalizeOptions, ParseOptions, ParseReport};
use kor_report::{DateFilter, FilterStatus, Summary, apply_date_filter, date_bounds, summarize};

/// Default map title.
pub const DEFAULT_TITLE: &str = "Kor Measurements Map";

/// Where the export comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    Path(PathBuf),
    /// Bytes already read, e.g. from stdin.
    Bytes { label: String, bytes: Vec<u8> },
}

impl InputSource {
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { label, .. } => label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub input: InputSource,
    pub options: ParseOptions,
    pub filter: DateFilter,
    pub title: String,
    pub geojson: Option<PathBuf>,
}

impl ViewRequest {
    pub fn new(input: InputSource) -> Self {
        Self {
            input,
            options: ParseOptions::default(),
            filter: DateFilter::All,
            title: DEFAULT_TITLE.to_string(),
            geojson: None,
        }
    }
}

/// What the map stage produced.
#[derive(Debug, Clone)]
pub enum MapOutcome {
    /// The dataset lacks coordinate, serial or site columns.
    MissingColumns,
    Figure {
        figure: MapFigure,
        written: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub struct ViewOutcome {
    pub source: String,
    pub report: ParseReport,
    /// Filtered selection.
    pub data: DataFrame,
    pub filter: DateFilter,
    pub filter_status: FilterStatus,
    pub matched: usize,
    pub total: usize,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    pub summary: Summary,
    /// `None` when the parse produced no rows.
    pub map: Option<MapOutcome>,
}

impl ViewOutcome {
    pub fn is_empty(&self) -> bool {
        self.report.is_empty_result()
    }
}

/// Reads a JSON options file; absent keys keep their defaults.
pub fn load_parse_options(path: &Path) -> Result<ParseOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read options file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse options file {}", path.display()))
}

pub fn parse_input(input: &InputSource, options: &ParseOptions) -> kor_core::Result<ParsedDataset> {
    match input {
        InputSource::Path(path) => parse_kor_file(path, options),
        InputSource::Bytes { bytes, .. } => parse_kor_bytes(bytes, options),
    }
}

pub fn run_view(request: &ViewRequest) -> Result<ViewOutcome> {
    let source = request.input.label();
    let span = info_span!("view", source = %source);
    let _guard = span.enter();

    request.filter.validate()?;

    // =========================================================================
    // Stage 1: Parse
    // =========================================================================
    let parsed = parse_input(&request.input, &request.options)?;
    let ParsedDataset { data, report } = parsed;
    let bounds = date_bounds(&data).context("compute date range")?;

    // =========================================================================
    // Stage 2: Filter
    // =========================================================================
    let selection = apply_date_filter(&data, &request.filter).context("apply date filter")?;
    let normalize = &request.options.normalize;

    // =========================================================================
    // Stage 3: Summarize
    // =========================================================================
    let summary = summarize(&selection.frame, normalize).context("summarize dataset")?;

    // =========================================================================
    // Stage 4: Map
    // =========================================================================
    let map = if report.is_empty_result() {
        None
    } else {
        Some(map_stage(
            &selection.frame,
            &request.title,
            normalize,
            request.geojson.as_deref(),
        )?)
    };

    info!(
        rows = report.rows_out,
        shown = selection.frame.height(),
        warnings = report.warnings.len(),
        "view complete"
    );
    Ok(ViewOutcome {
        source,
        report,
        data: selection.frame,
        filter: request.filter,
        filter_status: selection.status,
        matched: selection.matched,
        total: selection.total,
        date_bounds: bounds,
        summary,
        map,
    })
}

fn map_stage(
    df: &DataFrame,
    title: &str,
    options: &NormalizeOptions,
    geojson: Option<&Path>,
) -> Result<MapOutcome> {
    let required = [
        options.latitude_column(),
        options.longitude_column(),
        SERIAL_NUMBER,
        SITE_NAME,
    ];
    if required.iter().any(|name| df.column(name).is_err()) {
        warn!("dataset has no coordinate columns, map skipped");
        return Ok(MapOutcome::MissingColumns);
    }

    let figure = build_map(df, title, options).context("build map")?;
    let written = match geojson {
        Some(path) if figure.is_empty() => {
            warn!(path = %path.display(), "no plottable readings, GeoJSON not written");
            None
        }
        Some(path) => {
            figure
                .write_geojson(path)
                .with_context(|| format!("write GeoJSON {}", path.display()))?;
            Some(path.to_path_buf())
        }
        None => None,
    };
    Ok(MapOutcome::Figure { figure, written })
}

/// Whether any error in the chain is an encoding failure.
pub fn is_decoding_failure(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<KorError>()
            .is_some_and(KorError::is_decoding_failure)
            || matches!(
                cause.downcast_ref::<IngestError>(),
                Some(IngestError::Decoding { .. })
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = ViewRequest::new(InputSource::Path(PathBuf::from("export.csv")));
        assert_eq!(request.title, DEFAULT_TITLE);
        assert_eq!(request.filter, DateFilter::All);
        assert_eq!(request.input.label(), "export.csv");
    }

    #[test]
    fn test_invalid_range_fails_before_parse() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut request = ViewRequest::new(InputSource::Path(PathBuf::from("missing.csv")));
        request.filter = DateFilter::Range { start, end };
        let err = run_view(&request).unwrap_err();
        assert!(err.to_string().contains("must be before or equal to"));
    }

    #[test]
    fn test_bytes_label() {
        let input = InputSource::Bytes {
            label: "<stdin>".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(input.label(), "<stdin>");
    }
}
