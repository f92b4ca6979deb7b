//! Raw export to clean dataset.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use kor_ingest::{DecodedText, assemble_blocks, read_lines, segment_lines, with_staged_upload};
use kor_model::{ParseOptions, ParseReport};
use kor_normalization::normalize;

use crate::error::Result;

/// Clean dataset and the report of how it was produced.
#[derive(Debug, Clone)]
pub struct ParsedDataset {
    pub data: DataFrame,
    pub report: ParseReport,
}

impl ParsedDataset {
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

/// Parses a Kor export on disk.
pub fn parse_kor_file(path: &Path, options: &ParseOptions) -> Result<ParsedDataset> {
    let _span = info_span!("parse_kor_file", path = %path.display()).entered();
    let decoded = read_lines(path)?;
    parse_decoded(decoded, options)
}

/// Parses uploaded export bytes through a temporary file.
pub fn parse_kor_bytes(bytes: &[u8], options: &ParseOptions) -> Result<ParsedDataset> {
    with_staged_upload(bytes, |path| parse_kor_file(path, options))
}

/// Runs segmentation, assembly and normalization over decoded lines.
pub fn parse_decoded(decoded: DecodedText, options: &ParseOptions) -> Result<ParsedDataset> {
    let mut report = ParseReport {
        encoding: Some(decoded.encoding),
        lines: decoded.lines.len(),
        ..ParseReport::default()
    };

    let segmentation = segment_lines(&decoded.lines, &options.segment);
    report.blocks_found = segmentation.blocks.len();
    report.extend(segmentation.warnings);

    let assembled = assemble_blocks(&segmentation.blocks)?;
    report.blocks_assembled = assembled.blocks_assembled;
    report.rows_assembled = assembled.frame.height();
    report.extend(assembled.warnings);

    let normalized = normalize(&assembled.frame, &options.normalize)?;
    report.sentinel_rows_dropped = normalized.sentinel_rows_dropped;
    report.rows_out = normalized.frame.height();
    report.extend(normalized.warnings);

    info!(
        encoding = %decoded.encoding,
        lines = report.lines,
        blocks = report.blocks_found,
        rows = report.rows_out,
        warnings = report.warnings.len(),
        "parsed Kor export"
    );
    Ok(ParsedDataset {
        data: normalized.frame,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kor_ingest::encode_utf16le_with_bom;
    use kor_model::TextEncoding;

    #[test]
    fn test_report_counts() {
        let text = [
            "SENSOR SERIAL NUMBER:,,,,,S1",
            "DATE (MM/DD/YYYY),TIME (HH:MM:SS),SITE NAME,DEPTH M,PH",
            "06/01/2024,09:00:00,Dock,1.0,7.9",
            "SENSOR SERIAL NUMBER:,,,,,TBD",
            "DATE (MM/DD/YYYY),TIME (HH:MM:SS),SITE NAME,DEPTH M,PH",
            "06/01/2024,09:00:00,Dock,1.0,7.9",
        ]
        .join("\r\n");
        let parsed = parse_kor_bytes(&encode_utf16le_with_bom(&text), &ParseOptions::default())
            .unwrap();
        let report = parsed.report;
        assert_eq!(report.encoding, Some(TextEncoding::Utf16));
        assert_eq!(report.lines, 6);
        assert_eq!(report.blocks_found, 2);
        assert_eq!(report.blocks_assembled, 2);
        assert_eq!(report.rows_assembled, 2);
        assert_eq!(report.sentinel_rows_dropped, 1);
        assert_eq!(report.rows_out, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_noise_only_is_empty_not_error() {
        let bytes = encode_utf16le_with_bom("sep=,\r\nKor Measurement File Export\r\n");
        let parsed = parse_kor_bytes(&bytes, &ParseOptions::default()).unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.report.is_empty_result());
        assert_eq!(parsed.report.encoding, Some(TextEncoding::Utf16));
    }
}
