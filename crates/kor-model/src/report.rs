//! Recovered warnings and run counters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TextEncoding;

/// A recovered, non-fatal condition raised while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    /// A marker line had no serial in the searched field range.
    MissingSerial { line: usize },
    /// A block could not be tabularized and was dropped.
    BlockParse {
        block: usize,
        serial: String,
        reason: String,
    },
    /// A row's date and time did not combine into a timestamp.
    Timestamp { row: usize, value: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSerial { line } => {
                write!(f, "line {line}: serial number marker without a serial")
            }
            Self::BlockParse {
                block,
                serial,
                reason,
            } => write!(f, "block {block} ({serial}) dropped: {reason}"),
            Self::Timestamp { row, value } => {
                write!(f, "row {row}: unparseable date/time '{value}'")
            }
        }
    }
}

/// Counts and warnings collected across one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Encoding that decoded the input.
    pub encoding: Option<TextEncoding>,
    /// Decoded line count.
    pub lines: usize,
    /// Qualifying blocks emitted by the segmenter.
    pub blocks_found: usize,
    /// Blocks that made it into the unified table.
    pub blocks_assembled: usize,
    /// Rows in the unified table.
    pub rows_assembled: usize,
    /// Rows removed for carrying a placeholder serial.
    pub sentinel_rows_dropped: usize,
    /// Rows in the clean dataset.
    pub rows_out: usize,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    /// True when decoding succeeded but no measurement survived.
    pub fn is_empty_result(&self) -> bool {
        self.rows_out == 0
    }

    pub fn block_warning_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::BlockParse { .. }))
            .count()
    }

    pub fn timestamp_warning_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::Timestamp { .. }))
            .count()
    }

    pub fn push(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = ParseWarning>) {
        self.warnings.extend(warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_counts_by_kind() {
        let mut report = ParseReport::default();
        report.push(ParseWarning::BlockParse {
            block: 1,
            serial: "S2".to_string(),
            reason: "row 3 has 4 fields, expected 5".to_string(),
        });
        report.push(ParseWarning::Timestamp {
            row: 0,
            value: "13/45/2024 10:00:00".to_string(),
        });
        report.push(ParseWarning::Timestamp {
            row: 4,
            value: " ".to_string(),
        });
        assert_eq!(report.block_warning_count(), 1);
        assert_eq!(report.timestamp_warning_count(), 2);
        assert!(report.is_empty_result());
    }

    #[test]
    fn warning_display() {
        let warning = ParseWarning::BlockParse {
            block: 2,
            serial: "S1".to_string(),
            reason: "header differs from first block".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "block 2 (S1) dropped: header differs from first block"
        );
    }
}
