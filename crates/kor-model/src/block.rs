//! Measurement blocks.

use serde::{Deserialize, Serialize};

/// One sensor's run of lines in an export, bounded by serial-number markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementBlock {
    /// Sensor serial number taken from the marker line.
    pub serial: Option<String>,
    /// Raw header line containing the `TIME (HH:MM:SS)` column.
    pub header: Option<String>,
    /// Raw data lines in file order.
    pub rows: Vec<String>,
}

impl MeasurementBlock {
    /// Opens a block for the given serial.
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: Some(serial.into()),
            header: None,
            rows: Vec::new(),
        }
    }

    /// Returns the block with `header` as its header line.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Returns the block with `row` appended.
    #[must_use]
    pub fn with_row(mut self, row: impl Into<String>) -> Self {
        self.rows.push(row.into());
        self
    }

    /// A block is usable only with a serial, a non-empty header and data rows.
    pub fn is_usable(&self) -> bool {
        self.serial.as_deref().is_some_and(|s| !s.is_empty())
            && self.header.as_deref().is_some_and(|h| !h.trim().is_empty())
            && !self.rows.is_empty()
    }

    pub fn serial_or_empty(&self) -> &str {
        self.serial.as_deref().unwrap_or("")
    }
}
