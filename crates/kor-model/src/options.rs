//! Configuration options for Kor parsing.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Placeholder serial assigned to unregistered sensors.
pub const DEFAULT_SENTINEL_SERIAL: &str = "TBD";

/// How an unparseable date/time pair is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimestampPolicy {
    /// Store a null timestamp for the row and record a warning.
    #[default]
    NullOnError,
    /// Abort the whole parse on the first unparseable row.
    FailOnError,
}

/// Output names for the coordinate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateNaming {
    /// `Latitude` / `Longitude`.
    #[default]
    Long,
    /// `Lat` / `Long`, as produced by older exports of the viewer.
    Short,
}

/// Handling of rows whose serial is a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentinelPolicy {
    /// Keep every row.
    Keep,
    /// Drop rows whose serial equals one of these values.
    Exclude(Vec<String>),
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self::Exclude(vec![DEFAULT_SENTINEL_SERIAL.to_string()])
    }
}

impl SentinelPolicy {
    pub fn is_sentinel(&self, serial: &str) -> bool {
        match self {
            Self::Keep => false,
            Self::Exclude(values) => values.iter().any(|value| value == serial),
        }
    }
}

/// Options for the block segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// First field index (0-based) searched for the serial on a marker line.
    pub serial_field_start: usize,
    /// Last field index (inclusive) searched for the serial.
    pub serial_field_end: usize,
    /// Minimum number of comma-separated fields for a data row.
    pub min_data_fields: usize,
    /// When set, header lines with a different field count are ignored.
    pub expected_header_width: Option<usize>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            serial_field_start: 5,
            serial_field_end: 7,
            min_data_fields: 5,
            expected_header_width: None,
        }
    }
}

impl SegmentOptions {
    pub fn serial_fields(&self) -> RangeInclusive<usize> {
        self.serial_field_start..=self.serial_field_end
    }

    #[must_use]
    pub fn with_serial_fields(mut self, fields: RangeInclusive<usize>) -> Self {
        self.serial_field_start = *fields.start();
        self.serial_field_end = *fields.end();
        self
    }

    #[must_use]
    pub fn with_min_data_fields(mut self, count: usize) -> Self {
        self.min_data_fields = count;
        self
    }

    #[must_use]
    pub fn with_expected_header_width(mut self, width: Option<usize>) -> Self {
        self.expected_header_width = width;
        self
    }
}

/// Options for the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub timestamp_policy: TimestampPolicy,
    pub coordinate_naming: CoordinateNaming,
    pub sentinel: SentinelPolicy,
}

impl NormalizeOptions {
    pub fn latitude_column(&self) -> &'static str {
        match self.coordinate_naming {
            CoordinateNaming::Long => crate::columns::LATITUDE,
            CoordinateNaming::Short => crate::columns::LAT,
        }
    }

    pub fn longitude_column(&self) -> &'static str {
        match self.coordinate_naming {
            CoordinateNaming::Long => crate::columns::LONGITUDE,
            CoordinateNaming::Short => crate::columns::LONG,
        }
    }
}

/// Options for a full parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub segment: SegmentOptions,
    pub normalize: NormalizeOptions,
}

impl ParseOptions {
    #[must_use]
    pub fn with_segment(mut self, segment: SegmentOptions) -> Self {
        self.segment = segment;
        self
    }

    #[must_use]
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.normalize.timestamp_policy = policy;
        self
    }

    #[must_use]
    pub fn with_coordinate_naming(mut self, naming: CoordinateNaming) -> Self {
        self.normalize.coordinate_naming = naming;
        self
    }

    #[must_use]
    pub fn with_sentinel(mut self, sentinel: SentinelPolicy) -> Self {
        self.normalize.sentinel = sentinel;
        self
    }
}
