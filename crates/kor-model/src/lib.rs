//! Data model types for Kor sonde measurement exports.
//!
//! This crate holds the types shared by every stage of the Kor pipeline:
//!
//! - [`block`]: Measurement blocks produced by the segmenter
//! - [`columns`]: Canonical column names the viewer depends on
//! - [`encoding`]: Candidate text encodings for raw exports
//! - [`options`]: Parse, segmentation and normalization options
//! - [`report`]: Recovered warnings and per-run counts

pub mod block;
pub mod columns;
pub mod encoding;
pub mod options;
pub mod report;

pub use block::MeasurementBlock;
pub use encoding::{CANDIDATE_ENCODINGS, TextEncoding};
pub use options::{
    CoordinateNaming, DEFAULT_SENTINEL_SERIAL, NormalizeOptions, ParseOptions, SegmentOptions,
    SentinelPolicy, TimestampPolicy,
};
pub use report::{ParseReport, ParseWarning};
