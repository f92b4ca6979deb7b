//! Kor export ingestion.
//!
//! This crate turns raw export bytes into a unified, typed table:
//!
//! - **Encoding resolution**: UTF-16, then Latin-1, then Windows-1252
//! - **Block segmentation**: one block per `SENSOR SERIAL NUMBER:` marker
//! - **Table assembly**: per-block polars CSV reads, stacked in order
//! - **Upload staging**: uploaded bytes go through a self-deleting temp file
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kor_ingest::{assemble_blocks, read_lines, segment_lines};
//! use kor_model::SegmentOptions;
//!
//! let decoded = read_lines(Path::new("exports/site_a.csv"))?;
//! let segmentation = segment_lines(&decoded.lines, &SegmentOptions::default());
//! let table = assemble_blocks(&segmentation.blocks)?;
//! ```

mod assemble;
mod encoding;
mod error;
mod segment;
mod upload;

// === Error Types ===
pub use error::{IngestError, Result};

// === Encoding Resolution ===
pub use encoding::{
    DecodedText, decode_bytes, decode_with, encode_utf16le_with_bom, read_lines, try_decode,
};

// === Block Segmentation ===
pub use segment::{
    ANNOTATION_PREFIXES, LineKind, MARKER_PREFIX, SegmentState, Segmentation, Transition,
    classify_line, extract_serial, segment_lines,
};

// === Table Assembly ===
pub use assemble::{
    AssembledTable, BlockTable, assemble_blocks, disambiguate_names, settle_dtypes,
    tabularize_block,
};

// === Upload Staging ===
pub use upload::{StagedUpload, with_staged_upload};
