//! Kor sonde export parsing.
//!
//! Wires the ingestion and normalization stages into one call that turns a
//! raw export into a clean dataset and a [`ParseReport`](kor_model::ParseReport).
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kor_core::parse_kor_file;
//! use kor_model::ParseOptions;
//!
//! let parsed = parse_kor_file(Path::new("exports/site_a.csv"), &ParseOptions::default())?;
//! for warning in &parsed.report.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod error;
mod pipeline;

pub use error::{KorError, Result};
pub use pipeline::{ParsedDataset, parse_decoded, parse_kor_bytes, parse_kor_file};
