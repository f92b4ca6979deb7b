//! Error types for Kor export ingestion.

use std::path::PathBuf;
use thiserror::Error;

use kor_model::TextEncoding;

/// Errors that can occur while reading a Kor export.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Export file not found.
    #[error("export file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to materialize uploaded bytes.
    #[error("failed to stage upload in a temporary file: {source}")]
    TempFile {
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// None of the candidate encodings decoded the input.
    #[error("could not read file with any of the encodings: {}", format_encodings(attempted))]
    Decoding { attempted: Vec<TextEncoding> },

    // === Table Assembly Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

fn format_encodings(encodings: &[TextEncoding]) -> String {
    encodings
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
