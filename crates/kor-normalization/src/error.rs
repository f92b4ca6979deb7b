//! Error types for dataset normalization.

use thiserror::Error;

/// Errors that abort normalization.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// A column the normalizer derives from is absent.
    #[error("required column not found: {0}")]
    MissingColumn(String),

    /// Two source columns map to the same canonical name.
    #[error("columns '{first}' and '{second}' both normalize to '{target}'")]
    DuplicateColumn {
        first: String,
        second: String,
        target: String,
    },

    /// Unparseable date/time under the fail-on-error policy.
    #[error("row {row}: could not parse date/time '{value}'")]
    Timestamp { row: usize, value: String },

    /// Polars operation failed.
    #[error("polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;
