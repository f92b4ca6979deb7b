//! Error types for map building.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or writing a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// A column the map needs is not in the dataset.
    #[error("map requires column '{0}'")]
    MissingColumn(String),

    /// Failed to write the map artifact.
    #[error("failed to write map to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize map: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}

/// Result type for map operations.
pub type Result<T> = std::result::Result<T, MapError>;
