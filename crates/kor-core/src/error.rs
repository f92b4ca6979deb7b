//! Errors surfaced by the parsing pipeline.

use thiserror::Error;

use kor_ingest::IngestError;
use kor_normalization::NormalizationError;

/// Fatal pipeline errors. Recovered conditions go to the parse report instead.
#[derive(Debug, Error)]
pub enum KorError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl KorError {
    /// True when no candidate encoding could read the input.
    pub fn is_decoding_failure(&self) -> bool {
        matches!(self, Self::Ingest(IngestError::Decoding { .. }))
    }
}

pub type Result<T> = std::result::Result<T, KorError>;
