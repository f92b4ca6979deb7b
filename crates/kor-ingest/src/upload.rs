//! Staging of uploaded bytes on disk.
//!
//! Uploaded exports are written to a named temporary file so they go through
//! the same path-based reader as files on disk. The file is removed when the
//! guard drops, on success and on error alike.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Temporary file holding one uploaded export.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Writes `bytes` to a fresh temporary file.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let mut file = NamedTempFile::with_suffix(".csv")
            .map_err(|source| IngestError::TempFile { source })?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|source| IngestError::TempFile { source })?;
        debug!(path = %file.path().display(), bytes = bytes.len(), "staged upload");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Stages `bytes`, runs `f` on the staged path and removes the file.
pub fn with_staged_upload<T, E, F>(bytes: &[u8], f: F) -> std::result::Result<T, E>
where
    F: FnOnce(&Path) -> std::result::Result<T, E>,
    E: From<IngestError>,
{
    let staged = StagedUpload::new(bytes)?;
    f(staged.path())
}
