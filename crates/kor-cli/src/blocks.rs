//! Block listing for troubleshooting exports that parse to nothing.

use anyhow::{Context, Result};

use kor_ingest::{DecodedText, decode_bytes, read_lines, segment_lines, tabularize_block};
use kor_model::{ParseWarning, SegmentOptions, TextEncoding};

use crate::view::InputSource;

/// One segmented block and whether it tabularizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    /// 1-based, in file order.
    pub index: usize,
    pub serial: String,
    /// Columns including the prepended serial column.
    pub columns: usize,
    pub rows: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlockListing {
    pub source: String,
    pub encoding: TextEncoding,
    pub lines: usize,
    pub blocks: Vec<BlockInfo>,
    pub warnings: Vec<ParseWarning>,
}

pub fn list_blocks(input: &InputSource, options: &SegmentOptions) -> Result<BlockListing> {
    let decoded: DecodedText = match input {
        InputSource::Path(path) => {
            read_lines(path).with_context(|| format!("read {}", path.display()))?
        }
        InputSource::Bytes { bytes, .. } => decode_bytes(bytes).context("decode input")?,
    };
    let segmentation = segment_lines(&decoded.lines, options);

    let blocks = segmentation
        .blocks
        .iter()
        .enumerate()
        .map(|(idx, block)| {
            let (columns, error) = match tabularize_block(block) {
                Ok(table) => (table.columns.len(), None),
                Err(reason) => (0, Some(reason)),
            };
            BlockInfo {
                index: idx + 1,
                serial: block.serial_or_empty().to_string(),
                columns,
                rows: block.rows.len(),
                error,
            }
        })
        .collect();

    Ok(BlockListing {
        source: input.label(),
        encoding: decoded.encoding,
        lines: decoded.lines.len(),
        blocks,
        warnings: segmentation.warnings,
    })
}
