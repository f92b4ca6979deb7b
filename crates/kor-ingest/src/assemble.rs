//! Tabular assembly of measurement blocks.
//!
//! Each block's header and rows are checked as CSV, with the block serial as
//! a leading `SERIAL_NUMBER` field, and read into an all-text polars frame.
//! Blocks that share the first accepted block's header are stacked in order;
//! the rest are dropped with a warning. Column types are settled once over
//! the stacked table so blocks never disagree on a dtype.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;

use csv::{ErrorKind, ReaderBuilder, Trim, WriterBuilder};
use polars::prelude::*;
use tracing::{info, warn};

use kor_model::columns::{SERIAL_NUMBER, TEXT_HEADERS};
use kor_model::{MeasurementBlock, ParseWarning};

use crate::error::Result;

/// Unified table built from all accepted blocks.
#[derive(Debug, Clone)]
pub struct AssembledTable {
    pub frame: DataFrame,
    pub blocks_assembled: usize,
    pub warnings: Vec<ParseWarning>,
}

/// One block read into a frame of text columns.
#[derive(Debug, Clone)]
pub struct BlockTable {
    pub columns: Vec<String>,
    pub frame: DataFrame,
}

/// Parses a single block. The error is a human-readable reason.
pub fn tabularize_block(block: &MeasurementBlock) -> std::result::Result<BlockTable, String> {
    let serial = block.serial_or_empty();
    let header = block.header.as_deref().unwrap_or_default();

    let mut text = String::new();
    text.push_str(header);
    text.push('\n');
    for row in &block.rows {
        text.push_str(row);
        text.push('\n');
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let raw_header: Vec<String> = reader
        .headers()
        .map_err(|e| format!("unreadable header: {e}"))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut names = Vec::with_capacity(raw_header.len() + 1);
    names.push(SERIAL_NUMBER.to_string());
    names.extend(raw_header);
    let columns = disambiguate_names(names);

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|e| format!("unwritable header: {e}"))?;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| match e.kind() {
            ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => format!("row {} has {len} fields, expected {expected_len}", idx + 1),
            _ => format!("row {}: {e}", idx + 1),
        })?;
        writer
            .write_record(std::iter::once(serial).chain(record.iter()))
            .map_err(|e| format!("row {}: {e}", idx + 1))?;
    }
    let normalized = writer
        .into_inner()
        .map_err(|e| format!("unwritable block: {e}"))?;

    let frame = read_text_frame(&columns, normalized)
        .map_err(|e| format!("unreadable block: {e}"))?;
    Ok(BlockTable { columns, frame })
}

/// Reads normalized block CSV with every column pinned to text.
fn read_text_frame(columns: &[String], bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    let mut schema = Schema::with_capacity(columns.len());
    for name in columns {
        schema.with_column(name.as_str().into(), DataType::String);
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema(Some(Arc::new(schema)))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Renames blank headers and suffixes repeats with `.1`, `.2`, ...
pub fn disambiguate_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("UNNAMED_{idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 0;
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Parses and stacks blocks in order, then settles column types.
pub fn assemble_blocks(blocks: &[MeasurementBlock]) -> Result<AssembledTable> {
    let mut warnings = Vec::new();
    let mut stacked: Option<BlockTable> = None;
    let mut blocks_assembled = 0;

    for (idx, block) in blocks.iter().enumerate() {
        let table = match tabularize_block(block) {
            Ok(table) => table,
            Err(reason) => {
                drop_block(&mut warnings, idx, block, reason);
                continue;
            }
        };
        match stacked.as_mut() {
            None => stacked = Some(table),
            Some(first) if first.columns != table.columns => {
                drop_block(
                    &mut warnings,
                    idx,
                    block,
                    "header differs from first block".to_string(),
                );
                continue;
            }
            Some(first) => {
                first.frame.vstack_mut(&table.frame)?;
            }
        }
        blocks_assembled += 1;
    }

    let Some(stacked) = stacked else {
        info!("no blocks assembled");
        return Ok(AssembledTable {
            frame: DataFrame::empty(),
            blocks_assembled,
            warnings,
        });
    };

    let frame = settle_dtypes(&stacked.frame)?;
    info!(
        blocks = blocks_assembled,
        rows = frame.height(),
        columns = frame.width(),
        "assembled unified table"
    );
    Ok(AssembledTable {
        frame,
        blocks_assembled,
        warnings,
    })
}

/// Casts each non-text column to Int64, else Float64, when every value fits.
///
/// All-null columns stay String.
pub fn settle_dtypes(frame: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = frame
        .get_columns()
        .iter()
        .map(|column| {
            if TEXT_HEADERS.contains(&column.name().as_str())
                || column.null_count() == column.len()
            {
                return column.clone();
            }
            [DataType::Int64, DataType::Float64]
                .iter()
                .find_map(|dtype| column.strict_cast(dtype).ok())
                .unwrap_or_else(|| column.clone())
        })
        .collect();
    DataFrame::new(columns)
}

fn drop_block(
    warnings: &mut Vec<ParseWarning>,
    idx: usize,
    block: &MeasurementBlock,
    reason: String,
) {
    let warning = ParseWarning::BlockParse {
        block: idx + 1,
        serial: block.serial_or_empty().to_string(),
        reason,
    };
    warn!(%warning, "dropping block");
    warnings.push(warning);
}
