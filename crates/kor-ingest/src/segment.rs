//! Block segmentation of decoded Kor export lines.
//!
//! A Kor export is a sequence of per-sensor sections. Each section opens with
//! a `SENSOR SERIAL NUMBER:` marker line, carries one header line with the
//! `TIME (HH:MM:SS)` column and then the sensor's readings, interleaved with
//! summary and banner lines that have to be skipped.
//!
//! The segmenter is an explicit state machine. [`SegmentState::step`] is a
//! pure transition: it consumes the current state and one line and returns
//! the next state plus any block closed by that line.

use std::ops::RangeInclusive;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use kor_model::columns::HEADER_SIGNATURE;
use kor_model::{MeasurementBlock, ParseWarning, SegmentOptions};

/// Marker prefix announcing a new sensor block.
pub const MARKER_PREFIX: &str = "SENSOR SERIAL NUMBER:";

/// Prefixes of lines that never carry data.
pub const ANNOTATION_PREFIXES: &[&str] = &[
    "MEAN VALUE:",
    "STANDARD DEVIATION:",
    "sep=",
    "Kor MEASUREMENT",
    "FILE CREATED:",
];

const SEPARATOR: char = ',';

/// Classification of a single trimmed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Annotation,
    /// Serial-number marker with the resolved serial, if any.
    Marker(Option<String>),
    Header,
    Data,
    /// Anything else: too few fields, or no separator.
    Noise,
}

/// Classifies one line. Leading/trailing whitespace and a stray BOM are ignored.
pub fn classify_line(line: &str, options: &SegmentOptions) -> LineKind {
    let line = clean_line(line);
    if line.is_empty() {
        return LineKind::Blank;
    }
    if ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(line, prefix))
    {
        return LineKind::Annotation;
    }
    if starts_with_ignore_case(line, MARKER_PREFIX) {
        let fields = split_fields(line);
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        return LineKind::Marker(extract_serial(&fields, options.serial_fields()));
    }
    if line.contains(HEADER_SIGNATURE) {
        if let Some(width) = options.expected_header_width {
            let found = split_fields(line).len();
            if found != width {
                debug!(found, expected = width, "ignoring header line of unexpected width");
                return LineKind::Noise;
            }
        }
        return LineKind::Header;
    }
    if line.contains(SEPARATOR) && split_fields(line).len() >= options.min_data_fields {
        return LineKind::Data;
    }
    LineKind::Noise
}

/// Returns the first non-empty field in `range`, trimmed and unquoted.
///
/// The serial's position drifts between export versions, so a range of
/// candidate positions is searched rather than a single index.
pub fn extract_serial(fields: &[&str], range: RangeInclusive<usize>) -> Option<String> {
    range
        .filter_map(|idx| fields.get(idx))
        .map(|field| field.trim().trim_matches('"').trim())
        .find(|field| !field.is_empty())
        .map(str::to_string)
}

fn clean_line(line: &str) -> &str {
    line.trim().trim_start_matches('\u{feff}').trim()
}

/// Splits one line with the same quote rules the assembler parses with.
///
/// Lines the CSV reader rejects fall back to a plain separator split.
fn split_fields(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        _ => line.split(SEPARATOR).map(str::to_string).collect(),
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Segmenter state. Blocks are moved between states, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SegmentState {
    /// No serial active; lines other than markers are ignored.
    #[default]
    SeekingBlock,
    /// Serial known, header not yet seen.
    InHeaderWait(MeasurementBlock),
    /// Serial and header known; rows accumulate.
    InData(MeasurementBlock),
}

/// Result of one state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SegmentState,
    /// Block closed by this line, present only when it qualifies.
    pub emitted: Option<MeasurementBlock>,
    pub warning: Option<ParseWarning>,
}

impl Transition {
    fn stay(state: SegmentState) -> Self {
        Self {
            state,
            emitted: None,
            warning: None,
        }
    }
}

impl SegmentState {
    /// Advances the machine by one line. `line_no` is 1-based and only used
    /// for warnings.
    pub fn step(self, line: &str, line_no: usize, options: &SegmentOptions) -> Transition {
        let trimmed = clean_line(line);
        match classify_line(line, options) {
            LineKind::Blank | LineKind::Annotation | LineKind::Noise => Transition::stay(self),
            LineKind::Marker(serial) => {
                let emitted = self.finish();
                match serial {
                    Some(serial) => Transition {
                        state: Self::InHeaderWait(MeasurementBlock::new(serial)),
                        emitted,
                        warning: None,
                    },
                    None => {
                        warn!(line = line_no, "serial number marker without a serial");
                        Transition {
                            state: Self::SeekingBlock,
                            emitted,
                            warning: Some(ParseWarning::MissingSerial { line: line_no }),
                        }
                    }
                }
            }
            LineKind::Header => match self {
                Self::SeekingBlock => {
                    debug!(line = line_no, "header line outside of a block");
                    Transition::stay(Self::SeekingBlock)
                }
                Self::InHeaderWait(block) | Self::InData(block) => {
                    Transition::stay(Self::InData(block.with_header(trimmed)))
                }
            },
            LineKind::Data => match self {
                Self::SeekingBlock => Transition::stay(Self::SeekingBlock),
                Self::InHeaderWait(block) => {
                    Transition::stay(Self::InHeaderWait(block.with_row(trimmed)))
                }
                Self::InData(block) => Transition::stay(Self::InData(block.with_row(trimmed))),
            },
        }
    }

    /// Closes the in-progress block, returning it only when usable.
    pub fn finish(self) -> Option<MeasurementBlock> {
        match self {
            Self::SeekingBlock => None,
            Self::InHeaderWait(block) | Self::InData(block) => {
                if block.is_usable() {
                    Some(block)
                } else {
                    debug!(
                        serial = block.serial_or_empty(),
                        has_header = block.header.is_some(),
                        rows = block.rows.len(),
                        "dropping incomplete block"
                    );
                    None
                }
            }
        }
    }
}

/// Output of [`segment_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub blocks: Vec<MeasurementBlock>,
    pub warnings: Vec<ParseWarning>,
}

/// Partitions decoded lines into qualifying measurement blocks, in file order.
pub fn segment_lines<I, S>(lines: I, options: &SegmentOptions) -> Segmentation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Segmentation::default();
    let mut state = SegmentState::SeekingBlock;
    for (idx, line) in lines.into_iter().enumerate() {
        let transition = state.step(line.as_ref(), idx + 1, options);
        state = transition.state;
        out.blocks.extend(transition.emitted);
        out.warnings.extend(transition.warning);
    }
    out.blocks.extend(state.finish());
    debug!(blocks = out.blocks.len(), "segmentation complete");
    out
}
