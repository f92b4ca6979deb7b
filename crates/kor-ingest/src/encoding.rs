//! Encoding resolution for raw Kor exports.
//!
//! Kor desktop software writes UTF-16 by default, but files that passed
//! through spreadsheet tools come back as 8-bit Western text. Candidates are
//! tried in a fixed order and the first clean decode wins.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16LE, WINDOWS_1252};
use tracing::debug;

use kor_model::{CANDIDATE_ENCODINGS, TextEncoding};

use crate::error::{IngestError, Result};

/// Decoded export text split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub encoding: TextEncoding,
    pub lines: Vec<String>,
}

/// Reads `path` and decodes it with the default candidate order.
pub fn read_lines(path: &Path) -> Result<DecodedText> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    decode_bytes(&bytes)
}

/// Decodes raw bytes with the default candidate order.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedText> {
    decode_with(bytes, &CANDIDATE_ENCODINGS)
}

/// Decodes raw bytes with the first candidate that accepts them.
pub fn decode_with(bytes: &[u8], candidates: &[TextEncoding]) -> Result<DecodedText> {
    for &encoding in candidates {
        match try_decode(bytes, encoding) {
            Some(text) => {
                let lines = split_lines(&text);
                debug!(%encoding, lines = lines.len(), "decoded export");
                return Ok(DecodedText { encoding, lines });
            }
            None => debug!(%encoding, "decode failed, trying next candidate"),
        }
    }
    Err(IngestError::Decoding {
        attempted: candidates.to_vec(),
    })
}

/// Attempts a strict decode; `None` means the bytes are malformed for `encoding`.
pub fn try_decode(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    match encoding {
        TextEncoding::Utf16 => decode_utf16(bytes),
        TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        TextEncoding::Windows1252 => {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned())
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding != encoding_rs::UTF_8 => {
            (encoding, &bytes[bom_len..])
        }
        _ => (UTF_16LE, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

/// Splits on `\n`, `\r\n` and bare `\r`, dropping a leading byte-order mark.
fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .flat_map(|line| line.split('\r'))
        .map(str::to_string)
        .collect()
}

/// Encodes text as UTF-16LE with a byte-order mark, the layout Kor writes.
pub fn encode_utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
