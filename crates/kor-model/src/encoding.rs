//! Text encodings accepted for raw exports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A candidate encoding for a Kor export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-16 with byte-order-mark sniffing, little-endian when no BOM.
    Utf16,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// Windows code page 1252.
    Windows1252,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf16 => "utf-16",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "cp1252",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolution order. The primary encoding must stay first: an 8-bit decoder
/// accepts nearly any byte sequence and would mask a UTF-16 export.
pub const CANDIDATE_ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Utf16,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];
