//! # Encoding Detection
//!
//! Import files come from spreadsheets, phones and old desktop tools, so their
//! encoding is unknown. [`EncodingDetector`] tries a fixed list of
//! [`EncodingCandidate`]s in order and returns the text from the first one
//! that decodes the whole buffer.
//!
//! ## Default Order
//!
//! 1. `utf8`: strict UTF-8; any buffer that is valid UTF-8 is read as UTF-8
//! 2. `utf16-bom`: UTF-16 with a leading LE or BE byte-order mark
//! 3. `utf16le`, `utf16be`: BOM-less UTF-16
//! 4. `windows1254`: the Turkish code page
//! 5. `latin1`: ISO-8859-1, which accepts every byte
//!
//! The order is part of the contract. An ambiguous buffer decodes differently
//! if the order changes.
//!
//! BOM-less UTF-16 is only tried once UTF-8 has failed, and only accepted when
//! the buffer has an even length and at least one code unit whose high byte
//! is zero. Delimited text always contains a `;` or a line break, so real
//! UTF-16 input passes, while 8-bit text almost never contains NUL bytes.
//! BOM-less UTF-16 of pure ASCII is also valid UTF-8 and is read as such.

use crate::error::{CardzError, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1254};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingCandidate {
    #[serde(rename = "utf8")]
    Utf8,
    #[serde(rename = "utf16-bom")]
    Utf16Bom,
    #[serde(rename = "utf16le")]
    Utf16Le,
    #[serde(rename = "utf16be")]
    Utf16Be,
    #[serde(rename = "windows1254")]
    Windows1254,
    #[serde(rename = "latin1")]
    Latin1,
}

pub const DEFAULT_ORDER: [EncodingCandidate; 6] = [
    EncodingCandidate::Utf8,
    EncodingCandidate::Utf16Bom,
    EncodingCandidate::Utf16Le,
    EncodingCandidate::Utf16Be,
    EncodingCandidate::Windows1254,
    EncodingCandidate::Latin1,
];

impl EncodingCandidate {
    pub fn label(self) -> &'static str {
        match self {
            EncodingCandidate::Utf8 => "utf8",
            EncodingCandidate::Utf16Bom => "utf16-bom",
            EncodingCandidate::Utf16Le => "utf16le",
            EncodingCandidate::Utf16Be => "utf16be",
            EncodingCandidate::Windows1254 => "windows1254",
            EncodingCandidate::Latin1 => "latin1",
        }
    }

    /// Decode the whole buffer, or `None` if this encoding does not apply.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            EncodingCandidate::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            EncodingCandidate::Utf16Bom => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                strict(encoding, &bytes[bom_len..])
            }
            EncodingCandidate::Utf16Le => {
                if !looks_like_utf16(bytes, 1) {
                    return None;
                }
                strict(UTF_16LE, bytes)
            }
            EncodingCandidate::Utf16Be => {
                if !looks_like_utf16(bytes, 0) {
                    return None;
                }
                strict(UTF_16BE, bytes)
            }
            EncodingCandidate::Windows1254 => {
                // Bytes the code page leaves unassigned come back as C1
                // controls; treat them as a mismatch.
                let text = strict(WINDOWS_1254, bytes)?;
                (!text.chars().any(|c| ('\u{80}'..='\u{9f}').contains(&c))).then_some(text)
            }
            EncodingCandidate::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for EncodingCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EncodingCandidate {
    type Err = CardzError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "utf8" => Ok(EncodingCandidate::Utf8),
            "utf16bom" | "utf16" => Ok(EncodingCandidate::Utf16Bom),
            "utf16le" => Ok(EncodingCandidate::Utf16Le),
            "utf16be" => Ok(EncodingCandidate::Utf16Be),
            "windows1254" | "cp1254" => Ok(EncodingCandidate::Windows1254),
            "latin1" | "iso88591" => Ok(EncodingCandidate::Latin1),
            _ => Err(CardzError::Api(format!("Unknown encoding: {}", s))),
        }
    }
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// `high_byte` is the offset of the high byte within each code unit:
/// 1 for little endian, 0 for big endian.
fn looks_like_utf16(bytes: &[u8], high_byte: usize) -> bool {
    bytes.len() % 2 == 0 && bytes.chunks_exact(2).any(|unit| unit[high_byte] == 0)
}

#[derive(Debug, Clone)]
pub struct EncodingDetector {
    candidates: Vec<EncodingCandidate>,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER.to_vec())
    }
}

impl EncodingDetector {
    pub fn new(candidates: Vec<EncodingCandidate>) -> Self {
        Self { candidates }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.detect(bytes).map(|(_, text)| text)
    }

    /// Like [`decode`](Self::decode), but also reports which candidate won.
    pub fn detect(&self, bytes: &[u8]) -> Result<(EncodingCandidate, String)> {
        for candidate in &self.candidates {
            if let Some(text) = candidate.decode(bytes) {
                tracing::debug!(encoding = %candidate, len = bytes.len(), "decoded input");
                return Ok((*candidate, text));
            }
        }
        Err(CardzError::UndecodableInput)
    }
}
