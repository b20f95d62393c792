//! Byte codecs for pasted key material and for display
//!
//! Users paste keys and signatures either as hex or as the bracketed number
//! arrays pqlab prints. `parse_bytes` accepts both. The formatters produce
//! the collapsed previews used by the renderer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Elements shown before a collapsed array is truncated
pub const DEFAULT_PREVIEW_LEN: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No byte data found in input")]
    Empty,

    #[error("Hex input has an odd number of digits ({0})")]
    OddLength(usize),

    #[error("Array element {index} is not a byte (0-255): {value}")]
    ByteOutOfRange { index: usize, value: String },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// How byte arrays are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteFormat {
    #[default]
    Array,
    Hex,
}

impl FromStr for ByteFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(ByteFormat::Array),
            "hex" => Ok(ByteFormat::Hex),
            other => Err(format!("unknown byte format '{}', expected array or hex", other)),
        }
    }
}

/// Parse pasted bytes: a `[1, 2, 3]` array first, hex as the fallback.
///
/// Input that is a JSON array but holds something other than bytes is an
/// error. Only text that is not a JSON array at all is read as hex. Non-hex
/// characters (whitespace, colons, line breaks) are ignored in hex input, as
/// is a leading `0x`.
pub fn parse_bytes(input: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = input.trim();

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(values) if values.is_empty() => return Err(ParseError::Empty),
            Ok(values) => return array_bytes(&values),
            Err(e) => {
                tracing::debug!(error = %e, "input is not a JSON array, falling back to hex");
            }
        }
    }

    parse_hex(trimmed)
}

fn array_bytes(values: &[serde_json::Value]) -> Result<Vec<u8>, ParseError> {
    values
        .iter()
        .enumerate()
        .map(|(index, v)| {
            v.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| ParseError::ByteOutOfRange {
                    index,
                    value: v.to_string(),
                })
        })
        .collect()
}

fn parse_hex(input: &str) -> Result<Vec<u8>, ParseError> {
    let body = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let digits: Vec<u8> = body.bytes().filter(u8::is_ascii_hexdigit).collect();

    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::OddLength => ParseError::OddLength(digits.len()),
        other => ParseError::InvalidHex(other.to_string()),
    })
}

/// Lowercase hex, no separators
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// `[1, 2, 3]`, truncated with a count suffix when collapsed
pub fn format_array(bytes: &[u8], expanded: bool, limit: usize) -> String {
    let shown = if expanded { bytes.len() } else { bytes.len().min(limit) };
    let joined = bytes[..shown]
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    if shown < bytes.len() {
        format!("[{}, ... ({} more items)]", joined, bytes.len() - shown)
    } else {
        format!("[{}]", joined)
    }
}

/// Hex counterpart of [`format_array`]
pub fn format_hex(bytes: &[u8], expanded: bool, limit: usize) -> String {
    let shown = if expanded { bytes.len() } else { bytes.len().min(limit) };
    let hex = to_hex(&bytes[..shown]);

    if shown < bytes.len() {
        format!("{}... ({} more bytes)", hex, bytes.len() - shown)
    } else {
        hex
    }
}

pub fn format_bytes(bytes: &[u8], format: ByteFormat, expanded: bool, limit: usize) -> String {
    match format {
        ByteFormat::Array => format_array(bytes, expanded, limit),
        ByteFormat::Hex => format_hex(bytes, expanded, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        assert_eq!(parse_bytes("[1,2,3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_bytes("  [1, 2, 255]\n").unwrap(), vec![1, 2, 255]);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_bytes("010203").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_bytes("0xDEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_parse_hex_ignores_noise() {
        let pasted = "01 02\n03:0a\t0B ";
        assert_eq!(parse_bytes(pasted).unwrap(), vec![1, 2, 3, 10, 11]);
    }

    #[test]
    fn test_bad_array_falls_back_to_hex() {
        // Not a valid byte array, but the hex digits 1 and 2 survive cleaning
        assert_eq!(parse_bytes("[1,2,]").unwrap(), vec![0x12]);
    }

    #[test]
    fn test_out_of_range_array_rejected() {
        // Even digit count once cleaned, must still not be read as hex
        assert_eq!(
            parse_bytes("[1, 2, 300, 4]"),
            Err(ParseError::ByteOutOfRange {
                index: 2,
                value: "300".to_string()
            })
        );
        assert!(matches!(
            parse_bytes("[1, 2, 300]"),
            Err(ParseError::ByteOutOfRange { index: 2, .. })
        ));
        assert!(matches!(
            parse_bytes("[-1, 2]"),
            Err(ParseError::ByteOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            parse_bytes("[1, \"ab\"]"),
            Err(ParseError::ByteOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_bytes(""), Err(ParseError::Empty));
        assert_eq!(parse_bytes("xyz!"), Err(ParseError::Empty));
        assert_eq!(parse_bytes("[]"), Err(ParseError::Empty));
        assert_eq!(parse_bytes("abc"), Err(ParseError::OddLength(3)));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0, 15, 255]), "000fff");
        assert_eq!(parse_bytes(&to_hex(&[9, 8, 7])).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_format_array_collapsed() {
        let bytes: Vec<u8> = (0..25).collect();
        assert_eq!(
            format_array(&bytes, false, DEFAULT_PREVIEW_LEN),
            "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, ... (5 more items)]"
        );
    }

    #[test]
    fn test_format_array_expanded_and_short() {
        let bytes: Vec<u8> = (0..25).collect();
        assert!(format_array(&bytes, true, DEFAULT_PREVIEW_LEN).ends_with("23, 24]"));
        assert_eq!(format_array(&[1, 2, 3], false, DEFAULT_PREVIEW_LEN), "[1, 2, 3]");
        assert_eq!(format_array(&[], false, DEFAULT_PREVIEW_LEN), "[]");
    }

    #[test]
    fn test_format_hex_collapsed() {
        let bytes = [0xabu8; 24];
        assert_eq!(format_hex(&bytes, false, 2), "abab... (22 more bytes)");
    }

    #[test]
    fn test_byte_format_from_str() {
        assert_eq!("HEX".parse::<ByteFormat>().unwrap(), ByteFormat::Hex);
        assert!("base64".parse::<ByteFormat>().is_err());
    }
}
