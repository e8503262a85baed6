//! # Content Digest — Content-Addressed Identifiers
//!
//! Defines `ContentDigest` and `DigestAlgorithm`, the identifiers under which
//! pipeline outputs are memoized. A digest's textual form
//! (`sha256:<64 hex>`) and its binary form inside other digest streams
//! (2-byte big-endian algorithm tag followed by the raw value) are persisted
//! as cache keys, so both are fixed formats.
//!
//! ## Zero Digest
//!
//! The all-zero digest is reserved to mean "content not known". A
//! `FileRecord` carrying it is a reference rather than a resolved file.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DigestParseError;

/// Size in bytes of every digest value this crate produces.
pub const DIGEST_LEN: usize = 32;

/// The hash algorithm used to produce a content digest.
///
/// Every supported algorithm has a 32-byte output. The wire tags follow the
/// numbering already present in stored cache keys and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    /// SHA-256, the default algorithm.
    Sha256,
    /// SHA-512/256: SHA-512 truncated to 256 bits.
    Sha512_256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512_256 => "sha512_256",
        }
    }

    /// The 16-bit tag written ahead of a digest embedded in another digest
    /// stream.
    pub fn wire_tag(&self) -> u16 {
        match self {
            Self::Sha256 => 0x0005,
            Self::Sha512_256 => 0x000f,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha512_256" => Ok(Self::Sha512_256),
            other => Err(DigestParseError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// A content-addressed digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; DIGEST_LEN],
}

impl ContentDigest {
    /// The zero digest, denoting unknown content.
    pub const ZERO: ContentDigest = ContentDigest {
        algorithm: DigestAlgorithm::Sha256,
        bytes: [0u8; DIGEST_LEN],
    };

    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; DIGEST_LEN]) -> Self {
        Self { algorithm, bytes }
    }

    /// True if every byte of the value is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Render the digest value as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.bytes)
    }

    /// Abbreviated rendering: the first four bytes in hex.
    pub fn short(&self) -> String {
        bytes_to_hex(&self.bytes[..4])
    }
}

impl Default for ContentDigest {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (alg, hex) = s
            .split_once(':')
            .ok_or_else(|| DigestParseError::MissingAlgorithm(s.to_string()))?;
        let algorithm = alg.parse::<DigestAlgorithm>()?;
        let bytes = hex_to_32bytes(hex)?;
        // Zero means "unknown" whatever the algorithm; keep one representation.
        if bytes == [0u8; DIGEST_LEN] {
            return Ok(Self::ZERO);
        }
        Ok(Self::new(algorithm, bytes))
    }
}

// The zero digest serializes as an empty string so that documents written
// before content was known stay readable.
impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_str("")
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn bytes_to_hex(b: &[u8]) -> String {
    b.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn hex_to_32bytes(hex: &str) -> Result<[u8; DIGEST_LEN], DigestParseError> {
    if hex.len() != DIGEST_LEN * 2 {
        return Err(DigestParseError::InvalidLength(hex.len()));
    }
    let mut out = [0u8; DIGEST_LEN];
    for (i, pair) in hex.as_bytes().chunks_exact(2).enumerate() {
        let hi = hex_nibble(pair[0]).ok_or(DigestParseError::InvalidHex(i))?;
        let lo = hex_nibble(pair[1]).ok_or(DigestParseError::InvalidHex(i))?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

// Lowercase only: the rendered form is lowercase and parsing must invert it.
fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO_SHA256: &str =
        "sha256:2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";

    #[test]
    fn test_parse_and_display_round_trip() {
        let d: ContentDigest = FOO_SHA256.parse().unwrap();
        assert_eq!(d.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(d.to_string(), FOO_SHA256);
        assert_eq!(d.short(), "2c26b46b");
    }

    #[test]
    fn test_zero_digest() {
        assert!(ContentDigest::ZERO.is_zero());
        assert!(ContentDigest::default().is_zero());
        let d: ContentDigest = FOO_SHA256.parse().unwrap();
        assert!(!d.is_zero());
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let err = "2c26b46b".parse::<ContentDigest>().unwrap_err();
        assert!(matches!(err, DigestParseError::MissingAlgorithm(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let err = "md5:abcd".parse::<ContentDigest>().unwrap_err();
        assert_eq!(err, DigestParseError::UnknownAlgorithm("md5".to_string()));
    }

    #[test]
    fn test_parse_rejects_short_hex() {
        let err = "sha256:abcd".parse::<ContentDigest>().unwrap_err();
        assert_eq!(err, DigestParseError::InvalidLength(4));
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        let bad = format!("sha256:zz{}", "0".repeat(62));
        let err = bad.parse::<ContentDigest>().unwrap_err();
        assert_eq!(err, DigestParseError::InvalidHex(0));
    }

    #[test]
    fn test_parse_rejects_sign() {
        let signed = format!("sha256:{}", "+f".repeat(32));
        let err = signed.parse::<ContentDigest>().unwrap_err();
        assert_eq!(err, DigestParseError::InvalidHex(0));
    }

    #[test]
    fn test_parse_rejects_uppercase_hex() {
        let upper = format!("sha256:{}", FOO_SHA256[7..].to_ascii_uppercase());
        assert!(matches!(
            upper.parse::<ContentDigest>().unwrap_err(),
            DigestParseError::InvalidHex(_)
        ));
    }

    #[test]
    fn test_parse_rejects_multibyte_chars() {
        // 64 bytes long, but not hex.
        let bad = format!("sha256:{}", "é".repeat(32));
        assert!(matches!(
            bad.parse::<ContentDigest>().unwrap_err(),
            DigestParseError::InvalidHex(0)
        ));
    }

    #[test]
    fn test_zero_parses_to_canonical_zero() {
        let zero = format!("sha512_256:{}", "0".repeat(64));
        let d: ContentDigest = zero.parse().unwrap();
        assert_eq!(d, ContentDigest::ZERO);
        let json = format!("\"{zero}\"");
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ContentDigest::ZERO);
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!(DigestAlgorithm::Sha256.wire_tag(), 5);
        assert_eq!(DigestAlgorithm::Sha512_256.wire_tag(), 15);
    }

    #[test]
    fn test_serde_as_string() {
        let d: ContentDigest = FOO_SHA256.parse().unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{FOO_SHA256}\""));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_zero_serializes_empty() {
        let json = serde_json::to_string(&ContentDigest::ZERO).unwrap();
        assert_eq!(json, "\"\"");
        let back: ContentDigest = serde_json::from_str("\"\"").unwrap();
        assert!(back.is_zero());
    }
}
