//! # Byte Sizes
//!
//! Human-readable rendering and parsing of byte counts, used by the
//! diagnostic renderings of filesets and resource vectors.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SizeParseError;

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// A number of bytes.
///
/// Renders as `<n>B` below one KiB and with one decimal in the largest
/// binary unit otherwise: `0B`, `14B`, `1.5KiB`, `4.0GiB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByteSize(pub u64);

impl ByteSize {
    /// The raw byte count.
    pub fn bytes(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 1024 {
            return write!(f, "{}B", self.0);
        }
        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        write!(f, "{value:.1}{}", UNITS[unit])
    }
}

impl FromStr for ByteSize {
    type Err = SizeParseError;

    /// Accepts a non-negative number followed by an optional unit: one of
    /// `B, KiB, MiB, GiB, TiB, PiB, EiB` or the shorthands `K, M, G, T, P, E`
    /// (case-insensitive). Fractional values are rounded to whole bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| SizeParseError::InvalidNumber(s.to_string()))?;
        if !value.is_finite() {
            return Err(SizeParseError::InvalidNumber(s.to_string()));
        }
        let exponent = unit_exponent(unit.trim()).ok_or_else(|| SizeParseError::UnknownUnit {
            unit: unit.trim().to_string(),
            input: s.to_string(),
        })?;
        let bytes = value * 1024f64.powi(exponent);
        // `as` saturates at u64::MAX for oversized inputs.
        Ok(Self(bytes.round() as u64))
    }
}

fn unit_exponent(unit: &str) -> Option<i32> {
    let lower = unit.to_ascii_lowercase();
    let exponent = match lower.as_str() {
        "" | "b" => 0,
        "k" | "kib" => 1,
        "m" | "mib" => 2,
        "g" | "gib" => 3,
        "t" | "tib" => 4,
        "p" | "pib" => 5,
        "e" | "eib" => 6,
        _ => return None,
    };
    Some(exponent)
}
