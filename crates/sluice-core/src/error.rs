//! # Error Types
//!
//! The algebra in this crate is total: digesting, equality, traversal and
//! substitution never fail. Errors only arise at the text and document
//! boundaries. Parsing a digest or a byte size has its own error type;
//! [`CoreError`] covers reading and writing fileset documents.

use thiserror::Error;

/// Errors reading or writing a fileset document.
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors parsing the `<algorithm>:<hex>` digest form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestParseError {
    /// The string has no `:` separating algorithm and value.
    #[error("missing algorithm prefix in digest \"{0}\" (expected <algorithm>:<hex>)")]
    MissingAlgorithm(String),

    /// The algorithm name is not one this crate can produce.
    #[error("unknown digest algorithm \"{0}\"")]
    UnknownAlgorithm(String),

    /// The hex part is not exactly 64 characters.
    #[error("expected 64 hex chars, got {0}")]
    InvalidLength(usize),

    /// The hex part contains a non-hex character.
    #[error("invalid hex at byte {0}")]
    InvalidHex(usize),
}

/// Errors parsing a byte size such as `4GiB` or `512`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    /// The numeric part is missing or not a finite, non-negative number.
    #[error("invalid size value \"{0}\"")]
    InvalidNumber(String),

    /// The unit suffix is not recognized.
    #[error("unknown size unit \"{unit}\" in \"{input}\"")]
    UnknownUnit {
        /// The rejected suffix.
        unit: String,
        /// The full input string.
        input: String,
    },
}
