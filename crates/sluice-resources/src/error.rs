//! # Error Types
//!
//! Resource arithmetic is total. Errors only arise when parsing the textual
//! form of a resource vector, e.g. from the command line.

use sluice_core::SizeParseError;
use thiserror::Error;

/// Error parsing a `key=value,...` resource vector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A component is not of the form `key=value`.
    #[error("expected <dimension>=<value>, got \"{0}\"")]
    MalformedComponent(String),

    /// The key does not name a dimension.
    #[error("unknown resource dimension \"{0}\" (expected mem, cpu, or disk)")]
    UnknownDimension(String),

    /// The same dimension was given twice.
    #[error("resource dimension \"{0}\" given more than once")]
    DuplicateDimension(String),

    /// The value is not a finite, non-negative number.
    #[error("invalid value \"{value}\" for {dimension}")]
    InvalidValue {
        /// The dimension being parsed.
        dimension: String,
        /// The rejected value.
        value: String,
    },

    /// A byte quantity could not be parsed.
    #[error(transparent)]
    Size(#[from] SizeParseError),
}
