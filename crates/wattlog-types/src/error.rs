//! Error types for wattlog-types.

use thiserror::Error;

/// Errors that can occur when parsing log lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A log line had the wrong number of fields.
    #[error("expected {expected} fields, got {actual}")]
    FieldCount {
        /// Expected field count.
        expected: usize,
        /// Actual field count.
        actual: usize,
    },

    /// A remaining-balance field could not be parsed as a float.
    #[error("invalid remaining value: {0:?}")]
    InvalidRemaining(String),

    /// A timestamp field could not be parsed.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Result type alias for parsing operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
