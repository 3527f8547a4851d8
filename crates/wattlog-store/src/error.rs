//! Error types for wattlog-store.

use std::path::PathBuf;

use wattlog_types::ParseError;

/// Result type for wattlog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wattlog-store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No encrypted blob exists at the resolved store location.
    ///
    /// Distinct from [`Error::DecryptionFailed`]: the location itself is
    /// derived from the room name and passphrase, so this usually means
    /// one of the two is wrong, or no reading was ever recorded.
    #[error("no history found at {path} (wrong room name and/or passphrase?)")]
    NotFound {
        /// The resolved blob path that was probed.
        path: PathBuf,
    },

    /// The blob could not be decrypted.
    ///
    /// A wrong passphrase and corrupted ciphertext are indistinguishable
    /// here by design; both surface as a padding failure.
    #[error("decryption failed: wrong passphrase or corrupted data")]
    DecryptionFailed,

    /// The key derivation parameters were rejected.
    #[error("key derivation failed")]
    KeyDerivation,

    /// Failed to create the store directory.
    #[error("failed to create store directory {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The decrypted payload is not valid UTF-8.
    #[error("decrypted log is not valid UTF-8")]
    NotUtf8,

    /// A decrypted log record is malformed.
    #[error("malformed log record: {0}")]
    Parse(#[from] ParseError),

    /// CSV-level error while reading the decrypted log.
    #[error("log format error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
