//! Error types for the fingerprinting facade.

use structhash_core::HashError;
use thiserror::Error;

/// Errors that can occur while fingerprinting.
#[derive(Debug, Error)]
pub enum Error {
    /// The walker rejected the value.
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// A policy document could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A fingerprint string is not 16 hex digits.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
