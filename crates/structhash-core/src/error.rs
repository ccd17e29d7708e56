//! Error types for the structhash core.

use thiserror::Error;

/// Error type reported by caller-supplied hooks.
///
/// Hook errors are carried through the walk verbatim as the source of
/// [`HashError::Hook`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while hashing a value.
#[derive(Debug, Error)]
pub enum HashError {
    /// The value contains a kind the walker cannot introspect.
    #[error("unsupported kind to hash: {kind}")]
    UnsupportedType { kind: &'static str },

    /// A field is tagged `string` but its type has no string form.
    #[error("field {field} has a string directive but does not provide a string form")]
    NotStringer { field: String },

    /// A `Hashable`, `Includable` or `IncludableMap` hook failed.
    #[error("hook error: {0}")]
    Hook(#[source] BoxError),

    /// A time value could not be serialized to its canonical form.
    #[error("time encoding error: {0}")]
    TimeEncoding(#[from] TimeEncodingError),

    /// Too many consecutive optional layers around a single value.
    #[error("indirection limit of {limit} exceeded")]
    IndirectionLimit { limit: usize },
}

/// Errors produced by the canonical time encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeEncodingError {
    #[error("zone offset has fractional minute: {0}s")]
    FractionalMinuteOffset(i32),

    #[error("unexpected zone offset: {0} minutes")]
    UnexpectedOffset(i32),

    #[error("time out of range")]
    OutOfRange,
}

/// Result type for hashing operations.
pub type Result<T> = std::result::Result<T, HashError>;
