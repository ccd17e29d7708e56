//! Caller-implemented extension points consulted during the walk.
//!
//! A type opts into a hook by implementing the trait and returning
//! `Some(self)` from the matching accessor on [`Structural`]. The walker
//! asks for hooks only when it enters a struct or a map.

use crate::error::BoxError;
use crate::structural::Structural;

/// A struct value that computes its own digest.
///
/// When present, the walker skips the struct's fields entirely and uses
/// this digest (or error) as the struct's result.
pub trait Hashable {
    fn digest(&self) -> Result<u64, BoxError>;
}

/// A struct that filters its own fields.
pub trait Includable {
    /// Whether `field` (holding `value`) takes part in the struct's digest.
    fn include_field(&self, field: &str, value: &dyn Structural) -> Result<bool, BoxError>;
}

/// A struct (or map) that filters map entries.
pub trait IncludableMap {
    /// Whether the entry `key -> value` takes part in the map's digest.
    ///
    /// `field` names the struct field holding the map, or is empty when the
    /// map filters its own entries.
    fn include_entry(
        &self,
        field: &str,
        key: &dyn Structural,
        value: &dyn Structural,
    ) -> Result<bool, BoxError>;
}
