//! Hashing policy and per-field tag directives.
//!
//! A [`Policy`] is resolved once per top-level call and is read-only for
//! the rest of the walk. Struct fields may override it through tags
//! written in the conventional `key:"value"` form, for example
//! `hash:"set"` or `hash:"ignore" json:"-"`.

use serde::{Deserialize, Serialize};

use crate::hasher::HasherKind;

/// Tag key consulted when the policy does not name one.
pub const DEFAULT_TAG_NAME: &str = "hash";

/// Equivalence policy for a hashing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Hasher primitive.
    pub hasher: HasherKind,
    /// Tag key holding field directives. Empty means [`DEFAULT_TAG_NAME`].
    pub tag_name: String,
    /// Absent optional values hash as the zero value of their type.
    pub zero_nil: bool,
    /// Struct fields holding their zero value are skipped.
    pub ignore_zero_value: bool,
    /// Every slice is hashed as a set.
    pub slices_as_sets: bool,
    /// Prefer a field's string form whenever it has one.
    pub use_stringer: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            hasher: HasherKind::default(),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            zero_nil: false,
            ignore_zero_value: false,
            slices_as_sets: false,
            use_stringer: false,
        }
    }
}

impl Policy {
    pub fn hasher(mut self, hasher: HasherKind) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn zero_nil(mut self, on: bool) -> Self {
        self.zero_nil = on;
        self
    }

    pub fn ignore_zero_value(mut self, on: bool) -> Self {
        self.ignore_zero_value = on;
        self
    }

    pub fn slices_as_sets(mut self, on: bool) -> Self {
        self.slices_as_sets = on;
        self
    }

    pub fn use_stringer(mut self, on: bool) -> Self {
        self.use_stringer = on;
        self
    }

    /// The tag key actually in effect.
    pub fn effective_tag_name(&self) -> &str {
        if self.tag_name.is_empty() {
            DEFAULT_TAG_NAME
        } else {
            &self.tag_name
        }
    }

    /// Resolve the directive carried by a field's tag string.
    pub fn directive(&self, tag: &str) -> FieldDirective {
        lookup_tag(tag, self.effective_tag_name())
            .map(FieldDirective::parse)
            .unwrap_or(FieldDirective::None)
    }
}

/// Per-field override of the global policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDirective {
    /// No directive, or one this engine does not recognize.
    None,
    /// `ignore` or `-`: the field never influences the digest.
    Ignore,
    /// `set`: element order of the field's sequence is irrelevant.
    Set,
    /// `string`: hash the field's string form; it is an error if absent.
    String,
}

impl FieldDirective {
    pub fn parse(value: &str) -> Self {
        match value {
            "ignore" | "-" => FieldDirective::Ignore,
            "set" => FieldDirective::Set,
            "string" => FieldDirective::String,
            _ => FieldDirective::None,
        }
    }
}

/// Look up `key` in a conventional `key:"value" other:"value"` tag string.
///
/// Malformed input ends the scan; whatever was found before it counts.
pub fn lookup_tag<'t>(tag: &'t str, key: &str) -> Option<&'t str> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        // Name runs up to the colon; it may not contain spaces, quotes or
        // control characters.
        let name_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
            .unwrap_or(rest.len());
        if name_end == 0 || !rest[name_end..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_end];
        rest = &rest[name_end + 2..];

        // Quoted value, honoring backslash escapes when finding its end.
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let value = &rest[..i];
        rest = &rest[i + 1..];

        if name == key {
            return Some(value);
        }
    }
}
