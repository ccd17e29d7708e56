//! Sample types exercising every part of the walker.
//!
//! Each fixture implements [`Structural`] by hand, the way a downstream
//! crate would.

use std::collections::BTreeMap;
use std::fmt;

use structhash_core::{
    default_zero, BoxError, Child, Entries, Hashable, Includable, IncludableMap, Kind,
    StructValue, Structural, UnionValue,
};

/// A package-like record with one field of each tag flavor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    pub name: String,
    pub version: String,
    /// Tagged `set`: order is irrelevant.
    pub tags: Vec<String>,
    /// Tagged `ignore`.
    pub notes: String,
    /// Private.
    pub cache_key: u64,
}

impl Component {
    pub fn new(name: &str, version: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            notes: String::new(),
            cache_key: 0,
        }
    }
}

impl Structural for Component {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(
            StructValue::new("Component")
                .field("Name", &self.name)
                .field("Version", &self.version)
                .tagged("Tags", r#"hash:"set""#, &self.tags)
                .tagged("Notes", r#"json:"notes" hash:"ignore""#, &self.notes)
                .private("cache_key", &self.cache_key),
        )
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }
}

/// A struct with a single exported integer field `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Single {
    pub a: i64,
}

impl Structural for Single {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(StructValue::new("Single").field("A", &self.a))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }
}

/// Always reports the digest 42, whatever its contents.
#[derive(Debug, Clone, Default)]
pub struct Constant {
    pub payload: Vec<u8>,
}

/// Digest every [`Constant`] reports.
pub const CONSTANT_DIGEST: u64 = 42;

impl Hashable for Constant {
    fn digest(&self) -> Result<u64, BoxError> {
        Ok(CONSTANT_DIGEST)
    }
}

impl Structural for Constant {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(StructValue::new("Constant").field("Payload", &self.payload))
    }

    fn hashable(&self) -> Option<&dyn Hashable> {
        Some(self)
    }
}

/// Holds a [`Constant`] in its only field, `Inner`.
#[derive(Debug, Clone, Default)]
pub struct Outer {
    pub inner: Constant,
}

impl Structural for Outer {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(StructValue::new("Outer").field("Inner", &self.inner))
    }
}

/// Drops every field whose name starts with `Secret`.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user: String,
    pub secret_token: String,
}

impl Includable for Credentials {
    fn include_field(&self, field: &str, _value: &dyn Structural) -> Result<bool, BoxError> {
        Ok(!field.starts_with("Secret"))
    }
}

impl Structural for Credentials {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(
            StructValue::new("Credentials")
                .field("User", &self.user)
                .field("SecretToken", &self.secret_token),
        )
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }

    fn includable(&self) -> Option<&dyn Includable> {
        Some(self)
    }
}

/// Drops map entries whose key starts with `_` from its `Labels` field.
#[derive(Debug, Clone, Default)]
pub struct Labeled {
    pub labels: BTreeMap<String, String>,
}

impl IncludableMap for Labeled {
    fn include_entry(
        &self,
        field: &str,
        key: &dyn Structural,
        _value: &dyn Structural,
    ) -> Result<bool, BoxError> {
        if field != "Labels" {
            return Ok(true);
        }
        match key.kind() {
            Kind::Str(k) => Ok(!k.starts_with('_')),
            other => Err(format!("unexpected label key {other:?}").into()),
        }
    }
}

impl Structural for Labeled {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(StructValue::new("Labeled").field("Labels", &self.labels))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }

    fn includable_map(&self) -> Option<&dyn IncludableMap> {
        Some(self)
    }
}

/// A string map that drops its own `_`-prefixed entries.
///
/// Unlike [`Labeled`], the filter belongs to the map itself, so it applies
/// wherever the map appears and sees an empty field name.
#[derive(Debug, Clone, Default)]
pub struct Annotations(pub BTreeMap<String, String>);

impl IncludableMap for Annotations {
    fn include_entry(
        &self,
        field: &str,
        key: &dyn Structural,
        _value: &dyn Structural,
    ) -> Result<bool, BoxError> {
        if !field.is_empty() {
            return Err(format!("map filter scoped to field {field}").into());
        }
        match key.kind() {
            Kind::Str(k) => Ok(!k.starts_with('_')),
            other => Err(format!("unexpected annotation key {other:?}").into()),
        }
    }
}

impl Structural for Annotations {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(
            self.0.iter().map(|(k, v)| (k as Child<'_>, v as Child<'_>)),
        ))
    }

    fn includable_map(&self) -> Option<&dyn IncludableMap> {
        Some(self)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }
}

/// A map whose entry filter always fails.
#[derive(Debug, Clone, Default)]
pub struct Unreadable(pub BTreeMap<String, u32>);

impl IncludableMap for Unreadable {
    fn include_entry(
        &self,
        _field: &str,
        _key: &dyn Structural,
        _value: &dyn Structural,
    ) -> Result<bool, BoxError> {
        Err("entry filter unavailable".into())
    }
}

impl Structural for Unreadable {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(
            self.0.iter().map(|(k, v)| (k as Child<'_>, v as Child<'_>)),
        ))
    }

    fn includable_map(&self) -> Option<&dyn IncludableMap> {
        Some(self)
    }
}

/// A semantic version whose string form is `major.minor.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SemVer {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemVer {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Structural for SemVer {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(
            StructValue::new("SemVer")
                .field("Major", &self.major)
                .field("Minor", &self.minor)
                .field("Patch", &self.patch),
        )
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }

    fn stringer(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// A release whose version is hashed by its string form.
#[derive(Debug, Clone, Default)]
pub struct Release {
    pub version: SemVer,
    pub channel: String,
}

impl Structural for Release {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(
            StructValue::new("Release")
                .tagged("Version", r#"hash:"string""#, &self.version)
                .field("Channel", &self.channel),
        )
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        default_zero::<Self>()
    }
}

/// A plain enum hashed as a tagged union.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Empty,
    Circle(f64),
    Rect(f64, f64),
}

impl Structural for Shape {
    fn kind(&self) -> Kind<'_> {
        Kind::Union(match self {
            Shape::Empty => UnionValue::new().unit("Empty"),
            Shape::Circle(r) => UnionValue::single("Circle", r),
            Shape::Rect(w, h) => UnionValue::new().tuple("Rect", vec![w as Child<'_>, h]),
        })
    }
}

/// A struct whose `Hashable` hook always fails.
#[derive(Debug, Clone, Default)]
pub struct Broken;

impl Hashable for Broken {
    fn digest(&self) -> Result<u64, BoxError> {
        Err("digest unavailable".into())
    }
}

impl Structural for Broken {
    fn kind(&self) -> Kind<'_> {
        Kind::Struct(StructValue::new("Broken"))
    }

    fn hashable(&self) -> Option<&dyn Hashable> {
        Some(self)
    }
}
