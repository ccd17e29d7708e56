//! The closed classification of a value's shape.
//!
//! A [`Structural`] value describes itself as exactly one [`Kind`] per
//! step of the walk. Composite kinds borrow their children as
//! `&dyn Structural`, so the walker recurses without knowing any concrete
//! type.

use std::fmt;

use crate::structural::Structural;
use crate::time::CanonicalTime;

/// A borrowed child value.
pub type Child<'a> = &'a (dyn Structural + 'a);

/// Produces the zero value of a pointee type, if the type has one.
pub type ZeroFn = fn() -> Option<Box<dyn Structural>>;

/// The shape of a value at one step of the walk.
pub enum Kind<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Real and imaginary parts.
    Complex64(f32, f32),
    /// Real and imaginary parts.
    Complex128(f64, f64),
    Str(&'a str),
    Time(&'a dyn CanonicalTime),
    /// Fixed-length sequence.
    Array(Elements<'a>),
    /// Variable-length sequence.
    Slice(Elements<'a>),
    Map(Entries<'a>),
    Struct(StructValue<'a>),
    /// Tagged variant aggregate.
    Union(UnionValue<'a>),
    /// A value that may be absent.
    Pointer(Pointer<'a>),
    /// Something the walker cannot introspect (a channel, a function).
    Unsupported(&'static str),
}

impl Kind<'_> {
    /// Short name of the kind, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool(_) => "bool",
            Kind::I8(_) => "i8",
            Kind::I16(_) => "i16",
            Kind::I32(_) => "i32",
            Kind::I64(_) => "i64",
            Kind::U8(_) => "u8",
            Kind::U16(_) => "u16",
            Kind::U32(_) => "u32",
            Kind::U64(_) => "u64",
            Kind::F32(_) => "f32",
            Kind::F64(_) => "f64",
            Kind::Complex64(..) => "complex64",
            Kind::Complex128(..) => "complex128",
            Kind::Str(_) => "string",
            Kind::Time(_) => "time",
            Kind::Array(_) => "array",
            Kind::Slice(_) => "slice",
            Kind::Map(_) => "map",
            Kind::Struct(_) => "struct",
            Kind::Union(_) => "union",
            Kind::Pointer(_) => "pointer",
            Kind::Unsupported(kind) => kind,
        }
    }
}

impl fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.name())
    }
}

/// Children of an array or slice, in iteration order.
pub struct Elements<'a> {
    iter: Box<dyn Iterator<Item = Child<'a>> + 'a>,
    unordered: bool,
}

impl<'a> Elements<'a> {
    pub fn new(iter: impl Iterator<Item = Child<'a>> + 'a) -> Self {
        Self {
            iter: Box::new(iter),
            unordered: false,
        }
    }

    /// Elements of a collection whose iteration order carries no meaning
    /// (hash sets and the like). Always hashed as a set.
    pub fn unordered(iter: impl Iterator<Item = Child<'a>> + 'a) -> Self {
        Self {
            iter: Box::new(iter),
            unordered: true,
        }
    }

    /// Borrow every element of a slice.
    pub fn of<T: Structural>(items: &'a [T]) -> Self {
        Self::new(items.iter().map(|item| item as Child<'a>))
    }

    pub fn is_unordered(&self) -> bool {
        self.unordered
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = Child<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Key/value pairs of a map, in arbitrary order.
pub struct Entries<'a> {
    iter: Box<dyn Iterator<Item = (Child<'a>, Child<'a>)> + 'a>,
}

impl<'a> Entries<'a> {
    pub fn new(iter: impl Iterator<Item = (Child<'a>, Child<'a>)> + 'a) -> Self {
        Self {
            iter: Box::new(iter),
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Child<'a>, Child<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

/// One member of a struct.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    pub name: &'a str,
    /// Raw tag string, e.g. `hash:"set"`. Empty when untagged.
    pub tag: &'a str,
    /// Private members never influence the digest.
    pub exported: bool,
    pub value: Child<'a>,
}

/// A named record with fields in declaration order.
///
/// ```
/// use structhash_core::{Kind, StructValue, Structural};
///
/// struct Package {
///     name: String,
///     tags: Vec<String>,
///     cache_key: u64,
/// }
///
/// impl Structural for Package {
///     fn kind(&self) -> Kind<'_> {
///         Kind::Struct(
///             StructValue::new("Package")
///                 .field("Name", &self.name)
///                 .tagged("Tags", r#"hash:"set""#, &self.tags)
///                 .private("cache_key", &self.cache_key),
///         )
///     }
/// }
/// ```
pub struct StructValue<'a> {
    name: &'a str,
    fields: Vec<Field<'a>>,
}

impl<'a> StructValue<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add an exported, untagged field.
    pub fn field(self, name: &'a str, value: Child<'a>) -> Self {
        self.push(name, "", true, value)
    }

    /// Add an exported field carrying a tag string.
    pub fn tagged(self, name: &'a str, tag: &'a str, value: Child<'a>) -> Self {
        self.push(name, tag, true, value)
    }

    /// Add a private field. It counts towards zero-value checks only.
    pub fn private(self, name: &'a str, value: Child<'a>) -> Self {
        self.push(name, "", false, value)
    }

    fn push(mut self, name: &'a str, tag: &'a str, exported: bool, value: Child<'a>) -> Self {
        self.fields.push(Field {
            name,
            tag,
            exported,
            value,
        });
        self
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }
}

/// Payload carried by one union variant.
pub enum Payload<'a> {
    /// A variant without data.
    Unit,
    /// A single value.
    Value(Child<'a>),
    /// Several positional values, hashed as an ordered sequence.
    Tuple(Vec<Child<'a>>),
}

/// One variant of a tagged union.
pub struct Variant<'a> {
    pub tag: &'a str,
    pub payload: Payload<'a>,
}

/// A tagged variant aggregate, typically a Rust enum value.
///
/// Most enums report a single active variant; the walker accepts any
/// number and combines them without regard to order.
///
/// Every variant contributes, including those without data: a unit
/// variant hashes as its tag alone, so `Empty` differs from a union with
/// no variants at all. A data-carrying variant hashes as the ordered pair
/// of its tag and payload.
#[derive(Default)]
pub struct UnionValue<'a> {
    variants: Vec<Variant<'a>>,
}

impl<'a> UnionValue<'a> {
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
        }
    }

    /// A union holding a single data-carrying variant.
    pub fn single(tag: &'a str, value: Child<'a>) -> Self {
        Self::new().variant(tag, value)
    }

    pub fn variant(self, tag: &'a str, value: Child<'a>) -> Self {
        self.push(tag, Payload::Value(value))
    }

    pub fn tuple(self, tag: &'a str, values: Vec<Child<'a>>) -> Self {
        self.push(tag, Payload::Tuple(values))
    }

    pub fn unit(self, tag: &'a str) -> Self {
        self.push(tag, Payload::Unit)
    }

    fn push(mut self, tag: &'a str, payload: Payload<'a>) -> Self {
        self.variants.push(Variant { tag, payload });
        self
    }

    pub fn variants(&self) -> &[Variant<'a>] {
        &self.variants
    }
}

/// An optional value and the zero value of its pointee type.
pub struct Pointer<'a> {
    pub target: Option<Child<'a>>,
    pub zero: ZeroFn,
}

impl<'a> Pointer<'a> {
    pub fn new(target: Option<Child<'a>>, zero: ZeroFn) -> Self {
        Self { target, zero }
    }
}
