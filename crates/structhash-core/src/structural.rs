//! The [`Structural`] trait and its implementations for standard types.
//!
//! References, `Box`, `Rc` and `Arc` are transparent: they report their
//! target's kind and hooks. `Option` is the only pointer-like type that
//! can be absent.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;
use std::time::Duration;

use crate::hooks::{Hashable, Includable, IncludableMap};
use crate::kind::{Child, Elements, Entries, Kind, Pointer};

/// A value the walker can hash.
pub trait Structural {
    /// Describe this value's shape.
    fn kind(&self) -> Kind<'_>;

    /// String form used by the `string` directive and `use_stringer`.
    fn stringer(&self) -> Option<String> {
        None
    }

    fn hashable(&self) -> Option<&dyn Hashable> {
        None
    }

    fn includable(&self) -> Option<&dyn Includable> {
        None
    }

    fn includable_map(&self) -> Option<&dyn IncludableMap> {
        None
    }

    /// The zero value of this type, substituted for absent values when the
    /// policy enables `zero_nil`.
    ///
    /// Struct types must supply it for `zero_nil` to apply to them; without
    /// it an absent value hashes as the untyped placeholder. Types with a
    /// `Default` that is their zero can return [`default_zero`].
    fn zero_value() -> Option<Box<dyn Structural>>
    where
        Self: Sized,
    {
        None
    }
}

/// A [`Structural::zero_value`] built from `T::default()`.
///
/// ```
/// use structhash_core::{default_zero, hash, Kind, Policy, StructValue, Structural};
///
/// #[derive(Default)]
/// struct Port {
///     number: u16,
/// }
///
/// impl Structural for Port {
///     fn kind(&self) -> Kind<'_> {
///         Kind::Struct(StructValue::new("Port").field("Number", &self.number))
///     }
///
///     fn zero_value() -> Option<Box<dyn Structural>> {
///         default_zero::<Self>()
///     }
/// }
///
/// let policy = Policy::default().zero_nil(true);
/// assert_eq!(
///     hash(&Option::<Port>::None, Some(&policy)).unwrap(),
///     hash(&Port::default(), Some(&policy)).unwrap(),
/// );
/// ```
pub fn default_zero<T: Structural + Default + 'static>() -> Option<Box<dyn Structural>> {
    Some(Box::new(T::default()))
}

macro_rules! primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Structural for $ty {
                fn kind(&self) -> Kind<'_> {
                    Kind::$variant(*self)
                }

                fn zero_value() -> Option<Box<dyn Structural>> {
                    Some(Box::new(<$ty>::default()))
                }
            }
        )*
    };
}

primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl Structural for isize {
    fn kind(&self) -> Kind<'_> {
        Kind::I64(*self as i64)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(0isize))
    }
}

impl Structural for usize {
    fn kind(&self) -> Kind<'_> {
        Kind::U64(*self as u64)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(0usize))
    }
}

impl Structural for char {
    fn kind(&self) -> Kind<'_> {
        Kind::U32(*self as u32)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new('\0'))
    }
}

impl Structural for Duration {
    /// Signed nanoseconds, saturating.
    fn kind(&self) -> Kind<'_> {
        Kind::I64(i64::try_from(self.as_nanos()).unwrap_or(i64::MAX))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(Duration::ZERO))
    }
}

impl Structural for str {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }
}

impl Structural for String {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(String::new()))
    }
}

impl Structural for Cow<'_, str> {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(String::new()))
    }
}

impl<T: Structural> Structural for [T] {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::of(self))
    }
}

impl<T: Structural, const N: usize> Structural for [T; N] {
    fn kind(&self) -> Kind<'_> {
        Kind::Array(Elements::of(self))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        let elem = T::zero_value()?;
        Some(Box::new(ZeroArray { elem, len: N }))
    }
}

impl<T: Structural> Structural for Vec<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::of(self))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptySlice))
    }
}

impl<T: Structural> Structural for VecDeque<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::new(self.iter().map(|v| v as Child<'_>)))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptySlice))
    }
}

impl<T: Structural, S> Structural for HashSet<T, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::unordered(self.iter().map(|v| v as Child<'_>)))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptySlice))
    }
}

impl<T: Structural> Structural for BTreeSet<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::unordered(self.iter().map(|v| v as Child<'_>)))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptySlice))
    }
}

impl<K: Structural, V: Structural, S> Structural for HashMap<K, V, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(
            self.iter().map(|(k, v)| (k as Child<'_>, v as Child<'_>)),
        ))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptyMap))
    }
}

impl<K: Structural, V: Structural> Structural for BTreeMap<K, V> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(
            self.iter().map(|(k, v)| (k as Child<'_>, v as Child<'_>)),
        ))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(EmptyMap))
    }
}

impl<T: Structural> Structural for Option<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Pointer(Pointer::new(
            self.as_ref().map(|v| v as Child<'_>),
            T::zero_value,
        ))
    }

    fn stringer(&self) -> Option<String> {
        self.as_ref().and_then(Structural::stringer)
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(Absent))
    }
}

macro_rules! transparent {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl<T: Structural + ?Sized> Structural for $wrapper {
                fn kind(&self) -> Kind<'_> {
                    (**self).kind()
                }

                fn stringer(&self) -> Option<String> {
                    (**self).stringer()
                }

                fn hashable(&self) -> Option<&dyn Hashable> {
                    (**self).hashable()
                }

                fn includable(&self) -> Option<&dyn Includable> {
                    (**self).includable()
                }

                fn includable_map(&self) -> Option<&dyn IncludableMap> {
                    (**self).includable_map()
                }
            }
        )*
    };
}

transparent!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T> Structural for Sender<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("chan")
    }
}

impl<T> Structural for SyncSender<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("chan")
    }
}

impl<T> Structural for Receiver<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("chan")
    }
}

/// Zero value of any growable sequence.
struct EmptySlice;

impl Structural for EmptySlice {
    fn kind(&self) -> Kind<'_> {
        Kind::Slice(Elements::new(std::iter::empty()))
    }
}

/// Zero value of any map.
struct EmptyMap;

impl Structural for EmptyMap {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(std::iter::empty()))
    }
}

/// Zero value of an `Option`: itself absent, with no typed zero behind it.
struct Absent;

impl Structural for Absent {
    fn kind(&self) -> Kind<'_> {
        Kind::Pointer(Pointer::new(None, no_zero))
    }
}

fn no_zero() -> Option<Box<dyn Structural>> {
    None
}

/// Zero value of a fixed-size array: `len` copies of the element zero.
struct ZeroArray {
    elem: Box<dyn Structural>,
    len: usize,
}

impl Structural for ZeroArray {
    fn kind(&self) -> Kind<'_> {
        let elem: Child<'_> = &*self.elem;
        Kind::Array(Elements::new(std::iter::repeat(elem).take(self.len)))
    }
}
