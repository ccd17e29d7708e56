//! The recursive value walker.
//!
//! The walker asks each value for its [`Kind`], hashes leaves directly and
//! folds the digests of composite kinds through the combiner. Hooks are
//! looked up only when entering a struct or a map.

use tracing::{debug, trace};

use crate::combine::{ordered_combine, Unordered};
use crate::error::{HashError, Result};
use crate::hasher::Hasher64;
use crate::kind::{
    Elements, Entries, Field, Kind, Payload, Pointer, StructValue, UnionValue, ZeroFn,
};
use crate::hooks::IncludableMap;
use crate::policy::{FieldDirective, Policy};
use crate::structural::Structural;

/// Maximum number of consecutive optional layers followed for one value.
pub const MAX_INDIRECTIONS: usize = 64;

/// Per-step data handed from a parent to the child being visited.
#[derive(Clone, Copy, Default)]
struct VisitContext<'c> {
    /// The child is a sequence tagged `set`.
    set: bool,
    /// Map-entry filter of the enclosing struct, with the field name.
    map_filter: Option<(&'c dyn IncludableMap, &'c str)>,
}

/// Hash a value with the given policy (defaults when `None`).
///
/// A fresh hasher is allocated for every call, so concurrent calls never
/// share state.
///
/// ```
/// use structhash_core::{hash, Policy};
///
/// let a = hash(&vec![1u32, 2, 3], None).unwrap();
/// let b = hash(&vec![3u32, 2, 1], None).unwrap();
/// assert_ne!(a, b);
///
/// let sets = Policy::default().slices_as_sets(true);
/// assert_eq!(
///     hash(&vec![1u32, 2, 3], Some(&sets)).unwrap(),
///     hash(&vec![3u32, 2, 1], Some(&sets)).unwrap(),
/// );
/// ```
pub fn hash<T: Structural + ?Sized>(value: &T, policy: Option<&Policy>) -> Result<u64> {
    let default_policy;
    let policy = match policy {
        Some(policy) => policy,
        None => {
            default_policy = Policy::default();
            &default_policy
        }
    };
    let mut hasher = policy.hasher.build();
    hash_with_hasher(value, policy, &mut *hasher)
}

/// Hash a value using a caller-owned hasher instead of `policy.hasher`.
///
/// The hasher is reset before every write, so leftover state from earlier
/// use never leaks into the digest.
pub fn hash_with_hasher<T: Structural + ?Sized>(
    value: &T,
    policy: &Policy,
    hasher: &mut dyn Hasher64,
) -> Result<u64> {
    let mut walker = Walker { hasher, policy };
    match value.kind() {
        // Top-level strings skip the walk entirely.
        Kind::Str(s) => Ok(walker.hash_str(s)),
        kind => walker.visit_kind(value, kind, VisitContext::default()),
    }
}

/// Whether a value is the zero value of its type.
///
/// Empty strings, sequences and maps, numeric zero (bit pattern zero for
/// floats), `false`, absent options and the zero instant are zero; arrays
/// and structs are zero when every member is. Unions never are.
pub fn is_zero<V: Structural + ?Sized>(value: &V) -> bool {
    match value.kind() {
        Kind::Bool(b) => !b,
        Kind::I8(v) => v == 0,
        Kind::I16(v) => v == 0,
        Kind::I32(v) => v == 0,
        Kind::I64(v) => v == 0,
        Kind::U8(v) => v == 0,
        Kind::U16(v) => v == 0,
        Kind::U32(v) => v == 0,
        Kind::U64(v) => v == 0,
        Kind::F32(v) => v.to_bits() == 0,
        Kind::F64(v) => v.to_bits() == 0,
        Kind::Complex64(re, im) => re.to_bits() == 0 && im.to_bits() == 0,
        Kind::Complex128(re, im) => re.to_bits() == 0 && im.to_bits() == 0,
        Kind::Str(s) => s.is_empty(),
        Kind::Time(t) => t.is_zero(),
        Kind::Array(mut elems) => elems.all(|e| is_zero(e)),
        Kind::Slice(mut elems) => elems.next().is_none(),
        Kind::Map(mut entries) => entries.next().is_none(),
        Kind::Struct(s) => s.fields().iter().all(|f| is_zero(f.value)),
        Kind::Pointer(p) => p.target.is_none(),
        Kind::Union(_) | Kind::Unsupported(_) => false,
    }
}

struct Walker<'w> {
    hasher: &'w mut dyn Hasher64,
    policy: &'w Policy,
}

impl Walker<'_> {
    fn hash_bytes(&mut self, bytes: &[u8]) -> u64 {
        self.hasher.reset();
        self.hasher.write(bytes);
        self.hasher.sum64()
    }

    fn hash_str(&mut self, s: &str) -> u64 {
        self.hash_bytes(s.as_bytes())
    }

    fn ordered(&mut self, a: u64, b: u64) -> u64 {
        ordered_combine(&mut *self.hasher, a, b)
    }

    fn visit<V: Structural + ?Sized>(&mut self, value: &V, ctx: VisitContext<'_>) -> Result<u64> {
        self.visit_kind(value, value.kind(), ctx)
    }

    fn visit_kind<V: Structural + ?Sized>(
        &mut self,
        value: &V,
        kind: Kind<'_>,
        ctx: VisitContext<'_>,
    ) -> Result<u64> {
        match kind {
            Kind::Bool(b) => Ok(self.hash_bytes(&[b as u8])),
            Kind::I8(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::I16(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::I32(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::I64(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::U8(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::U16(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::U32(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::U64(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::F32(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::F64(v) => Ok(self.hash_bytes(&v.to_le_bytes())),
            Kind::Complex64(re, im) => {
                let mut buf = [0u8; 8];
                buf[..4].copy_from_slice(&re.to_le_bytes());
                buf[4..].copy_from_slice(&im.to_le_bytes());
                Ok(self.hash_bytes(&buf))
            }
            Kind::Complex128(re, im) => {
                let mut buf = [0u8; 16];
                buf[..8].copy_from_slice(&re.to_le_bytes());
                buf[8..].copy_from_slice(&im.to_le_bytes());
                Ok(self.hash_bytes(&buf))
            }
            Kind::Str(s) => Ok(self.hash_str(s)),
            Kind::Time(t) => {
                let bytes = t.marshal_binary()?;
                Ok(self.hash_bytes(&bytes))
            }
            Kind::Array(elems) => {
                let set = ctx.set || elems.is_unordered();
                self.visit_sequence(elems, set)
            }
            Kind::Slice(elems) => {
                let set = ctx.set || self.policy.slices_as_sets || elems.is_unordered();
                self.visit_sequence(elems, set)
            }
            Kind::Map(entries) => self.visit_map(value, entries, ctx),
            Kind::Struct(record) => self.visit_struct(value, record),
            Kind::Union(union) => self.visit_union(union),
            Kind::Pointer(ptr) => self.follow(ptr, ctx),
            Kind::Unsupported(kind) => Err(HashError::UnsupportedType { kind }),
        }
    }

    /// Follow optional layers until a concrete value or an absence.
    fn follow(&mut self, mut ptr: Pointer<'_>, ctx: VisitContext<'_>) -> Result<u64> {
        let mut zero: Option<ZeroFn> = None;
        for _ in 0..MAX_INDIRECTIONS {
            if self.policy.zero_nil {
                zero = Some(ptr.zero);
            }
            let Some(target) = ptr.target else {
                return self.visit_absent(zero, ctx);
            };
            match target.kind() {
                Kind::Pointer(next) => ptr = next,
                kind => return self.visit_kind(target, kind, ctx),
            }
        }
        Err(HashError::IndirectionLimit {
            limit: MAX_INDIRECTIONS,
        })
    }

    fn visit_absent(&mut self, zero: Option<ZeroFn>, ctx: VisitContext<'_>) -> Result<u64> {
        match zero.and_then(|make| make()) {
            Some(value) => self.visit(&*value, ctx),
            // Untyped placeholder.
            None => Ok(self.hash_bytes(&0i64.to_le_bytes())),
        }
    }

    fn visit_sequence(&mut self, elems: Elements<'_>, set: bool) -> Result<u64> {
        if set {
            let mut scope = Unordered::new();
            for child in elems {
                scope.add(self.visit(child, VisitContext::default())?);
            }
            return Ok(scope.finish(&mut *self.hasher));
        }

        let mut acc = 0;
        for child in elems {
            let digest = self.visit(child, VisitContext::default())?;
            acc = self.ordered(acc, digest);
        }
        Ok(acc)
    }

    fn visit_map<V: Structural + ?Sized>(
        &mut self,
        value: &V,
        entries: Entries<'_>,
        ctx: VisitContext<'_>,
    ) -> Result<u64> {
        // The map's own filter wins over the enclosing struct's.
        let (filter, field) = match value.includable_map() {
            Some(own) => (Some(own), ""),
            None => match ctx.map_filter {
                Some((filter, field)) => (Some(filter), field),
                None => (None, ""),
            },
        };

        let mut scope = Unordered::new();
        for (key, val) in entries {
            if let Some(filter) = filter {
                if !filter.include_entry(field, key, val).map_err(HashError::Hook)? {
                    trace!(field, "map entry excluded by filter");
                    continue;
                }
            }
            let key_digest = self.visit(key, VisitContext::default())?;
            let val_digest = self.visit(val, VisitContext::default())?;
            let entry = self.ordered(key_digest, val_digest);
            scope.add(entry);
        }
        Ok(scope.finish(&mut *self.hasher))
    }

    fn visit_struct<V: Structural + ?Sized>(
        &mut self,
        value: &V,
        record: StructValue<'_>,
    ) -> Result<u64> {
        if let Some(hook) = value.hashable() {
            debug!(name = record.name(), "digest supplied by Hashable hook");
            return hook.digest().map_err(HashError::Hook);
        }
        let include = value.includable();
        let map_filter = value.includable_map();

        trace!(name = record.name(), fields = record.fields().len(), "visiting struct");
        let seed = self.hash_str(record.name());
        let mut scope = Unordered::seeded(seed);

        for field in record.fields() {
            if !field.exported {
                continue;
            }

            let directive = self.policy.directive(field.tag);
            if directive == FieldDirective::Ignore {
                trace!(field = field.name, "field ignored by tag");
                continue;
            }

            if self.policy.ignore_zero_value && is_zero(field.value) {
                continue;
            }

            if let Some(include) = include {
                if !include
                    .include_field(field.name, field.value)
                    .map_err(HashError::Hook)?
                {
                    trace!(field = field.name, "field excluded by Includable hook");
                    continue;
                }
            }

            let name_digest = self.hash_str(field.name);
            let value_digest = match self.string_form(field, directive)? {
                Some(text) => self.hash_str(&text),
                None => {
                    let ctx = VisitContext {
                        set: directive == FieldDirective::Set,
                        map_filter: map_filter.map(|filter| (filter, field.name)),
                    };
                    self.visit(field.value, ctx)?
                }
            };

            let pair = self.ordered(name_digest, value_digest);
            scope.add(pair);
            scope.harden(&mut *self.hasher);
        }

        Ok(scope.into_hardened())
    }

    /// The string substituted for a field's value, if any.
    fn string_form(&self, field: &Field<'_>, directive: FieldDirective) -> Result<Option<String>> {
        let forced = directive == FieldDirective::String;
        if !forced && !self.policy.use_stringer {
            return Ok(None);
        }
        match field.value.stringer() {
            Some(text) => Ok(Some(text)),
            None if forced => Err(HashError::NotStringer {
                field: field.name.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn visit_union(&mut self, union: UnionValue<'_>) -> Result<u64> {
        let mut scope = Unordered::new();
        for variant in union.variants() {
            let tag = self.hash_str(variant.tag);
            let digest = match &variant.payload {
                Payload::Unit => tag,
                Payload::Value(value) => {
                    let inner = self.visit(*value, VisitContext::default())?;
                    self.ordered(tag, inner)
                }
                Payload::Tuple(values) => {
                    let inner = self.visit_sequence(Elements::new(values.iter().copied()), false)?;
                    self.ordered(tag, inner)
                }
            };
            scope.add(digest);
        }
        Ok(scope.finish(&mut *self.hasher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::finalize;
    use crate::error::BoxError;
    use crate::hasher::Fnv64;
    use crate::hooks::{Hashable, Includable};
    use crate::time::{CanonicalTime, TimeParts};
    use chrono::{FixedOffset, TimeZone, Utc};
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::mpsc;

    fn leaf(bytes: &[u8]) -> u64 {
        let mut h = Fnv64::new();
        h.write(bytes);
        h.sum64()
    }

    fn fnv() -> Fnv64 {
        Fnv64::new()
    }

    struct Pair {
        a: i64,
        b: String,
    }

    impl Structural for Pair {
        fn kind(&self) -> Kind<'_> {
            Kind::Struct(StructValue::new("Pair").field("A", &self.a).field("B", &self.b))
        }
    }

    #[test]
    fn test_leaf_encodings() {
        assert_eq!(hash(&true, None).unwrap(), leaf(&[1]));
        assert_eq!(hash(&false, None).unwrap(), leaf(&[0]));
        assert_eq!(hash(&7u16, None).unwrap(), leaf(&[7, 0]));
        assert_eq!(hash(&-1i32, None).unwrap(), leaf(&[0xff; 4]));
        assert_eq!(hash(&1.5f64, None).unwrap(), leaf(&1.5f64.to_le_bytes()));
        assert_eq!(hash(&3usize, None).unwrap(), hash(&3u64, None).unwrap());
        assert_eq!(hash(&3isize, None).unwrap(), hash(&3i64, None).unwrap());
    }

    #[test]
    fn test_integer_width_matters() {
        assert_ne!(hash(&1i32, None).unwrap(), hash(&1i64, None).unwrap());
    }

    #[test]
    fn test_complex_is_single_write() {
        struct C(f64, f64);
        impl Structural for C {
            fn kind(&self) -> Kind<'_> {
                Kind::Complex128(self.0, self.1)
            }
        }
        let mut bytes = 1.0f64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&(-2.0f64).to_le_bytes());
        assert_eq!(hash(&C(1.0, -2.0), None).unwrap(), leaf(&bytes));
    }

    #[test]
    fn test_string_fast_path() {
        assert_eq!(hash("hello", None).unwrap(), leaf(b"hello"));
        assert_eq!(hash(&String::from("hello"), None).unwrap(), leaf(b"hello"));
    }

    #[test]
    fn test_ordered_sequence_starts_from_zero() {
        let mut h = fnv();
        let one = leaf(&1u8.to_le_bytes());
        let two = leaf(&2u8.to_le_bytes());
        let first = ordered_combine(&mut h, 0, one);
        let expected = ordered_combine(&mut h, first, two);
        assert_eq!(hash(&vec![1u8, 2], None).unwrap(), expected);
        assert_eq!(hash(&[1u8, 2], None).unwrap(), expected);
        assert_eq!(hash(&Vec::<u8>::new(), None).unwrap(), 0);
    }

    #[test]
    fn test_set_sequence_is_finalized() {
        let mut h = fnv();
        let one = leaf(&1u8.to_le_bytes());
        let two = leaf(&2u8.to_le_bytes());
        let set: HashSet<u8> = [1, 2].into_iter().collect();
        assert_eq!(hash(&set, None).unwrap(), finalize(&mut h, one ^ two));

        let policy = Policy::default().slices_as_sets(true);
        assert_eq!(
            hash(&vec![2u8, 1], Some(&policy)).unwrap(),
            finalize(&mut h, one ^ two)
        );
    }

    #[test]
    fn test_map_digest() {
        let mut h = fnv();
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 1u8);
        let entry = ordered_combine(&mut h, leaf(b"k"), leaf(&[1]));
        assert_eq!(hash(&map, None).unwrap(), finalize(&mut h, entry));
    }

    #[test]
    fn test_struct_digest_layout() {
        let mut h = fnv();
        let value = Pair {
            a: 1,
            b: "x".into(),
        };

        let mut acc = leaf(b"Pair");
        acc ^= ordered_combine(&mut h, leaf(b"A"), leaf(&1i64.to_le_bytes()));
        acc = finalize(&mut h, acc);
        acc ^= ordered_combine(&mut h, leaf(b"B"), leaf(b"x"));
        acc = finalize(&mut h, acc);

        assert_eq!(hash(&value, None).unwrap(), acc);
    }

    #[test]
    fn test_empty_struct_is_name_digest() {
        struct Unit;
        impl Structural for Unit {
            fn kind(&self) -> Kind<'_> {
                Kind::Struct(StructValue::new("Unit"))
            }
        }
        assert_eq!(hash(&Unit, None).unwrap(), leaf(b"Unit"));
    }

    #[test]
    fn test_absent_option() {
        let none: Option<u32> = None;
        // Untyped placeholder without zero_nil.
        assert_eq!(hash(&none, None).unwrap(), leaf(&0i64.to_le_bytes()));

        let policy = Policy::default().zero_nil(true);
        assert_eq!(
            hash(&none, Some(&policy)).unwrap(),
            hash(&0u32, Some(&policy)).unwrap()
        );
        assert_eq!(hash(&Some(5u32), None).unwrap(), hash(&5u32, None).unwrap());
    }

    #[test]
    fn test_nested_absent_option_with_zero_nil() {
        let policy = Policy::default().zero_nil(true);
        let inner_none: Option<Option<String>> = Some(None);
        assert_eq!(
            hash(&inner_none, Some(&policy)).unwrap(),
            hash("", Some(&policy)).unwrap()
        );
    }

    #[test]
    fn test_indirection_limit() {
        struct Spiral;
        impl Structural for Spiral {
            fn kind(&self) -> Kind<'_> {
                Kind::Pointer(Pointer::new(Some(self), || None))
            }
        }
        assert!(matches!(
            hash(&Spiral, None),
            Err(HashError::IndirectionLimit { limit: MAX_INDIRECTIONS })
        ));
    }

    #[test]
    fn test_unsupported_kind() {
        let (tx, _rx) = mpsc::channel::<u8>();
        assert!(matches!(
            hash(&vec![tx], None),
            Err(HashError::UnsupportedType { kind: "chan" })
        ));
    }

    #[test]
    fn test_time_digest() {
        let t = Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap();
        let bytes = t.marshal_binary().unwrap();
        assert_eq!(hash(&t, None).unwrap(), leaf(&bytes));

        let bad = FixedOffset::east_opt(30)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 14, 12, 0, 0)
            .unwrap();
        assert!(matches!(
            hash(&vec![bad], None),
            Err(HashError::TimeEncoding(_))
        ));
    }

    #[test]
    fn test_zero_time_parts() {
        struct Epoch0;
        impl CanonicalTime for Epoch0 {
            fn time_parts(&self) -> std::result::Result<TimeParts, crate::TimeEncodingError> {
                Ok(TimeParts {
                    seconds: 0,
                    nanos: 0,
                    offset: None,
                })
            }
        }
        impl Structural for Epoch0 {
            fn kind(&self) -> Kind<'_> {
                Kind::Time(self)
            }
        }
        assert!(is_zero(&Epoch0));
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&0u8));
        assert!(is_zero(&0.0f64));
        assert!(!is_zero(&-0.0f64));
        assert!(is_zero(""));
        assert!(is_zero(&Vec::<u8>::new()));
        assert!(is_zero(&HashMap::<u8, u8>::new()));
        assert!(is_zero(&[0u8, 0]));
        assert!(!is_zero(&[0u8, 1]));
        assert!(is_zero(&Option::<u8>::None));
        assert!(!is_zero(&Some(0u8)));
        assert!(is_zero(&Pair {
            a: 0,
            b: String::new()
        }));
        assert!(!is_zero(&Pair {
            a: 0,
            b: "x".into()
        }));
    }

    struct Fixed;

    impl Hashable for Fixed {
        fn digest(&self) -> std::result::Result<u64, BoxError> {
            Ok(42)
        }
    }

    impl Structural for Fixed {
        fn kind(&self) -> Kind<'_> {
            Kind::Struct(StructValue::new("Fixed").field("Ignored", &1u8))
        }

        fn hashable(&self) -> Option<&dyn Hashable> {
            Some(self)
        }
    }

    #[test]
    fn test_hashable_short_circuit() {
        assert_eq!(hash(&Fixed, None).unwrap(), 42);
        // References delegate to the same hook.
        assert_eq!(hash(&&Fixed, None).unwrap(), 42);
        assert_eq!(hash(&Box::new(Fixed), None).unwrap(), 42);
    }

    struct Failing;

    impl Includable for Failing {
        fn include_field(
            &self,
            _field: &str,
            _value: &dyn Structural,
        ) -> std::result::Result<bool, BoxError> {
            Err("filter unavailable".into())
        }
    }

    impl Structural for Failing {
        fn kind(&self) -> Kind<'_> {
            Kind::Struct(StructValue::new("Failing").field("A", &1u8))
        }

        fn includable(&self) -> Option<&dyn Includable> {
            Some(self)
        }
    }

    #[test]
    fn test_hook_error_propagates() {
        match hash(&Failing, None) {
            Err(HashError::Hook(source)) => assert_eq!(source.to_string(), "filter unavailable"),
            other => panic!("expected hook error, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_variant_contributes_tag() {
        struct Tagged(bool);
        impl Structural for Tagged {
            fn kind(&self) -> Kind<'_> {
                if self.0 {
                    Kind::Union(UnionValue::new().unit("Empty"))
                } else {
                    Kind::Union(UnionValue::new())
                }
            }
        }
        let mut h = fnv();
        assert_eq!(hash(&Tagged(true), None).unwrap(), finalize(&mut h, leaf(b"Empty")));
        assert_eq!(hash(&Tagged(false), None).unwrap(), finalize(&mut h, 0));
    }

    #[test]
    fn test_hash_with_hasher_ignores_leftover_state() {
        let value = Pair {
            a: 9,
            b: "y".into(),
        };
        let mut h = fnv();
        h.write(b"garbage");
        let policy = Policy::default();
        assert_eq!(
            hash_with_hasher(&value, &policy, &mut h).unwrap(),
            hash(&value, None).unwrap()
        );
    }

    #[test]
    fn test_blake3_policy_changes_digest() {
        let value = Pair {
            a: 9,
            b: "y".into(),
        };
        let policy = Policy::default().hasher(crate::HasherKind::Blake3);
        assert_ne!(
            hash(&value, Some(&policy)).unwrap(),
            hash(&value, None).unwrap()
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_map_insertion_order_irrelevant(
                pairs in prop::collection::vec((any::<u16>(), any::<i32>()), 0..32)
            ) {
                let forward: HashMap<u16, i32> = pairs.iter().copied().collect();
                let mut entries: Vec<(u16, i32)> = forward.iter().map(|(k, v)| (*k, *v)).collect();
                entries.sort_unstable();
                let sorted: BTreeMap<u16, i32> = entries.iter().copied().collect();
                let reversed: HashMap<u16, i32> = entries.iter().rev().copied().collect();
                prop_assert_eq!(hash(&forward, None).unwrap(), hash(&sorted, None).unwrap());
                prop_assert_eq!(hash(&reversed, None).unwrap(), hash(&sorted, None).unwrap());
            }

            #[test]
            fn test_set_policy_ignores_permutation(
                items in prop::collection::vec(any::<u32>(), 0..24).prop_shuffle(),
            ) {
                let policy = Policy::default().slices_as_sets(true);
                let mut sorted = items.clone();
                sorted.sort_unstable();
                prop_assert_eq!(
                    hash(&items, Some(&policy)).unwrap(),
                    hash(&sorted, Some(&policy)).unwrap()
                );
            }
        }
    }
}
