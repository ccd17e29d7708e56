//! [`Structural`] for dynamically typed JSON documents.
//!
//! Objects hash as maps, arrays as ordered slices. Numbers take the first
//! representation that fits: `i64`, then `u64`, then `f64`. `null` is an
//! absent value with no typed zero.

use serde_json::{Map, Number, Value};

use crate::kind::{Child, Elements, Entries, Kind, Pointer};
use crate::structural::Structural;

fn number_kind<'a>(n: &Number) -> Kind<'a> {
    if let Some(v) = n.as_i64() {
        Kind::I64(v)
    } else if let Some(v) = n.as_u64() {
        Kind::U64(v)
    } else {
        Kind::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn untyped() -> Option<Box<dyn Structural>> {
    None
}

impl Structural for Value {
    fn kind(&self) -> Kind<'_> {
        match self {
            Value::Null => Kind::Pointer(Pointer::new(None, untyped)),
            Value::Bool(b) => Kind::Bool(*b),
            Value::Number(n) => number_kind(n),
            Value::String(s) => Kind::Str(s),
            Value::Array(items) => Kind::Slice(Elements::of(items)),
            Value::Object(map) => map.kind(),
        }
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(Value::Null))
    }
}

impl Structural for Map<String, Value> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(Entries::new(
            self.iter().map(|(k, v)| (k as Child<'_>, v as Child<'_>)),
        ))
    }

    fn zero_value() -> Option<Box<dyn Structural>> {
        Some(Box::new(Map::new()))
    }
}

impl Structural for Number {
    fn kind(&self) -> Kind<'_> {
        number_kind(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::walker::{hash, is_zero};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_object_matches_typed_map() {
        let doc = json!({"a": 1, "b": 2});
        let typed: BTreeMap<String, i64> =
            [("b".to_string(), 2), ("a".to_string(), 1)].into_iter().collect();
        assert_eq!(hash(&doc, None).unwrap(), hash(&typed, None).unwrap());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(hash(&json!(-3), None).unwrap(), hash(&-3i64, None).unwrap());
        assert_eq!(
            hash(&json!(u64::MAX), None).unwrap(),
            hash(&u64::MAX, None).unwrap()
        );
        assert_eq!(hash(&json!(0.5), None).unwrap(), hash(&0.5f64, None).unwrap());
    }

    #[test]
    fn test_null_is_absent() {
        assert_eq!(
            hash(&json!(null), None).unwrap(),
            hash(&Option::<u8>::None, None).unwrap()
        );
        assert!(is_zero(&json!(null)));
        assert!(is_zero(&json!([])));
        assert!(!is_zero(&json!({"k": null})));
    }

    #[test]
    fn test_array_order_matters() {
        assert_ne!(
            hash(&json!(["foo", "bar"]), None).unwrap(),
            hash(&json!(["bar", "foo"]), None).unwrap()
        );
    }
}
