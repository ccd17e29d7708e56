//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::Value;

use crate::fixtures::Component;

/// Generate a short lowercase identifier.
pub fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

/// Generate a list of tags.
pub fn tags(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(label(), 0..=max_len)
}

/// Generate a list of tags together with a permutation of it.
pub fn tags_and_permutation(max_len: usize) -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    tags(max_len).prop_flat_map(|t| (Just(t.clone()), Just(t).prop_shuffle()))
}

/// Generate a string-keyed map.
pub fn string_map(max_len: usize) -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(label(), any::<i64>(), 0..=max_len)
}

/// Generate a JSON document of bounded depth. Numbers are integers only.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        label().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(label(), inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Parameters for generating a component.
#[derive(Debug, Clone)]
pub struct ComponentParams {
    pub name: String,
    pub version: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub cache_key: u64,
}

impl Arbitrary for ComponentParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            label(),
            "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
            tags(6),
            ".{0,24}",
            any::<u64>(),
        )
            .prop_map(|(name, version, tags, notes, cache_key)| ComponentParams {
                name,
                version,
                tags,
                notes,
                cache_key,
            })
            .boxed()
    }
}

/// Build a component from params.
pub fn component_from_params(params: &ComponentParams) -> Component {
    Component {
        name: params.name.clone(),
        version: params.version.clone(),
        tags: params.tags.clone(),
        notes: params.notes.clone(),
        cache_key: params.cache_key,
    }
}
