//! Golden test vectors for deterministic verification.
//!
//! Digests are pinned for the default FNV-1 hasher. Any change to leaf
//! encoding or aggregation order breaks these, which is the point: stored
//! fingerprints must stay valid across releases.

use std::collections::BTreeMap;

use serde_json::json;
use structhash_core::{hash, Policy, Result, Structural};

use crate::fixtures::{Component, Outer, Shape};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Builds the value to hash.
    pub value: fn() -> Box<dyn Structural>,
    /// Builds the policy to hash under.
    pub policy: fn() -> Policy,
    /// Expected digest (16 hex digits, big-endian).
    pub expected: &'static str,
}

impl GoldenVector {
    /// Hash this vector's value under its policy.
    pub fn compute(&self) -> Result<u64> {
        let value = (self.value)();
        hash(&*value, Some(&(self.policy)()))
    }
}

/// Render a digest the way vectors store it.
pub fn digest_hex(digest: u64) -> String {
    hex::encode(digest.to_be_bytes())
}

fn defaults() -> Policy {
    Policy::default()
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "string fast path",
            value: || Box::new("hello".to_string()),
            policy: defaults,
            expected: "7b495389bdbdd4c7",
        },
        GoldenVector {
            name: "u64 leaf",
            value: || Box::new(42u64),
            policy: defaults,
            expected: "9dde9615304e5897",
        },
        GoldenVector {
            name: "ordered sequence",
            value: || Box::new(vec![1u32, 2, 3]),
            policy: defaults,
            expected: "91e3aa7ea0e6aa9f",
        },
        GoldenVector {
            name: "sequence as set",
            value: || Box::new(vec![3u32, 1, 2]),
            policy: || Policy::default().slices_as_sets(true),
            expected: "1b3bad450ac530ff",
        },
        GoldenVector {
            name: "string map",
            value: || {
                let map: BTreeMap<String, i64> =
                    [("b".to_string(), 2), ("a".to_string(), 1)].into_iter().collect();
                Box::new(map)
            },
            policy: defaults,
            expected: "9c9a05cfc7c139e4",
        },
        GoldenVector {
            name: "component struct",
            value: || Box::new(Component::new("hugo", "0.120.0", &["ssg", "go"])),
            policy: defaults,
            expected: "1084a30d6257b17c",
        },
        GoldenVector {
            name: "json document",
            value: || Box::new(json!({"id": 2, "tags": ["foo", "bar"]})),
            policy: defaults,
            expected: "250b1c4a3002d477",
        },
        GoldenVector {
            name: "shape union",
            value: || Box::new(Shape::Rect(2.0, 3.0)),
            policy: defaults,
            expected: "926c8b9053d73990",
        },
        GoldenVector {
            name: "absent option",
            value: || Box::new(Option::<u32>::None),
            policy: defaults,
            expected: "a8c7f832281a39c5",
        },
        GoldenVector {
            name: "absent option with zero_nil",
            value: || Box::new(Option::<u32>::None),
            policy: || Policy::default().zero_nil(true),
            expected: "4d25767f9dce13f5",
        },
        GoldenVector {
            name: "hashable short-circuit",
            value: || Box::new(Outer::default()),
            policy: defaults,
            expected: "ea18541acfe33a81",
        },
    ]
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual_hex)` per vector; a hashing error
/// reports as a mismatch with the error text.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| match v.compute() {
            Ok(digest) => {
                let hex = digest_hex(digest);
                (v.name.to_string(), hex == v.expected, hex)
            }
            Err(e) => (v.name.to_string(), false, e.to_string()),
        })
        .collect()
}
