//! # structhash
//!
//! Deterministic 64-bit fingerprints for arbitrary nested values.
//!
//! ## Overview
//!
//! Two values that are equivalent under a [`Policy`] always get the same
//! fingerprint; values that differ structurally get different fingerprints
//! with high probability. Maps, sets and set-tagged fields ignore element
//! order; everything else is order-sensitive.
//!
//! Fingerprints are not a security primitive and are only stable for a
//! fixed policy and hasher.
//!
//! ## Usage
//!
//! ```rust
//! use structhash::{Fingerprinter, Kind, Policy, StructValue, Structural};
//!
//! struct Package {
//!     name: String,
//!     tags: Vec<String>,
//!     downloads: u64,
//! }
//!
//! impl Structural for Package {
//!     fn kind(&self) -> Kind<'_> {
//!         Kind::Struct(
//!             StructValue::new("Package")
//!                 .field("Name", &self.name)
//!                 .tagged("Tags", r#"hash:"set""#, &self.tags)
//!                 .tagged("Downloads", r#"hash:"ignore""#, &self.downloads),
//!         )
//!     }
//! }
//!
//! let mut fp = Fingerprinter::new(Policy::default());
//! let a = Package { name: "hugo".into(), tags: vec!["ssg".into(), "go".into()], downloads: 10 };
//! let b = Package { name: "hugo".into(), tags: vec!["go".into(), "ssg".into()], downloads: 99 };
//! assert_eq!(fp.fingerprint(&a).unwrap(), fp.fingerprint(&b).unwrap());
//! ```
//!
//! ## Re-exports
//!
//! - `structhash::core` - The engine (walker, combiner, hasher, hooks)

pub mod config;
pub mod error;
pub mod fingerprint;

pub use structhash_core as core;

pub use config::{policy_from_file, policy_from_json, policy_to_json};
pub use error::{Error, Result};
pub use fingerprint::{Fingerprint, Fingerprinter};

pub use structhash_core::{
    hash, hash_with_hasher, BoxError, HashError, Hashable, HasherKind, Includable, IncludableMap,
    Kind, Policy, StructValue, Structural, UnionValue,
};
