//! # structhash testkit
//!
//! Testing utilities for structhash.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned digests that catch any change to the hashing rules
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Hand-written `Structural` types covering tags, hooks and unions
//!
//! ## Golden Vectors
//!
//! ```rust
//! use structhash_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let digest = vector.compute().unwrap();
//!     println!("{}: {:016x}", vector.name, digest);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use structhash_testkit::generators::{component_from_params, ComponentParams};
//!
//! proptest! {
//!     #[test]
//!     fn digest_is_deterministic(params: ComponentParams) {
//!         let c = component_from_params(&params);
//!         prop_assert_eq!(structhash_core::hash(&c, None)?, structhash_core::hash(&c, None)?);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{Component, Constant, Outer, Shape, Single, CONSTANT_DIGEST};
pub use generators::{component_from_params, ComponentParams};
pub use vectors::{all_vectors, digest_hex, verify_all_vectors, GoldenVector};
