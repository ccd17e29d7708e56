//! # structhash core
//!
//! Deterministic structural hashing: any value that implements
//! [`Structural`] hashes to a stable 64-bit digest under a [`Policy`].
//!
//! This crate contains no I/O. It is pure computation over borrowed values.
//!
//! ## Key Types
//!
//! - [`Structural`] - How a value describes its shape to the walker
//! - [`Kind`] - The closed set of shapes (primitives, sequences, maps, structs, ...)
//! - [`Policy`] - Equivalence rules for one hashing call
//! - [`Hasher64`] - The resettable hash primitive (FNV-1 by default)
//!
//! ## Aggregation
//!
//! Sequences fold children with [`ordered_combine`]; maps, sets and struct
//! fields fold with [`unordered_combine`] and are hardened with
//! [`finalize`]. See the [`combine`] module.
//!
//! ## Hooks
//!
//! Types may compute their own digest ([`Hashable`]), filter their fields
//! ([`Includable`]) or filter map entries ([`IncludableMap`]).

pub mod combine;
pub mod error;
pub mod hasher;
pub mod hooks;
pub mod json;
pub mod kind;
pub mod policy;
pub mod structural;
pub mod time;
pub mod walker;

pub use combine::{finalize, ordered_combine, unordered_combine, Unordered};
pub use error::{BoxError, HashError, Result, TimeEncodingError};
pub use hasher::{Blake3Hasher64, Fnv64, Hasher64, HasherKind};
pub use hooks::{Hashable, Includable, IncludableMap};
pub use kind::{
    Child, Elements, Entries, Field, Kind, Payload, Pointer, StructValue, UnionValue, Variant,
    ZeroFn,
};
pub use policy::{FieldDirective, Policy, DEFAULT_TAG_NAME};
pub use structural::{default_zero, Structural};
pub use time::{CanonicalTime, TimeParts, ZeroTime};
pub use walker::{hash, hash_with_hasher, is_zero, MAX_INDIRECTIONS};
