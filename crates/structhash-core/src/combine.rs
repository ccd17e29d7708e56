//! Digest aggregation.
//!
//! Two operators fold child digests into a parent digest:
//!
//! - [`ordered_combine`] rehashes `a || b` and is position-sensitive.
//! - [`unordered_combine`] is a plain XOR: commutative and associative, but
//!   not safe to nest. `(H(A) ^ H(B)) ^ (H(A) ^ H(C))` collapses to
//!   `H(B) ^ H(C)`, which is also what `{Z, B}` and `{Z, C}` produce.
//!
//! Every unordered scope therefore ends with [`finalize`], which rehashes
//! the accumulator before it can meet another scope. The [`Unordered`]
//! accumulator enforces this: it never hands out a raw XOR state.

use crate::hasher::Hasher64;

/// Position-sensitive combination of two digests.
pub fn ordered_combine(h: &mut dyn Hasher64, a: u64, b: u64) -> u64 {
    h.reset();
    h.write(&a.to_le_bytes());
    h.write(&b.to_le_bytes());
    h.sum64()
}

/// Order-insensitive combination of two digests. Must be followed by
/// [`finalize`] before the result is combined with anything else.
pub const fn unordered_combine(a: u64, b: u64) -> u64 {
    a ^ b
}

/// Harden an unordered accumulator.
pub fn finalize(h: &mut dyn Hasher64, acc: u64) -> u64 {
    h.reset();
    h.write(&acc.to_le_bytes());
    h.sum64()
}

/// XOR accumulator for one unordered aggregation scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unordered {
    acc: u64,
    dirty: bool,
}

impl Unordered {
    /// An empty scope.
    pub const fn new() -> Self {
        Self { acc: 0, dirty: false }
    }

    /// A scope seeded with an existing (already hardened) digest.
    pub const fn seeded(seed: u64) -> Self {
        Self {
            acc: seed,
            dirty: false,
        }
    }

    /// Fold a digest into the scope.
    pub fn add(&mut self, digest: u64) {
        self.acc = unordered_combine(self.acc, digest);
        self.dirty = true;
    }

    /// Finalize in place, keeping the scope open for further folds.
    pub fn harden(&mut self, h: &mut dyn Hasher64) {
        self.acc = finalize(h, self.acc);
        self.dirty = false;
    }

    /// Close the scope with a single finalize.
    pub fn finish(self, h: &mut dyn Hasher64) -> u64 {
        finalize(h, self.acc)
    }

    /// Close a scope that was hardened after its last fold.
    ///
    /// Returns the seed unchanged when nothing was folded.
    pub fn into_hardened(self) -> u64 {
        debug_assert!(!self.dirty, "unordered scope closed without finalize");
        self.acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Fnv64;

    fn leaf(h: &mut dyn Hasher64, s: &str) -> u64 {
        h.reset();
        h.write(s.as_bytes());
        h.sum64()
    }

    #[test]
    fn test_ordered_combine_is_position_sensitive() {
        let mut h = Fnv64::new();
        let a = leaf(&mut h, "a");
        let b = leaf(&mut h, "b");
        assert_ne!(ordered_combine(&mut h, a, b), ordered_combine(&mut h, b, a));
        assert_eq!(ordered_combine(&mut h, a, b), ordered_combine(&mut h, a, b));
    }

    #[test]
    fn test_unordered_combine_commutes() {
        assert_eq!(unordered_combine(3, 9), unordered_combine(9, 3));
        assert_eq!(
            unordered_combine(unordered_combine(1, 2), 4),
            unordered_combine(1, unordered_combine(2, 4))
        );
    }

    #[test]
    fn test_raw_xor_cancels_shared_terms() {
        let mut h = Fnv64::new();
        let (a, b, c, z) = (
            leaf(&mut h, "A"),
            leaf(&mut h, "B"),
            leaf(&mut h, "C"),
            leaf(&mut h, "Z"),
        );

        let raw_a = unordered_combine(unordered_combine(a, b), unordered_combine(a, c));
        let raw_z = unordered_combine(unordered_combine(z, b), unordered_combine(z, c));
        assert_eq!(raw_a, raw_z);

        let hard_a = unordered_combine(
            finalize(&mut h, unordered_combine(a, b)),
            finalize(&mut h, unordered_combine(a, c)),
        );
        let hard_z = unordered_combine(
            finalize(&mut h, unordered_combine(z, b)),
            finalize(&mut h, unordered_combine(z, c)),
        );
        assert_ne!(hard_a, hard_z);
    }

    #[test]
    fn test_accumulator_matches_free_functions() {
        let mut h = Fnv64::new();
        let mut scope = Unordered::new();
        scope.add(5);
        scope.add(7);
        assert_eq!(scope.finish(&mut h), finalize(&mut h, 5 ^ 7));

        let mut seeded = Unordered::seeded(11);
        assert_eq!(seeded.into_hardened(), 11);
        seeded.add(2);
        seeded.harden(&mut h);
        assert_eq!(seeded.into_hardened(), finalize(&mut h, 11 ^ 2));
    }
}
