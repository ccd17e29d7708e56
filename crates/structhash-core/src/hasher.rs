//! The 64-bit hasher primitive.
//!
//! Every leaf digest and every combine step resets the hasher, writes a
//! short byte sequence and reads back a 64-bit sum. The default is FNV-1
//! (64-bit); Blake3 truncated to its first eight bytes is available as an
//! alternative when better mixing matters more than speed.

use serde::{Deserialize, Serialize};

/// A resettable 64-bit hash function.
///
/// Implementations must be deterministic: after `reset`, the same writes
/// produce the same `sum64`.
pub trait Hasher64 {
    /// Return the hasher to its initial state.
    fn reset(&mut self);

    /// Feed bytes into the hasher.
    fn write(&mut self, bytes: &[u8]);

    /// The digest of everything written since the last reset.
    fn sum64(&self) -> u64;
}

impl<H: Hasher64 + ?Sized> Hasher64 for Box<H> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes)
    }

    fn sum64(&self) -> u64 {
        (**self).sum64()
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1 64-bit hasher (multiply, then xor).
#[derive(Debug, Clone)]
pub struct Fnv64(u64);

impl Fnv64 {
    pub const fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Default for Fnv64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher64 for Fnv64 {
    fn reset(&mut self) {
        self.0 = FNV_OFFSET_BASIS;
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(FNV_PRIME);
            self.0 ^= b as u64;
        }
    }

    fn sum64(&self) -> u64 {
        self.0
    }
}

/// Blake3 truncated to 64 bits (first eight output bytes, little-endian).
#[derive(Debug, Clone, Default)]
pub struct Blake3Hasher64(blake3::Hasher);

impl Blake3Hasher64 {
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }
}

impl Hasher64 for Blake3Hasher64 {
    fn reset(&mut self) {
        self.0.reset();
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn sum64(&self) -> u64 {
        let hash = self.0.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}

/// Selects the hasher primitive used for a hashing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    /// FNV-1 64-bit.
    #[default]
    Fnv64,
    /// Blake3, truncated to 64 bits.
    Blake3,
}

impl HasherKind {
    /// Construct a fresh hasher of this kind.
    pub fn build(self) -> Box<dyn Hasher64 + Send> {
        match self {
            HasherKind::Fnv64 => Box::new(Fnv64::new()),
            HasherKind::Blake3 => Box::new(Blake3Hasher64::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(h: &mut dyn Hasher64, data: &[u8]) -> u64 {
        h.reset();
        h.write(data);
        h.sum64()
    }

    #[test]
    fn test_fnv1_known_vectors() {
        let mut h = Fnv64::new();
        // Empty input yields the offset basis.
        assert_eq!(sum(&mut h, b""), 0xcbf29ce484222325);
        assert_eq!(sum(&mut h, b"a"), 0xaf63bd4c8601b7be);
        assert_eq!(sum(&mut h, b"foobar"), 0x340d8765a4dda9c2);
    }

    #[test]
    fn test_reset_discards_previous_writes() {
        let mut h = Fnv64::new();
        h.write(b"leftover state");
        assert_eq!(sum(&mut h, b"a"), 0xaf63bd4c8601b7be);

        let mut b = Blake3Hasher64::new();
        let first = sum(&mut b, b"payload");
        b.write(b"more");
        assert_eq!(sum(&mut b, b"payload"), first);
    }

    #[test]
    fn test_blake3_truncation() {
        let mut h = Blake3Hasher64::new();
        let expected = {
            let full = blake3::hash(b"structhash");
            u64::from_le_bytes(full.as_bytes()[..8].try_into().unwrap())
        };
        assert_eq!(sum(&mut h, b"structhash"), expected);
    }

    #[test]
    fn test_hasher_kind_build() {
        let mut fnv = HasherKind::Fnv64.build();
        let mut blake = HasherKind::Blake3.build();
        assert_ne!(sum(&mut fnv, b"x"), sum(&mut blake, b"x"));
        assert_eq!(HasherKind::default(), HasherKind::Fnv64);
    }
}
