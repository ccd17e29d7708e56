//! Fingerprints and the reusable fingerprinting engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use structhash_core::{hash_with_hasher, Hasher64, Policy, Structural};

use crate::error::{Error, Result};

/// A 64-bit structural fingerprint.
///
/// Rendered as 16 lowercase hex digits of the big-endian digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub const fn from_u64(digest: u64) -> Self {
        Self(digest)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_be_bytes())
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidFingerprint(e.to_string()))?;
        let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidFingerprint(format!("expected 8 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(u64::from_be_bytes(arr)))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<u64> for Fingerprint {
    fn from(digest: u64) -> Self {
        Self(digest)
    }
}

impl From<Fingerprint> for u64 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

/// Computes fingerprints under a fixed policy, reusing one hasher.
///
/// Takes `&mut self`: one instance serves one caller at a time. Give each
/// thread its own `Fingerprinter`.
pub struct Fingerprinter {
    policy: Policy,
    hasher: Box<dyn Hasher64 + Send>,
}

impl Fingerprinter {
    /// Create a fingerprinter using the hasher the policy names.
    pub fn new(policy: Policy) -> Self {
        let hasher = policy.hasher.build();
        Self { policy, hasher }
    }

    /// Create a fingerprinter with a caller-supplied hasher.
    ///
    /// `policy.hasher` is ignored.
    pub fn with_hasher(policy: Policy, hasher: Box<dyn Hasher64 + Send>) -> Self {
        Self { policy, hasher }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Fingerprint a value.
    pub fn fingerprint<T: Structural + ?Sized>(&mut self, value: &T) -> Result<Fingerprint> {
        let digest = hash_with_hasher(value, &self.policy, &mut *self.hasher)?;
        Ok(Fingerprint(digest))
    }

    /// Whether a value still has the given fingerprint.
    pub fn matches<T: Structural + ?Sized>(
        &mut self,
        value: &T,
        expected: Fingerprint,
    ) -> Result<bool> {
        Ok(self.fingerprint(value)? == expected)
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

impl fmt::Debug for Fingerprinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprinter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structhash_core::{hash, Fnv64, HasherKind};

    #[test]
    fn test_fingerprint_hex_roundtrip() {
        let fp = Fingerprint(0x0123_4567_89ab_cdef);
        assert_eq!(fp.to_hex(), "0123456789abcdef");
        assert_eq!(Fingerprint::from_hex("0123456789abcdef").unwrap(), fp);
        assert_eq!(format!("{fp}"), "0123456789abcdef");
        assert_eq!(format!("{fp:?}"), "Fingerprint(0123456789abcdef)");
    }

    #[test]
    fn test_fingerprint_from_hex_rejects_bad_input() {
        assert!(matches!(
            Fingerprint::from_hex("zz"),
            Err(Error::InvalidFingerprint(_))
        ));
        assert!(matches!(
            Fingerprint::from_hex("0123"),
            Err(Error::InvalidFingerprint(_))
        ));
    }

    #[test]
    fn test_fingerprinter_matches_free_function() {
        let mut fp = Fingerprinter::default();
        let value = vec!["a".to_string(), "b".to_string()];
        let expected = hash(&value, None).unwrap();
        // Reuse must not leak state between calls.
        fp.fingerprint(&42u8).unwrap();
        assert_eq!(fp.fingerprint(&value).unwrap(), Fingerprint(expected));
        assert!(fp.matches(&value, Fingerprint(expected)).unwrap());
    }

    #[test]
    fn test_fingerprinter_uses_policy_hasher() {
        let policy = Policy::default().hasher(HasherKind::Blake3);
        let mut blake = Fingerprinter::new(policy.clone());
        let mut fnv = Fingerprinter::with_hasher(policy, Box::new(Fnv64::new()));
        assert_ne!(
            blake.fingerprint(&1u8).unwrap(),
            fnv.fingerprint(&1u8).unwrap()
        );
        assert_eq!(fnv.fingerprint(&1u8).unwrap().0, hash(&1u8, None).unwrap());
    }

    #[test]
    fn test_fingerprint_serde_is_transparent() {
        let json = serde_json::to_string(&Fingerprint(7)).unwrap();
        assert_eq!(json, "7");
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Fingerprint(7));
    }
}
