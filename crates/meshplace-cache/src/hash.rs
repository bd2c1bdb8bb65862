//! Geometry fingerprints.
//!
//! Uses FNV-1a for fast, deterministic hashing of the values a node set was
//! built from. The hash is not cryptographically secure: it only flags a
//! cache file that was written for a different mesh configuration.

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Incremental FNV-1a hasher over little-endian encoded values.
///
/// # Examples
///
/// ```
/// use meshplace_cache::Fingerprint;
///
/// let a = Fingerprint::new().f64(5.0).u32(3).finish();
/// let b = Fingerprint::new().f64(5.0).u32(3).finish();
/// assert_eq!(a, b);
/// assert_ne!(a, Fingerprint::new().f64(5.0).u32(4).finish());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Start from the FNV-1a offset basis.
    pub fn new() -> Self {
        Self(FNV_OFFSET)
    }

    /// Feed raw bytes.
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        for &b in bytes {
            self.0 = fnv1a_byte(self.0, b);
        }
        self
    }

    /// Feed a u32 (4 LE bytes).
    pub fn u32(self, v: u32) -> Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Feed a u64 (8 LE bytes).
    pub fn u64(self, v: u64) -> Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Feed an f64 by its bit pattern. `-0.0` is folded into `0.0`.
    pub fn f64(self, v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        self.u64(v.to_bits())
    }

    /// Feed a boolean as one byte.
    pub fn bool(self, v: bool) -> Self {
        self.bytes(&[u8::from(v)])
    }

    /// Current hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
