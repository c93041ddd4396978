//! Hashing primitives shared by all particles.
//!
//! Particle hashes are structural: they only depend on kinds, identifier strings and
//! child hashes. [`hash_bytes`] is the leaf function and [`combine`] folds child hashes
//! into a parent hash.
use std::hash::{DefaultHasher, Hasher};

/// 64-bit FNV prime, used as the multiplier of [`combine`].
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash a byte string.
///
/// Uses SipHash with fixed zero keys, so the result is deterministic for the lifetime of
/// the process (and across processes built with the same toolchain).
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Fold `value` into the accumulated hash `acc`.
#[inline]
pub fn combine(acc: u64, value: u64) -> u64 {
    acc.wrapping_mul(FNV_PRIME) ^ value
}

/// Fold a sequence of hashes, starting from zero.
pub fn combine_all<I: IntoIterator<Item = u64>>(hashes: I) -> u64 {
    hashes.into_iter().fold(0, combine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_bytes_is_deterministic() {
        assert_eq!(hash_bytes(b"Foo"), hash_bytes(b"Foo"));
        assert_ne!(hash_bytes(b"Foo"), hash_bytes(b"foo"));
    }

    #[test]
    fn combine_is_order_sensitive() {
        let (a, b) = (hash_bytes(b"a"), hash_bytes(b"b"));
        assert_ne!(combine_all([a, b]), combine_all([b, a]));
        assert_eq!(combine_all([]), 0);
        assert_eq!(combine_all([a]), a);
    }
}
