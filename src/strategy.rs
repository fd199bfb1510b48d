//! Key hashing and equality strategies.
//!
//! A `ChainMap` never interprets key bytes itself; it asks a `KeyHasher` for
//! a digest and a `KeyEq` whether two keys match. Both are plain traits with
//! blanket impls for closures, so
//! `MapBuilder::new().hasher(|k: &[u8]| k[0] as u64)` works without a newtype.

/// Maps key bytes to a 64-bit digest. Must be a pure function of `key`.
pub trait KeyHasher {
    fn hash(&self, key: &[u8]) -> u64;
}

/// Decides whether two keys of equal length are the same key.
///
/// The map only calls this after checking `a.len() == b.len()`.
pub trait KeyEq {
    fn equal(&self, a: &[u8], b: &[u8]) -> bool;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8]) -> u64,
{
    #[inline]
    fn hash(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

impl<F> KeyEq for F
where
    F: Fn(&[u8], &[u8]) -> bool,
{
    #[inline]
    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        self(a, b)
    }
}

/// Jenkins' one-at-a-time hash widened to 64 bits.
///
/// Unseeded, so digests are stable across runs and processes. Not suitable
/// for keys chosen by an adversary.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OneAtATime;

impl KeyHasher for OneAtATime {
    fn hash(&self, key: &[u8]) -> u64 {
        let mut h: u64 = 0;
        for &b in key {
            h = h.wrapping_add(u64::from(b));
            h = h.wrapping_add(h << 10);
            h ^= h >> 6;
        }
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h.wrapping_add(h << 15)
    }
}

/// Exact byte-wise comparison.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BytewiseEq;

impl KeyEq for BytewiseEq {
    #[inline]
    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }
}
