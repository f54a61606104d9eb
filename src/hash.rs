//! Hash adapters: pure functions from a key string to a `u64`.

use core::fmt;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// A deterministic, pure hash over key strings. Maps never validate the
/// adapter; a degenerate one (e.g. constant) only makes them slower.
pub trait KeyHash {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHash for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Randomly seeded hash backed by hashbrown's default hash builder. The seed
/// is fixed per instance, so one map always sees the same hash for a key.
#[derive(Clone, Default)]
pub struct DefaultHash(DefaultHashBuilder);

impl DefaultHash {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyHash for DefaultHash {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self.0.hash_one(key)
    }
}

impl fmt::Debug for DefaultHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultHash")
    }
}

/// Polynomial hash: `sum(byte[i] * 29^(i+1))` with wrapping arithmetic.
/// Bytes are sign-extended, so bytes `>= 0x80` contribute negative terms
/// as a signed `char` does.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Hash29;

impl KeyHash for Hash29 {
    fn hash_key(&self, key: &str) -> u64 {
        let mut sum: u64 = 0;
        let mut factor: u64 = 29;
        for &b in key.as_bytes() {
            let term = i64::from(b as i8) as u64;
            sum = sum.wrapping_add(term.wrapping_mul(factor));
            factor = factor.wrapping_mul(29);
        }
        sum
    }
}
