//! Access to record keys and the hash and equality callbacks used on them.

/// Records that carry a byte string key.
///
/// A table never looks at anything but the key of a record, and only ever borrows it.
pub trait Keyed {
    /// Returns the key of this record.
    fn key(&self) -> &[u8];
}

impl Keyed for [u8] {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self
    }
}

impl Keyed for str {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Keyed for Vec<u8> {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self
    }
}

impl Keyed for Box<[u8]> {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self
    }
}

impl Keyed for String {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        T::key(self)
    }
}

impl<K: Keyed, V> Keyed for (K, V) {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self.0.key()
    }
}

/// Hash function applied to keys.
///
/// Implemented for all `Fn(&[u8]) -> u32` closures.
pub trait KeyHasher {
    /// Computes the 32-bit hash of `key`.
    fn hash_key(&self, key: &[u8]) -> u32;
}

impl<F: Fn(&[u8]) -> u32> KeyHasher for F {
    #[inline(always)]
    fn hash_key(&self, key: &[u8]) -> u32 {
        self(key)
    }
}

/// Equality test applied to keys.
///
/// Must be consistent with the [`KeyHasher`] of the same table, i.e. keys that compare equal must
/// hash to the same value. Implemented for all `Fn(&[u8], &[u8]) -> bool` closures.
pub trait KeyEq {
    /// Returns `true` if both keys are considered the same.
    fn key_eq(&self, a: &[u8], b: &[u8]) -> bool;
}

impl<F: Fn(&[u8], &[u8]) -> bool> KeyEq for F {
    #[inline(always)]
    fn key_eq(&self, a: &[u8], b: &[u8]) -> bool {
        self(a, b)
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x01000193;

/// Computes the 32-bit FNV-1a hash of `bytes`.
#[inline]
pub const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// The default key hasher, 32-bit FNV-1a.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1a;

impl KeyHasher for Fnv1a {
    #[inline(always)]
    fn hash_key(&self, key: &[u8]) -> u32 {
        fnv1a(key)
    }
}

/// The default key equality, comparing lengths and then bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct BytesEq;

impl KeyEq for BytesEq {
    #[inline(always)]
    fn key_eq(&self, a: &[u8], b: &[u8]) -> bool {
        a.len() == b.len() && a == b
    }
}
