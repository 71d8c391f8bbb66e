//! Deterministic hashing for integer-keyed tables.
//!
//! Integer keys hash to their absolute value, so a key lands in bucket
//! `|key| mod capacity` and bucket order is stable from run to run. Anything
//! that writes several integers or raw bytes (composite keys, strings) is
//! folded with a ×31 polynomial.

use std::hash::{BuildHasherDefault, Hasher};

/// Hasher that passes single integers through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher {
    state: u64,
}

impl IdentityHasher {
    #[inline]
    fn fold(&mut self, value: u64) {
        self.state = self.state.wrapping_mul(31).wrapping_add(value);
    }
}

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(u64::from(byte));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.fold(i.unsigned_abs());
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.fold(i.unsigned_abs() as u64);
    }
}

/// `BuildHasher` used by `ChainingHashMap` unless another is supplied
pub type BuildIdentityHasher = BuildHasherDefault<IdentityHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasher, Hash};

    #[test]
    fn test_integers_hash_to_themselves() {
        let build = BuildIdentityHasher::default();
        assert_eq!(build.hash_one(42u32), 42);
        assert_eq!(build.hash_one(7usize), 7);
        assert_eq!(build.hash_one(-13i32), 13);
    }

    #[test]
    fn test_composite_keys_fold() {
        #[derive(Hash)]
        struct Pair {
            a: u32,
            b: u32,
        }

        let build = BuildIdentityHasher::default();
        assert_eq!(build.hash_one(Pair { a: 2, b: 5 }), 2 * 31 + 5);
        assert_ne!(
            build.hash_one(Pair { a: 2, b: 5 }),
            build.hash_one(Pair { a: 5, b: 2 })
        );
    }

    #[test]
    fn test_strings_are_deterministic() {
        let build = BuildIdentityHasher::default();
        let mut hasher = build.build_hasher();
        "film".hash(&mut hasher);
        assert_eq!(hasher.finish(), build.hash_one("film"));
        assert_ne!(build.hash_one("film"), build.hash_one("mlif"));
    }
}
