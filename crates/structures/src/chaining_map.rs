//! Separate-chaining hash table.
//!
//! Each bucket holds the head of a singly linked chain. New entries are
//! prepended, so within a bucket the most recently added key comes first.
//! A running list of live keys is kept beside the buckets so the key set can
//! be handed out without walking the table.
//!
//! ## Rehashing
//! After an insert pushes the load factor (`len / capacity`) above
//! [`MAX_LOAD_FACTOR`], the table grows to the first entry of [`PRIMES`] that
//! is at least double the current capacity. Past the end of that table the
//! next prime is found by trial division over odd numbers. Every node is
//! relinked into a fresh bucket array, which only replaces the live one once
//! all nodes have moved. Removes and lookups never rehash.

use crate::hasher::BuildIdentityHasher;
use crate::sequence::GrowableSeq;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use tracing::debug;

/// Bucket count used by the stores' top-level tables
pub const DEFAULT_CAPACITY: usize = 2153;

/// Load factor above which an insert triggers a rehash
pub const MAX_LOAD_FACTOR: f64 = 1.5;

/// Ascending primes, each at least double its predecessor
const PRIMES: [usize; 19] = [
    13, 29, 59, 127, 257, 521, 1049, 2099, 4201, 8419, 16843, 33703, 67409, 134837, 269683,
    539389, 1078787, 2157587, 4315183,
];

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

/// Hash table with linked-list chains and prime-capacity growth
pub struct ChainingHashMap<K, V, S = BuildIdentityHasher> {
    buckets: Vec<Link<K, V>>,
    /// Live keys in insertion order
    keys: GrowableSeq<K>,
    hasher: S,
}

impl<K: Hash + Eq + Clone, V> ChainingHashMap<K, V> {
    /// Creates a table with [`DEFAULT_CAPACITY`] buckets
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table with `capacity` buckets (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, BuildIdentityHasher::default())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> ChainingHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(1)),
            keys: GrowableSeq::new(),
            hasher,
        }
    }

    /// Inserts `key` with `value`.
    ///
    /// Returns `false` and leaves the table untouched if the key is already
    /// present; existing values are never overwritten.
    pub fn add(&mut self, key: K, value: V) -> bool {
        let index = self.bucket_index(&key);
        if find(&self.buckets[index], &key).is_some() {
            return false;
        }

        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Node {
            key: key.clone(),
            value,
            next: head,
        }));
        self.keys.push(key);

        if self.load_factor() > MAX_LOAD_FACTOR {
            self.rehash();
        }
        true
    }

    /// Unlinks `key` from its chain and returns its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let mut link = &mut self.buckets[index];
        loop {
            match link {
                None => return None,
                Some(node) if node.key == *key => {
                    let next = node.next.take();
                    let removed = std::mem::replace(link, next);
                    self.keys.remove(key);
                    return removed.map(|node| node.value);
                }
                Some(node) => link = &mut node.next,
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        find(&self.buckets[self.bucket_index(key)], key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let mut current = self.buckets[index].as_deref_mut();
        while let Some(node) = current {
            if node.key == *key {
                return Some(&mut node.value);
            }
            current = node.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Current number of buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Live keys in the order they were added
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Visits every entry once: bucket by bucket, each chain head to tail
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len(),
        }
    }

    fn bucket_index(&self, key: &K) -> usize {
        bucket_for(&self.hasher, key, self.buckets.len())
    }

    fn rehash(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = next_capacity(old_capacity);
        let mut buckets = empty_buckets(new_capacity);

        for bucket in self.buckets.iter_mut() {
            let mut chain = bucket.take();
            while let Some(mut node) = chain {
                chain = node.next.take();
                let index = bucket_for(&self.hasher, &node.key, new_capacity);
                node.next = buckets[index].take();
                buckets[index] = Some(node);
            }
        }

        self.buckets = buckets;
        debug!(
            len = self.len(),
            old_capacity, new_capacity, "rehashed chaining table"
        );
    }
}

impl<K: Hash + Eq + Clone, V> Default for ChainingHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainingHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for bucket in &self.buckets {
            let mut current = bucket.as_deref();
            while let Some(node) = current {
                map.entry(&node.key, &node.value);
                current = node.next.as_deref();
            }
        }
        map.finish()
    }
}

impl<'a, K: Hash + Eq + Clone, V, S: BuildHasher> IntoIterator for &'a ChainingHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`ChainingHashMap`]
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Link<K, V>>,
    chain: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Link<K, V>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

fn bucket_for<K: Hash, S: BuildHasher>(hasher: &S, key: &K, capacity: usize) -> usize {
    (hasher.hash_one(key) % capacity as u64) as usize
}

fn find<'a, K: Eq, V>(bucket: &'a Link<K, V>, key: &K) -> Option<&'a V> {
    let mut current = bucket.as_deref();
    while let Some(node) = current {
        if node.key == *key {
            return Some(&node.value);
        }
        current = node.next.as_deref();
    }
    None
}

/// Capacity the table grows to from `capacity`
fn next_capacity(capacity: usize) -> usize {
    let candidate = capacity.saturating_mul(2);
    match PRIMES.iter().find(|&&prime| prime >= candidate) {
        Some(&prime) => prime,
        None => next_prime(candidate),
    }
}

fn next_prime(from: usize) -> usize {
    let mut candidate = from | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn test_add_and_get() {
        let mut map = ChainingHashMap::with_capacity(13);
        assert!(map.add(1193u32, "One Flew Over the Cuckoo's Nest"));
        assert!(map.add(661, "James and the Giant Peach"));

        assert_eq!(map.get(&1193), Some(&"One Flew Over the Cuckoo's Nest"));
        assert_eq!(map.get(&661), Some(&"James and the Giant Peach"));
        assert_eq!(map.get(&914), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut map = ChainingHashMap::with_capacity(13);
        assert!(map.add(7u32, 1));
        assert!(!map.add(7, 2));

        // The original value survives and nothing else changed
        assert_eq!(map.get(&7), Some(&1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.keys(), &[7]);
    }

    #[test]
    fn test_remove_from_chain_positions() {
        // Capacity 13: keys 1, 14, 27 and 40 share bucket 1
        let mut map = ChainingHashMap::with_capacity(13);
        for key in [1u32, 14, 27, 40] {
            map.add(key, key * 10);
        }

        assert_eq!(map.remove(&14), Some(140)); // middle
        assert_eq!(map.remove(&40), Some(400)); // head
        assert_eq!(map.remove(&1), Some(10)); // tail
        assert_eq!(map.remove(&1), None);

        assert_eq!(map.get(&27), Some(&270));
        assert_eq!(map.keys(), &[27]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iteration_order() {
        let mut map = ChainingHashMap::with_capacity(13);
        for key in [3u32, 16, 2, 29] {
            map.add(key, ());
        }

        // Bucket 2 holds [2], bucket 3 holds [29, 16, 3] (newest first)
        let keys: Vec<u32> = map.iter().map(|(&k, _)| k).collect();
        assert_eq!(keys, vec![2, 29, 16, 3]);
        assert_eq!(map.iter().len(), 4);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut map = ChainingHashMap::with_capacity(13);
        map.add(5u32, 1u32);
        map.add(18, 1);

        *map.get_mut(&5).unwrap() += 4;
        assert_eq!(map.get(&5), Some(&5));
        assert_eq!(map.get(&18), Some(&1));
        assert!(map.get_mut(&31).is_none());
    }

    #[test]
    fn test_rehash_triggers_above_load_factor() {
        let mut map = ChainingHashMap::with_capacity(13);

        // 19 / 13 = 1.46 keeps the original capacity
        for key in 0..19u32 {
            map.add(key, key);
        }
        assert_eq!(map.capacity(), 13);

        // 20 / 13 = 1.54 grows to the first prime >= 26
        map.add(19, 19);
        assert_eq!(map.capacity(), 29);
        assert!(map.load_factor() <= MAX_LOAD_FACTOR);

        for key in 0..20u32 {
            assert_eq!(map.get(&key), Some(&key));
        }
    }

    #[test]
    fn test_next_capacity() {
        assert_eq!(next_capacity(13), 29);
        assert_eq!(next_capacity(DEFAULT_CAPACITY), 8419);
        assert_eq!(next_capacity(10), 29);
        // Beyond the prime table the capacity comes from trial division
        assert_eq!(next_capacity(4315183), 8630387);
    }

    #[test]
    fn test_prime_table() {
        assert!(PRIMES.iter().all(|&p| is_prime(p)));
        assert!(PRIMES.windows(2).all(|pair| pair[1] >= pair[0] * 2));
        assert!(is_prime(2));
        assert!(!is_prime(1));
        assert!(!is_prime(4307)); // 59 * 73
        assert_eq!(next_prime(24), 29);
    }

    #[test]
    fn test_matches_std_hashmap_under_random_workload() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut map = ChainingHashMap::with_capacity(13);
        let mut expected: HashMap<u32, u64> = HashMap::new();

        let mut keys: Vec<u32> = (0..5_000).collect();
        keys.shuffle(&mut rng);

        for &key in &keys {
            let value = rng.random_range(0..1_000_000u64);
            assert!(map.add(key, value));
            expected.insert(key, value);
        }
        assert!(map.capacity() > 13);

        // Remove roughly a third of the keys
        for &key in keys.iter().filter(|&&k| k % 3 == 0) {
            assert_eq!(map.remove(&key), expected.remove(&key));
        }

        assert_eq!(map.len(), expected.len());
        for (key, value) in &expected {
            assert_eq!(map.get(key), Some(value));
        }

        let mut listed: Vec<u32> = map.keys().to_vec();
        let mut iterated: Vec<u32> = map.iter().map(|(&k, _)| k).collect();
        let mut reference: Vec<u32> = expected.keys().copied().collect();
        listed.sort_unstable();
        iterated.sort_unstable();
        reference.sort_unstable();
        assert_eq!(listed, reference);
        assert_eq!(iterated, reference);
    }

    #[test]
    fn test_string_keys() {
        let mut map: ChainingHashMap<String, usize> = ChainingHashMap::with_capacity(13);
        for (i, name) in ["Tom Hanks", "Tim Allen", "Don Rickles"].iter().enumerate() {
            map.add(name.to_string(), i);
        }
        assert_eq!(map.get(&"Tim Allen".to_string()), Some(&1));
        assert_eq!(map.remove(&"Tom Hanks".to_string()), Some(0));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_custom_hasher() {
        let mut map = ChainingHashMap::with_hasher(std::collections::hash_map::RandomState::new());
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert!(map.add(862u32, "Toy Story"));
        assert!(!map.add(862, "Toy Story 2"));
        assert_eq!(map.get(&862), Some(&"Toy Story"));
    }
}
