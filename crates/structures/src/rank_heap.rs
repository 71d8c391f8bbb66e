//! Fixed-capacity min-heap of `(key, id)` pairs.
//!
//! `RankHeap` never grows past the capacity it was built with. Two uses:
//!
//! 1. **Streaming top-K**: [`RankHeap::offer`] keeps the K largest pairs
//!    seen so far with the smallest of them at the root, so each candidate
//!    costs one comparison plus O(log K) when it displaces the root.
//! 2. **Heap sort**: build a heap whose capacity equals the number of items,
//!    add `(sort key, position)` for each and drain it in ascending order.
//!
//! ## Ordering
//! Pairs compare by `key` first and `id` second. Heap sort over
//! `(key, position)` is therefore stable, and when two candidates tie on
//! key the one with the larger id ranks higher in a top-K result.

use std::cmp::Ordering;

/// Slots reserved up front; larger heaps allocate as they fill
const MAX_PREALLOCATED_SLOTS: usize = 4096;

/// A rank key paired with the id it ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankPair<K, I = u32> {
    pub key: K,
    pub id: I,
}

impl<K, I> RankPair<K, I> {
    pub fn new(key: K, id: I) -> Self {
        Self { key, id }
    }
}

/// Totally ordered `f32` so averages can be used as rank keys.
///
/// Ordering follows `f32::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(pub f32);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Binary min-heap with a fixed number of slots
#[derive(Debug, Clone)]
pub struct RankHeap<K, I = u32> {
    /// Populated prefix of the heap, parent of `i` at `(i - 1) / 2`
    slots: Vec<RankPair<K, I>>,
    capacity: usize,
}

impl<K: Ord, I: Ord> RankHeap<K, I> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(MAX_PREALLOCATED_SLOTS)),
            capacity,
        }
    }

    /// Selects the `k` largest candidates and returns their ids, largest first
    pub fn top_k(candidates: impl IntoIterator<Item = RankPair<K, I>>, k: usize) -> Vec<I> {
        let mut heap = Self::new(k);
        for candidate in candidates {
            heap.offer(candidate);
        }
        heap.into_descending_ids()
    }

    /// Adds a pair, restoring heap order upwards.
    ///
    /// Returns `false` without touching the heap when it is already full.
    pub fn add(&mut self, pair: RankPair<K, I>) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.push(pair);
        self.sift_up(self.slots.len() - 1);
        true
    }

    /// Removes and returns the smallest pair
    pub fn pop_root(&mut self) -> Option<RankPair<K, I>> {
        if self.slots.is_empty() {
            return None;
        }
        // The last populated slot takes the root's place
        let root = self.slots.swap_remove(0);
        self.sift_down(0);
        Some(root)
    }

    pub fn peek(&self) -> Option<&RankPair<K, I>> {
        self.slots.first()
    }

    /// Offers a candidate to a top-K selection.
    ///
    /// Until the heap is full every candidate is added. After that a
    /// candidate only gets in by strictly beating the current root, which it
    /// then replaces. Returns `true` if the candidate was kept.
    pub fn offer(&mut self, candidate: RankPair<K, I>) -> bool {
        if !self.is_full() {
            return self.add(candidate);
        }
        match self.peek() {
            Some(root) if candidate > *root => {
                self.pop_root();
                self.add(candidate)
            }
            _ => false,
        }
    }

    /// Drains the heap into ids ordered from largest to smallest pair
    pub fn into_descending_ids(self) -> Vec<I> {
        let mut ids = self.into_ascending_ids();
        ids.reverse();
        ids
    }

    /// Drains the heap into ids ordered from smallest to largest pair
    pub fn into_ascending_ids(mut self) -> Vec<I> {
        let mut ids = Vec::with_capacity(self.slots.len());
        while let Some(pair) = self.pop_root() {
            ids.push(pair.id);
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[index] >= self.slots[parent] {
                break;
            }
            self.slots.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            // Left child wins ties
            let child = if right < len && self.slots[right] < self.slots[left] {
                right
            } else {
                left
            };
            if self.slots[child] >= self.slots[index] {
                break;
            }
            self.slots.swap(index, child);
            index = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn pair(key: u32, id: u32) -> RankPair<u32> {
        RankPair::new(key, id)
    }

    #[test]
    fn test_pop_root_returns_minimum() {
        let mut heap = RankHeap::new(5);
        for (key, id) in [(5, 1), (2, 2), (8, 3), (1, 4), (9, 5)] {
            assert!(heap.add(pair(key, id)));
        }

        assert_eq!(heap.peek(), Some(&pair(1, 4)));
        let keys: Vec<u32> = std::iter::from_fn(|| heap.pop_root()).map(|p| p.key).collect();
        assert_eq!(keys, vec![1, 2, 5, 8, 9]);
        assert!(heap.is_empty());
        assert_eq!(heap.pop_root(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn test_add_fails_when_full() {
        let mut heap = RankHeap::new(2);
        assert!(heap.add(pair(3, 1)));
        assert!(heap.add(pair(4, 2)));
        assert!(heap.is_full());

        assert!(!heap.add(pair(1, 3)));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.peek(), Some(&pair(3, 1)));
    }

    #[test]
    fn test_offer_keeps_largest() {
        let mut heap = RankHeap::new(3);
        for (id, key) in [5, 2, 8, 10, 1].into_iter().enumerate() {
            heap.offer(pair(key, id as u32));
        }
        // Keys 10, 8, 5 live at ids 3, 2, 0
        assert_eq!(heap.into_descending_ids(), vec![3, 2, 0]);
    }

    #[test]
    fn test_offer_requires_strictly_larger() {
        let mut heap = RankHeap::new(1);
        assert!(heap.offer(pair(4, 9)));
        assert!(!heap.offer(pair(4, 2)));
        assert!(!heap.offer(pair(3, 50)));
        assert!(heap.offer(pair(4, 10)));
        assert_eq!(heap.into_descending_ids(), vec![10]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut heap: RankHeap<u32> = RankHeap::new(0);
        assert!(heap.is_full());
        assert!(heap.is_empty());
        assert!(!heap.offer(pair(1, 1)));
        assert!(heap.into_descending_ids().is_empty());
    }

    #[test]
    fn test_top_k_with_fewer_candidates_than_k() {
        let ids = RankHeap::top_k([pair(1, 10), pair(7, 20), pair(3, 30)], 10);
        assert_eq!(ids, vec![20, 30, 10]);
    }

    #[test]
    fn test_streaming_top_k_matches_sort() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(1..2_000);
            let k = rng.random_range(1..=n);

            let mut keys: Vec<u32> = (0..n as u32).map(|i| i * 3).collect();
            keys.shuffle(&mut rng);

            let selected = RankHeap::top_k(keys.iter().map(|&key| pair(key, key + 1)), k);

            keys.sort_unstable_by(|a, b| b.cmp(a));
            let expected: Vec<u32> = keys.iter().take(k).map(|&key| key + 1).collect();
            assert_eq!(selected, expected);
        }
    }

    #[test]
    fn test_heap_sort_is_stable() {
        let orders = [3u32, 1, 3, 0, 1, 7, 0];
        let mut heap = RankHeap::new(orders.len());
        for (position, &order) in orders.iter().enumerate() {
            heap.add(RankPair::new(order, position));
        }

        assert_eq!(heap.into_ascending_ids(), vec![3, 6, 1, 4, 0, 2, 5]);
    }

    #[test]
    fn test_heap_sort_random_input() {
        let mut rng = StdRng::seed_from_u64(3);
        let keys: Vec<u16> = (0..500).map(|_| rng.random_range(0..50)).collect();

        let mut heap = RankHeap::new(keys.len());
        for (position, &key) in keys.iter().enumerate() {
            heap.add(RankPair::new(key, position));
        }
        let sorted: Vec<u16> = heap.into_ascending_ids().iter().map(|&p| keys[p]).collect();

        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_ties_rank_larger_id_first() {
        let ids = RankHeap::top_k([pair(5, 1), pair(5, 3), pair(5, 2), pair(1, 4)], 2);
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_float_keys() {
        let averages = [(3.5f32, 1u32), (4.25, 2), (0.0, 3), (4.0, 4)];
        let ids = RankHeap::top_k(
            averages.iter().map(|&(avg, id)| RankPair::new(FloatKey(avg), id)),
            3,
        );
        assert_eq!(ids, vec![2, 4, 1]);

        assert!(FloatKey(-0.0) < FloatKey(0.0));
        assert_eq!(FloatKey(2.5), FloatKey(2.5));
    }
}
