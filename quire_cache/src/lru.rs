// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit LRU bookkeeping.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Capacity-bounded least-recently-used ledger.
///
/// The ledger only tracks *which* keys are live and in what order they were
/// last touched; callers keep the associated values themselves. Every
/// [`LruLedger::record_access`] stamps the key with the next value of a
/// monotonically increasing access counter, and
/// [`LruLedger::evict_if_needed`] removes the smallest stamps until the ledger
/// is back within capacity.
///
/// Eviction scans all entries, which is cheap for the small capacities used
/// for page bitmaps and decoded images.
///
/// # Example
///
/// ```
/// use quire_cache::LruLedger;
///
/// let mut lru = LruLedger::new(2);
/// lru.record_access("a");
/// lru.record_access("b");
/// lru.record_access("a");
/// lru.record_access("c");
///
/// let evicted = lru.evict_if_needed();
/// assert_eq!(evicted.as_slice(), &["b"]);
/// assert_eq!(lru.iter_by_recency().collect::<Vec<_>>(), vec![&"c", &"a"]);
/// ```
#[derive(Clone, Debug)]
pub struct LruLedger<K>
where
    K: Clone + Eq + Hash,
{
    stamps: HashMap<K, u64>,
    clock: u64,
    capacity: usize,
}

impl<K> LruLedger<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty ledger holding at most `capacity` keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            stamps: HashMap::new(),
            clock: 0,
            capacity,
        }
    }

    /// Maximum number of keys kept after eviction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity. Call [`LruLedger::evict_if_needed`] afterwards to shrink.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns `true` if no key is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Returns `true` if `key` is live.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.stamps.contains_key(key)
    }

    /// Marks `key` as the most recently used. Returns `true` if it was new.
    pub fn record_access(&mut self, key: K) -> bool {
        self.clock += 1;
        self.stamps.insert(key, self.clock).is_none()
    }

    /// Evicts least recently used keys until the ledger is within capacity.
    ///
    /// Returns the evicted keys, oldest first.
    pub fn evict_if_needed(&mut self) -> SmallVec<[K; 4]> {
        let mut evicted = SmallVec::new();
        while self.stamps.len() > self.capacity {
            let Some(oldest) = self
                .stamps
                .iter()
                .min_by_key(|(_, stamp)| **stamp)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.stamps.remove(&oldest);
            evicted.push(oldest);
        }
        evicted
    }

    /// Forgets `key`. Returns `true` if it was live.
    pub fn remove(&mut self, key: &K) -> bool {
        self.stamps.remove(key).is_some()
    }

    /// Forgets every key. The access counter keeps running.
    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    /// Live keys, most recently used first.
    pub fn iter_by_recency(&self) -> impl Iterator<Item = &K> + '_ {
        let mut entries: Vec<(&K, u64)> = self.stamps.iter().map(|(k, s)| (k, *s)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        entries.into_iter().map(|(k, _)| k)
    }
}

impl<K> Default for LruLedger<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::LruLedger;
    use alloc::vec::Vec;

    #[test]
    fn evicts_least_recently_used() {
        let mut lru = LruLedger::new(3);
        for k in 0..5_u32 {
            lru.record_access(k);
        }
        assert_eq!(lru.evict_if_needed().as_slice(), &[0, 1]);
        assert_eq!(lru.len(), 3);
        assert!(!lru.contains(&0));
    }

    #[test]
    fn reaccess_refreshes() {
        let mut lru = LruLedger::new(2);
        assert!(lru.record_access(1_u32));
        assert!(lru.record_access(2));
        assert!(!lru.record_access(1));
        lru.record_access(3);
        assert_eq!(lru.evict_if_needed().as_slice(), &[2]);
        assert_eq!(lru.iter_by_recency().copied().collect::<Vec<_>>(), [3, 1]);
    }

    #[test]
    fn shrinking_capacity() {
        let mut lru = LruLedger::new(4);
        for k in 0..4_u32 {
            lru.record_access(k);
        }
        assert!(lru.evict_if_needed().is_empty());
        lru.set_capacity(1);
        assert_eq!(lru.evict_if_needed().as_slice(), &[0, 1, 2]);

        lru.set_capacity(0);
        assert_eq!(lru.evict_if_needed().as_slice(), &[3]);
        assert!(lru.is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let mut lru = LruLedger::new(4);
        lru.record_access("x");
        lru.record_access("y");
        assert!(lru.remove(&"x"));
        assert!(!lru.remove(&"x"));
        lru.clear();
        assert!(lru.is_empty());
    }
}
