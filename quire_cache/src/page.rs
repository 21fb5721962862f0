// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which page bitmaps are current.

use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::LruLedger;

/// Record of which pages have been drawn since their content last changed.
///
/// Each entry is tagged with the generation it was drawn in. Bumping the
/// generation with [`PageRenderCache::invalidate_all`] makes every existing
/// entry stale in `O(1)`; stale entries keep their LRU slot until they are
/// redrawn or evicted.
///
/// ```
/// use quire_cache::PageRenderCache;
///
/// let mut cache = PageRenderCache::new(2);
/// cache.mark_page_rendered(0);
/// cache.mark_page_rendered(1);
/// let evicted = cache.mark_page_rendered(2);
/// assert_eq!(evicted.as_slice(), &[0]);
///
/// cache.invalidate_all();
/// assert!(!cache.is_page_cached(2));
/// ```
#[derive(Clone, Debug)]
pub struct PageRenderCache {
    ledger: LruLedger<usize>,
    rendered_in: HashMap<usize, u64>,
    generation: u64,
}

impl PageRenderCache {
    /// Default number of page entries.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Creates an empty cache holding at most `capacity` pages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            ledger: LruLedger::new(capacity),
            rendered_in: HashMap::new(),
            generation: 0,
        }
    }

    /// Records that page `index` is up to date as of the current generation.
    ///
    /// Returns the pages evicted to stay within capacity, least recently
    /// marked first. Their bitmaps may be released.
    pub fn mark_page_rendered(&mut self, index: usize) -> SmallVec<[usize; 4]> {
        self.rendered_in.insert(index, self.generation);
        self.ledger.record_access(index);
        let evicted = self.ledger.evict_if_needed();
        for page in &evicted {
            self.rendered_in.remove(page);
        }
        if !evicted.is_empty() {
            log::trace!("page cache evicted {:?}", evicted.as_slice());
        }
        evicted
    }

    /// Returns `true` if page `index` was drawn in the current generation.
    #[must_use]
    pub fn is_page_cached(&self, index: usize) -> bool {
        self.rendered_in.get(&index) == Some(&self.generation)
    }

    /// Returns `true` if page `index` has an entry, current or stale.
    #[must_use]
    pub fn has_entry(&self, index: usize) -> bool {
        self.ledger.contains(&index)
    }

    /// Makes every entry stale.
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Drops the entry for page `index`. Returns `true` if there was one.
    pub fn invalidate_page(&mut self, index: usize) -> bool {
        self.ledger.remove(&index);
        self.rendered_in.remove(&index).is_some()
    }

    /// Drops every entry, returning the pages that had one.
    pub fn clear(&mut self) -> Vec<usize> {
        let pages = self.rendered_in.keys().copied().collect();
        self.rendered_in.clear();
        self.ledger.clear();
        pages
    }

    /// The current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ledger.capacity()
    }

    /// Changes the capacity, returning the pages evicted to fit.
    pub fn set_capacity(&mut self, capacity: usize) -> SmallVec<[usize; 4]> {
        self.ledger.set_capacity(capacity);
        let evicted = self.ledger.evict_if_needed();
        for page in &evicted {
            self.rendered_in.remove(page);
        }
        evicted
    }

    /// Number of entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Pages valid in the current generation, most recently marked first.
    #[must_use]
    pub fn cached_pages(&self) -> Vec<usize> {
        self.ledger
            .iter_by_recency()
            .copied()
            .filter(|page| self.is_page_cached(*page))
            .collect()
    }
}

impl Default for PageRenderCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_keeps_most_recent() {
        let mut cache = PageRenderCache::new(10);
        for page in 0..10 {
            assert!(cache.mark_page_rendered(page).is_empty());
        }
        assert_eq!(cache.mark_page_rendered(10).as_slice(), &[0]);
        assert_eq!(cache.len(), 10);
        let mut pages = cache.cached_pages();
        pages.sort_unstable();
        assert_eq!(pages, (1..=10).collect::<Vec<_>>());
        assert!(!cache.is_page_cached(0));
    }

    #[test]
    fn generation_bump_invalidates_everything() {
        let mut cache = PageRenderCache::default();
        cache.mark_page_rendered(3);
        assert!(cache.is_page_cached(3));
        let before = cache.generation();
        cache.invalidate_all();
        assert_eq!(cache.generation(), before + 1);
        assert!(!cache.is_page_cached(3));
        assert!(cache.has_entry(3));
        // Stale entries still occupy their slot.
        assert_eq!(cache.len(), 1);
        assert!(cache.cached_pages().is_empty());

        cache.mark_page_rendered(3);
        assert!(cache.is_page_cached(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn single_page_invalidation() {
        let mut cache = PageRenderCache::default();
        cache.mark_page_rendered(1);
        cache.mark_page_rendered(2);
        assert!(cache.invalidate_page(1));
        assert!(!cache.invalidate_page(1));
        assert_eq!(cache.cached_pages(), [2]);
    }

    #[test]
    fn shrinking_releases_oldest() {
        let mut cache = PageRenderCache::new(4);
        for page in [5, 6, 7, 8] {
            cache.mark_page_rendered(page);
        }
        assert_eq!(cache.set_capacity(2).as_slice(), &[5, 6]);
        let mut cleared = cache.clear();
        cleared.sort_unstable();
        assert_eq!(cleared, [7, 8]);
        assert!(cache.is_empty());
    }
}
