// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulated dirty pages.

use core::ops::Range;

use hashbrown::HashSet;
use smallvec::SmallVec;

/// Pages whose bitmaps must be redrawn, or a flag meaning "all of them".
///
/// Marks are idempotent: marking a page twice before a render tick is the
/// same as marking it once. A generation counter increments on every
/// mutation that changes the set.
#[derive(Clone, Debug, Default)]
pub struct DirtyPages {
    global: bool,
    pages: HashSet<usize>,
    generation: u64,
}

impl DirtyPages {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks page `index`. Returns `true` if it was not already dirty.
    pub fn mark(&mut self, index: usize) -> bool {
        let inserted = self.pages.insert(index);
        if inserted {
            self.generation = self.generation.wrapping_add(1);
        }
        inserted
    }

    /// Marks several pages.
    pub fn mark_many(&mut self, indices: impl IntoIterator<Item = usize>) {
        for index in indices {
            self.mark(index);
        }
    }

    /// Marks every page.
    pub fn mark_all(&mut self) {
        if !self.global {
            self.global = true;
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Returns `true` if page `index` must be redrawn.
    #[must_use]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.global || self.pages.contains(&index)
    }

    /// Returns `true` if the global flag is set.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Returns `true` if nothing is dirty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.global && self.pages.is_empty()
    }

    /// Number of individually marked pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Generation counter, bumped on every change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clears page `index` after it was drawn. Returns `true` if it was marked.
    pub fn clear(&mut self, index: usize) -> bool {
        let removed = self.pages.remove(&index);
        if removed {
            self.generation = self.generation.wrapping_add(1);
        }
        removed
    }

    /// Replaces the global flag by individual marks for the pages in `range`.
    pub fn expand_global(&mut self, range: Range<usize>) {
        if self.global {
            self.global = false;
            self.pages.extend(range);
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Removes and returns the marked pages outside `range`.
    pub fn take_outside(&mut self, range: &Range<usize>) -> SmallVec<[usize; 8]> {
        let outside: SmallVec<[usize; 8]> = self
            .pages
            .iter()
            .copied()
            .filter(|page| !range.contains(page))
            .collect();
        for page in &outside {
            self.pages.remove(page);
        }
        if !outside.is_empty() {
            self.generation = self.generation.wrapping_add(1);
        }
        outside
    }

    /// Clears everything.
    pub fn clear_all(&mut self) {
        if !self.is_empty() {
            self.generation = self.generation.wrapping_add(1);
        }
        self.global = false;
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_idempotent() {
        let mut once = DirtyPages::new();
        once.mark(4);
        let mut twice = DirtyPages::new();
        assert!(twice.mark(4));
        assert!(!twice.mark(4));
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.generation(), twice.generation());
        assert!(twice.is_dirty(4));
        assert!(!twice.is_dirty(5));
    }

    #[test]
    fn global_covers_everything_until_expanded() {
        let mut dirty = DirtyPages::new();
        dirty.mark_all();
        assert!(dirty.is_dirty(999));
        dirty.expand_global(2..5);
        assert!(!dirty.is_global());
        assert!(dirty.is_dirty(3));
        assert!(!dirty.is_dirty(999));
        assert_eq!(dirty.len(), 3);
    }

    #[test]
    fn take_outside_keeps_in_range_pages() {
        let mut dirty = DirtyPages::new();
        dirty.mark_many([1, 5, 6, 20]);
        let mut outside = dirty.take_outside(&(4..8)).into_vec();
        outside.sort_unstable();
        assert_eq!(outside, [1, 20]);
        assert!(dirty.is_dirty(5) && dirty.is_dirty(6));
        assert!(dirty.clear(5));
        assert!(!dirty.clear(5));
        dirty.clear_all();
        assert!(dirty.is_empty());
    }
}
