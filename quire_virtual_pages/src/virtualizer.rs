// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use crate::{PageExtents, VisibleRange};

/// Controller that memoizes page positions and the latest visible range.
///
/// Page heights, gap and top offset change rarely (on a new model, a zoom or a
/// ruler toggle); scroll position changes every tick. The virtualizer rebuilds
/// its [`PageExtents`] only on the former and answers scroll queries in
/// `O(log n)`.
#[derive(Clone, Debug)]
pub struct PageVirtualizer {
    heights: Vec<f64>,
    page_gap: f64,
    top_offset: f64,
    buffer_pages: usize,
    extents: PageExtents,
    last: VisibleRange,
}

impl PageVirtualizer {
    /// Creates a virtualizer with no pages.
    #[must_use]
    pub fn new(buffer_pages: usize) -> Self {
        Self {
            heights: Vec::new(),
            page_gap: 0.0,
            top_offset: 0.0,
            buffer_pages,
            extents: PageExtents::default(),
            last: VisibleRange::default(),
        }
    }

    /// Replaces the page heights and gap.
    pub fn set_pages(&mut self, heights: &[f64], page_gap: f64) {
        self.heights.clear();
        self.heights.extend_from_slice(heights);
        self.page_gap = page_gap;
        self.rebuild();
    }

    /// Sets the space reserved above the first page.
    pub fn set_top_offset(&mut self, top_offset: f64) {
        if self.top_offset != top_offset {
            self.top_offset = top_offset;
            self.rebuild();
        }
    }

    /// Sets how many pages beyond the visible ones are kept drawn on each side.
    pub fn set_buffer_pages(&mut self, buffer_pages: usize) {
        self.buffer_pages = buffer_pages;
    }

    /// Buffer size in pages.
    #[must_use]
    pub fn buffer_pages(&self) -> usize {
        self.buffer_pages
    }

    /// Memoized page positions.
    #[must_use]
    pub fn extents(&self) -> &PageExtents {
        &self.extents
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.extents.len()
    }

    /// Computes and remembers the range for a scroll position.
    pub fn visible_range(&mut self, scroll_top: f64, container_height: f64) -> &VisibleRange {
        self.last = self
            .extents
            .range(scroll_top, container_height, self.buffer_pages);
        &self.last
    }

    /// The most recently computed range.
    #[must_use]
    pub fn last_range(&self) -> &VisibleRange {
        &self.last
    }

    /// Returns `true` if page `index` is in the most recent buffered range.
    #[must_use]
    pub fn should_render_page(&self, index: usize) -> bool {
        self.last.should_render(index)
    }

    /// Indices of the most recently visible pages.
    #[must_use]
    pub fn visible_indices(&self) -> Range<usize> {
        self.last.visible.clone()
    }

    /// Indices of the most recently buffered pages.
    #[must_use]
    pub fn buffered_indices(&self) -> Range<usize> {
        self.last.buffered.clone()
    }

    fn rebuild(&mut self) {
        self.extents = PageExtents::new(&self.heights, self.page_gap, self.top_offset);
        // The last range refers to the old positions.
        self.last = VisibleRange::empty(self.extents.total_height());
    }
}

impl Default for PageVirtualizer {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_last_range() {
        let mut v = PageVirtualizer::new(1);
        v.set_pages(&[100.0; 10], 10.0);
        let range = v.visible_range(230.0, 100.0).clone();
        // Pages at 10+110*i: page 2 [230, 330], page 3 starts at 340.
        assert_eq!(range.visible, 2..3);
        assert_eq!(v.buffered_indices(), 1..4);
        assert!(v.should_render_page(3));
        assert!(!v.should_render_page(4));
    }

    #[test]
    fn rebuild_forgets_stale_range() {
        let mut v = PageVirtualizer::new(0);
        v.set_pages(&[100.0, 100.0], 0.0);
        let _ = v.visible_range(0.0, 50.0);
        assert!(v.should_render_page(0));
        v.set_top_offset(24.0);
        assert!(!v.should_render_page(0));
        assert_eq!(v.extents().top(0), Some(24.0));
    }
}
