// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::PageExtents;

/// Result of a visibility query.
///
/// `start..end` is the buffered range: the pages that should be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRange {
    /// First page to draw.
    pub start: usize,
    /// One past the last page to draw.
    pub end: usize,
    /// Pages intersecting the viewport window.
    pub visible: Range<usize>,
    /// `visible` widened by the buffer on each side, clamped to the page count.
    pub buffered: Range<usize>,
    /// Top edge of page `start` (or the total height when there is no such page).
    pub offset_top: f64,
    /// Total scrollable height.
    pub total_height: f64,
}

impl VisibleRange {
    /// A range that draws nothing.
    #[must_use]
    pub fn empty(total_height: f64) -> Self {
        Self {
            start: 0,
            end: 0,
            visible: 0..0,
            buffered: 0..0,
            offset_top: 0.0,
            total_height,
        }
    }

    /// Returns `true` if no page should be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if page `index` is in the buffered range.
    #[must_use]
    pub fn should_render(&self, index: usize) -> bool {
        self.buffered.contains(&index)
    }

    /// Returns `true` if page `index` intersects the viewport window.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }
}

impl Default for VisibleRange {
    fn default() -> Self {
        Self::empty(0.0)
    }
}

/// Computes the visible and buffered page ranges in one shot.
///
/// All values are in the same unit (document units). Pages are stacked with
/// `page_gap` above each page, starting at zero. Use [`crate::PageVirtualizer`]
/// to memoize the page positions across scroll ticks.
///
/// ```rust
/// use quire_virtual_pages::compute_visible_range;
///
/// let heights = vec![1000.0; 50];
/// let scroll_top = 20.0 + 10.0 * 1020.0; // top of page 10
/// let range = compute_visible_range(&heights, 3000.0, scroll_top, 2, 20.0);
/// assert_eq!(range.visible, 10..13);
/// assert_eq!(range.buffered, 8..15);
/// ```
#[must_use]
pub fn compute_visible_range(
    page_heights: &[f64],
    container_height: f64,
    scroll_top: f64,
    buffer_pages: usize,
    page_gap: f64,
) -> VisibleRange {
    PageExtents::new(page_heights, page_gap, 0.0).range(scroll_top, container_height, buffer_pages)
}
