// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized page positions.

use alloc::vec::Vec;

use crate::VisibleRange;

/// Vertical positions of a stack of pages separated by a uniform gap.
///
/// Page `i` occupies `[top(i), top(i) + height(i)]`, with
/// `top(0) = top_offset + gap` and `top(i + 1) = top(i) + height(i) + gap`.
/// The stack ends one gap below the last page.
///
/// Positions are computed once per change of heights, gap or offset; range
/// queries then binary-search them.
#[derive(Clone, Debug, Default)]
pub struct PageExtents {
    tops: Vec<f64>,
    bottoms: Vec<f64>,
    total_height: f64,
    valid: bool,
}

impl PageExtents {
    /// Builds extents for pages of the given heights.
    ///
    /// Non-finite or negative heights, gap or offset make the extents invalid:
    /// every range query on them is empty.
    #[must_use]
    pub fn new(heights: &[f64], page_gap: f64, top_offset: f64) -> Self {
        let valid = page_gap.is_finite()
            && page_gap >= 0.0
            && top_offset.is_finite()
            && top_offset >= 0.0
            && heights.iter().all(|h| h.is_finite() && *h >= 0.0);
        if !valid {
            return Self::default();
        }

        let mut tops = Vec::with_capacity(heights.len());
        let mut bottoms = Vec::with_capacity(heights.len());
        let mut y = top_offset + page_gap;
        for h in heights {
            tops.push(y);
            bottoms.push(y + h);
            y += h + page_gap;
        }
        Self {
            tops,
            bottoms,
            total_height: if heights.is_empty() { 0.0 } else { y },
            valid: true,
        }
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tops.len()
    }

    /// Returns `true` if there are no pages (or the input was invalid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }

    /// Returns `true` unless the input was rejected.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Top edge of page `index`.
    #[must_use]
    pub fn top(&self, index: usize) -> Option<f64> {
        self.tops.get(index).copied()
    }

    /// Bottom edge of page `index`.
    #[must_use]
    pub fn bottom(&self, index: usize) -> Option<f64> {
        self.bottoms.get(index).copied()
    }

    /// Total scrollable height, including the offset and every gap.
    ///
    /// Zero when there are no pages.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Pages intersecting `[scroll_top, scroll_top + container_height]`,
    /// widened by `buffer_pages` on each side.
    ///
    /// Intersection is boundary-inclusive: a page whose edge touches the
    /// window counts as visible. Degenerate input yields an empty range.
    #[must_use]
    pub fn range(&self, scroll_top: f64, container_height: f64, buffer_pages: usize) -> VisibleRange {
        if self.is_empty()
            || !scroll_top.is_finite()
            || !container_height.is_finite()
            || container_height <= 0.0
        {
            return VisibleRange::empty(self.total_height);
        }
        let window_bottom = scroll_top + container_height;
        let len = self.len();

        // First page whose bottom reaches the window top.
        let first = self.bottoms.partition_point(|bottom| *bottom < scroll_top);
        // One past the last page whose top is within the window.
        let last = self.tops.partition_point(|top| *top <= window_bottom);
        let visible = first..last.max(first);

        let start = visible.start.saturating_sub(buffer_pages);
        let end = visible.end.saturating_add(buffer_pages).min(len);
        let start = start.min(end);
        VisibleRange {
            start,
            end,
            visible,
            buffered: start..end,
            offset_top: self.top(start).unwrap_or(self.total_height),
            total_height: self.total_height,
        }
    }
}
