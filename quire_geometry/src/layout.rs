// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use quire_scene::RenderModel;

/// A page's position in document space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageLayout {
    /// Index of the page in the render model.
    pub page_index: usize,
    /// Left edge in document units.
    pub x: f64,
    /// Top edge in document units.
    pub y: f64,
    /// Page width in document units.
    pub width: f64,
    /// Page height in document units.
    pub height: f64,
}

impl PageLayout {
    /// The page rectangle in document space.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns `true` if `pt` lies inside the page, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x
            && pt.x <= self.x + self.width
            && pt.y >= self.y
            && pt.y <= self.y + self.height
    }

    /// Vertical distance from `y` to the page's vertical band, zero inside it.
    #[must_use]
    pub fn vertical_distance(&self, y: f64) -> f64 {
        if y < self.y {
            self.y - y
        } else if y > self.y + self.height {
            y - (self.y + self.height)
        } else {
            0.0
        }
    }
}

/// Inputs to [`layout_pages`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Gap above each page and below the last one, in document units.
    pub page_gap: f64,
    /// Container width in screen pixels, used for centring.
    pub container_width: f64,
    /// Zoom factor, used to convert the container width to document units.
    pub zoom: f64,
    /// Space reserved above the first page (e.g. a ruler), in document units.
    pub top_offset: f64,
    /// Horizontal offset from the centred position, in document units.
    ///
    /// Pages are still kept at least `page_gap` from the left edge.
    pub shift_x: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            page_gap: 20.0,
            container_width: 0.0,
            zoom: 1.0,
            top_offset: 0.0,
            shift_x: 0.0,
        }
    }
}

/// Positions every page of `model` in document space.
///
/// Pages are stacked vertically with one `page_gap` above each page, shifted
/// down by `top_offset`, and centred horizontally in the container (moved by
/// `shift_x`) but never closer than `page_gap` to its left edge.
#[must_use]
pub fn layout_pages(model: &RenderModel, params: &LayoutParams) -> Vec<PageLayout> {
    let zoom = if params.zoom > 0.0 { params.zoom } else { 1.0 };
    let available = params.container_width / zoom;
    let mut y = params.top_offset + params.page_gap;
    model
        .pages()
        .iter()
        .enumerate()
        .map(|(page_index, page)| {
            let centred = ((available - page.width) * 0.5).max(params.page_gap);
            let x = (centred + params.shift_x).max(params.page_gap);
            let layout = PageLayout {
                page_index,
                x,
                y,
                width: page.width,
                height: page.height,
            };
            y += page.height + params.page_gap;
            layout
        })
        .collect()
}

/// Scrollable document size in document units, including the trailing gap.
#[must_use]
pub fn document_extent(layouts: &[PageLayout], page_gap: f64) -> Size {
    let Some(last) = layouts.last() else {
        return Size::ZERO;
    };
    let right = layouts
        .iter()
        .map(|l| l.x + l.width)
        .fold(0.0_f64, f64::max);
    Size::new(right + page_gap, last.y + last.height + page_gap)
}

/// How [`page_at_point`] treats points that fall between pages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PageSearch {
    /// Only a page containing the point matches.
    #[default]
    Exact,
    /// The vertically nearest page matches; ties go to the earlier page.
    Nearest,
}

/// Finds the layout under a document-space point.
///
/// `layouts` must be ordered by `y`, as [`layout_pages`] produces them.
#[must_use]
pub fn page_at_point(layouts: &[PageLayout], pt: Point, search: PageSearch) -> Option<&PageLayout> {
    if layouts.is_empty() || !pt.is_finite() {
        return None;
    }
    // First page whose bottom edge is at or below the point.
    let idx = layouts.partition_point(|l| l.y + l.height < pt.y);
    match search {
        PageSearch::Exact => layouts.get(idx).filter(|l| l.contains(pt)),
        PageSearch::Nearest => {
            let below = layouts.get(idx);
            let above = idx.checked_sub(1).and_then(|i| layouts.get(i));
            match (above, below) {
                (Some(a), Some(b)) => {
                    if a.vertical_distance(pt.y) <= b.vertical_distance(pt.y) {
                        Some(a)
                    } else {
                        Some(b)
                    }
                }
                (a, b) => a.or(b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use quire_scene::PageRender;

    fn model(heights: &[f64]) -> RenderModel {
        RenderModel::new(
            heights
                .iter()
                .enumerate()
                .map(|(i, h)| PageRender::new(i, 600.0, *h, vec![]))
                .collect(),
        )
    }

    #[test]
    fn pages_stack_with_gaps() {
        let params = LayoutParams {
            page_gap: 20.0,
            container_width: 1000.0,
            zoom: 1.0,
            top_offset: 24.0,
            shift_x: 0.0,
        };
        let layouts = layout_pages(&model(&[100.0, 200.0, 50.0]), &params);
        let ys: Vec<f64> = layouts.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![44.0, 164.0, 384.0]);
        assert!(layouts.iter().all(|l| l.x == 200.0));
        assert_eq!(
            document_extent(&layouts, 20.0),
            Size::new(820.0, 454.0)
        );
    }

    #[test]
    fn narrow_container_keeps_left_gap() {
        let params = LayoutParams {
            container_width: 300.0,
            zoom: 2.0,
            ..LayoutParams::default()
        };
        let layouts = layout_pages(&model(&[100.0]), &params);
        assert_eq!(layouts[0].x, 20.0);
    }

    #[test]
    fn shift_moves_pages_but_not_past_the_left_gap() {
        let shifted = |shift_x| {
            let params = LayoutParams {
                container_width: 1000.0,
                shift_x,
                ..LayoutParams::default()
            };
            layout_pages(&model(&[100.0]), &params)[0].x
        };
        assert_eq!(shifted(0.0), 200.0);
        assert_eq!(shifted(35.0), 235.0);
        assert_eq!(shifted(-150.0), 50.0);
        assert_eq!(shifted(-500.0), 20.0);
    }

    #[test]
    fn empty_model_has_no_extent() {
        let layouts = layout_pages(&RenderModel::default(), &LayoutParams::default());
        assert!(layouts.is_empty());
        assert_eq!(document_extent(&layouts, 20.0), Size::ZERO);
        assert!(page_at_point(&layouts, Point::ZERO, PageSearch::Nearest).is_none());
    }

    #[test]
    fn page_lookup_exact_and_nearest() {
        let params = LayoutParams {
            container_width: 640.0,
            ..LayoutParams::default()
        };
        // Pages at y = 20..120, 140..240, 260..360.
        let layouts = layout_pages(&model(&[100.0, 100.0, 100.0]), &params);
        let x = 100.0;

        let hit = page_at_point(&layouts, Point::new(x, 140.0), PageSearch::Exact);
        assert_eq!(hit.map(|l| l.page_index), Some(1));
        // Bottom edge is inclusive.
        let edge = page_at_point(&layouts, Point::new(x, 120.0), PageSearch::Exact);
        assert_eq!(edge.map(|l| l.page_index), Some(0));

        assert!(page_at_point(&layouts, Point::new(x, 130.0), PageSearch::Exact).is_none());
        let near = page_at_point(&layouts, Point::new(x, 125.0), PageSearch::Nearest);
        assert_eq!(near.map(|l| l.page_index), Some(0));
        let near = page_at_point(&layouts, Point::new(x, 136.0), PageSearch::Nearest);
        assert_eq!(near.map(|l| l.page_index), Some(1));
        let below = page_at_point(&layouts, Point::new(x, 9000.0), PageSearch::Nearest);
        assert_eq!(below.map(|l| l.page_index), Some(2));
        let above = page_at_point(&layouts, Point::new(x, -5.0), PageSearch::Nearest);
        assert_eq!(above.map(|l| l.page_index), Some(0));
    }
}
