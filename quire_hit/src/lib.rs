// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Hit: maps between screen points and document positions.
//!
//! Screen to document:
//! - [`hit_test_click`] finds the page under a screen point, then the glyph
//!   run on the clicked line, then the closest measured character boundary.
//! - [`hit_test_hyperlink`] considers only runs carrying a hyperlink and
//!   matches against their measured text box.
//!
//! Document to screen:
//! - [`caret_rect_for`] gives the zero-width line-height rectangle where a
//!   caret at a position is drawn.
//! - [`range_rects`] gives one rectangle per run slice covered by a range,
//!   for selection highlights.
//!
//! Both directions measure with the run's canonical font string and go
//! through [`quire_geometry::page_to_screen`] and its inverse, so hit testing
//! the centre of [`caret_rect_for`]`(p)` gives back `p`.
//!
//! Misses are `None` (or an empty list), never errors. These functions run
//! on every pointer move.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use quire_geometry::{layout_pages, LayoutParams, Viewport};
//! use quire_hit::{caret_rect_for, hit_test_click, HitParams};
//! use quire_scene::{FontSpec, GlyphRun, PageRender, RenderItem, RenderModel, TextPosition, TextSource};
//! use quire_surface::RecordingSurface;
//!
//! let run = GlyphRun::new("Hello world", Point::new(72.0, 100.0), FontSpec::new("Inter", 16.0))
//!     .with_source(TextSource::new(0, 0, "Hello world"))
//!     .with_line_height(20.0);
//! let model = RenderModel::new(vec![PageRender::new(0, 600.0, 800.0, vec![RenderItem::GlyphRun(run)])]);
//! let viewport = Viewport::new(Size::new(800.0, 600.0));
//! let layouts = layout_pages(&model, &LayoutParams { container_width: 800.0, ..LayoutParams::default() });
//! let measure = RecordingSurface::new(9.0);
//!
//! let caret = caret_rect_for(&model, &layouts, &viewport, &measure, TextPosition::new(0, 4)).unwrap();
//! let hit = hit_test_click(&model, &layouts, &viewport, &measure, caret.center(), &HitParams::default()).unwrap();
//! assert_eq!(hit.position, TextPosition::new(0, 4));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod page;
mod text;

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use quire_geometry::{PageLayout, PageSearch, Viewport, page_at_point, page_to_screen, screen_to_page};
use quire_scene::{GlyphRun, Hyperlink, RenderModel, TextPosition};
use quire_surface::TextMeasure;

pub use page::{PageHit, hit_test_page};
pub use text::{char_x, closest_char_boundary, prefix_x, run_width};

/// Tuning for hit testing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitParams {
    /// Line height assumed for runs that carry none, when looking for the
    /// nearest line under an empty-line click.
    pub fallback_line_height: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fallback_line_height: 20.0,
        }
    }
}

/// A click resolved to a document position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HitResult {
    /// Page under the click.
    pub page_index: usize,
    /// Document position.
    pub position: TextPosition,
    /// Index into the page's items of the glyph run hit, if one was.
    pub run: Option<usize>,
}

/// A hyperlink under a point.
#[derive(Clone, Debug, PartialEq)]
pub struct HyperlinkHit {
    /// Page holding the link.
    pub page_index: usize,
    /// The link.
    pub hyperlink: Hyperlink,
    /// Measured text box of the run, in screen pixels.
    pub rect: Rect,
}

/// Layout and page content under a screen point.
fn page_under<'a>(
    model: &'a RenderModel,
    layouts: &'a [PageLayout],
    viewport: &Viewport,
    screen_pt: Point,
) -> Option<(&'a PageLayout, &'a quire_scene::PageRender, Point)> {
    let doc = viewport.screen_to_document(screen_pt);
    let layout = page_at_point(layouts, doc, PageSearch::Exact)?;
    let page = model.page(layout.page_index)?;
    Some((layout, page, screen_to_page(layout, viewport, screen_pt)))
}

/// Resolves a screen point to a document position.
///
/// Returns `None` if the point is not over a page, or the page has no text.
#[must_use]
pub fn hit_test_click<M: TextMeasure + ?Sized>(
    model: &RenderModel,
    layouts: &[PageLayout],
    viewport: &Viewport,
    measure: &M,
    screen_pt: Point,
    params: &HitParams,
) -> Option<HitResult> {
    let (layout, page, local) = page_under(model, layouts, viewport, screen_pt)?;
    let hit = hit_test_page(page, local, measure, params)?;
    Some(HitResult {
        page_index: layout.page_index,
        position: hit.position,
        run: hit.run,
    })
}

/// Finds the hyperlink whose measured text box contains a screen point.
///
/// The box is the tight text box, not the line box, so points in the line
/// spacing around a link do not activate it.
#[must_use]
pub fn hit_test_hyperlink<M: TextMeasure + ?Sized>(
    model: &RenderModel,
    layouts: &[PageLayout],
    viewport: &Viewport,
    measure: &M,
    screen_pt: Point,
) -> Option<HyperlinkHit> {
    let (layout, page, local) = page_under(model, layouts, viewport, screen_pt)?;
    page.glyph_runs().find_map(|(_, run)| {
        let hyperlink = run.hyperlink.as_ref()?;
        let rect = run.text_box(run_width(run, measure));
        let inside = local.x >= rect.x0
            && local.x <= rect.x1
            && local.y >= rect.y0
            && local.y <= rect.y1;
        inside.then(|| HyperlinkHit {
            page_index: layout.page_index,
            hyperlink: hyperlink.clone(),
            rect: page_to_screen(layout, viewport).transform_rect_bbox(rect),
        })
    })
}

/// Screen rectangle of a caret standing at `position`.
///
/// The rectangle is zero-width at the measured boundary and spans the run's
/// line box. At a boundary shared by two runs the later run is used.
#[must_use]
pub fn caret_rect_for<M: TextMeasure + ?Sized>(
    model: &RenderModel,
    layouts: &[PageLayout],
    viewport: &Viewport,
    measure: &M,
    position: TextPosition,
) -> Option<Rect> {
    let (layout, run) = run_for(model, layouts, position)?;
    let index = position.offset - run.source.as_ref()?.offset;
    let x = char_x(run, index, measure);
    let line = run.line_box(0.0);
    let local = Rect::new(x, line.y0, x, line.y1);
    Some(page_to_screen(layout, viewport).transform_rect_bbox(local))
}

/// Screen rectangles covering the document range between `start` and `end`.
///
/// One rectangle per run slice inside the range, in page then item order.
/// The ends may be given in either order; an empty range gives no
/// rectangles.
#[must_use]
pub fn range_rects<M: TextMeasure + ?Sized>(
    model: &RenderModel,
    layouts: &[PageLayout],
    viewport: &Viewport,
    measure: &M,
    start: TextPosition,
    end: TextPosition,
) -> Vec<Rect> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let mut rects = Vec::new();
    if start == end {
        return rects;
    }
    for layout in layouts {
        let Some(page) = model.page(layout.page_index) else {
            continue;
        };
        let transform = page_to_screen(layout, viewport);
        for (_, run) in page.glyph_runs() {
            let Some(source) = &run.source else {
                continue;
            };
            let run_start = TextPosition::new(source.paragraph, source.offset);
            let run_end = TextPosition::new(source.paragraph, source.offset + run.char_len());
            let lo = start.max(run_start);
            let hi = end.min(run_end);
            if lo >= hi {
                continue;
            }
            let line = run.line_box(0.0);
            let x0 = char_x(run, lo.offset - source.offset, measure);
            let x1 = char_x(run, hi.offset - source.offset, measure);
            rects.push(transform.transform_rect_bbox(Rect::new(x0, line.y0, x1, line.y1)));
        }
    }
    rects
}

/// The run a caret at `position` belongs to, with its page layout.
fn run_for<'a>(
    model: &'a RenderModel,
    layouts: &'a [PageLayout],
    position: TextPosition,
) -> Option<(&'a PageLayout, &'a GlyphRun)> {
    let mut at_end = None;
    for layout in layouts {
        let Some(page) = model.page(layout.page_index) else {
            continue;
        };
        for (_, run) in page.glyph_runs() {
            if !run.contains_position(position) {
                continue;
            }
            let ends_here = run
                .source
                .as_ref()
                .is_some_and(|s| s.offset + run.char_len() == position.offset);
            if !ends_here {
                return Some((layout, run));
            }
            at_end.get_or_insert((layout, run));
        }
    }
    at_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{Size, Vec2};
    use quire_geometry::{LayoutParams, layout_pages};
    use quire_scene::{FontSpec, PageRender, RenderItem, TextSource};
    use quire_surface::RecordingSurface;

    fn model() -> RenderModel {
        let link = GlyphRun::new("docs", Point::new(100.0, 60.0), FontSpec::new("Inter", 10.0))
            .with_source(TextSource::new(1, 0, "docs"))
            .with_hyperlink(Hyperlink::url("https://example.com/docs"))
            .with_line_height(16.0);
        let text = GlyphRun::new("plain", Point::new(100.0, 40.0), FontSpec::new("Inter", 10.0))
            .with_source(TextSource::new(0, 0, "plain"))
            .with_line_height(16.0);
        RenderModel::new(vec![
            PageRender::new(0, 300.0, 200.0, vec![RenderItem::GlyphRun(text)]),
            PageRender::new(1, 300.0, 200.0, vec![RenderItem::GlyphRun(link)]),
        ])
    }

    fn layouts(model: &RenderModel) -> Vec<PageLayout> {
        layout_pages(
            model,
            &LayoutParams {
                container_width: 340.0,
                ..LayoutParams::default()
            },
        )
    }

    #[test]
    fn click_on_second_page_with_scroll_and_zoom() {
        let model = model();
        let layouts = layouts(&model);
        let mut viewport = Viewport::new(Size::new(400.0, 300.0));
        viewport.set_zoom(2.0);
        viewport.set_scroll(Vec2::new(10.0, 300.0));
        let m = RecordingSurface::new(10.0);

        // Page 1 sits at (20, 240) in document space; "docs" starts at x 120.
        let doc = Point::new(20.0 + 100.0 + 21.0, 240.0 + 58.0);
        let screen = viewport.document_to_screen(doc);
        let hit = hit_test_click(&model, &layouts, &viewport, &m, screen, &HitParams::default())
            .unwrap();
        assert_eq!(hit.page_index, 1);
        assert_eq!(hit.position, TextPosition::new(1, 2));
        assert_eq!(hit.run, Some(0));
    }

    #[test]
    fn gaps_between_pages_miss() {
        let model = model();
        let layouts = layouts(&model);
        let viewport = Viewport::new(Size::new(400.0, 300.0));
        let m = RecordingSurface::new(10.0);
        let gap = Point::new(100.0, 230.0);
        assert!(hit_test_click(&model, &layouts, &viewport, &m, gap, &HitParams::default()).is_none());
        let empty = RenderModel::default();
        assert!(hit_test_click(&empty, &[], &viewport, &m, gap, &HitParams::default()).is_none());
    }

    #[test]
    fn hyperlinks_use_the_tight_text_box() {
        let model = model();
        let layouts = layouts(&model);
        let viewport = Viewport::new(Size::new(400.0, 600.0));
        let m = RecordingSurface::new(10.0);
        // Text box of "docs" on page 1: x [120, 160], y [240 + 52, 240 + 62].
        let hit = hit_test_hyperlink(&model, &layouts, &viewport, &m, Point::new(130.0, 295.0))
            .unwrap();
        assert_eq!(hit.page_index, 1);
        assert_eq!(hit.rect, Rect::new(120.0, 292.0, 160.0, 302.0));
        // Inside the line box but above the text box.
        assert!(hit_test_hyperlink(&model, &layouts, &viewport, &m, Point::new(130.0, 290.0)).is_none());
        // Plain text is not a link.
        assert!(hit_test_hyperlink(&model, &layouts, &viewport, &m, Point::new(130.0, 55.0)).is_none());
    }

    #[test]
    fn caret_and_range_geometry() {
        let model = model();
        let layouts = layouts(&model);
        let viewport = Viewport::new(Size::new(400.0, 600.0));
        let m = RecordingSurface::new(10.0);
        let caret = caret_rect_for(&model, &layouts, &viewport, &m, TextPosition::new(0, 3)).unwrap();
        // "plain" on page 0 starts at x 120; line box [29, 45] below y 20.
        assert_eq!(caret, Rect::new(150.0, 49.0, 150.0, 65.0));
        assert!(caret_rect_for(&model, &layouts, &viewport, &m, TextPosition::new(0, 9)).is_none());

        let rects = range_rects(
            &model,
            &layouts,
            &viewport,
            &m,
            TextPosition::new(1, 2),
            TextPosition::new(0, 1),
        );
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].x0, 130.0);
        assert_eq!(rects[0].x1, 170.0);
        assert_eq!(rects[1].x1, 140.0);
        assert!(range_rects(&model, &layouts, &viewport, &m, TextPosition::new(0, 1), TextPosition::new(0, 1)).is_empty());
    }
}
