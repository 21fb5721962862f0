// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Size;

use crate::item::{CaretMarker, GlyphRun, RenderItem};

/// One page's fully laid-out content, in page-local (unzoomed) coordinates.
#[derive(Clone, Debug)]
pub struct PageRender {
    /// Index of the page within the document.
    pub page_index: usize,
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
    /// Drawable items in paint order.
    pub items: Vec<RenderItem>,
}

impl PageRender {
    /// Creates a page.
    #[must_use]
    pub fn new(page_index: usize, width: f64, height: f64, items: Vec<RenderItem>) -> Self {
        Self {
            page_index,
            width,
            height,
            items,
        }
    }

    /// Page size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Glyph runs on this page, with their index into [`PageRender::items`].
    pub fn glyph_runs(&self) -> impl Iterator<Item = (usize, &GlyphRun)> + '_ {
        self.items.iter().enumerate().filter_map(|(i, item)| match item {
            RenderItem::GlyphRun(run) => Some((i, run)),
            _ => None,
        })
    }

    /// The caret marker on this page, if the layout engine placed one here.
    #[must_use]
    pub fn caret(&self) -> Option<&CaretMarker> {
        self.items.iter().find_map(|item| match item {
            RenderItem::Caret(caret) => Some(caret),
            _ => None,
        })
    }
}

/// A full paginated snapshot of the document, replaced wholesale on every edit.
#[derive(Clone, Debug, Default)]
pub struct RenderModel {
    pages: Vec<PageRender>,
}

impl RenderModel {
    /// Creates a model from its pages, in document order.
    #[must_use]
    pub fn new(pages: Vec<PageRender>) -> Self {
        Self { pages }
    }

    /// All pages.
    #[must_use]
    pub fn pages(&self) -> &[PageRender] {
        &self.pages
    }

    /// The page at `index`.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&PageRender> {
        self.pages.get(index)
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if the model has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Unzoomed page heights in document order.
    #[must_use]
    pub fn page_heights(&self) -> Vec<f64> {
        self.pages.iter().map(|p| p.height).collect()
    }

    /// The first caret marker in the document, with the index of its page.
    #[must_use]
    pub fn caret(&self) -> Option<(usize, &CaretMarker)> {
        self.pages
            .iter()
            .enumerate()
            .find_map(|(i, page)| page.caret().map(|c| (i, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilledRect, FontSpec, TextPosition};
    use alloc::vec;
    use kurbo::{Point, Rect};
    use peniko::Color;

    fn caret(offset: usize) -> RenderItem {
        RenderItem::Caret(CaretMarker {
            x: 10.0,
            top: 20.0,
            height: 16.0,
            position: TextPosition::new(0, offset),
            line: None,
        })
    }

    #[test]
    fn glyph_runs_keep_item_indices() {
        let page = PageRender::new(
            0,
            100.0,
            200.0,
            vec![
                RenderItem::Rect(FilledRect {
                    rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                    fill: Color::WHITE,
                    stroke: None,
                }),
                RenderItem::GlyphRun(GlyphRun::new("a", Point::ZERO, FontSpec::default())),
                caret(0),
                RenderItem::GlyphRun(GlyphRun::new("b", Point::ZERO, FontSpec::default())),
            ],
        );
        let indices: Vec<usize> = page.glyph_runs().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(page.caret().map(|c| c.position.offset), Some(0));
    }

    #[test]
    fn model_caret_reports_its_page() {
        let model = RenderModel::new(vec![
            PageRender::new(0, 10.0, 30.0, vec![]),
            PageRender::new(1, 10.0, 40.0, vec![caret(4)]),
        ]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.page_heights(), vec![30.0, 40.0]);
        let (page, marker) = model.caret().unwrap();
        assert_eq!(page, 1);
        assert_eq!(marker.position, TextPosition::new(0, 4));
        assert!(RenderModel::default().caret().is_none());
    }
}
