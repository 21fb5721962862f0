// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The caret and composition overlay pass.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use kurbo::{Line, Point, Rect};
use peniko::Color;
use quire_geometry::{PageLayout, Viewport, overlay_size, page_to_canvas, page_to_screen};
use quire_hit::prefix_x;
use quire_scene::{CaretMarker, FontSpec, PageRender, RenderModel};
use quire_surface::{DrawOp, StateOp, Surface, TextMeasure};

use crate::CompositionState;

/// Look of the overlay. Widths are in screen pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Caret bar width.
    pub caret_width: f64,
    /// Caret bar color.
    pub caret_color: Color,
    /// Thickness of the line under composition text.
    pub composition_underline: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            caret_width: 1.5,
            caret_color: Color::BLACK,
            composition_underline: 1.0,
        }
    }
}

/// What one overlay pass drew, in screen pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OverlayFrame {
    /// The overlay layer was redrawn.
    pub drawn: bool,
    /// Caret bar, if drawn.
    pub caret: Option<Rect>,
    /// Composition text box, if drawn. Hosts place the input method's
    /// candidate window next to it.
    pub composition: Option<Rect>,
}

/// Page-local caret x.
///
/// With line metadata the x is measured from the line text, using the same
/// prefix measurement as hit testing; otherwise the layout engine's x is
/// used as is.
#[must_use]
pub fn caret_x<M: TextMeasure + ?Sized>(marker: &CaretMarker, measure: &M) -> f64 {
    match &marker.line {
        Some(line) => prefix_x(line.start_x, &line.text, line.char_index, &line.font, measure),
        None => marker.x,
    }
}

/// Draws the caret and composition preview into the overlay layer.
///
/// The overlay is cleared and redrawn on every pass, so a hidden blink phase
/// simply draws nothing. Page bitmaps are never touched.
#[derive(Clone, Debug, Default)]
pub struct CaretOverlay {
    style: OverlayStyle,
}

impl CaretOverlay {
    /// Creates an overlay painter.
    #[must_use]
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// The current style.
    #[must_use]
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Replaces the style.
    pub fn set_style(&mut self, style: OverlayStyle) {
        self.style = style;
    }

    /// Runs the caret pass, then the composition pass.
    ///
    /// During composition the preview text is drawn at the caret, underlined,
    /// in the font of the glyph run on the caret's line, and the caret moves
    /// to the end of the preview. An unavailable surface draws nothing; a
    /// composition with no caret in the model is logged.
    pub fn paint<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        model: Option<&RenderModel>,
        layouts: &[PageLayout],
        viewport: &Viewport,
        caret_visible: bool,
        composition: &CompositionState,
    ) -> OverlayFrame {
        if let Err(err) = surface.begin_overlay(overlay_size(viewport)) {
            log::debug!("overlay skipped: {err}");
            return OverlayFrame::default();
        }
        let mut frame = OverlayFrame {
            drawn: true,
            ..OverlayFrame::default()
        };

        let Some((page_index, marker)) = model.and_then(RenderModel::caret) else {
            if composition.is_composing() {
                log::warn!("composition is active but the render model has no caret");
            }
            surface.end_overlay();
            return frame;
        };
        let Some(layout) = layouts.iter().find(|l| l.page_index == page_index) else {
            log::warn!("caret is on page {page_index}, which has no layout");
            surface.end_overlay();
            return frame;
        };
        let page = model.and_then(|m| m.page(page_index));

        let zoom = viewport.zoom();
        let to_screen = page_to_screen(layout, viewport);
        surface.state(StateOp::SetTransform(page_to_canvas(layout, viewport)));

        let mut x = caret_x(marker, &*surface);
        let preview = composition
            .text()
            .filter(|text| !text.is_empty())
            .map(|text| {
                let (font, baseline, color) = self.composition_font(page, marker);
                let width = surface.measure_text(text, &font.font_string());
                (text, font, baseline, color, width)
            });
        let preview_x = x;
        if let Some((_, _, _, _, width)) = &preview {
            x += width;
        }

        if caret_visible {
            let half = self.style.caret_width / zoom * 0.5;
            let bar = Rect::new(x - half, marker.top, x + half, marker.top + marker.height);
            surface.draw(DrawOp::FillRect {
                rect: bar,
                color: self.style.caret_color,
            });
            frame.caret = Some(to_screen.transform_rect_bbox(bar));
        }

        if let Some((text, font, baseline, color, width)) = preview {
            surface.draw(DrawOp::Text {
                text: text.into(),
                origin: Point::new(preview_x, baseline),
                font: font.font_string(),
                color,
            });
            let y = baseline + font.descent() * 0.5;
            surface.draw(DrawOp::Line {
                line: Line::new((preview_x, y), (preview_x + width, y)),
                color,
                width: self.style.composition_underline / zoom,
                dash: None,
            });
            let text_box = Rect::new(
                preview_x,
                baseline - font.ascent(),
                preview_x + width,
                baseline + font.descent(),
            );
            frame.composition = Some(to_screen.transform_rect_bbox(text_box));
        }

        surface.end_overlay();
        frame
    }

    /// Font, baseline and color for composition text at the caret.
    fn composition_font(
        &self,
        page: Option<&PageRender>,
        marker: &CaretMarker,
    ) -> (FontSpec, f64, Color) {
        let caret_y = marker.top + marker.height * 0.5;
        let run = page.and_then(|page| {
            page.glyph_runs()
                .map(|(_, run)| run)
                .filter(|run| {
                    let line = run.line_box(0.0);
                    caret_y >= line.y0 && caret_y <= line.y1
                })
                .min_by(|a, b| {
                    let da = (a.baseline() - caret_y).abs();
                    let db = (b.baseline() - caret_y).abs();
                    da.total_cmp(&db)
                })
        });
        if let Some(run) = run {
            return (run.font.clone(), run.baseline(), run.color);
        }
        let font = marker
            .line
            .as_ref()
            .map_or_else(FontSpec::default, |line| line.font.clone());
        // Centre the text box in the caret.
        let slack = marker.height - font.ascent() - font.descent();
        let baseline = marker.top + slack * 0.5 + font.ascent();
        (font, baseline, self.style.caret_color)
    }
}
