// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draws one page's content into its bitmap.

use kurbo::{Affine, Line, Point, Rect, Vec2};
use peniko::Color;
use quire_cache::{ImageCache, ImageState};
use quire_geometry::{Viewport, page_bitmap_size, page_bitmap_transform};
use quire_scene::{GlyphRun, PageRender, RenderItem, VectorShape};
use quire_surface::{DrawOp, Shadow, StateOp, Surface, SurfaceError};

/// Fire-and-forget image requests to the backend.
///
/// The answer comes back later through
/// [`RenderScheduler::finish_image_load`](crate::RenderScheduler::finish_image_load).
pub trait ImageSource {
    /// Requests the image for `resource_id`.
    fn request(&mut self, resource_id: &str);
}

/// Page background and shadow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageStyle {
    /// Page fill.
    pub background: Color,
    /// Drop shadow under the page, in document units.
    pub shadow: Option<Shadow>,
}

impl PageStyle {
    /// Space around the page reserved in its bitmap for the shadow.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.shadow.map_or(0.0, |shadow| {
            shadow.blur + shadow.offset.x.abs().max(shadow.offset.y.abs())
        })
    }
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            shadow: Some(Shadow {
                offset: Vec2::new(0.0, 2.0),
                blur: 8.0,
                color: Color::from_rgba8(0, 0, 0, 64),
            }),
        }
    }
}

/// Draws every non-caret item of `page` into the bitmap for model position
/// `index`.
///
/// Images that are not ready are drawn as placeholders; missing ones are
/// requested from `source` once. Carets are left to the overlay pass.
pub(crate) fn paint_page<S: Surface + ?Sized>(
    surface: &mut S,
    index: usize,
    page: &PageRender,
    viewport: &Viewport,
    style: &PageStyle,
    images: &mut ImageCache,
    mut source: Option<&mut (dyn ImageSource + '_)>,
) -> Result<(), SurfaceError> {
    let margin = style.margin();
    let size = page_bitmap_size(page.size(), viewport, margin);
    surface.begin_page(index, size)?;

    let base = page_bitmap_transform(viewport, margin);
    surface.state(StateOp::SetTransform(base));

    let page_rect = Rect::from_origin_size(Point::ZERO, page.size());
    if style.shadow.is_some() {
        surface.state(StateOp::SetShadow(style.shadow));
    }
    surface.draw(DrawOp::FillRect {
        rect: page_rect,
        color: style.background,
    });
    if style.shadow.is_some() {
        surface.state(StateOp::SetShadow(None));
    }

    for item in &page.items {
        match item {
            RenderItem::GlyphRun(run) => paint_glyph_run(surface, run),
            RenderItem::Rect(rect) => {
                surface.draw(DrawOp::FillRect {
                    rect: rect.rect,
                    color: rect.fill,
                });
                if let Some((color, width)) = rect.stroke {
                    surface.draw(DrawOp::StrokeRect {
                        rect: rect.rect,
                        color,
                        width,
                    });
                }
            }
            RenderItem::Image(image) => {
                let op = match images.lookup(&image.resource_id) {
                    ImageState::Ready(id) => DrawOp::Image {
                        image: id,
                        rect: image.rect,
                    },
                    ImageState::Missing => {
                        if images.begin_load(&image.resource_id) {
                            if let Some(source) = source.as_deref_mut() {
                                source.request(&image.resource_id);
                            } else {
                                // Nobody to ask; let a later draw try again.
                                images.cancel_load(&image.resource_id);
                            }
                        }
                        DrawOp::Placeholder { rect: image.rect }
                    }
                    ImageState::Loading | ImageState::Failed => {
                        DrawOp::Placeholder { rect: image.rect }
                    }
                };
                surface.draw(op);
            }
            RenderItem::Selection(selection) => {
                for rect in &selection.rects {
                    surface.draw(DrawOp::FillRect {
                        rect: *rect,
                        color: selection.color,
                    });
                }
            }
            RenderItem::Line(segment) => surface.draw(DrawOp::Line {
                line: segment.line,
                color: segment.color,
                width: segment.width,
                dash: segment.dash,
            }),
            RenderItem::TableCell(cell) => {
                if let Some(color) = cell.background {
                    surface.draw(DrawOp::FillRect {
                        rect: cell.rect,
                        color,
                    });
                }
            }
            RenderItem::TableBorder(border) => surface.draw(DrawOp::Line {
                line: border.line,
                color: border.color,
                width: border.width,
                dash: None,
            }),
            RenderItem::Shape(shape) => paint_shape(surface, shape, base),
            RenderItem::Caret(_) => {}
        }
    }

    surface.end_page(index);
    Ok(())
}

fn paint_glyph_run<S: Surface + ?Sized>(surface: &mut S, run: &GlyphRun) {
    let font = run.font.font_string();
    let decorated = run.decoration.underline || run.decoration.strikethrough;
    let width = if decorated {
        surface.measure_text(&run.text, &font)
    } else {
        0.0
    };
    surface.draw(DrawOp::Text {
        text: run.text.clone(),
        origin: run.origin,
        font,
        color: run.color,
    });

    let thickness = (run.font.size / 16.0).max(1.0);
    let x0 = run.origin.x;
    if run.decoration.underline {
        let y = run.baseline() + run.font.descent() * 0.5;
        surface.draw(DrawOp::Line {
            line: Line::new((x0, y), (x0 + width, y)),
            color: run.color,
            width: thickness,
            dash: None,
        });
    }
    if run.decoration.strikethrough {
        let y = run.baseline() - run.font.ascent() * 0.35;
        surface.draw(DrawOp::Line {
            line: Line::new((x0, y), (x0 + width, y)),
            color: run.color,
            width: thickness,
            dash: None,
        });
    }
}

fn paint_shape<S: Surface + ?Sized>(surface: &mut S, shape: &VectorShape, base: Affine) {
    surface.state(StateOp::SetTransform(base * shape.local_transform()));
    if let Some(fill) = shape.fill {
        if let Some(shadow) = shape.shadow {
            surface.state(StateOp::SetShadow(Some(Shadow {
                offset: shadow.offset,
                blur: shadow.blur,
                color: shadow.color,
            })));
        }
        surface.draw(DrawOp::FillPath {
            path: shape.path.clone(),
            color: fill,
        });
        if shape.shadow.is_some() {
            surface.state(StateOp::SetShadow(None));
        }
    }
    if let Some(stroke) = shape.stroke {
        surface.draw(DrawOp::StrokePath {
            path: shape.path.clone(),
            color: stroke.color,
            width: stroke.width,
        });
    }
    surface.state(StateOp::SetTransform(base));
}
