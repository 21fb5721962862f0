// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure conversions between screen, canvas, document and page-local space.
//!
//! Drawing and hit-testing must agree exactly, so every page-local mapping is
//! derived from [`page_to_screen`]; hit-testing uses its inverse.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ceil`
use kurbo::{Affine, Point, Rect, Size, Vec2};
use quire_surface::PixelSize;

use crate::{PageLayout, Viewport};

/// Screen pixels to device pixels.
#[must_use]
pub fn screen_to_canvas(pt: Point, viewport: &Viewport) -> Point {
    (pt.to_vec2() * viewport.device_pixel_ratio()).to_point()
}

/// Device pixels to screen pixels.
#[must_use]
pub fn canvas_to_screen(pt: Point, viewport: &Viewport) -> Point {
    (pt.to_vec2() / viewport.device_pixel_ratio()).to_point()
}

/// Screen pixels to document units.
#[must_use]
pub fn screen_to_document(pt: Point, viewport: &Viewport) -> Point {
    viewport.screen_to_document(pt)
}

/// Document units to screen pixels.
#[must_use]
pub fn document_to_screen(pt: Point, viewport: &Viewport) -> Point {
    viewport.document_to_screen(pt)
}

/// Transform from page-local coordinates to screen pixels.
#[must_use]
pub fn page_to_screen(layout: &PageLayout, viewport: &Viewport) -> Affine {
    Affine::translate(-viewport.scroll())
        * Affine::scale(viewport.zoom())
        * Affine::translate(Vec2::new(layout.x, layout.y))
}

/// Maps a screen point into the page-local space of `layout`.
///
/// This is the exact inverse of [`page_to_screen`].
#[must_use]
pub fn screen_to_page(layout: &PageLayout, viewport: &Viewport, pt: Point) -> Point {
    page_to_screen(layout, viewport).inverse() * pt
}

/// Transform from page-local coordinates to device pixels.
#[must_use]
pub fn page_to_canvas(layout: &PageLayout, viewport: &Viewport) -> Affine {
    Affine::scale(viewport.device_pixel_ratio()) * page_to_screen(layout, viewport)
}

/// Transform applied while drawing into a page bitmap.
///
/// A page bitmap covers the page grown by `margin` on every side (room for
/// the page shadow), at `zoom * device_pixel_ratio` device pixels per unit.
#[must_use]
pub fn page_bitmap_transform(viewport: &Viewport, margin: f64) -> Affine {
    Affine::scale(viewport.zoom() * viewport.device_pixel_ratio())
        * Affine::translate(Vec2::new(margin, margin))
}

/// Device-pixel size of the bitmap for a page of `page` size.
#[must_use]
pub fn page_bitmap_size(page: Size, viewport: &Viewport, margin: f64) -> PixelSize {
    let scale = viewport.zoom() * viewport.device_pixel_ratio();
    PixelSize::new(
        to_pixels((page.width + 2.0 * margin) * scale),
        to_pixels((page.height + 2.0 * margin) * scale),
    )
}

/// Screen rectangle at which a host composites the bitmap of `layout`.
#[must_use]
pub fn page_bitmap_rect(layout: &PageLayout, viewport: &Viewport, margin: f64) -> Rect {
    page_to_screen(layout, viewport)
        .transform_rect_bbox(layout_local_rect(layout).inflate(margin, margin))
}

/// Device-pixel size of the overlay layer.
#[must_use]
pub fn overlay_size(viewport: &Viewport) -> PixelSize {
    let size = viewport.canvas_size();
    PixelSize::new(to_pixels(size.width), to_pixels(size.height))
}

fn layout_local_rect(layout: &PageLayout) -> Rect {
    Rect::new(0.0, 0.0, layout.width, layout.height)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "bitmap dimensions are clamped into u32 range first"
)]
fn to_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.ceil().min(f64::from(u32::MAX)) as u32
}
