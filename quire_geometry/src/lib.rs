// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Geometry: viewport state, page layout and coordinate transforms.
//!
//! - [`Viewport`]: scroll offset, container size, zoom (clamped to limits) and
//!   device pixel ratio, with zoom about an anchor point.
//! - [`layout_pages`]: positions every page of a render model in document
//!   space, stacked with a gap and centred horizontally.
//! - [`transform`]: pure conversions between screen pixels, device (canvas)
//!   pixels, document units and page-local coordinates, including the
//!   transforms used to draw into page bitmaps.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use quire_geometry::{layout_pages, page_to_screen, screen_to_page, LayoutParams, Viewport};
//! use quire_scene::{PageRender, RenderModel};
//!
//! let model = RenderModel::new(vec![
//!     PageRender::new(0, 600.0, 800.0, vec![]),
//!     PageRender::new(1, 600.0, 800.0, vec![]),
//! ]);
//! let mut viewport = Viewport::new(Size::new(1000.0, 700.0));
//! viewport.set_zoom(1.25);
//! viewport.set_scroll(Vec2::new(0.0, 900.0));
//!
//! let params = LayoutParams { container_width: 1000.0, zoom: 1.25, ..LayoutParams::default() };
//! let layouts = layout_pages(&model, &params);
//!
//! let local = Point::new(50.0, 60.0);
//! let screen = page_to_screen(&layouts[1], &viewport) * local;
//! let back = screen_to_page(&layouts[1], &viewport, screen);
//! assert!((back - local).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod layout;
pub mod transform;
mod viewport;

pub use layout::{document_extent, layout_pages, page_at_point, LayoutParams, PageLayout, PageSearch};
pub use transform::{
    canvas_to_screen, document_to_screen, overlay_size, page_bitmap_rect, page_bitmap_size,
    page_bitmap_transform, page_to_canvas, page_to_screen, screen_to_canvas, screen_to_document,
    screen_to_page,
};
pub use viewport::Viewport;
