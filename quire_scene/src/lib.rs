// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Scene: the render model consumed by the Quire canvas core.
//!
//! A layout engine (not part of Quire) turns a document into a [`RenderModel`]:
//! an ordered list of [`PageRender`]s, each holding fully laid-out
//! [`RenderItem`]s in page-local, unzoomed coordinates. The canvas core only
//! reads this model. It draws it, hit-tests against it, and places the caret
//! from it, and it never patches it: every document edit produces a new model
//! that replaces the previous one wholesale.
//!
//! The crate also owns the one place where a [`FontSpec`] is turned into a
//! font string ([`FontSpec::font_string`]). Drawing, hit-testing and caret
//! placement all measure text through that string, so they agree on widths.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use peniko::Color;
//! use quire_scene::{FontSpec, GlyphRun, PageRender, RenderItem, RenderModel, TextSource};
//!
//! let run = GlyphRun::new("Hello world", Point::new(72.0, 100.0), FontSpec::new("Serif", 16.0))
//!     .with_color(Color::BLACK)
//!     .with_source(TextSource::new(0, 0, "Hello world"));
//!
//! let page = PageRender::new(0, 612.0, 792.0, vec![RenderItem::GlyphRun(run)]);
//! let model = RenderModel::new(vec![page]);
//!
//! assert_eq!(model.page_heights(), vec![792.0]);
//! assert_eq!(model.pages()[0].glyph_runs().count(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod font;
mod item;
mod model;
mod position;

pub use font::FontSpec;
pub use item::{
    CaretLine, CaretMarker, Decoration, FilledRect, GlyphRun, ImageItem, LineSegment,
    RenderItem, SelectionRects, ShapeShadow, ShapeStroke, TableBorder, TableCell, TextSource,
    VectorShape,
};
pub use model::{PageRender, RenderModel};
pub use position::{Hyperlink, LinkTarget, TextPosition};
