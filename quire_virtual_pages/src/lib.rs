// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Virtual Pages: which pages of a paginated document need drawing.
//!
//! Given per-page heights, a uniform inter-page gap, a scroll offset, a
//! container height and a buffer size, this crate computes the contiguous range
//! of pages intersecting the viewport and the wider range that should be kept
//! drawn so scrolling does not reveal blank pages.
//!
//! - [`PageExtents`]: memoized page positions (tops and bottoms), built once
//!   per change of heights, gap or top offset.
//! - [`compute_visible_range`]: one-shot query returning a [`VisibleRange`].
//! - [`PageVirtualizer`]: a controller that keeps the extents and the last
//!   range, answering [`PageVirtualizer::should_render_page`] cheaply.
//!
//! Visibility is boundary-inclusive: a page whose edge touches
//! `scroll_top` or `scroll_top + container_height` counts as visible, so a
//! zero buffer still avoids flicker on sub-pixel scrolls. Degenerate input
//! (non-finite or negative heights, a container of zero height) produces an
//! empty range instead of an error: a transient zero-size container during
//! layout is expected.
//!
//! ## Minimal example
//!
//! ```rust
//! use quire_virtual_pages::PageVirtualizer;
//!
//! let mut pages = PageVirtualizer::new(2);
//! pages.set_pages(&[792.0; 100], 20.0);
//!
//! let range = pages.visible_range(5000.0, 900.0).clone();
//! assert!(range.visible.start > 0);
//! assert!(pages.should_render_page(range.visible.start));
//! ```
//!
//! All values share one unit (the canvas core uses unzoomed document units).
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod extents;
mod range;
mod virtualizer;

pub use extents::PageExtents;
pub use range::{compute_visible_range, VisibleRange};
pub use virtualizer::PageVirtualizer;
