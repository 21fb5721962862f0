// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Render: decides which pages get drawn, and when.
//!
//! The [`RenderScheduler`] owns the drawing surface and the current render
//! model. Edits, scrolls and image arrivals mark pages dirty through
//! [`DirtyPages`]; the host's display-refresh callback calls
//! [`RenderScheduler::tick`], which draws the buffered page range and skips
//! pages whose bitmap is still current.
//!
//! - A new render model, a zoom change or a device pixel ratio change makes
//!   every page dirty and every cached bitmap stale.
//! - Pages scrolled into the buffered range are marked only when they lack a
//!   current bitmap.
//! - Dirty marks for pages outside the buffered range are dropped, and the
//!   matching cache entries invalidated, so those pages redraw when they come
//!   back into view.
//! - A page whose draw fails stays dirty and is retried on the next tick.
//!
//! Images referenced by the model are drawn as placeholders until the
//! [`ImageSource`] answers through [`RenderScheduler::finish_image_load`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quire_render::{RenderScheduler, SchedulerConfig};
//! use quire_scene::{PageRender, RenderModel};
//! use quire_surface::RecordingSurface;
//!
//! let pages = (0..50).map(|i| PageRender::new(i, 600.0, 1000.0, vec![])).collect();
//! let mut scheduler = RenderScheduler::new(SchedulerConfig::default());
//! scheduler.set_surface(RecordingSurface::default());
//! scheduler.set_render_model(Arc::new(RenderModel::new(pages)));
//! scheduler.handle_scroll(0.0, 10_220.0, 1000.0, 3000.0);
//!
//! assert_eq!(scheduler.visible_page_indices(), 10..13);
//! let report = scheduler.tick();
//! assert_eq!(report.drawn.as_slice(), &[8, 9, 10, 11, 12, 13, 14]);
//! assert!(scheduler.tick().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dirty;
mod painter;
mod scheduler;

pub use dirty::DirtyPages;
pub use painter::{ImageSource, PageStyle};
pub use scheduler::{DecodedImage, RenderReport, RenderScheduler, SchedulerConfig};
