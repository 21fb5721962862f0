// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Cache: bounded caches behind the page render loop.
//!
//! - [`LruLedger`]: explicit least-recently-used bookkeeping
//!   (`record_access`, `evict_if_needed`) with a monotonically increasing
//!   access counter. It tracks keys only, so it can sit next to any storage.
//! - [`PageRenderCache`]: which page bitmaps are current. Entries are tagged
//!   with a generation; a new render model or a zoom change invalidates the
//!   whole cache by bumping the generation, in `O(1)`.
//! - [`ImageCache`]: decoded images keyed by backend resource id, with
//!   in-flight deduplication so each id is requested once.
//!
//! Both caches report what they evict, so the owner can release the matching
//! surface resources.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod image;
mod lru;
mod page;

pub use image::{ImageCache, ImageLoadError, ImageState};
pub use lru::LruLedger;
pub use page::PageRenderCache;
