// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Caret: the cheap pass drawn on top of cached page bitmaps.
//!
//! - [`CaretBlink`]: the `Visible ⇄ Hidden` blink cycle. Edits reset it so the
//!   caret shows right after a keystroke; composition suspends it.
//! - [`CompositionState`]: the open input-method session, if any.
//! - [`CaretOverlay`]: clears the overlay layer and draws the caret bar, then
//!   the underlined composition preview, in the page's coordinate space.
//!
//! The caret x is measured from the caret's line text with the same prefix
//! measurement hit testing uses ([`quire_hit::prefix_x`]), so clicking on the
//! caret lands on its own position.
//!
//! ## Example
//!
//! ```rust
//! use core::time::Duration;
//! use quire_caret::{CaretBlink, CompositionState};
//! use quire_scene::TextPosition;
//!
//! let mut blink = CaretBlink::default();
//! let mut ime = CompositionState::default();
//!
//! ime.start(TextPosition::new(0, 12));
//! blink.suspend();
//! // Composing: visible no matter how long the user hesitates.
//! assert!(blink.is_visible(Duration::from_secs(3600)));
//!
//! ime.end();
//! blink.resume(Duration::from_secs(3600));
//! assert!(!blink.is_visible(Duration::from_secs(3601)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod blink;
mod composition;
mod overlay;

pub use blink::{BlinkPhase, CaretBlink};
pub use composition::CompositionState;
pub use overlay::{CaretOverlay, OverlayFrame, OverlayStyle, caret_x};
