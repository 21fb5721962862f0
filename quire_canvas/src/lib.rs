// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Canvas: the interactive surface of a paginated document editor.
//!
//! [`CanvasController`] ties the other Quire crates together:
//!
//! - It owns the [`Viewport`](quire_geometry::Viewport) (scroll, container,
//!   zoom, device pixel ratio) and recomputes page layouts when the model,
//!   the zoom, the container width, or ruler visibility change.
//! - Each [`CanvasController::tick`] runs the content pass of the
//!   [`RenderScheduler`](quire_render::RenderScheduler), then the caret and
//!   composition passes of the [`CaretOverlay`](quire_caret::CaretOverlay),
//!   and hands a [`FrameInfo`] to the frame observer.
//! - Pointer, key, wheel and input-method events come in through its
//!   handlers. Clicks are hit tested and leave as [`Command`]s; keys and
//!   composition go to an [`InputHandler`].
//!
//! The controller never mutates the document. A host applies commands and
//! edits to its own model, lays it out again, and installs the new
//! [`RenderModel`](quire_scene::RenderModel) with
//! [`CanvasController::set_render_model`].
//!
//! ## Example
//!
//! ```rust
//! use core::time::Duration;
//! use std::sync::{Arc, Mutex};
//!
//! use kurbo::Point;
//! use quire_canvas::{CanvasController, Command, Modifiers};
//! use quire_scene::{FontSpec, GlyphRun, PageRender, RenderItem, RenderModel, TextSource};
//! use quire_surface::RecordingSurface;
//!
//! let now = Duration::ZERO;
//! let run = GlyphRun::new("Hello", Point::new(50.0, 100.0), FontSpec::new("Inter", 16.0))
//!     .with_source(TextSource::new(0, 0, "Hello"));
//! let model = RenderModel::new(vec![PageRender::new(0, 600.0, 800.0, vec![RenderItem::GlyphRun(run)])]);
//!
//! let commands = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&commands);
//!
//! let mut canvas = CanvasController::default();
//! canvas.set_surface(RecordingSurface::new(10.0));
//! canvas.set_command_sink(move |command| sink.lock().unwrap().push(command));
//! let _ = canvas.resize(1000.0, 700.0, now);
//! canvas.set_render_model(Arc::new(model), now);
//!
//! let frame = canvas.tick(now);
//! assert_eq!(frame.content.drawn.as_slice(), &[0]);
//!
//! // The page is centred at x = 200 below a 20 unit gap; the click lands
//! // in the right half of the third character.
//! canvas.pointer_down(Point::new(200.0 + 50.0 + 26.0, 20.0 + 95.0), Modifiers::empty(), now);
//! assert_eq!(
//!     commands.lock().unwrap().as_slice(),
//!     &[Command::SetCursorPosition { paragraph: 0, offset: 3 }],
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod input;

pub use config::{CanvasConfig, PageShadow};
pub use controller::CanvasController;
pub use input::{
    Command, CommandSink, CompositionEvent, CompositionUpdate, CursorStyle, FrameInfo,
    FrameObserver, InputHandler, InputOutcome, KeyEvent, Modifiers, ResizeObserver,
};
