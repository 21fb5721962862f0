// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quire Surface: the drawing-surface seam of the Quire canvas core.
//!
//! The canvas core never rasterizes anything itself. It talks to a backend
//! through the [`Surface`] trait, which exposes two kinds of layers:
//!
//! - **Page layers**, one bitmap per page index. Page content is drawn into
//!   these between [`Surface::begin_page`] and [`Surface::end_page`]. A page
//!   layer keeps its pixels until it is redrawn or released, which is what
//!   makes the page render cache meaningful.
//! - **The overlay layer**, cleared and redrawn between
//!   [`Surface::begin_overlay`] and [`Surface::end_overlay`] every caret blink
//!   or composition update. Overlay redraws never touch page layers.
//!
//! Hosts composite page layers at their page positions and the overlay on top.
//!
//! Text measurement lives on its own trait, [`TextMeasure`], so hit-testing can
//! run against any measurer, and every [`Surface`] is also a measurer. All
//! measurement is keyed by the canonical font string built in `quire_scene`.
//!
//! [`RecordingSurface`] is a backend that records every op instead of drawing.
//! It is meant for tests and debugging.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use peniko::Color;
//! use quire_surface::{DrawOp, Layer, PixelSize, RecordingSurface, Surface, TextMeasure};
//!
//! let mut surface = RecordingSurface::new(10.0);
//! surface.begin_page(0, PixelSize::new(100, 100)).unwrap();
//! surface.draw(DrawOp::FillRect { rect: Rect::new(0.0, 0.0, 10.0, 10.0), color: Color::WHITE });
//! surface.end_page(0);
//!
//! assert_eq!(surface.draws_on(Layer::Page(0)).count(), 1);
//! assert_eq!(surface.measure_text("abc", "400 16px Serif"), 30.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;

use kurbo::{Affine, BezPath, Line, Point, Rect, Vec2};
use peniko::Color;

mod recording;

pub use recording::{Event, Layer, RecordingSurface};

/// Identifier for an image resource created on a surface.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Pixel format of decoded image data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// 8-bit RGBA, premultiplied.
    #[default]
    Rgba8,
    /// 8-bit BGRA, premultiplied.
    Bgra8,
}

/// Description of an image resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: ImageFormat,
}

/// Size of a layer bitmap in device pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl PixelSize {
    /// Creates a pixel size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A drop shadow applied to subsequent fills.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow offset in the current transform's units.
    pub offset: Vec2,
    /// Blur radius.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
}

/// Operations that change surface state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Replace the current transform.
    SetTransform(Affine),
    /// Set or clear the shadow applied to fills.
    SetShadow(Option<Shadow>),
    /// Set the global opacity in `0.0..=1.0`.
    SetOpacity(f32),
}

/// Drawing operations, interpreted under the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a rectangle.
    FillRect {
        /// Rectangle to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Outline a rectangle.
    StrokeRect {
        /// Rectangle to outline.
        rect: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// Stroke a line segment.
    Line {
        /// Segment end points.
        line: Line,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
        /// Dash pattern as `[on, off]`, solid when absent.
        dash: Option<[f64; 2]>,
    },
    /// Draw a string with its baseline starting at `origin`.
    Text {
        /// The text.
        text: String,
        /// Left end of the baseline.
        origin: Point,
        /// Canonical font string.
        font: String,
        /// Text color.
        color: Color,
    },
    /// Draw an image scaled into `rect`.
    Image {
        /// Image resource.
        image: ImageId,
        /// Destination rectangle.
        rect: Rect,
    },
    /// Draw the placeholder shown while an image is missing.
    Placeholder {
        /// Destination rectangle.
        rect: Rect,
    },
    /// Fill a path.
    FillPath {
        /// Path to fill.
        path: BezPath,
        /// Fill color.
        color: Color,
    },
    /// Stroke a path.
    StrokePath {
        /// Path to stroke.
        path: BezPath,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
}

/// Errors a surface can report when a layer cannot be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface is not ready yet (e.g. not attached or zero-sized).
    Unavailable,
    /// The backing context was lost and must be recreated by the host.
    Lost,
    /// Backend-specific failure.
    Backend(&'static str),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("drawing surface is not available"),
            Self::Lost => f.write_str("drawing surface context was lost"),
            Self::Backend(reason) => write!(f, "drawing surface backend failure: {reason}"),
        }
    }
}

impl core::error::Error for SurfaceError {}

/// Synchronous text measurement.
pub trait TextMeasure {
    /// Advance width of `text` drawn with `font`, a canonical font string.
    fn measure_text(&self, text: &str, font: &str) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure_text(&self, text: &str, font: &str) -> f64 {
        (**self).measure_text(text, font)
    }
}

/// A drawing surface with per-page layers and one overlay layer.
///
/// State set with [`Surface::state`] is reset to identity transform, no shadow
/// and full opacity at the start of every layer.
pub trait Surface: TextMeasure {
    /// Returns `true` once the surface can accept drawing.
    fn is_ready(&self) -> bool;

    /// Start (re)drawing the bitmap for page `index`, clearing its previous
    /// contents and sizing it to `size`.
    fn begin_page(&mut self, index: usize, size: PixelSize) -> Result<(), SurfaceError>;

    /// Finish drawing page `index`.
    fn end_page(&mut self, index: usize);

    /// Drop the bitmap for page `index`. Releasing an unknown page is a no-op.
    fn release_page(&mut self, index: usize);

    /// Start redrawing the overlay layer, clearing it first.
    fn begin_overlay(&mut self, size: PixelSize) -> Result<(), SurfaceError>;

    /// Finish drawing the overlay layer.
    fn end_overlay(&mut self);

    /// Apply a state operation to the active layer.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation to the active layer.
    fn draw(&mut self, op: DrawOp);

    /// Create an image resource from decoded pixels.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;

    /// Destroy an image resource.
    fn destroy_image(&mut self, id: ImageId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn errors_display() {
        assert_eq!(
            SurfaceError::Unavailable.to_string(),
            "drawing surface is not available"
        );
        assert_eq!(
            SurfaceError::Backend("oom").to_string(),
            "drawing surface backend failure: oom"
        );
    }

    #[test]
    fn measure_through_reference() {
        let surface = RecordingSurface::new(5.0);
        let by_ref: &dyn TextMeasure = &surface;
        assert_eq!((&by_ref).measure_text("abcd", "f"), 20.0);
    }

    #[test]
    fn empty_pixel_size() {
        assert!(PixelSize::new(0, 10).is_empty());
        assert!(!PixelSize::new(1, 1).is_empty());
    }
}
