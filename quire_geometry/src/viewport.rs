// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

/// Scroll, container size, zoom and device pixel ratio of the canvas.
///
/// Three coordinate spaces meet here:
/// - **document space**: unzoomed layout units, where pages are positioned,
/// - **screen space**: container-local CSS pixels, `screen = document * zoom - scroll`,
/// - **canvas space**: device pixels, `canvas = screen * device_pixel_ratio`.
///
/// `scroll` is measured in screen pixels. When a document extent is set, the
/// scroll offset is clamped so the container never scrolls past the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    scroll: Vec2,
    container: Size,
    zoom: f64,
    device_pixel_ratio: f64,
    min_zoom: f64,
    max_zoom: f64,
    extent: Option<Size>,
}

impl Viewport {
    /// Creates a viewport for a container of the given size.
    ///
    /// - Initial zoom is `1.0` and the zoom range is `[0.25, 5.0]`.
    /// - Initial scroll is zero.
    /// - Device pixel ratio is `1.0`.
    #[must_use]
    pub fn new(container: Size) -> Self {
        Self {
            scroll: Vec2::ZERO,
            container,
            zoom: 1.0,
            device_pixel_ratio: 1.0,
            min_zoom: 0.25,
            max_zoom: 5.0,
            extent: None,
        }
    }

    /// Scroll offset in screen pixels.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Container size in screen pixels.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Device pixels per screen pixel.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Document extent used for scroll clamping, if any.
    #[must_use]
    pub fn extent(&self) -> Option<Size> {
        self.extent
    }

    /// Sets the scroll offset, clamped to the document extent. Last write wins.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        if !scroll.is_finite() {
            return;
        }
        self.scroll = scroll;
        self.clamp_scroll();
    }

    /// Scrolls by a delta in screen pixels.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.set_scroll(self.scroll + delta);
    }

    /// Sets the container size.
    pub fn set_container(&mut self, container: Size) {
        if !container.is_finite() {
            return;
        }
        self.container = container;
        self.clamp_scroll();
    }

    /// Sets the device pixel ratio. Non-positive values are ignored.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        if ratio > 0.0 && ratio.is_finite() {
            self.device_pixel_ratio = ratio;
        }
    }

    /// Sets the document extent (in document units) used for scroll clamping.
    pub fn set_extent(&mut self, extent: Option<Size>) {
        self.extent = extent;
        self.clamp_scroll();
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The range is normalized so that `min_zoom <= max_zoom`, and the current
    /// zoom is clamped into it.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.set_zoom(self.zoom);
    }

    /// Zoom range as `(min, max)`.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the zoom factor, clamped to the zoom range, keeping the scroll offset.
    ///
    /// Returns `true` if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
        if (self.zoom - clamped).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = clamped;
        self.clamp_scroll();
        true
    }

    /// Multiplies the zoom by `factor`, keeping the document point under the
    /// screen-space `anchor` fixed where possible.
    ///
    /// Returns `true` if the zoom changed.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> bool {
        if factor <= 0.0 || !factor.is_finite() {
            return false;
        }
        let anchored = self.screen_to_document(anchor);
        if !self.set_zoom(self.zoom * factor) {
            return false;
        }
        self.set_scroll(anchored.to_vec2() * self.zoom - anchor.to_vec2());
        true
    }

    /// Converts a screen point to document coordinates.
    #[must_use]
    pub fn screen_to_document(&self, pt: Point) -> Point {
        ((pt.to_vec2() + self.scroll) / self.zoom).to_point()
    }

    /// Converts a document point to screen coordinates.
    #[must_use]
    pub fn document_to_screen(&self, pt: Point) -> Point {
        (pt.to_vec2() * self.zoom - self.scroll).to_point()
    }

    /// The part of the document visible in the container, in document units.
    #[must_use]
    pub fn visible_document_rect(&self) -> Rect {
        let origin = self.screen_to_document(Point::ZERO);
        Rect::from_origin_size(origin, self.container / self.zoom)
    }

    /// Container size in device pixels.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.container * self.device_pixel_ratio
    }

    fn clamp_scroll(&mut self) {
        let Some(extent) = self.extent else {
            return;
        };
        let max_x = (extent.width * self.zoom - self.container.width).max(0.0);
        let max_y = (extent.height * self.zoom - self.container.height).max(0.0);
        self.scroll = Vec2::new(
            self.scroll.x.clamp(0.0, max_x),
            self.scroll.y.clamp(0.0, max_y),
        );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}
