// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A surface that records ops instead of drawing them.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use kurbo::Affine;

use crate::{
    DrawOp, ImageDesc, ImageId, PixelSize, StateOp, Surface, SurfaceError, TextMeasure,
};

/// Layer an op was applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The bitmap of a page.
    Page(usize),
    /// The caret/composition overlay.
    Overlay,
}

/// Event recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A page layer was (re)started.
    BeginPage {
        /// Page index.
        index: usize,
        /// Bitmap size.
        size: PixelSize,
    },
    /// A page layer was finished.
    EndPage {
        /// Page index.
        index: usize,
    },
    /// A page layer was released.
    ReleasePage {
        /// Page index.
        index: usize,
    },
    /// The overlay was cleared and restarted.
    BeginOverlay {
        /// Overlay size.
        size: PixelSize,
    },
    /// The overlay was finished.
    EndOverlay,
    /// A state op.
    State {
        /// Active layer, if any.
        layer: Option<Layer>,
        /// The op.
        op: StateOp,
    },
    /// A draw op and the transform it was drawn under.
    Draw {
        /// Active layer, if any.
        layer: Option<Layer>,
        /// The op.
        op: DrawOp,
        /// Transform current when the op was applied.
        transform: Affine,
    },
}

/// Recording backend for tests and debugging.
///
/// Text is measured with a fixed advance per character regardless of font.
/// The surface can be made unavailable, and individual pages can be made to
/// fail, to exercise retry paths.
#[derive(Debug)]
pub struct RecordingSurface {
    advance: f64,
    ready: bool,
    failing: BTreeSet<usize>,
    active: Option<Layer>,
    transform: Affine,
    images: Vec<Option<ImageDesc>>,
    events: Vec<Event>,
}

impl RecordingSurface {
    /// Creates a ready surface measuring every character as `advance` wide.
    #[must_use]
    pub fn new(advance: f64) -> Self {
        Self {
            advance,
            ready: true,
            failing: BTreeSet::new(),
            active: None,
            transform: Affine::IDENTITY,
            images: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Makes the whole surface (un)available.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Makes `begin_page(index, ..)` fail until [`RecordingSurface::heal_page`].
    pub fn fail_page(&mut self, index: usize) {
        self.failing.insert(index);
    }

    /// Lets page `index` draw again.
    pub fn heal_page(&mut self, index: usize) {
        self.failing.remove(&index);
    }

    /// Recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Clears recorded events, keeping images.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Draw ops applied to `layer`, in order.
    pub fn draws_on(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> + '_ {
        self.events.iter().filter_map(move |e| match e {
            Event::Draw { layer: Some(l), op, .. } if *l == layer => Some(op),
            _ => None,
        })
    }

    /// Draw ops applied to `layer` with their transforms.
    pub fn transformed_draws_on(
        &self,
        layer: Layer,
    ) -> impl Iterator<Item = (&DrawOp, Affine)> + '_ {
        self.events.iter().filter_map(move |e| match e {
            Event::Draw {
                layer: Some(l),
                op,
                transform,
            } if *l == layer => Some((op, *transform)),
            _ => None,
        })
    }

    /// Indices of pages begun, in order (with repeats).
    #[must_use]
    pub fn pages_begun(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::BeginPage { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Indices of pages released, in order.
    #[must_use]
    pub fn pages_released(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ReleasePage { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Number of times the overlay was redrawn.
    #[must_use]
    pub fn overlay_passes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::BeginOverlay { .. }))
            .count()
    }

    /// Number of live image resources.
    #[must_use]
    pub fn live_images(&self) -> usize {
        self.images.iter().filter(|slot| slot.is_some()).count()
    }

    fn start_layer(&mut self, layer: Layer) {
        self.active = Some(layer);
        self.transform = Affine::IDENTITY;
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&self, text: &str, _font: &str) -> f64 {
        let chars = text.chars().count() as f64;
        chars * self.advance
    }
}

impl Surface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn begin_page(&mut self, index: usize, size: PixelSize) -> Result<(), SurfaceError> {
        if !self.ready || size.is_empty() {
            return Err(SurfaceError::Unavailable);
        }
        if self.failing.contains(&index) {
            return Err(SurfaceError::Backend("injected page failure"));
        }
        self.start_layer(Layer::Page(index));
        self.events.push(Event::BeginPage { index, size });
        Ok(())
    }

    fn end_page(&mut self, index: usize) {
        self.active = None;
        self.events.push(Event::EndPage { index });
    }

    fn release_page(&mut self, index: usize) {
        self.events.push(Event::ReleasePage { index });
    }

    fn begin_overlay(&mut self, size: PixelSize) -> Result<(), SurfaceError> {
        if !self.ready || size.is_empty() {
            return Err(SurfaceError::Unavailable);
        }
        self.start_layer(Layer::Overlay);
        self.events.push(Event::BeginOverlay { size });
        Ok(())
    }

    fn end_overlay(&mut self) {
        self.active = None;
        self.events.push(Event::EndOverlay);
    }

    fn state(&mut self, op: StateOp) {
        if let StateOp::SetTransform(transform) = &op {
            self.transform = *transform;
        }
        self.events.push(Event::State {
            layer: self.active,
            op,
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.events.push(Event::Draw {
            layer: self.active,
            op,
            transform: self.transform,
        });
    }

    fn create_image(&mut self, desc: ImageDesc, _pixels: &[u8]) -> ImageId {
        // Ids saturate at u32::MAX.
        let id = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
        self.images.push(Some(desc));
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageFormat;
    use kurbo::Rect;
    use peniko::Color;

    #[test]
    fn unavailable_surface_rejects_layers() {
        let mut surface = RecordingSurface::default();
        surface.set_ready(false);
        assert_eq!(
            surface.begin_page(0, PixelSize::new(10, 10)),
            Err(SurfaceError::Unavailable)
        );
        assert_eq!(
            surface.begin_overlay(PixelSize::new(10, 10)),
            Err(SurfaceError::Unavailable)
        );
        assert!(surface.events().is_empty());
    }

    #[test]
    fn failing_page_heals() {
        let mut surface = RecordingSurface::default();
        surface.fail_page(2);
        assert!(surface.begin_page(2, PixelSize::new(1, 1)).is_err());
        surface.heal_page(2);
        assert!(surface.begin_page(2, PixelSize::new(1, 1)).is_ok());
        assert_eq!(surface.pages_begun(), [2]);
    }

    #[test]
    fn transform_resets_per_layer() {
        let mut surface = RecordingSurface::default();
        surface.begin_page(0, PixelSize::new(4, 4)).unwrap();
        surface.state(StateOp::SetTransform(Affine::scale(2.0)));
        surface.draw(DrawOp::Placeholder {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        });
        surface.end_page(0);
        surface.begin_overlay(PixelSize::new(4, 4)).unwrap();
        surface.draw(DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            color: Color::BLACK,
        });
        surface.end_overlay();

        let page: Vec<_> = surface.transformed_draws_on(Layer::Page(0)).collect();
        assert_eq!(page[0].1, Affine::scale(2.0));
        let overlay: Vec<_> = surface.transformed_draws_on(Layer::Overlay).collect();
        assert_eq!(overlay[0].1, Affine::IDENTITY);
        assert_eq!(surface.overlay_passes(), 1);
    }

    #[test]
    fn images_are_tracked() {
        let mut surface = RecordingSurface::default();
        let desc = ImageDesc {
            width: 1,
            height: 1,
            format: ImageFormat::Rgba8,
        };
        let a = surface.create_image(desc, &[0, 0, 0, 0]);
        let b = surface.create_image(desc, &[0, 0, 0, 0]);
        assert_ne!(a, b);
        surface.destroy_image(a);
        assert_eq!(surface.live_images(), 1);
    }
}
