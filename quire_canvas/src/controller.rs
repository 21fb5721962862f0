// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas controller.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use quire_cache::ImageLoadError;
use quire_caret::{CaretBlink, CaretOverlay, CompositionState, OverlayFrame};
use quire_geometry::{
    LayoutParams, PageLayout, PageSearch, Viewport, document_extent, layout_pages, page_at_point,
    screen_to_page,
};
use quire_hit::{HitResult, caret_rect_for, hit_test_click, hit_test_hyperlink, range_rects};
use quire_render::{DecodedImage, ImageSource, RenderReport, RenderScheduler};
use quire_scene::{RenderModel, TextPosition};
use quire_surface::Surface;

use crate::{
    CanvasConfig, Command, CommandSink, CompositionEvent, CompositionUpdate, CursorStyle,
    FrameInfo, FrameObserver, InputHandler, InputOutcome, KeyEvent, Modifiers, ResizeObserver,
};

/// Scroll shortfall, in screen pixels, below which an anchored zoom counts as pinned.
const PIN_TOLERANCE: f64 = 1e-9;

/// Owns the viewport, the current render model and everything drawn from it.
///
/// Hosts feed it input and clock ticks; it drives the
/// [`RenderScheduler`] for page bitmaps and the [`CaretOverlay`] for the
/// caret and composition preview, and reports document-level intents
/// through a [`CommandSink`].
///
/// Page layouts are recomputed whenever the model, the zoom, the container
/// width, or ruler visibility change.
pub struct CanvasController<S> {
    config: CanvasConfig,
    viewport: Viewport,
    model: Option<Arc<RenderModel>>,
    layouts: Vec<PageLayout>,
    scheduler: RenderScheduler<S>,
    blink: CaretBlink,
    composition: CompositionState,
    overlay: CaretOverlay,
    /// Something the overlay shows changed since it was last drawn.
    overlay_dirty: bool,
    /// Caret visibility the overlay was last drawn with.
    shown_caret: Option<bool>,
    ruler_visible: bool,
    /// Horizontal page offset left by the last anchored zoom, in document units.
    shift_x: f64,
    commands: Option<Box<dyn CommandSink>>,
    input: Option<Box<dyn InputHandler>>,
    resize_observer: Option<Box<dyn ResizeObserver>>,
    frame_observer: Option<Box<dyn FrameObserver>>,
}

impl<S> fmt::Debug for CanvasController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasController")
            .field("viewport", &self.viewport)
            .field("pages", &self.layouts.len())
            .field("scheduler", &self.scheduler)
            .field("blink", &self.blink)
            .field("composition", &self.composition)
            .field("ruler_visible", &self.ruler_visible)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> CanvasController<S> {
    /// Creates a controller with no surface, no model and an empty container.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let mut viewport = Viewport::new(Size::ZERO);
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);
        Self {
            viewport,
            model: None,
            layouts: Vec::new(),
            scheduler: RenderScheduler::new(config.scheduler_config()),
            blink: CaretBlink::new(config.blink_interval),
            composition: CompositionState::Idle,
            overlay: CaretOverlay::new(config.overlay_style()),
            overlay_dirty: true,
            shown_caret: None,
            ruler_visible: false,
            shift_x: 0.0,
            commands: None,
            input: None,
            resize_observer: None,
            frame_observer: None,
            config,
        }
    }

    /// The configuration the controller was built with.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Attaches a drawing surface, returning the previous one.
    pub fn set_surface(&mut self, surface: S) -> Option<S> {
        self.overlay_dirty = true;
        self.scheduler.set_surface(surface)
    }

    /// The drawing surface, if attached.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.scheduler.surface()
    }

    /// Mutable access to the drawing surface, if attached.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.scheduler.surface_mut()
    }

    /// Sets where pointer commands go.
    pub fn set_command_sink(&mut self, sink: impl CommandSink + 'static) {
        self.commands = Some(Box::new(sink));
    }

    /// Sets who turns key and input-method events into edits.
    pub fn set_input_handler(&mut self, handler: impl InputHandler + 'static) {
        self.input = Some(Box::new(handler));
    }

    /// Sets who is told about container size changes.
    pub fn set_resize_observer(&mut self, observer: impl ResizeObserver + 'static) {
        self.resize_observer = Some(Box::new(observer));
    }

    /// Fills the frame-observer slot, replacing its previous occupant.
    pub fn set_frame_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.frame_observer = Some(Box::new(observer));
    }

    /// Empties the frame-observer slot.
    pub fn clear_frame_observer(&mut self) {
        self.frame_observer = None;
    }

    /// Sets where image requests go.
    pub fn set_image_source(&mut self, source: impl ImageSource + 'static) {
        self.scheduler.set_image_source(Box::new(source));
    }

    /// The render scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler<S> {
        &self.scheduler
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current page layouts, in page order.
    #[must_use]
    pub fn page_layouts(&self) -> &[PageLayout] {
        &self.layouts
    }

    /// Current render model.
    #[must_use]
    pub fn render_model(&self) -> Option<&Arc<RenderModel>> {
        self.model.as_ref()
    }

    /// The caret blink cycle.
    #[must_use]
    pub fn blink(&self) -> &CaretBlink {
        &self.blink
    }

    /// The input-method session.
    #[must_use]
    pub fn composition(&self) -> &CompositionState {
        &self.composition
    }

    /// Returns `true` while an input-method session is open.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composition.is_composing()
    }

    /// Page indices intersecting the container.
    #[must_use]
    pub fn visible_page_indices(&self) -> core::ops::Range<usize> {
        self.scheduler.visible_page_indices()
    }

    /// Installs a new render model from the layout engine.
    ///
    /// Pages are laid out again, every page is treated as dirty and the caret
    /// shows immediately.
    pub fn set_render_model(&mut self, model: Arc<RenderModel>, now: Duration) {
        self.scheduler.set_render_model(Arc::clone(&model));
        self.model = Some(model);
        self.relayout();
        self.blink.reset(now);
        self.overlay_dirty = true;
    }

    /// Returns `true` while the ruler strip is shown above the pages.
    #[must_use]
    pub fn ruler_visible(&self) -> bool {
        self.ruler_visible
    }

    /// Shows or hides the ruler strip, shifting every page.
    pub fn set_ruler_visible(&mut self, visible: bool) {
        if self.ruler_visible == visible {
            return;
        }
        self.ruler_visible = visible;
        self.relayout();
        self.scheduler.mark_global_dirty();
        self.overlay_dirty = true;
    }

    /// Applies a container size change, tells the resize observer and
    /// redraws the buffered pages.
    pub fn resize(&mut self, width: f64, height: f64, now: Duration) -> FrameInfo {
        self.viewport.set_container(Size::new(width, height));
        self.shift_x = 0.0;
        self.relayout();
        if let Some(observer) = self.resize_observer.as_mut() {
            observer.container_resized(width, height);
        }
        self.force_render(now)
    }

    /// Sets the device pixel ratio. Pages are redrawn at the new resolution.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.viewport.set_device_pixel_ratio(ratio);
        self.scheduler.set_viewport(&self.viewport);
        self.overlay_dirty = true;
    }

    /// Scrolls to an offset in screen pixels, clamped to the document.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.set_scroll(Vec2::new(x, y));
        self.sync_scroll();
    }

    /// Scrolls by a delta in screen pixels. Returns `true` if the offset
    /// changed.
    pub fn scroll_by(&mut self, delta: Vec2) -> bool {
        let before = self.viewport.scroll();
        self.viewport.scroll_by(delta);
        if self.viewport.scroll() == before {
            return false;
        }
        self.sync_scroll();
        true
    }

    /// Sets the zoom factor, keeping the scroll offset. Returns `true` if the
    /// zoom changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !self.viewport.set_zoom(zoom) {
            return false;
        }
        self.shift_x = 0.0;
        self.relayout();
        self.overlay_dirty = true;
        true
    }

    /// Multiplies the zoom by `factor`, keeping the document point under the
    /// screen-space `anchor` in place. Returns `true` if the zoom changed.
    ///
    /// The page under the anchor (or the nearest one) stays pinned in both
    /// axes. When the document is narrower than the container the pages are
    /// moved off centre rather than scrolled; a resize or [`Self::set_zoom`]
    /// centres them again.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> bool {
        let pinned = self.page_point_at(anchor);
        if !self.viewport.zoom_about(anchor, factor) {
            return false;
        }
        self.shift_x = 0.0;
        self.relayout();
        if let Some((page, local)) = pinned {
            let residual = self.scroll_to_page_point(page, local, anchor);
            if residual.abs() > PIN_TOLERANCE {
                self.shift_x = -residual / self.viewport.zoom();
                self.relayout();
                let _ = self.scroll_to_page_point(page, local, anchor);
            }
            self.scheduler.set_viewport(&self.viewport);
        }
        self.overlay_dirty = true;
        true
    }

    /// One zoom step in, about the container centre.
    pub fn zoom_in(&mut self) -> bool {
        let centre = self.viewport.container().to_rect().center();
        self.zoom_about(centre, self.config.zoom_step)
    }

    /// One zoom step out, about the container centre.
    pub fn zoom_out(&mut self) -> bool {
        let centre = self.viewport.container().to_rect().center();
        self.zoom_about(centre, 1.0 / self.config.zoom_step)
    }

    /// Handles a wheel event at screen point `pos`.
    ///
    /// With the zoom modifier held a notch zooms about the pointer (up is
    /// in); otherwise the delta scrolls. Returns `true` if the viewport
    /// changed.
    pub fn wheel(&mut self, delta: Vec2, pos: Point, modifiers: Modifiers) -> bool {
        if !modifiers.zoom_modifier() {
            return self.scroll_by(delta);
        }
        let factor = if delta.y < 0.0 {
            self.config.zoom_step
        } else if delta.y > 0.0 {
            1.0 / self.config.zoom_step
        } else {
            return false;
        };
        self.zoom_about(pos, factor)
    }

    /// Handles a primary-button press at screen point `pos`.
    ///
    /// A press on a hyperlink dispatches [`Command::ActivateHyperlink`]. If
    /// the link-follow modifier was held that is all; otherwise the press
    /// also moves the cursor, like any press on text, with
    /// [`Command::SetCursorPosition`]. Returns the hit the cursor moved to.
    pub fn pointer_down(&mut self, pos: Point, modifiers: Modifiers, now: Duration) -> Option<HitResult> {
        let model = self.model.clone()?;
        let surface = self.scheduler.surface()?;
        let link = hit_test_hyperlink(&model, &self.layouts, &self.viewport, surface, pos);
        let hit = hit_test_click(
            &model,
            &self.layouts,
            &self.viewport,
            surface,
            pos,
            &self.config.hit_params(),
        );

        let modifier_held = modifiers.link_modifier();
        if let Some(link) = link {
            self.dispatch(Command::ActivateHyperlink {
                hyperlink: link.hyperlink,
                modifier_held,
            });
            if modifier_held {
                return None;
            }
        }
        let hit = hit?;
        self.dispatch(Command::SetCursorPosition {
            paragraph: hit.position.paragraph,
            offset: hit.position.offset,
        });
        self.blink.reset(now);
        self.overlay_dirty = true;
        Some(hit)
    }

    /// Cursor to show with the pointer at screen point `pos`.
    #[must_use]
    pub fn pointer_move(&self, pos: Point) -> CursorStyle {
        let (Some(model), Some(surface)) = (self.model.as_deref(), self.scheduler.surface()) else {
            return CursorStyle::Default;
        };
        if hit_test_hyperlink(model, &self.layouts, &self.viewport, surface, pos).is_some() {
            return CursorStyle::Pointer;
        }
        let doc = self.viewport.screen_to_document(pos);
        if page_at_point(&self.layouts, doc, PageSearch::Exact).is_some() {
            CursorStyle::Text
        } else {
            CursorStyle::Default
        }
    }

    /// Forwards a key press to the input handler and shows the caret.
    pub fn key_down(&mut self, event: &KeyEvent, now: Duration) -> InputOutcome {
        self.blink.reset(now);
        self.overlay_dirty = true;
        let Some(handler) = self.input.as_mut() else {
            return InputOutcome::default();
        };
        let outcome = handler.key_down(event);
        if let Some(update) = &outcome.composition {
            self.apply_composition(update, now);
        }
        outcome
    }

    /// An input-method session opened.
    pub fn composition_start(&mut self, now: Duration) -> InputOutcome {
        self.composition_event(&CompositionEvent::Start, now)
    }

    /// The input method's provisional text changed.
    pub fn composition_update(&mut self, text: &str, now: Duration) -> InputOutcome {
        self.composition_event(&CompositionEvent::Update(text.into()), now)
    }

    /// The input-method session closed.
    pub fn composition_end(&mut self, now: Duration) -> InputOutcome {
        self.composition_event(&CompositionEvent::End, now)
    }

    /// Accepts the backend's answer for an image request.
    pub fn image_loaded(
        &mut self,
        resource_id: &str,
        result: Result<DecodedImage, ImageLoadError>,
    ) -> RenderReport {
        self.scheduler.finish_image_load(resource_id, result)
    }

    /// Screen rectangle of a caret standing at `position`.
    #[must_use]
    pub fn caret_rect(&self, position: TextPosition) -> Option<Rect> {
        let model = self.model.as_deref()?;
        let surface = self.scheduler.surface()?;
        caret_rect_for(model, &self.layouts, &self.viewport, surface, position)
    }

    /// Screen rectangles covering the document range between two positions.
    #[must_use]
    pub fn range_rects(&self, start: TextPosition, end: TextPosition) -> Vec<Rect> {
        match (self.model.as_deref(), self.scheduler.surface()) {
            (Some(model), Some(surface)) => {
                range_rects(model, &self.layouts, &self.viewport, surface, start, end)
            }
            _ => Vec::new(),
        }
    }

    /// One render-loop callback.
    ///
    /// Runs the content pass, then redraws the overlay if the caret blinked
    /// or anything it shows changed, then hands the frame to the observer.
    pub fn tick(&mut self, now: Duration) -> FrameInfo {
        let content = self.scheduler.tick();
        self.finish_frame(content, now)
    }

    /// Redraws every buffered page and the overlay now.
    pub fn force_render(&mut self, now: Duration) -> FrameInfo {
        let content = self.scheduler.force_render();
        self.overlay_dirty = true;
        self.finish_frame(content, now)
    }

    fn finish_frame(&mut self, content: RenderReport, now: Duration) -> FrameInfo {
        let visible = self.blink.is_visible(now);
        let overlay = if self.overlay_dirty || self.shown_caret != Some(visible) {
            self.paint_overlay(visible)
        } else {
            OverlayFrame::default()
        };
        let info = FrameInfo {
            now,
            content,
            overlay,
            next_blink: self.blink.next_toggle(now),
        };
        if let Some(observer) = self.frame_observer.as_mut() {
            observer.frame(&info);
        }
        info
    }

    fn paint_overlay(&mut self, caret_visible: bool) -> OverlayFrame {
        let Some(surface) = self.scheduler.surface_mut() else {
            return OverlayFrame::default();
        };
        let frame = self.overlay.paint(
            surface,
            self.model.as_deref(),
            &self.layouts,
            &self.viewport,
            caret_visible,
            &self.composition,
        );
        if frame.drawn {
            self.overlay_dirty = false;
            self.shown_caret = Some(caret_visible);
        }
        frame
    }

    fn composition_event(&mut self, event: &CompositionEvent, now: Duration) -> InputOutcome {
        let outcome = match self.input.as_mut() {
            Some(handler) => handler.composition(event),
            None => InputOutcome {
                composition: Some(event.into()),
                edited: false,
            },
        };
        self.blink.reset(now);
        self.overlay_dirty = true;
        if let Some(update) = &outcome.composition {
            self.apply_composition(update, now);
        }
        outcome
    }

    fn apply_composition(&mut self, update: &CompositionUpdate, now: Duration) {
        match update {
            CompositionUpdate::Start => {
                let at = self
                    .model
                    .as_deref()
                    .and_then(RenderModel::caret)
                    .map_or_else(TextPosition::default, |(_, marker)| marker.position);
                self.composition.start(at);
                self.blink.suspend();
            }
            CompositionUpdate::Text(text) => {
                if !self.composition.update(text) {
                    log::debug!("composition text {text:?} arrived with no open session");
                }
            }
            CompositionUpdate::End => {
                self.composition.end();
                self.blink.resume(now);
            }
        }
        self.overlay_dirty = true;
    }

    fn dispatch(&mut self, command: Command) {
        match self.commands.as_mut() {
            Some(sink) => sink.dispatch(command),
            None => log::debug!("no command sink; dropped {command:?}"),
        }
    }

    fn sync_scroll(&mut self) {
        let scroll = self.viewport.scroll();
        let container = self.viewport.container();
        self.scheduler
            .handle_scroll(scroll.x, scroll.y, container.width, container.height);
        self.overlay_dirty = true;
    }

    /// The page nearest to screen point `pos` and `pos` in its local space.
    fn page_point_at(&self, pos: Point) -> Option<(usize, Point)> {
        let doc = self.viewport.screen_to_document(pos);
        let layout = page_at_point(&self.layouts, doc, PageSearch::Nearest)?;
        Some((layout.page_index, screen_to_page(layout, &self.viewport, pos)))
    }

    /// Scrolls so page-local `local` on `page` sits under `anchor`.
    ///
    /// Returns the horizontal distance, in screen pixels, that clamping kept
    /// the scroll offset from covering.
    fn scroll_to_page_point(&mut self, page: usize, local: Point, anchor: Point) -> f64 {
        let Some(layout) = self.layouts.get(page) else {
            return 0.0;
        };
        let target = (Vec2::new(layout.x, layout.y) + local.to_vec2()) * self.viewport.zoom()
            - anchor.to_vec2();
        self.viewport.set_scroll(target);
        target.x - self.viewport.scroll().x
    }

    fn top_offset(&self) -> f64 {
        if self.ruler_visible {
            self.config.ruler_height / self.viewport.zoom()
        } else {
            0.0
        }
    }

    fn relayout(&mut self) {
        let Some(model) = &self.model else {
            self.scheduler.set_viewport(&self.viewport);
            return;
        };
        let params = LayoutParams {
            page_gap: self.config.page_gap,
            container_width: self.viewport.container().width,
            zoom: self.viewport.zoom(),
            top_offset: self.top_offset(),
            shift_x: self.shift_x,
        };
        self.layouts = layout_pages(model, &params);
        self.viewport
            .set_extent(Some(document_extent(&self.layouts, self.config.page_gap)));
        self.scheduler.set_page_layouts(self.layouts.clone());
        self.scheduler.set_viewport(&self.viewport);
    }
}

impl<S: Surface> Default for CanvasController<S> {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
