// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use hashbrown::HashSet;
use kurbo::{Size, Vec2};
use quire_cache::{ImageCache, ImageLoadError, PageRenderCache};
use quire_geometry::{PageLayout, Viewport};
use quire_scene::{RenderItem, RenderModel};
use quire_surface::{ImageDesc, Surface};
use quire_virtual_pages::PageVirtualizer;
use smallvec::SmallVec;

use crate::dirty::DirtyPages;
use crate::painter::{ImageSource, PageStyle, paint_page};

/// Construction parameters for [`RenderScheduler`].
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Pages kept drawn beyond the visible ones, on each side.
    pub buffer_pages: usize,
    /// Number of page bitmaps tracked by the page render cache.
    pub cache_capacity: usize,
    /// Number of decoded images kept.
    pub image_cache_capacity: usize,
    /// Skip pages whose bitmap is still current.
    pub enable_caching: bool,
    /// Gap above each page, in document units.
    pub page_gap: f64,
    /// Page background and shadow.
    pub page_style: PageStyle,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            buffer_pages: 2,
            cache_capacity: PageRenderCache::DEFAULT_CAPACITY,
            image_cache_capacity: ImageCache::DEFAULT_CAPACITY,
            enable_caching: true,
            page_gap: 20.0,
            page_style: PageStyle::default(),
        }
    }
}

/// Outcome of one draw pass, handed to the completion callback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Pages drawn in this pass.
    pub drawn: SmallVec<[usize; 8]>,
    /// Buffered pages skipped because their bitmap was current.
    pub skipped: SmallVec<[usize; 8]>,
    /// Pages whose draw failed; they stay dirty.
    pub failed: SmallVec<[usize; 8]>,
    /// Page bitmaps released from the surface.
    pub released: SmallVec<[usize; 8]>,
}

impl RenderReport {
    /// Returns `true` if the pass did nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
            && self.skipped.is_empty()
            && self.failed.is_empty()
            && self.released.is_empty()
    }
}

/// A decoded image returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Size and format.
    pub desc: ImageDesc,
    /// Pixel data, laid out as `desc` says.
    pub pixels: Vec<u8>,
}

type CompletionCallback = Box<dyn FnMut(&RenderReport)>;

/// Decides which pages to draw and when.
///
/// The scheduler owns the drawing surface, the current render model, the
/// page layouts and a set of dirty pages. Every display refresh the host
/// calls [`RenderScheduler::tick`]; when anything is dirty, the tick draws
/// the buffered page range into page bitmaps, skipping pages whose bitmap is
/// still current when caching is enabled.
///
/// The scheduler never draws carets or composition text. Those belong to the
/// overlay pass, which runs after the content pass on the same surface.
///
/// Nothing here fails across the public boundary: a page that cannot be
/// drawn stays dirty and is retried on the next tick.
pub struct RenderScheduler<S> {
    surface: Option<S>,
    model: Option<Arc<RenderModel>>,
    layouts: Vec<PageLayout>,
    viewport: Viewport,
    virtualizer: PageVirtualizer,
    dirty: DirtyPages,
    cache: PageRenderCache,
    images: ImageCache,
    bitmaps: HashSet<usize>,
    image_source: Option<Box<dyn ImageSource>>,
    on_complete: Option<CompletionCallback>,
    config: SchedulerConfig,
}

impl<S> fmt::Debug for RenderScheduler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("has_surface", &self.surface.is_some())
            .field("pages", &self.model.as_ref().map_or(0, |m| m.len()))
            .field("viewport", &self.viewport)
            .field("dirty", &self.dirty)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> RenderScheduler<S> {
    /// Creates a scheduler with no surface and no model.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            surface: None,
            model: None,
            layouts: Vec::new(),
            viewport: Viewport::default(),
            virtualizer: PageVirtualizer::new(config.buffer_pages),
            dirty: DirtyPages::new(),
            cache: PageRenderCache::new(config.cache_capacity),
            images: ImageCache::new(config.image_cache_capacity),
            bitmaps: HashSet::new(),
            image_source: None,
            on_complete: None,
            config,
        }
    }

    /// Attaches a drawing surface, returning the previous one.
    ///
    /// A new surface has no page bitmaps or images, so every cache is dropped
    /// and everything becomes dirty.
    pub fn set_surface(&mut self, surface: S) -> Option<S> {
        self.cache.clear();
        self.images.clear();
        self.bitmaps.clear();
        self.dirty.mark_all();
        self.surface.replace(surface)
    }

    /// The drawing surface, if attached.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access to the drawing surface, used by the overlay pass.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Sets the backend that image requests go to.
    pub fn set_image_source(&mut self, source: Box<dyn ImageSource>) {
        self.image_source = Some(source);
    }

    /// Sets the callback invoked after every draw pass.
    pub fn set_on_render_complete(&mut self, callback: impl FnMut(&RenderReport) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Removes the completion callback.
    pub fn clear_on_render_complete(&mut self) {
        self.on_complete = None;
    }

    /// Replaces the render model and marks everything dirty.
    ///
    /// Every cache entry becomes stale through a generation bump.
    pub fn set_render_model(&mut self, model: Arc<RenderModel>) {
        self.virtualizer
            .set_pages(&model.page_heights(), self.config.page_gap);
        self.model = Some(model);
        self.cache.invalidate_all();
        self.dirty.mark_all();
        self.refresh_range();
    }

    /// The current render model.
    #[must_use]
    pub fn render_model(&self) -> Option<&Arc<RenderModel>> {
        self.model.as_ref()
    }

    /// Updates page positions without forcing a redraw.
    ///
    /// Layouts are expected in page order, stacked with the configured gap.
    pub fn set_page_layouts(&mut self, layouts: Vec<PageLayout>) {
        let before = self.virtualizer.buffered_indices();
        let heights: Vec<f64> = layouts.iter().map(|l| l.height).collect();
        let top_offset = layouts
            .first()
            .map_or(0.0, |l| (l.y - self.config.page_gap).max(0.0));
        self.virtualizer.set_pages(&heights, self.config.page_gap);
        self.virtualizer.set_top_offset(top_offset);
        self.layouts = layouts;
        self.refresh_range();
        self.mark_newly_buffered(before);
    }

    /// Current page layouts.
    #[must_use]
    pub fn page_layouts(&self) -> &[PageLayout] {
        &self.layouts
    }

    /// Replaces the viewport.
    ///
    /// A change of zoom or device pixel ratio changes every page's pixels, so
    /// it invalidates the cache and marks everything dirty. Pages scrolled
    /// into the buffered range without a current bitmap become dirty.
    pub fn set_viewport(&mut self, viewport: &Viewport) {
        let rescaled = viewport.zoom() != self.viewport.zoom()
            || viewport.device_pixel_ratio() != self.viewport.device_pixel_ratio();
        if rescaled {
            self.cache.invalidate_all();
            self.dirty.mark_all();
        }
        let before = self.virtualizer.buffered_indices();
        self.viewport = viewport.clone();
        self.refresh_range();
        self.mark_newly_buffered(before);
    }

    /// The viewport the scheduler draws for.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Applies a scroll/resize. Last write wins.
    pub fn handle_scroll(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let before = self.virtualizer.buffered_indices();
        self.viewport.set_container(Size::new(width, height));
        self.viewport.set_scroll(Vec2::new(x, y));
        self.refresh_range();
        self.mark_newly_buffered(before);
    }

    /// Marks page `index` for redraw.
    pub fn mark_page_dirty(&mut self, index: usize) {
        self.dirty.mark(index);
    }

    /// Marks several pages for redraw.
    pub fn mark_pages_dirty(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.dirty.mark_many(indices);
    }

    /// Marks every page for redraw.
    pub fn mark_global_dirty(&mut self) {
        self.dirty.mark_all();
    }

    /// Returns `true` if a tick would draw something.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns `true` if page `index` is marked for redraw.
    #[must_use]
    pub fn is_page_dirty(&self, index: usize) -> bool {
        self.dirty.is_dirty(index)
    }

    /// Pages intersecting the viewport.
    #[must_use]
    pub fn visible_page_indices(&self) -> Range<usize> {
        self.virtualizer.visible_indices()
    }

    /// Pages that are kept drawn.
    #[must_use]
    pub fn buffered_page_indices(&self) -> Range<usize> {
        self.virtualizer.buffered_indices()
    }

    /// Returns `true` if page `index` is in the buffered range.
    #[must_use]
    pub fn should_render_page(&self, index: usize) -> bool {
        self.virtualizer.should_render_page(index)
    }

    /// The page render cache.
    #[must_use]
    pub fn cache(&self) -> &PageRenderCache {
        &self.cache
    }

    /// The image cache.
    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Enables or disables skipping pages with a current bitmap.
    pub fn set_caching_enabled(&mut self, enabled: bool) {
        self.config.enable_caching = enabled;
    }

    /// Returns `true` if caching is enabled.
    #[must_use]
    pub fn caching_enabled(&self) -> bool {
        self.config.enable_caching
    }

    /// One render-loop callback.
    ///
    /// Does nothing unless something is dirty. Otherwise draws every buffered
    /// page that is dirty or (with caching) lacks a current bitmap, clears
    /// the marks of pages drawn, and drops marks of pages outside the buffered
    /// range after invalidating their cache entries.
    pub fn tick(&mut self) -> RenderReport {
        if self.dirty.is_empty() {
            return RenderReport::default();
        }
        self.draw_pass(false)
    }

    /// Draws the whole buffered range now, ignoring dirty marks and the cache.
    pub fn force_render(&mut self) -> RenderReport {
        self.draw_pass(true)
    }

    /// Accepts the backend's answer for an image request and redraws.
    ///
    /// On success the image is created on the surface; either way the pages
    /// showing it are redrawn so placeholders are replaced (or stay, for a
    /// failure, which is not retried).
    pub fn finish_image_load(
        &mut self,
        resource_id: &str,
        result: Result<DecodedImage, ImageLoadError>,
    ) -> RenderReport {
        let result = match (result, self.surface.as_mut()) {
            (Ok(decoded), Some(surface)) => Ok(surface.create_image(decoded.desc, &decoded.pixels)),
            (Ok(_), None) => {
                log::debug!("image {resource_id:?} arrived without a surface; will request again");
                self.images.cancel_load(resource_id);
                return RenderReport::default();
            }
            (Err(err), _) => Err(err),
        };
        let evicted = self.images.finish_load(resource_id, result);
        if let Some(surface) = self.surface.as_mut() {
            for image in evicted {
                surface.destroy_image(image);
            }
        }

        let pages = self.pages_showing(resource_id);
        for page in pages {
            self.cache.invalidate_page(page);
            self.dirty.mark(page);
        }
        self.force_render()
    }

    fn pages_showing(&self, resource_id: &str) -> SmallVec<[usize; 8]> {
        let Some(model) = &self.model else {
            return SmallVec::new();
        };
        model
            .pages()
            .iter()
            .enumerate()
            .filter(|(_, page)| {
                page.items.iter().any(|item| {
                    matches!(item, RenderItem::Image(image) if image.resource_id == resource_id)
                })
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn refresh_range(&mut self) {
        let zoom = self.viewport.zoom();
        let scroll_top = self.viewport.scroll().y / zoom;
        let container_height = self.viewport.container().height / zoom;
        let _ = self.virtualizer.visible_range(scroll_top, container_height);
        // The cache must hold the whole buffered range or a pass evicts its own pages.
        let capacity = self
            .config
            .cache_capacity
            .max(self.virtualizer.buffered_indices().len());
        if capacity != self.cache.capacity() {
            let evicted = self.cache.set_capacity(capacity);
            if !evicted.is_empty() {
                log::trace!("page cache shrank to {capacity}, evicting {:?}", evicted.as_slice());
            }
        }
    }

    fn mark_newly_buffered(&mut self, before: Range<usize>) {
        for index in self.virtualizer.buffered_indices() {
            if before.contains(&index) {
                continue;
            }
            if !self.config.enable_caching || !self.cache.is_page_cached(index) {
                self.dirty.mark(index);
            }
        }
    }

    fn draw_pass(&mut self, force: bool) -> RenderReport {
        let mut report = RenderReport::default();
        let Some(model) = self.model.clone() else {
            log::debug!("render skipped: no render model yet");
            return report;
        };
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("render skipped: no drawing surface yet");
            return report;
        };
        if !surface.is_ready() {
            log::debug!("render skipped: drawing surface not ready");
            return report;
        }

        let range = self.virtualizer.buffered_indices();
        self.dirty.expand_global(range.clone());
        for page in self.dirty.take_outside(&range) {
            self.cache.invalidate_page(page);
        }

        for index in range.clone() {
            let Some(page) = model.page(index) else {
                self.dirty.clear(index);
                continue;
            };
            let current = self.config.enable_caching && self.cache.is_page_cached(index);
            if !force && !self.dirty.is_dirty(index) && current {
                report.skipped.push(index);
                continue;
            }
            let drawn = paint_page(
                surface,
                index,
                page,
                &self.viewport,
                &self.config.page_style,
                &mut self.images,
                self.image_source.as_deref_mut(),
            );
            match drawn {
                Ok(()) => {
                    self.dirty.clear(index);
                    self.bitmaps.insert(index);
                    let _ = self.cache.mark_page_rendered(index);
                    report.drawn.push(index);
                }
                Err(err) => {
                    log::debug!("page {index} not drawn ({err}); retrying next tick");
                    self.dirty.mark(index);
                    report.failed.push(index);
                }
            }
        }

        // Bitmaps with no cache entry outside the buffered range are dead weight.
        let stale: SmallVec<[usize; 8]> = self
            .bitmaps
            .iter()
            .copied()
            .filter(|page| !range.contains(page) && !self.cache.has_entry(*page))
            .collect();
        for page in stale {
            surface.release_page(page);
            self.bitmaps.remove(&page);
            report.released.push(page);
        }

        log::trace!(
            "render pass over {range:?}: drawn {:?}, skipped {:?}, failed {:?}",
            report.drawn.as_slice(),
            report.skipped.as_slice(),
            report.failed.as_slice()
        );
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&report);
        }
        report
    }
}

impl<S: Surface> Default for RenderScheduler<S> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
