// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded images keyed by backend resource id.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use quire_surface::ImageId;
use smallvec::SmallVec;

use crate::LruLedger;

/// Why an image could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageLoadError {
    /// The backend request failed.
    Network(String),
    /// The response could not be decoded into a bitmap.
    Decode(String),
    /// The backend has no resource with that id.
    NotFound,
}

impl fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(reason) => write!(f, "image request failed: {reason}"),
            Self::Decode(reason) => write!(f, "image could not be decoded: {reason}"),
            Self::NotFound => f.write_str("image resource not found"),
        }
    }
}

impl core::error::Error for ImageLoadError {}

/// What the cache knows about a resource id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageState {
    /// Decoded and available on the surface.
    Ready(ImageId),
    /// Requested, not yet answered.
    Loading,
    /// The load failed; it is not retried automatically.
    Failed,
    /// Never requested (or evicted).
    Missing,
}

/// Bounded cache of decoded images with request deduplication.
///
/// A resource id moves from `Missing` to `Loading` through
/// [`ImageCache::begin_load`], which returns `true` only for the first caller
/// so each id is requested once. [`ImageCache::finish_load`] moves it to
/// `Ready` or `Failed`. Ready images are bounded by an [`LruLedger`]; evicted
/// image handles are handed back so the owner can destroy them on the surface.
///
/// ```
/// use quire_cache::{ImageCache, ImageState};
/// use quire_surface::ImageId;
///
/// let mut images = ImageCache::new(8);
/// assert!(images.begin_load("logo"));
/// assert!(!images.begin_load("logo"));
/// assert_eq!(images.lookup("logo"), ImageState::Loading);
///
/// let evicted = images.finish_load("logo", Ok(ImageId(7)));
/// assert!(evicted.is_empty());
/// assert_eq!(images.lookup("logo"), ImageState::Ready(ImageId(7)));
/// ```
#[derive(Clone, Debug)]
pub struct ImageCache {
    ready: HashMap<String, ImageId>,
    ledger: LruLedger<String>,
    in_flight: HashSet<String>,
    failed: HashSet<String>,
}

impl ImageCache {
    /// Default number of decoded images kept.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates an empty cache keeping at most `capacity` decoded images.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            ready: HashMap::new(),
            ledger: LruLedger::new(capacity),
            in_flight: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    /// State of `id`, marking it as recently used if ready.
    pub fn lookup(&mut self, id: &str) -> ImageState {
        let state = self.peek(id);
        if matches!(state, ImageState::Ready(_)) {
            self.ledger.record_access(String::from(id));
        }
        state
    }

    /// State of `id` without touching recency.
    #[must_use]
    pub fn peek(&self, id: &str) -> ImageState {
        if let Some(image) = self.ready.get(id) {
            ImageState::Ready(*image)
        } else if self.in_flight.contains(id) {
            ImageState::Loading
        } else if self.failed.contains(id) {
            ImageState::Failed
        } else {
            ImageState::Missing
        }
    }

    /// Claims the request for `id`.
    ///
    /// Returns `true` if the caller should issue the request: the id is not
    /// ready, not in flight, and has not failed.
    pub fn begin_load(&mut self, id: &str) -> bool {
        if !matches!(self.peek(id), ImageState::Missing) {
            return false;
        }
        self.in_flight.insert(String::from(id))
    }

    /// Records the outcome of a load for `id`.
    ///
    /// Failures are logged and remembered. Returns images evicted to stay
    /// within capacity; the caller should destroy them on the surface.
    pub fn finish_load(
        &mut self,
        id: &str,
        result: Result<ImageId, ImageLoadError>,
    ) -> SmallVec<[ImageId; 2]> {
        self.in_flight.remove(id);
        let mut evicted = SmallVec::new();
        match result {
            Ok(image) => {
                self.failed.remove(id);
                if let Some(previous) = self.ready.insert(String::from(id), image)
                    && previous != image
                {
                    evicted.push(previous);
                }
                self.ledger.record_access(String::from(id));
                for key in self.ledger.evict_if_needed() {
                    if let Some(old) = self.ready.remove(&key) {
                        evicted.push(old);
                    }
                }
            }
            Err(err) => {
                log::warn!("image resource {id:?} failed to load: {err}");
                self.failed.insert(String::from(id));
            }
        }
        evicted
    }

    /// Abandons an in-flight load so the next draw requests `id` again.
    pub fn cancel_load(&mut self, id: &str) -> bool {
        self.in_flight.remove(id)
    }

    /// Forgets a failure so the next draw requests `id` again.
    pub fn forget_failure(&mut self, id: &str) -> bool {
        self.failed.remove(id)
    }

    /// Ids currently being loaded.
    pub fn in_flight(&self) -> impl Iterator<Item = &str> + '_ {
        self.in_flight.iter().map(String::as_str)
    }

    /// Number of decoded images held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    /// Returns `true` if no decoded image is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// Drops everything, returning the images the owner should destroy.
    ///
    /// Loads still in flight are forgotten; their results are accepted when
    /// they arrive.
    pub fn clear(&mut self) -> Vec<ImageId> {
        self.ledger.clear();
        self.in_flight.clear();
        self.failed.clear();
        self.ready.drain().map(|(_, image)| image).collect()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
