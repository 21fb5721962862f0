// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas configuration.

use core::time::Duration;

use kurbo::Vec2;
use peniko::Color;
use quire_caret::OverlayStyle;
use quire_hit::HitParams;
use quire_render::{PageStyle, SchedulerConfig};
use quire_surface::Shadow;

/// Drop shadow drawn under every page.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageShadow {
    /// Horizontal offset in document units.
    pub offset_x: f64,
    /// Vertical offset in document units.
    pub offset_y: f64,
    /// Blur radius in document units. Zero with no offset disables the shadow.
    pub blur: f64,
    /// Color as straight-alpha `[r, g, b, a]`.
    pub rgba: [u8; 4],
}

impl Default for PageShadow {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 2.0,
            blur: 8.0,
            rgba: [0, 0, 0, 64],
        }
    }
}

impl PageShadow {
    fn to_shadow(self) -> Option<Shadow> {
        if self.blur <= 0.0 && self.offset_x == 0.0 && self.offset_y == 0.0 {
            return None;
        }
        let [r, g, b, a] = self.rgba;
        Some(Shadow {
            offset: Vec2::new(self.offset_x, self.offset_y),
            blur: self.blur.max(0.0),
            color: Color::from_rgba8(r, g, b, a),
        })
    }
}

/// Everything a [`CanvasController`](crate::CanvasController) can be tuned
/// with.
///
/// With the `serde` feature this can be loaded from a host's settings file;
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Pages kept drawn beyond the visible ones, on each side.
    pub buffer_pages: usize,
    /// Page bitmaps kept by the page render cache.
    pub cache_capacity: usize,
    /// Decoded images kept.
    pub image_cache_capacity: usize,
    /// Skip redrawing pages whose bitmap is still current.
    pub enable_caching: bool,
    /// Half-period of the caret blink. Zero disables blinking.
    pub blink_interval: Duration,
    /// Gap between pages, in document units.
    pub page_gap: f64,
    /// Height of the ruler strip above the pages, in screen pixels.
    pub ruler_height: f64,
    /// Shadow under each page.
    pub page_shadow: PageShadow,
    /// Line height assumed for runs that carry none.
    pub fallback_line_height: f64,
    /// Caret bar width in screen pixels.
    pub caret_width: f64,
    /// Smallest zoom factor.
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Zoom multiplier for one wheel notch or zoom step.
    pub zoom_step: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            buffer_pages: 2,
            cache_capacity: 10,
            image_cache_capacity: 64,
            enable_caching: true,
            blink_interval: Duration::from_millis(530),
            page_gap: 20.0,
            ruler_height: 24.0,
            page_shadow: PageShadow::default(),
            fallback_line_height: 20.0,
            caret_width: 1.5,
            min_zoom: 0.25,
            max_zoom: 5.0,
            zoom_step: 1.1,
        }
    }
}

impl CanvasConfig {
    /// Scheduler settings derived from this configuration.
    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            buffer_pages: self.buffer_pages,
            cache_capacity: self.cache_capacity,
            image_cache_capacity: self.image_cache_capacity,
            enable_caching: self.enable_caching,
            page_gap: self.page_gap,
            page_style: PageStyle {
                background: Color::WHITE,
                shadow: self.page_shadow.to_shadow(),
            },
        }
    }

    /// Overlay look derived from this configuration.
    #[must_use]
    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            caret_width: self.caret_width,
            ..OverlayStyle::default()
        }
    }

    /// Hit-test settings derived from this configuration.
    #[must_use]
    pub fn hit_params(&self) -> HitParams {
        HitParams {
            fallback_line_height: self.fallback_line_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scheduler_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.scheduler_config(), SchedulerConfig::default());
        assert_eq!(config.overlay_style(), OverlayStyle::default());
        assert_eq!(config.hit_params(), HitParams::default());
    }

    #[test]
    fn flat_shadow_is_disabled() {
        let config = CanvasConfig {
            page_shadow: PageShadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 0.0,
                rgba: [0, 0, 0, 255],
            },
            ..CanvasConfig::default()
        };
        assert_eq!(config.scheduler_config().page_style.shadow, None);
        assert_eq!(config.scheduler_config().page_style.margin(), 0.0);
    }
}
