// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret blink timing.
//!
//! ## Usage
//!
//! 1) Call [`CaretBlink::reset`] on every keystroke, composition event and
//!    model replacement, so the caret shows right after an edit.
//! 2) Ask [`CaretBlink::is_visible`] during the overlay pass.
//! 3) Use [`CaretBlink::next_toggle`] to schedule the next wakeup.
//! 4) While an input method is composing, [`CaretBlink::suspend`] holds the
//!    caret visible; [`CaretBlink::resume`] re-enters the cycle.
//!
//! Time is a [`Duration`] since any epoch the host likes.
//!
//! ```
//! use core::time::Duration;
//! use quire_caret::{BlinkPhase, CaretBlink};
//!
//! let ms = Duration::from_millis;
//! let mut blink = CaretBlink::new(ms(500));
//! blink.reset(ms(1000));
//! assert_eq!(blink.phase(ms(1499)), BlinkPhase::Visible);
//! assert_eq!(blink.phase(ms(1500)), BlinkPhase::Hidden);
//! assert_eq!(blink.next_toggle(ms(1500)), Some(ms(2000)));
//! ```

use core::time::Duration;

/// Whether the caret is currently shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlinkPhase {
    /// Drawn.
    Visible,
    /// Not drawn.
    Hidden,
}

/// `Visible ⇄ Hidden` on a fixed interval, anchored at the last reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaretBlink {
    interval: Duration,
    anchor: Duration,
    suspended: bool,
}

impl CaretBlink {
    /// Default half-period of the blink cycle.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(530);

    /// Creates a blinking caret, visible from time zero.
    ///
    /// A zero interval never blinks.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            anchor: Duration::ZERO,
            suspended: false,
        }
    }

    /// Half-period of the blink cycle.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the interval and restarts the cycle at `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Duration) {
        self.interval = interval;
        self.reset(now);
    }

    /// Shows the caret and restarts the cycle at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.anchor = now;
    }

    /// Holds the caret visible until [`CaretBlink::resume`].
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Re-enters the blink cycle, visible from `now`.
    pub fn resume(&mut self, now: Duration) {
        self.suspended = false;
        self.reset(now);
    }

    /// Returns `true` while suspended.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Phase at `now`.
    ///
    /// Times before the last reset count as the start of the cycle.
    #[must_use]
    pub fn phase(&self, now: Duration) -> BlinkPhase {
        if self.suspended || self.interval.is_zero() {
            return BlinkPhase::Visible;
        }
        let elapsed = now.saturating_sub(self.anchor);
        if (elapsed.as_nanos() / self.interval.as_nanos()) % 2 == 0 {
            BlinkPhase::Visible
        } else {
            BlinkPhase::Hidden
        }
    }

    /// Returns `true` if the caret is shown at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Duration) -> bool {
        self.phase(now) == BlinkPhase::Visible
    }

    /// When the phase next changes after `now`, or `None` if it never does.
    #[must_use]
    pub fn next_toggle(&self, now: Duration) -> Option<Duration> {
        if self.suspended || self.interval.is_zero() {
            return None;
        }
        let elapsed = now.saturating_sub(self.anchor);
        let periods = elapsed.as_nanos() / self.interval.as_nanos() + 1;
        let periods = u32::try_from(periods).ok()?;
        self.anchor.checked_add(self.interval.checked_mul(periods)?)
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
