// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measured character boundaries inside a glyph run.

use alloc::string::String;

use quire_scene::{FontSpec, GlyphRun};
use quire_surface::TextMeasure;

/// Widths inside a run, measured in the context of its line.
///
/// A run whose source carries the raw line text is measured as the line
/// prefix through the run minus the part before it, so glyphs drawn earlier
/// on the line count toward kerning and shaping. Otherwise the run is
/// measured on its own.
struct RunMetrics<'a, M: ?Sized> {
    text: &'a str,
    skip: usize,
    lead: f64,
    font: String,
    measure: &'a M,
}

impl<'a, M: TextMeasure + ?Sized> RunMetrics<'a, M> {
    fn new(run: &'a GlyphRun, measure: &'a M) -> Self {
        let font = run.font.font_string();
        let line = run
            .source
            .as_ref()
            .and_then(|source| Some((source.line_through(&run.text)?, source.column)));
        let (text, skip) = line.unwrap_or((run.text.as_str(), 0));
        let lead = prefix_width(text, skip, &font, measure);
        Self {
            text,
            skip,
            lead,
            font,
            measure,
        }
    }

    /// Width of the first `chars` characters of the run.
    fn width(&self, chars: usize) -> f64 {
        prefix_width(self.text, self.skip + chars, &self.font, self.measure) - self.lead
    }
}

/// Page-local x of the boundary `index` characters into `run`.
///
/// `index` is clamped to the run length. The width comes from measuring the
/// prefix with the run's canonical font string, the same string the draw pass
/// uses, so the caret lands where the text was painted.
#[must_use]
pub fn char_x<M: TextMeasure + ?Sized>(run: &GlyphRun, index: usize, measure: &M) -> f64 {
    run.origin.x + RunMetrics::new(run, measure).width(index.min(run.char_len()))
}

/// x of the boundary `chars` characters into `text` drawn from `start_x`.
///
/// This is [`char_x`] for text that is not a glyph run, such as the line
/// metadata carried by a caret marker.
#[must_use]
pub fn prefix_x<M: TextMeasure + ?Sized>(
    start_x: f64,
    text: &str,
    chars: usize,
    font: &FontSpec,
    measure: &M,
) -> f64 {
    start_x + prefix_width(text, chars, &font.font_string(), measure)
}

/// Measured width of the whole run.
#[must_use]
pub fn run_width<M: TextMeasure + ?Sized>(run: &GlyphRun, measure: &M) -> f64 {
    RunMetrics::new(run, measure).width(run.char_len())
}

/// Character boundary of `run` closest to page-local `x`.
///
/// Boundaries are found by binary search over measured prefix widths. Inside
/// a character, the left half resolves to the boundary before it and the
/// right half (midpoint included) to the boundary after it. Points left of
/// the run give `0`, points right of it give the run length.
///
/// ```
/// use kurbo::Point;
/// use quire_hit::closest_char_boundary;
/// use quire_scene::{FontSpec, GlyphRun};
/// use quire_surface::RecordingSurface;
///
/// // Every character is 10 wide.
/// let measure = RecordingSurface::new(10.0);
/// let run = GlyphRun::new("Hello world", Point::new(0.0, 20.0), FontSpec::new("Inter", 16.0));
/// assert_eq!(closest_char_boundary(&run, 42.0, &measure), 4);
/// assert_eq!(closest_char_boundary(&run, 47.0, &measure), 5);
/// ```
#[must_use]
pub fn closest_char_boundary<M: TextMeasure + ?Sized>(run: &GlyphRun, x: f64, measure: &M) -> usize {
    let len = run.char_len();
    let target = x - run.origin.x;
    if len == 0 || target.is_nan() || target <= 0.0 {
        return 0;
    }
    let metrics = RunMetrics::new(run, measure);
    let width = |index: usize| metrics.width(index);
    if width(len) <= target {
        return len;
    }

    // width(lo) < target <= width(hi)
    let (mut lo, mut hi) = (0, len);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if width(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    if target - width(lo) < width(hi) - target {
        lo
    } else {
        hi
    }
}

fn prefix_width<M: TextMeasure + ?Sized>(text: &str, chars: usize, font: &str, measure: &M) -> f64 {
    if chars == 0 {
        return 0.0;
    }
    let end = text
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte);
    measure.measure_text(&text[..end], font)
}
