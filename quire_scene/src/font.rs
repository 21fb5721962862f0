// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font description and the canonical font string.

use alloc::format;
use alloc::string::String;

/// Fraction of the font size above the baseline used for text boxes.
const ASCENT_RATIO: f64 = 0.8;
/// Fraction of the font size below the baseline used for text boxes.
const DESCENT_RATIO: f64 = 0.2;

/// Font selection for a glyph run.
///
/// Layout engines describe fonts by family, size, weight and style. Every
/// consumer that needs text metrics goes through [`FontSpec::font_string`] so
/// that the draw pass and the hit-test pass measure with identical keys.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Font family name, e.g. `"Noto Serif"`.
    pub family: String,
    /// Font size in page-local (unzoomed) pixels.
    pub size: f64,
    /// CSS-style numeric weight (400 regular, 700 bold).
    pub weight: u16,
    /// Whether the italic face is requested.
    pub italic: bool,
}

impl FontSpec {
    /// Family used when a layout engine does not name one.
    pub const DEFAULT_FAMILY: &'static str = "sans-serif";

    /// Regular weight.
    pub const REGULAR: u16 = 400;

    /// Bold weight.
    pub const BOLD: u16 = 700;

    /// Creates a regular, upright font spec.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: Self::REGULAR,
            italic: false,
        }
    }

    /// Returns a copy with the given weight.
    #[must_use]
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Returns a copy with italic toggled as requested.
    #[must_use]
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Canonical font string: `"[italic ]<weight> <size>px <family>"`.
    ///
    /// This is the only place font strings are built. Text measurement keyed by
    /// anything else would let hit-testing drift from what was drawn.
    #[must_use]
    pub fn font_string(&self) -> String {
        let style = if self.italic { "italic " } else { "" };
        format!("{style}{} {}px {}", self.weight, self.size, self.family)
    }

    /// Distance from the baseline to the top of the text box.
    #[must_use]
    pub fn ascent(&self) -> f64 {
        self.size * ASCENT_RATIO
    }

    /// Distance from the baseline to the bottom of the text box.
    #[must_use]
    pub fn descent(&self) -> f64 {
        self.size * DESCENT_RATIO
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAMILY, 16.0)
    }
}
