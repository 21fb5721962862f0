// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render items: the drawable contents of a page.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Line, Point, Rect, Vec2};
use peniko::Color;

use crate::font::FontSpec;
use crate::position::{Hyperlink, TextPosition};

/// One drawable element of a page, in page-local coordinates.
#[derive(Clone, Debug)]
pub enum RenderItem {
    /// A run of text sharing one font and style.
    GlyphRun(GlyphRun),
    /// A filled (and optionally outlined) rectangle.
    Rect(FilledRect),
    /// A raster image fetched by resource id.
    Image(ImageItem),
    /// Selection highlight rectangles.
    Selection(SelectionRects),
    /// A straight line segment (rules, underlines drawn by layout).
    Line(LineSegment),
    /// Background of a table cell.
    TableCell(TableCell),
    /// One edge of a table border.
    TableBorder(TableBorder),
    /// A vector shape with fill, stroke, shadow and orientation.
    Shape(VectorShape),
    /// Where the layout engine placed the caret.
    ///
    /// Carets are never part of the cached page content; they are drawn by the
    /// overlay pass.
    Caret(CaretMarker),
}

/// Text decoration flags for a glyph run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoration {
    /// Draw a line under the text.
    pub underline: bool,
    /// Draw a line through the text.
    pub strikethrough: bool,
}

/// Document coordinates of a glyph run, used for hit-testing.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSource {
    /// Paragraph the run belongs to.
    pub paragraph: usize,
    /// Offset within the paragraph of the run's first character.
    pub offset: usize,
    /// Raw text of the whole visual line the run sits on.
    pub line_text: String,
    /// Characters of `line_text` before the run's first character.
    pub column: usize,
}

impl TextSource {
    /// Creates a text source for a run that starts its line.
    #[must_use]
    pub fn new(paragraph: usize, offset: usize, line_text: impl Into<String>) -> Self {
        Self {
            paragraph,
            offset,
            line_text: line_text.into(),
            column: 0,
        }
    }

    /// Places the run `column` characters into its line.
    #[must_use]
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// The line text up to the end of `run_text`.
    ///
    /// Returns `None` unless `run_text` appears in the line at `column`.
    #[must_use]
    pub fn line_through(&self, run_text: &str) -> Option<&str> {
        let start = match self.line_text.char_indices().nth(self.column) {
            Some((byte, _)) => byte,
            None if self.line_text.chars().count() == self.column => self.line_text.len(),
            None => return None,
        };
        let end = start + run_text.len();
        (self.line_text.get(start..end)? == run_text).then(|| &self.line_text[..end])
    }
}

/// A run of text drawn with a single font.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    /// The text of the run.
    pub text: String,
    /// Left edge (`x`) and baseline (`y`) of the run.
    pub origin: Point,
    /// Font used to draw and measure the run.
    pub font: FontSpec,
    /// Text color.
    pub color: Color,
    /// Underline / strikethrough.
    pub decoration: Decoration,
    /// Link carried by the run, if any.
    pub hyperlink: Option<Hyperlink>,
    /// Document coordinates of the run; runs without a source are not hit-testable.
    pub source: Option<TextSource>,
    /// Height of the visual line the run sits on, when known.
    pub line_height: Option<f64>,
}

impl GlyphRun {
    /// Creates a black, undecorated run without document metadata.
    #[must_use]
    pub fn new(text: impl Into<String>, origin: Point, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            origin,
            font,
            color: Color::BLACK,
            decoration: Decoration::default(),
            hyperlink: None,
            source: None,
            line_height: None,
        }
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Attaches document coordinates.
    #[must_use]
    pub fn with_source(mut self, source: TextSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches a hyperlink.
    #[must_use]
    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    /// Sets the visual line height.
    #[must_use]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Sets the decoration.
    #[must_use]
    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    /// Number of characters in the run.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `chars` characters of the run (clamped to the run length).
    #[must_use]
    pub fn prefix(&self, chars: usize) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(byte, _)| byte);
        &self.text[..end]
    }

    /// Baseline y coordinate.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.origin.y
    }

    /// Tight text box for a run of the given measured width.
    #[must_use]
    pub fn text_box(&self, width: f64) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y - self.font.ascent(),
            self.origin.x + width,
            self.origin.y + self.font.descent(),
        )
    }

    /// Box of the visual line the run occupies, for a run of the given width.
    ///
    /// When no line height is known this is the text box. Otherwise the text box
    /// is centred vertically in a box `line_height` tall.
    #[must_use]
    pub fn line_box(&self, width: f64) -> Rect {
        let text = self.text_box(width);
        match self.line_height {
            Some(height) if height > text.height() => {
                let extra = (height - text.height()) * 0.5;
                Rect::new(text.x0, text.y0 - extra, text.x1, text.y1 + extra)
            }
            _ => text,
        }
    }

    /// Document position of the character boundary `index` chars into the run.
    #[must_use]
    pub fn position_at(&self, index: usize) -> Option<TextPosition> {
        let source = self.source.as_ref()?;
        let index = index.min(self.char_len());
        Some(TextPosition::new(source.paragraph, source.offset + index))
    }

    /// Returns `true` if `position` falls on a boundary inside or at either end of the run.
    #[must_use]
    pub fn contains_position(&self, position: TextPosition) -> bool {
        self.source.as_ref().is_some_and(|source| {
            source.paragraph == position.paragraph
                && position.offset >= source.offset
                && position.offset <= source.offset + self.char_len()
        })
    }
}

/// A filled rectangle with an optional outline.
#[derive(Clone, Debug)]
pub struct FilledRect {
    /// Rectangle in page-local coordinates.
    pub rect: Rect,
    /// Fill color.
    pub fill: Color,
    /// Outline color and width.
    pub stroke: Option<(Color, f64)>,
}

/// A raster image placed on the page.
#[derive(Clone, Debug)]
pub struct ImageItem {
    /// Opaque backend resource id used to fetch the bitmap.
    pub resource_id: String,
    /// Destination rectangle in page-local coordinates.
    pub rect: Rect,
}

/// Selection highlight rectangles.
#[derive(Clone, Debug)]
pub struct SelectionRects {
    /// Highlight rectangles in page-local coordinates.
    pub rects: Vec<Rect>,
    /// Highlight color, usually translucent.
    pub color: Color,
}

/// A straight line segment.
#[derive(Clone, Debug)]
pub struct LineSegment {
    /// Segment end points.
    pub line: Line,
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: f64,
    /// Dash pattern as `[on, off]`, solid when absent.
    pub dash: Option<[f64; 2]>,
}

/// Background of a table cell.
#[derive(Clone, Debug)]
pub struct TableCell {
    /// Cell rectangle.
    pub rect: Rect,
    /// Background color, transparent cells draw nothing.
    pub background: Option<Color>,
}

/// One edge of a table border.
#[derive(Clone, Debug)]
pub struct TableBorder {
    /// Border edge.
    pub line: Line,
    /// Border color.
    pub color: Color,
    /// Border width.
    pub width: f64,
}

/// Outline of a vector shape.
#[derive(Copy, Clone, Debug)]
pub struct ShapeStroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: f64,
}

/// Drop shadow of a vector shape.
#[derive(Copy, Clone, Debug)]
pub struct ShapeShadow {
    /// Shadow offset.
    pub offset: Vec2,
    /// Blur radius.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
}

/// A vector shape.
#[derive(Clone, Debug)]
pub struct VectorShape {
    /// Outline in page-local coordinates, before rotation and flips.
    pub path: BezPath,
    /// Bounding box of `path`; rotation and flips pivot around its centre.
    pub bounds: Rect,
    /// Fill color.
    pub fill: Option<Color>,
    /// Outline.
    pub stroke: Option<ShapeStroke>,
    /// Drop shadow.
    pub shadow: Option<ShapeShadow>,
    /// Clockwise rotation in radians.
    pub rotation: f64,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
}

impl VectorShape {
    /// Transform applying rotation and flips around the centre of `bounds`.
    #[must_use]
    pub fn local_transform(&self) -> Affine {
        let center = self.bounds.center().to_vec2();
        let sx = if self.flip_x { -1.0 } else { 1.0 };
        let sy = if self.flip_y { -1.0 } else { 1.0 };
        Affine::translate(center)
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-center)
    }
}

/// Line metadata attached to a caret so its x can be measured locally.
#[derive(Clone, Debug)]
pub struct CaretLine {
    /// Raw text of the visual line.
    pub text: String,
    /// Page-local x of the line's first character.
    pub start_x: f64,
    /// Caret position as a character index into `text`.
    pub char_index: usize,
    /// Font used for measuring `text`.
    pub font: FontSpec,
}

/// Caret position as placed by the layout engine.
#[derive(Clone, Debug)]
pub struct CaretMarker {
    /// Caret x as computed by the layout engine.
    pub x: f64,
    /// Top of the caret.
    pub top: f64,
    /// Caret height.
    pub height: f64,
    /// Document position the caret stands at.
    pub position: TextPosition,
    /// Line metadata for measuring x locally.
    pub line: Option<CaretLine>,
}
