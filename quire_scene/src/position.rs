// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// A position in the document: a paragraph and a character offset inside it.
///
/// Offsets count Unicode scalar values from the start of the paragraph.
/// Positions order by paragraph first, then by offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
    /// Zero-based paragraph index.
    pub paragraph: usize,
    /// Zero-based character offset within the paragraph.
    pub offset: usize,
}

impl TextPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(paragraph: usize, offset: usize) -> Self {
        Self { paragraph, offset }
    }
}

/// Where a hyperlink points.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// An external URL.
    Url(String),
    /// A named location inside the document.
    Bookmark(String),
}

/// Hyperlink reference carried by a glyph run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    /// The link destination.
    pub target: LinkTarget,
    /// Optional tooltip text.
    pub tooltip: Option<String>,
}

impl Hyperlink {
    /// Creates a link to an external URL.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            target: LinkTarget::Url(url.into()),
            tooltip: None,
        }
    }

    /// Creates a link to a named bookmark.
    #[must_use]
    pub fn bookmark(name: impl Into<String>) -> Self {
        Self {
            target: LinkTarget::Bookmark(name.into()),
            tooltip: None,
        }
    }
}
