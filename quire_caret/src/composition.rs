// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input-method composition session state.

use alloc::string::String;

use quire_scene::TextPosition;

/// The provisional text of an input-method session, or no session.
///
/// Created on composition start, mutated on each update, cleared on
/// composition end. Never carried across documents.
///
/// ```
/// use quire_caret::CompositionState;
/// use quire_scene::TextPosition;
///
/// let mut ime = CompositionState::default();
/// ime.start(TextPosition::new(2, 5));
/// assert!(ime.update("にほ"));
/// assert_eq!(ime.text(), Some("にほ"));
/// assert_eq!(ime.end().as_deref(), Some("にほ"));
/// assert!(!ime.is_composing());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CompositionState {
    /// No session.
    #[default]
    Idle,
    /// A session is open.
    Composing {
        /// Provisional text, not yet committed.
        text: String,
        /// Where the text will be inserted.
        start: TextPosition,
    },
}

impl CompositionState {
    /// Opens a session at `start`, discarding any open one.
    pub fn start(&mut self, start: TextPosition) {
        *self = Self::Composing {
            text: String::new(),
            start,
        };
    }

    /// Replaces the provisional text. Returns `false` if no session is open.
    pub fn update(&mut self, new_text: &str) -> bool {
        match self {
            Self::Idle => false,
            Self::Composing { text, .. } => {
                text.clear();
                text.push_str(new_text);
                true
            }
        }
    }

    /// Closes the session, returning its last provisional text.
    pub fn end(&mut self) -> Option<String> {
        match core::mem::take(self) {
            Self::Idle => None,
            Self::Composing { text, .. } => Some(text),
        }
    }

    /// Returns `true` while a session is open.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        matches!(self, Self::Composing { .. })
    }

    /// Provisional text of the open session.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Composing { text, .. } => Some(text),
        }
    }

    /// Insertion point of the open session.
    #[must_use]
    pub fn start_position(&self) -> Option<TextPosition> {
        match self {
            Self::Idle => None,
            Self::Composing { start, .. } => Some(*start),
        }
    }
}
