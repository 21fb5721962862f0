// Copyright 2025 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events in, commands out.
//!
//! The controller never edits the document itself. Clicks become
//! [`Command`]s sent to a [`CommandSink`]; keys and input-method events go
//! to an [`InputHandler`], which answers with an [`InputOutcome`] describing
//! how the composition session changed. Closures implement all the
//! single-method traits here.

use alloc::string::String;
use core::time::Duration;

use quire_caret::OverlayFrame;
use quire_render::RenderReport;
use quire_scene::Hyperlink;

bitflags::bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Windows.
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Returns `true` if the platform link-follow modifier (Ctrl or Cmd) is held.
    #[must_use]
    pub fn link_modifier(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }

    /// Returns `true` if the wheel should zoom instead of scroll.
    #[must_use]
    pub fn zoom_modifier(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

/// A request for the document model, produced by pointer input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move the cursor.
    SetCursorPosition {
        /// Paragraph index.
        paragraph: usize,
        /// Character offset inside the paragraph.
        offset: usize,
    },
    /// A hyperlink was clicked.
    ActivateHyperlink {
        /// The link.
        hyperlink: Hyperlink,
        /// Whether the link-follow modifier was held.
        modifier_held: bool,
    },
}

/// Receives commands produced by the canvas.
pub trait CommandSink {
    /// Handles one command.
    fn dispatch(&mut self, command: Command);
}

impl<F: FnMut(Command)> CommandSink for F {
    fn dispatch(&mut self, command: Command) {
        self(command);
    }
}

/// A key press, as the host reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key name, e.g. `"a"` or `"ArrowLeft"`.
    pub key: String,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a key event.
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// An input-method event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositionEvent {
    /// A session opened.
    Start,
    /// The provisional text changed.
    Update(String),
    /// The session closed.
    End,
}

/// How the composition session should change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositionUpdate {
    /// Open a session at the caret.
    Start,
    /// Replace the provisional text.
    Text(String),
    /// Close the session.
    End,
}

impl From<&CompositionEvent> for CompositionUpdate {
    fn from(event: &CompositionEvent) -> Self {
        match event {
            CompositionEvent::Start => Self::Start,
            CompositionEvent::Update(text) => Self::Text(text.clone()),
            CompositionEvent::End => Self::End,
        }
    }
}

/// What an [`InputHandler`] did with an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// Change to apply to the composition session, if any.
    pub composition: Option<CompositionUpdate>,
    /// The document was edited; a new render model will follow.
    pub edited: bool,
}

/// Turns keyboard and input-method events into edits.
pub trait InputHandler {
    /// Handles a key press.
    fn key_down(&mut self, event: &KeyEvent) -> InputOutcome;

    /// Handles an input-method event.
    ///
    /// The default applies the event as is and edits nothing.
    fn composition(&mut self, event: &CompositionEvent) -> InputOutcome {
        InputOutcome {
            composition: Some(event.into()),
            edited: false,
        }
    }
}

/// Told when the canvas container changes size.
pub trait ResizeObserver {
    /// The container is now `width` by `height` screen pixels.
    fn container_resized(&mut self, width: f64, height: f64);
}

impl<F: FnMut(f64, f64)> ResizeObserver for F {
    fn container_resized(&mut self, width: f64, height: f64) {
        self(width, height);
    }
}

/// Mouse cursor the host should show.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    /// Arrow, outside the pages.
    #[default]
    Default,
    /// I-beam, over a page.
    Text,
    /// Hand, over a hyperlink.
    Pointer,
}

/// Summary of one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Time the frame was produced for.
    pub now: Duration,
    /// Content pass.
    pub content: RenderReport,
    /// Caret and composition pass.
    pub overlay: OverlayFrame,
    /// When the caret blink next toggles, if it will.
    pub next_blink: Option<Duration>,
}

/// Receives every frame the controller produces.
pub trait FrameObserver {
    /// Called after each frame.
    fn frame(&mut self, info: &FrameInfo);
}

impl<F: FnMut(&FrameInfo)> FrameObserver for F {
    fn frame(&mut self, info: &FrameInfo) {
        self(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_modifier_is_ctrl_or_meta() {
        assert!(!Modifiers::empty().link_modifier());
        assert!(!(Modifiers::SHIFT | Modifiers::ALT).link_modifier());
        assert!(Modifiers::CTRL.link_modifier());
        assert!((Modifiers::META | Modifiers::SHIFT).link_modifier());
    }

    #[test]
    fn default_composition_handling_applies_the_event() {
        struct Keys;
        impl InputHandler for Keys {
            fn key_down(&mut self, _event: &KeyEvent) -> InputOutcome {
                InputOutcome::default()
            }
        }
        let outcome = Keys.composition(&CompositionEvent::Update("か".into()));
        assert_eq!(outcome.composition, Some(CompositionUpdate::Text("か".into())));
        assert!(!outcome.edited);
    }
}
