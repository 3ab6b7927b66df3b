// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core event types: kinds, phases, dispatch entries, and outcomes.

use tmdropdown_dom::NodeId;

/// Keyboard keys the widget layer distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Any other key, by legacy key code.
    Other(u32),
}

impl Key {
    /// Map a legacy key code to a key.
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => Self::Enter,
            27 => Self::Escape,
            32 => Self::Space,
            38 => Self::ArrowUp,
            40 => Self::ArrowDown,
            other => Self::Other(other),
        }
    }
}

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Primary button click.
    Click,
    /// Mouse button pressed.
    MouseDown,
    /// Pointer entered an element.
    MouseOver,
    /// Pointer left an element.
    MouseOut,
    /// Key pressed.
    KeyDown(Key),
    /// Focus moved into an element.
    FocusIn,
    /// Focus left an element.
    FocusOut,
    /// An element or the page scrolled.
    Scroll,
    /// Pointer pressed (mouse, pen, or touch).
    PointerDown,
    /// Touch started.
    TouchStart,
    /// The window lost focus.
    WindowBlur,
    /// A form control value changed.
    Change,
}

impl EventKind {
    /// Listener registration key: the kind without its payload.
    pub fn event_type(self) -> EventType {
        match self {
            Self::Click => EventType::Click,
            Self::MouseDown => EventType::MouseDown,
            Self::MouseOver => EventType::MouseOver,
            Self::MouseOut => EventType::MouseOut,
            Self::KeyDown(_) => EventType::KeyDown,
            Self::FocusIn => EventType::FocusIn,
            Self::FocusOut => EventType::FocusOut,
            Self::Scroll => EventType::Scroll,
            Self::PointerDown => EventType::PointerDown,
            Self::TouchStart => EventType::TouchStart,
            Self::WindowBlur => EventType::WindowBlur,
            Self::Change => EventType::Change,
        }
    }

    /// Whether events of this kind bubble by default.
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Scroll | Self::WindowBlur)
    }
}

/// Event kind without payload, used to register listeners.
#[allow(missing_docs, reason = "Variants mirror `EventKind`.")]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseDown,
    MouseOver,
    MouseOut,
    KeyDown,
    FocusIn,
    FocusOut,
    Scroll,
    PointerDown,
    TouchStart,
    WindowBlur,
    Change,
}

/// An event aimed at a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// The node the event is aimed at.
    pub target: NodeId,
    /// Whether the event has a bubble phase.
    pub bubbles: bool,
}

impl Event {
    /// An event with the default bubbling behavior of its kind.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            bubbles: kind.bubbles(),
        }
    }

    /// Override bubbling.
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }
}

/// Propagation phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → parent of target.
    Capture,
    /// The target itself.
    Target,
    /// Parent of target → root.
    Bubble,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node visited in this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture step.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target step.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Handler result controlling propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Stop propagation after this step.
    Stop,
}

/// Parent relation used to reconstruct the root → target path.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` at a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A parent lookup for flat structures: every node is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}

impl<K, P: ParentLookup<K>> ParentLookup<K> for &P {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_key_codes_map_to_keys() {
        assert_eq!(Key::from_code(40), Key::ArrowDown);
        assert_eq!(Key::from_code(38), Key::ArrowUp);
        assert_eq!(Key::from_code(13), Key::Enter);
        assert_eq!(Key::from_code(32), Key::Space);
        assert_eq!(Key::from_code(27), Key::Escape);
        assert_eq!(Key::from_code(9), Key::Other(9));
    }

    #[test]
    fn scroll_and_window_blur_do_not_bubble() {
        assert!(!EventKind::Scroll.bubbles());
        assert!(!EventKind::WindowBlur.bubbles());
        assert!(EventKind::Change.bubbles());
        assert!(EventKind::KeyDown(Key::Enter).bubbles());
        assert_eq!(
            EventKind::KeyDown(Key::Escape).event_type(),
            EventType::KeyDown
        );
    }
}
