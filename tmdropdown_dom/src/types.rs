// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, tags, and element data.

use alloc::boxed::Box;
use alloc::string::String;
use kurbo::Rect;
use smallvec::SmallVec;

/// Identifier for a node in the document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Opaque key stored on an element to mark it as bound to a higher-level object.
///
/// The document never interprets the key; it only stores and clears it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BindingKey(pub u64);

/// Element tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The document body.
    Body,
    /// A selectable-list input.
    Select,
    /// An option inside a select or option group.
    Option,
    /// A labeled option group.
    OptGroup,
    /// Generic block container.
    Div,
    /// Anchor; focusable when it carries a tab index.
    Anchor,
    /// Unordered list.
    Ul,
    /// List item.
    Li,
    /// Any other element, by lowercase name.
    Other(Box<str>),
}

impl Tag {
    /// Lowercase element name.
    pub fn name(&self) -> &str {
        match self {
            Self::Body => "body",
            Self::Select => "select",
            Self::Option => "option",
            Self::OptGroup => "optgroup",
            Self::Div => "div",
            Self::Anchor => "a",
            Self::Ul => "ul",
            Self::Li => "li",
            Self::Other(name) => name,
        }
    }
}

/// Ordered list of class names without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList(SmallVec<[Box<str>; 4]>);

impl ClassList {
    /// Returns true if `class` is present.
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| &**c == class)
    }

    /// Iterate class names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| &**c)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no class is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds `class`; returns false if it was already present.
    pub(crate) fn add(&mut self, class: &str) -> bool {
        if class.is_empty() || self.contains(class) {
            return false;
        }
        self.0.push(class.into());
        true
    }

    /// Removes `class`; returns false if it was absent.
    pub(crate) fn remove(&mut self, class: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| &**c != class);
        before != self.0.len()
    }
}

/// Inline style declarations in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style(SmallVec<[(Box<str>, String); 4]>);

impl Style {
    /// Value of `property`, if declared.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| &**p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(property, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (&**p, v.as_str()))
    }

    pub(crate) fn set(&mut self, property: &str, value: &str) -> bool {
        if value.is_empty() {
            return self.remove(property);
        }
        match self.0.iter_mut().find(|(p, _)| &**p == property) {
            Some((_, v)) if v == value => false,
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => {
                self.0.push((property.into(), value.into()));
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, property: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|(p, _)| &**p != property);
        before != self.0.len()
    }

    pub(crate) fn clear(&mut self) -> bool {
        let changed = !self.0.is_empty();
        self.0.clear();
        changed
    }
}

/// Per-element data.
///
/// Fields are read through accessors; all writes go through [`crate::Document`]
/// so that mutation observers see them.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) tag: Tag,
    pub(crate) classes: ClassList,
    pub(crate) style: Style,
    pub(crate) text: String,
    pub(crate) value: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) selected: bool,
    pub(crate) disabled: bool,
    pub(crate) multiple: bool,
    pub(crate) tab_index: i32,
    pub(crate) rect: Rect,
    pub(crate) scroll_top: f64,
    pub(crate) binding: Option<BindingKey>,
}

impl Element {
    pub(crate) fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: ClassList::default(),
            style: Style::default(),
            text: String::new(),
            value: None,
            label: None,
            selected: false,
            disabled: false,
            multiple: false,
            tab_index: -1,
            rect: Rect::ZERO,
            scroll_top: 0.0,
            binding: None,
        }
    }

    /// Element tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Class list.
    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    /// Inline style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Own text (not including descendants).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Option value. Falls back to the option's own text, like a native option.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }

    /// Group label.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    /// Option selectedness.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Disabled flag.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Multiple-selection flag of a select.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Tab index; `-1` when not in the tab order.
    pub fn tab_index(&self) -> i32 {
        self.tab_index
    }

    /// Layout rectangle in viewport coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Vertical scroll offset of the element's content.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Binding back-reference, if the element is bound.
    pub fn binding(&self) -> Option<BindingKey> {
        self.binding
    }
}
