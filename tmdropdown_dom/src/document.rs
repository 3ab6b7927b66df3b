// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: node storage, structure, element updates, and queries.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::mutation::{MutationKind, MutationRecord, ObserverId, Observers};
use crate::types::{BindingKey, Element, NodeId, Tag};

/// An in-memory document.
///
/// Nodes live in a slot arena addressed by generational [`NodeId`]s. A node
/// is either attached (reachable from [`Document::body`]) or detached; detached
/// subtrees stay alive until [`Document::remove`] frees them, which is how a
/// subtree can be moved between parents without being rebuilt.
///
/// Every accessor tolerates stale identifiers: reads return `None` or an empty
/// value and writes are ignored.
///
/// ## Example
///
/// ```rust
/// use tmdropdown_dom::{Document, Tag};
///
/// let mut doc = Document::default();
/// let list = doc.create_element(Tag::Ul);
/// doc.append_child(doc.body(), list);
/// let item = doc.create_element(Tag::Li);
/// doc.set_text(item, "first");
/// doc.append_child(list, item);
///
/// assert!(doc.contains(doc.body(), item));
/// assert_eq!(doc.text_content(list), "first");
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    viewport: Size,
    focused: Option<NodeId>,
    observers: Observers,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub(crate) element: Element,
}

impl Node {
    fn new(generation: u32, tag: Tag) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element: Element::new(tag),
        }
    }
}

impl Document {
    /// Create a document containing only a body, with the given viewport size.
    pub fn new(viewport: Size) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 1),
            viewport,
            focused: None,
            observers: Observers::default(),
        };
        doc.body = doc.create_element(Tag::Body);
        doc
    }

    /// The body node. Always alive.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Viewport size used for fixed positioning.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Update the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Allocate a new detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation currently stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Tag of a live node.
    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.element(id).map(Element::tag)
    }

    // --- structure ---

    /// Append `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    ///
    /// Returns false (and changes nothing) if either node is stale or if the
    /// move would make a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.after_insert(parent, child);
        true
    }

    /// Insert `node` directly after `reference` under the same parent.
    ///
    /// Returns false if `reference` has no parent or the move is invalid.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent_of(reference) else {
            return false;
        };
        if reference == node || !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        let siblings = &mut self.node_mut(parent).children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, node);
        self.node_mut(node).parent = Some(parent);
        self.after_insert(parent, node);
        true
    }

    /// Detach `node` from its parent. The subtree stays alive.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent_of(node) else {
            return;
        };
        self.record(parent, MutationKind::ChildList);
        let select = self.reset_target(parent, node);
        self.node_mut(parent).children.retain(|c| *c != node);
        self.node_mut(node).parent = None;
        if self.focused.is_some_and(|f| self.contains(node, f)) {
            self.focused = None;
        }
        if let Some(select) = select {
            self.ask_for_reset(select);
        }
    }

    /// Remove a node and free its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    /// Parent of a live node, or `None` for detached roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children_of(id).first().copied()
    }

    /// Last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children_of(id).last().copied()
    }

    /// Next sibling under the same parent.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Previous sibling under the same parent.
    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&id| id == node)?;
        if pos > 0 {
            siblings.get(pos - 1).copied()
        } else {
            None
        }
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Returns true if `node` is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    /// Next node in depth-first (document) order, staying inside `root`'s subtree.
    ///
    /// Does not wrap around.
    pub fn next_depth_first(&self, root: NodeId, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(first) = self.first_child(current) {
            return Some(first);
        }
        let mut node = current;
        while node != root {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent_of(node)?;
        }
        None
    }

    /// All descendants of `root` in document order (excluding `root`).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.next_depth_first(root, root);
        while let Some(id) = cur {
            out.push(id);
            cur = self.next_depth_first(root, id);
        }
        out
    }

    /// Concatenated text of the node and all of its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(n) = self.node_opt(id) {
            out.push_str(&n.element.text);
            for d in self.descendants(id) {
                out.push_str(&self.node(d).element.text);
            }
        }
        out
    }

    // --- element data ---

    /// Replace the node's own text.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.text != text
        {
            n.element.text = text.into();
            self.record(id, MutationKind::CharacterData);
        }
    }

    /// Add a class name. Empty names are ignored.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.classes.add(class)
        {
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Remove a class name.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.classes.remove(class)
        {
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Add or remove a class name depending on `on`.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Returns true if the node carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    /// Set an inline style property. An empty value removes the declaration.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.style.set(property, value)
        {
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Inline style property value.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style.get(property))
    }

    /// Drop every inline style declaration.
    pub fn clear_style(&mut self, id: NodeId) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.style.clear()
        {
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Set the value attribute of an option.
    pub fn set_value_attr(&mut self, id: NodeId, value: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.value.as_deref() != Some(value)
        {
            n.element.value = Some(value.into());
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Set the label of an option group.
    pub fn set_label(&mut self, id: NodeId, label: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.label.as_deref() != Some(label)
        {
            n.element.label = Some(label.into());
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Set the disabled flag.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.disabled != disabled
        {
            n.element.disabled = disabled;
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Set the multiple-selection flag of a select.
    pub fn set_multiple(&mut self, id: NodeId, multiple: bool) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.multiple != multiple
        {
            n.element.multiple = multiple;
            self.record(id, MutationKind::Attributes);
            if !multiple {
                self.ask_for_reset(id);
            }
        }
    }

    /// Set the tab index.
    pub fn set_tab_index(&mut self, id: NodeId, tab_index: i32) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.tab_index != tab_index
        {
            n.element.tab_index = tab_index;
            self.record(id, MutationKind::Attributes);
        }
    }

    // --- layout and scrolling ---

    /// Set the layout rectangle (viewport coordinates) of a node.
    ///
    /// The document performs no layout of its own; hosts feed measured boxes in here.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.rect = rect;
        }
    }

    /// Layout rectangle of a node, or [`Rect::ZERO`] for stale ids.
    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        self.element(id).map(Element::rect).unwrap_or(Rect::ZERO)
    }

    /// Vertical scroll offset of a node's content.
    pub fn scroll_top(&self, id: NodeId) -> f64 {
        self.element(id).map(Element::scroll_top).unwrap_or(0.0)
    }

    /// Set the vertical scroll offset. Negative offsets clamp to zero.
    pub fn set_scroll_top(&mut self, id: NodeId, offset: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.scroll_top = offset.max(0.0);
        }
    }

    // --- focus ---

    /// Move focus to a live, connected node. Returns false otherwise.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Currently focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&f| self.is_alive(f))
    }

    // --- binding ---

    /// Binding key stored on a node.
    pub fn binding(&self, id: NodeId) -> Option<BindingKey> {
        self.element(id).and_then(Element::binding)
    }

    /// Store a binding key on a node, replacing any previous key.
    pub fn bind(&mut self, id: NodeId, key: BindingKey) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.binding = Some(key);
        }
    }

    /// Clear the binding key of a node.
    pub fn unbind(&mut self, id: NodeId) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.binding = None;
        }
    }

    // --- mutation observation ---

    /// Start recording changes inside the subtree rooted at `target`.
    pub fn observe(&mut self, target: NodeId) -> ObserverId {
        self.observers.add(target)
    }

    /// Stop an observer and drop its pending records.
    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers.remove(observer)
    }

    /// Drain the pending records of an observer.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer)
            .map(|o| core::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Returns true if the observer has records waiting.
    pub fn has_records(&self, observer: ObserverId) -> bool {
        self.observers
            .list
            .iter()
            .any(|o| o.id == observer && !o.records.is_empty())
    }

    // --- internals ---

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn record(&mut self, target: NodeId, kind: MutationKind) {
        if self.observers.is_empty() {
            return;
        }
        let hits: SmallVec<[usize; 2]> = self
            .observers
            .list
            .iter()
            .enumerate()
            .filter(|(_, o)| self.contains(o.target, target))
            .map(|(i, _)| i)
            .collect();
        for i in hits {
            self.observers.list[i]
                .records
                .push(MutationRecord { target, kind });
        }
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        self.is_alive(parent)
            && self.is_alive(child)
            && child != self.body
            && !self.contains(child, parent)
    }

    fn after_insert(&mut self, parent: NodeId, child: NodeId) {
        self.record(parent, MutationKind::ChildList);
        if let Some(select) = self.reset_target(parent, child) {
            self.ask_for_reset(select);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}
