// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dropdown instance: lifecycle state machine and interaction handling.
//!
//! ## State
//!
//! An instance is `Closed`, `Open`, or `Destroyed`. The state lives in the
//! instance; wrapper classes are derived from it after every transition and are
//! never read back.
//!
//! ## Borrowing
//!
//! [`Dropdown`] is a cheap handle over shared state. Operations hold the state
//! borrow only between calls out: hooks, event dispatch, and nested operations
//! always run with the borrow released, so they may freely query or drive the
//! same instance.

use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use kurbo::Rect;
use tmdropdown_dom::{BindingKey, Document, NodeId, ObserverId, Tag};
use tmdropdown_events::{Event, EventKind, Key};
use tracing::{debug, warn};

use crate::builder::{self, BuildParams, Built};
use crate::classes::{self, WrapperState};
use crate::config::{OptionKey, OptionValue, Options};
use crate::delegator::{Delegator, Registry};
use crate::error::Error;
use crate::hooks::{Cancelable, Hook, HookArgs, Notification};
use crate::navigation::{self, Direction};
use crate::page::Page;
use crate::position::{self, Placement};

/// What [`Dropdown::select`] should select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Assign this value to the source, like setting a native select's value.
    Value(String),
    /// An option element. Options of the source are toggled (multiple) or picked
    /// (single); options from elsewhere contribute their value.
    Option(NodeId),
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<NodeId> for Selection {
    fn from(option: NodeId) -> Self {
        Self::Option(option)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Lifecycle {
    Closed,
    Open,
    Destroyed,
}

#[derive(Debug)]
pub(crate) struct State {
    key: BindingKey,
    source: NodeId,
    options: Options,
    lifecycle: Lifecycle,
    dom: Built,
    placement: Option<Placement>,
    focused: bool,
    /// Source option carrying the hover marker.
    hovered: Option<NodeId>,
    list_clicked: bool,
    last_scroll: Option<f64>,
    observer: Option<ObserverId>,
    saved_visibility: Option<String>,
    saved_position: Option<String>,
    registry: Weak<RefCell<Registry>>,
}

impl State {
    fn is_multiple(&self, doc: &Document) -> bool {
        doc.element(self.source).is_some_and(|e| e.is_multiple())
    }

    fn sync_wrapper(&self, doc: &mut Document) {
        let open = self.lifecycle == Lifecycle::Open;
        let mut state = WrapperState::empty();
        state.set(WrapperState::MULTIPLE, self.is_multiple(doc));
        state.set(WrapperState::OPEN, open);
        state.set(
            WrapperState::OPEN_TOP,
            open && self.placement == Some(Placement::Above),
        );
        state.set(WrapperState::FOCUSED, self.focused);
        state.apply(doc, self.dom.wrapper);
    }

    fn set_hover(&mut self, doc: &mut Document, option: Option<NodeId>) {
        for &item in self.dom.items.keys() {
            doc.remove_class(item, classes::HOVER);
        }
        if let Some(item) = option.and_then(|o| self.dom.item_for(o)) {
            doc.add_class(item, classes::HOVER);
        }
        self.hovered = option;
    }

    /// Option item under `node`, with its backing option.
    fn item_at(&self, doc: &Document, node: NodeId) -> Option<(NodeId, NodeId)> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(&option) = self.dom.items.get(&n) {
                return Some((n, option));
            }
            if n == self.dom.list {
                return None;
            }
            cur = doc.parent_of(n);
        }
        None
    }

    fn current_item_at(&self, doc: &Document, node: NodeId) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(&option) = self.dom.current_items.get(&n) {
                return Some(option);
            }
            if n == self.dom.current {
                return None;
            }
            cur = doc.parent_of(n);
        }
        None
    }

    fn selected_item(&self, doc: &Document) -> Option<NodeId> {
        if self.is_multiple(doc) {
            return None;
        }
        navigation::option_items(doc, self.dom.list)
            .into_iter()
            .find(|&item| doc.has_class(item, classes::SELECTED))
    }

    fn hovered_item(&self, doc: &Document) -> Option<NodeId> {
        self.hovered
            .and_then(|o| self.dom.item_for(o))
            .or_else(|| self.selected_item(doc))
    }
}

/// Shared handle to a dropdown bound to a source select.
///
/// Handles compare equal when they refer to the same instance.
#[derive(Clone)]
pub struct Dropdown {
    inner: Rc<RefCell<State>>,
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.inner.borrow();
        f.debug_struct("Dropdown")
            .field("source", &st.source)
            .field("lifecycle", &st.lifecycle)
            .field("focused", &st.focused)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Dropdown {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Dropdown {}

fn build_dom(
    doc: &mut Document,
    source: NodeId,
    options: &Options,
    hovered: Option<NodeId>,
) -> Built {
    let placeholder = options.text(OptionKey::Placeholder);
    let empty_text = options.text(OptionKey::EmptyText);
    let wrapper_class = options.text(OptionKey::WrapperClass);
    let width = resolve_width(doc, source, options);
    let params = BuildParams {
        placeholder: &placeholder,
        empty_text: &empty_text,
        width: &width,
        wrapper_class: &wrapper_class,
        hovered,
    };
    builder::build(doc, source, &params)
}

fn resolve_width(doc: &Document, source: NodeId, options: &Options) -> String {
    match options.get(OptionKey::Width) {
        Some(OptionValue::Text(w)) if !w.is_empty() => w,
        _ => format!("{}px", doc.bounding_rect(source).width()),
    }
}

impl Dropdown {
    /// Bind a dropdown to `source` using the page's delegator.
    ///
    /// Fails with [`Error::NotASelect`] for anything but a select, with
    /// [`Error::Detached`] when the select has no parent, and with
    /// [`Error::AlreadyBound`] (after a warning) when a dropdown is already bound.
    pub fn new(page: &mut Page, source: NodeId, options: Options) -> Result<Self, Error> {
        let delegator = page.delegator().clone();
        Self::with_delegator(page, source, options, &delegator)
    }

    /// Bind a dropdown to `source`, registering it with an explicit delegator.
    pub fn with_delegator(
        page: &mut Page,
        source: NodeId,
        options: Options,
        delegator: &Delegator,
    ) -> Result<Self, Error> {
        let doc = page.document_mut();
        match doc.tag(source) {
            Some(Tag::Select) => {}
            other => {
                return Err(Error::NotASelect {
                    tag: other.map(|t| String::from(t.name())).unwrap_or_default(),
                });
            }
        }
        if doc.binding(source).is_some() {
            warn!(?source, "dropdown already initialized on this element");
            return Err(Error::AlreadyBound);
        }
        if doc.parent_of(source).is_none() {
            return Err(Error::Detached);
        }

        let dom = build_dom(doc, source, &options, None);
        doc.set_rect(dom.wrapper, doc.bounding_rect(source));
        let saved_visibility = doc.style(source, "visibility").map(String::from);
        let saved_position = doc.style(source, "position").map(String::from);
        doc.set_style(source, "visibility", "hidden");
        doc.set_style(source, "position", "absolute");
        doc.insert_after(source, dom.wrapper);

        let key = delegator.issue_key();
        doc.bind(source, key);
        let observer = options.flag(OptionKey::Observe).then(|| doc.observe(source));

        let dropdown = Self {
            inner: Rc::new(RefCell::new(State {
                key,
                source,
                options,
                lifecycle: Lifecycle::Closed,
                dom,
                placement: None,
                focused: false,
                hovered: None,
                list_clicked: false,
                last_scroll: None,
                observer,
                saved_visibility,
                saved_position,
                registry: delegator.downgrade(),
            })),
        };
        delegator.add(&dropdown);
        debug!(?source, observing = observer.is_some(), "dropdown rendered");
        dropdown.notify(page.document(), Notification::AfterRendered);
        Ok(dropdown)
    }

    // --- queries ---

    /// Source select.
    pub fn source(&self) -> NodeId {
        self.inner.borrow().source
    }

    /// Binding key stored on the source.
    pub fn key(&self) -> BindingKey {
        self.inner.borrow().key
    }

    /// Synthesized wrapper.
    pub fn wrapper(&self) -> NodeId {
        self.inner.borrow().dom.wrapper
    }

    /// Current-value display.
    pub fn current(&self) -> NodeId {
        self.inner.borrow().dom.current
    }

    /// Option list.
    pub fn option_list(&self) -> NodeId {
        self.inner.borrow().dom.list
    }

    /// Mutation observer on the source, when observation is enabled.
    pub fn observer(&self) -> Option<ObserverId> {
        self.inner.borrow().observer
    }

    /// Returns true while the option list is open.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().lifecycle == Lifecycle::Open
    }

    /// Returns true once [`Dropdown::destroy`] succeeded.
    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().lifecycle == Lifecycle::Destroyed
    }

    /// Returns true when the source has no options or groups.
    pub fn is_empty(&self, doc: &Document) -> bool {
        builder::entry_count(doc, self.source()) == 0
    }

    /// Returns true for a multiple-selection source.
    pub fn is_multiple(&self, doc: &Document) -> bool {
        self.inner.borrow().is_multiple(doc)
    }

    /// Item carrying the selected class. Always `None` for multiple selection.
    pub fn selected_item(&self, doc: &Document) -> Option<NodeId> {
        self.inner.borrow().selected_item(doc)
    }

    /// Item carrying the hover marker, falling back to the selected item.
    pub fn hovered_item(&self, doc: &Document) -> Option<NodeId> {
        self.inner.borrow().hovered_item(doc)
    }

    /// Source option backing an option item.
    pub fn option_of(&self, item: NodeId) -> Option<NodeId> {
        self.inner.borrow().dom.items.get(&item).copied()
    }

    /// Returns true if `node` is inside the wrapper or the option list.
    pub fn is_event_target(&self, doc: &Document, node: NodeId) -> bool {
        let st = self.inner.borrow();
        doc.contains(st.dom.wrapper, node) || doc.contains(st.dom.list, node)
    }

    /// Instance override, else default. `width` falls back to the source's measured width.
    pub fn get_option(&self, doc: &Document, key: OptionKey) -> Option<OptionValue> {
        let st = self.inner.borrow();
        match key {
            OptionKey::Width => Some(OptionValue::Text(resolve_width(doc, st.source, &st.options))),
            _ => st.options.get(key),
        }
    }

    /// Override an option for this instance. Takes effect on the next rebuild,
    /// except `closeOnScroll`, which is read on every scroll.
    pub fn set_option(&self, key: OptionKey, value: impl Into<OptionValue>) {
        self.inner.borrow_mut().options.set(key, value);
    }

    pub(crate) fn close_on_scroll(&self) -> bool {
        self.inner.borrow().options.flag(OptionKey::CloseOnScroll)
    }

    // --- lifecycle ---

    /// Open the option list. See [`Dropdown::open_at`].
    pub fn open(&self, page: &mut Page) -> bool {
        self.open_at(page, None)
    }

    /// Open the option list and scroll it to `scroll`, else to the remembered
    /// offset, else so the selected item is centered.
    ///
    /// Does nothing for an empty source or when `before_open` cancels. Opening an
    /// already open list only repositions and rescrolls it.
    pub fn open_at(&self, page: &mut Page, scroll: Option<f64>) -> bool {
        if self.refuse_destroyed("open") {
            return false;
        }
        if self.is_empty(page.document()) {
            return false;
        }
        if !self.is_open()
            && self.run_hook(page.document(), Cancelable::BeforeOpen, None) == Hook::Cancel
        {
            return false;
        }

        let mut st = self.inner.borrow_mut();
        let doc = page.document_mut();
        let (wrapper, list) = (st.dom.wrapper, st.dom.list);
        st.lifecycle = Lifecycle::Open;
        let body = doc.body();
        doc.append_child(body, list);
        st.placement = Some(position::reposition(doc, wrapper, list));
        st.sync_wrapper(doc);

        let offset = scroll.or(st.last_scroll).unwrap_or_else(|| {
            navigation::option_items(doc, list)
                .into_iter()
                .find(|&item| doc.has_class(item, classes::SELECTED))
                .map_or(0.0, |item| navigation::centered_offset(doc, list, item))
        });
        doc.set_scroll_top(list, offset);
        debug!(source = ?st.source, offset, "dropdown opened");
        true
    }

    /// Close the option list and move it back under the wrapper.
    ///
    /// Does nothing when already closed or when `before_close` cancels.
    pub fn close(&self, page: &mut Page) -> bool {
        if self.refuse_destroyed("close") || !self.is_open() {
            return false;
        }
        if self.run_hook(page.document(), Cancelable::BeforeClose, None) == Hook::Cancel {
            return false;
        }

        let mut st = self.inner.borrow_mut();
        let doc = page.document_mut();
        let (wrapper, list) = (st.dom.wrapper, st.dom.list);
        if st.is_multiple(doc) {
            st.last_scroll = Some(doc.scroll_top(list));
        }
        st.lifecycle = Lifecycle::Closed;
        st.placement = None;
        doc.remove_class(list, classes::OPTION_LIST_TOP);
        doc.append_child(wrapper, list);
        doc.clear_style(list);
        st.sync_wrapper(doc);
        debug!(source = ?st.source, "dropdown closed");
        true
    }

    /// Open when closed, close when open.
    pub fn toggle(&self, page: &mut Page) -> bool {
        if self.is_open() {
            self.close(page)
        } else {
            self.open(page)
        }
    }

    /// Recompute the position of an open list. Returns `None` when closed.
    pub fn reposition(&self, page: &mut Page) -> Option<Placement> {
        if self.refuse_destroyed("reposition") || !self.is_open() {
            return None;
        }
        let mut st = self.inner.borrow_mut();
        let doc = page.document_mut();
        let placement = position::reposition(doc, st.dom.wrapper, st.dom.list);
        st.placement = Some(placement);
        st.sync_wrapper(doc);
        Some(placement)
    }

    /// Discard the synthesized tree and rebuild it from the source.
    ///
    /// The rebuilt dropdown is closed. Layout measured for the old wrapper and
    /// list carries over to the new nodes.
    pub fn refresh(&self, page: &mut Page) -> bool {
        if self.refuse_destroyed("refresh") {
            return false;
        }
        {
            let mut st = self.inner.borrow_mut();
            let doc = page.document_mut();
            if doc.parent_of(st.source).is_none() {
                warn!(source = ?st.source, "source is detached; refresh skipped");
                return false;
            }
            let wrapper_rect = doc.bounding_rect(st.dom.wrapper);
            let list_height = doc.bounding_rect(st.dom.list).height();
            doc.remove(st.dom.list);
            doc.remove(st.dom.wrapper);

            if st.hovered.is_some_and(|o| !doc.contains(st.source, o)) {
                st.hovered = None;
            }
            let dom = build_dom(doc, st.source, &st.options, st.hovered);
            doc.set_rect(dom.wrapper, wrapper_rect);
            doc.set_rect(
                dom.list,
                Rect::new(0.0, 0.0, wrapper_rect.width(), list_height),
            );
            doc.insert_after(st.source, dom.wrapper);

            st.dom = dom;
            st.lifecycle = Lifecycle::Closed;
            st.placement = None;
            st.focused = false;
            st.list_clicked = false;
            st.sync_wrapper(doc);
            debug!(source = ?st.source, "dropdown refreshed");
        }
        self.notify(page.document(), Notification::AfterRefresh);
        true
    }

    /// Apply a selection to the source, optionally rebuild, and dispatch a
    /// bubbling change event on the source.
    ///
    /// When `before_option_selected` cancels nothing changes and no event fires.
    pub fn select(&self, page: &mut Page, selection: impl Into<Selection>, refresh: bool) -> bool {
        if self.refuse_destroyed("select") {
            return false;
        }
        let selection = selection.into();
        if self.run_hook(
            page.document(),
            Cancelable::BeforeOptionSelected,
            Some(&selection),
        ) == Hook::Cancel
        {
            return false;
        }

        let source = self.source();
        let doc = page.document_mut();
        match &selection {
            Selection::Option(option)
                if doc.tag(*option) == Some(&Tag::Option) && doc.contains(source, *option) =>
            {
                let multiple = doc.element(source).is_some_and(|e| e.is_multiple());
                let selected = doc.element(*option).is_some_and(|e| e.is_selected());
                doc.set_selected(*option, !multiple || !selected);
            }
            Selection::Option(foreign) => {
                let value = doc
                    .element(*foreign)
                    .map(|e| String::from(e.value()))
                    .unwrap_or_default();
                doc.set_value(source, &value);
            }
            Selection::Value(value) => {
                doc.set_value(source, value);
            }
        }

        if refresh {
            self.refresh(page);
        }
        page.dispatch(Event::new(EventKind::Change, source));
        true
    }

    /// Move keyboard focus to the current-value display.
    pub fn focus(&self, page: &mut Page) -> bool {
        if self.refuse_destroyed("focus") {
            return false;
        }
        let current = self.current();
        page.focus(current)
    }

    /// Remove the synthesized tree, restore the source, and unbind.
    ///
    /// Does nothing when `before_destroy` cancels.
    pub fn destroy(&self, page: &mut Page) -> bool {
        if self.refuse_destroyed("destroy") {
            return false;
        }
        if self.run_hook(page.document(), Cancelable::BeforeDestroy, None) == Hook::Cancel {
            return false;
        }

        let registry = {
            let mut st = self.inner.borrow_mut();
            let doc = page.document_mut();
            let source = st.source;
            if let Some(observer) = st.observer.take() {
                doc.disconnect(observer);
            }
            doc.remove(st.dom.list);
            doc.remove(st.dom.wrapper);
            let visibility = st.saved_visibility.take().unwrap_or_default();
            let position = st.saved_position.take().unwrap_or_default();
            doc.set_style(source, "visibility", &visibility);
            doc.set_style(source, "position", &position);
            doc.unbind(source);
            st.lifecycle = Lifecycle::Destroyed;
            st.placement = None;
            st.focused = false;
            debug!(?source, "dropdown destroyed");
            st.registry.upgrade()
        };
        if let Some(registry) = registry {
            Delegator::from_registry(registry).remove(self);
        }
        true
    }

    // --- interaction ---

    /// React to an event aimed at this dropdown's tree.
    pub(crate) fn handle_event(&self, page: &mut Page, event: &Event) {
        if self.is_destroyed() {
            return;
        }
        let target = event.target;
        let (in_list, in_current, item, current_item) = {
            let st = self.inner.borrow();
            let doc = page.document();
            let in_list = doc.contains(st.dom.list, target);
            (
                in_list,
                doc.contains(st.dom.current, target),
                in_list.then(|| st.item_at(doc, target)).flatten(),
                st.current_item_at(doc, target),
            )
        };

        match event.kind {
            EventKind::Click => {
                if let Some(option) = current_item {
                    self.select(page, Selection::Option(option), true);
                    self.focus(page);
                } else if let Some((_, option)) = item {
                    self.pick(page, option);
                } else if in_current {
                    self.toggle(page);
                }
            }
            EventKind::MouseDown if in_list => {
                self.inner.borrow_mut().list_clicked = true;
            }
            EventKind::MouseOver if in_list => {
                let mut st = self.inner.borrow_mut();
                st.set_hover(page.document_mut(), item.map(|(_, option)| option));
            }
            EventKind::MouseOut => {
                let mut st = self.inner.borrow_mut();
                if let Some((_, option)) = item
                    && st.hovered == Some(option)
                {
                    st.set_hover(page.document_mut(), None);
                }
            }
            EventKind::KeyDown(key) => self.on_key(page, key),
            EventKind::FocusIn => {
                let mut st = self.inner.borrow_mut();
                st.focused = true;
                st.sync_wrapper(page.document_mut());
            }
            EventKind::FocusOut => {
                let clicked = core::mem::take(&mut self.inner.borrow_mut().list_clicked);
                if !clicked {
                    {
                        let mut st = self.inner.borrow_mut();
                        st.focused = false;
                        st.sync_wrapper(page.document_mut());
                    }
                    self.close(page);
                }
            }
            _ => {}
        }
    }

    fn on_key(&self, page: &mut Page, key: Key) {
        match key {
            Key::ArrowUp => self.navigate(page, Direction::Up),
            Key::ArrowDown => self.navigate(page, Direction::Down),
            Key::Enter | Key::Space => {
                if self.is_open() {
                    self.pick_hovered(page);
                } else {
                    self.open(page);
                }
            }
            Key::Escape => {
                self.close(page);
            }
            Key::Other(_) => {}
        }
    }

    /// Move the hover marker one enabled item in `direction`.
    ///
    /// A closed list opens instead. Single selection follows the marker; multiple
    /// selection only highlights and scrolls the item into the middle of the list.
    fn navigate(&self, page: &mut Page, direction: Direction) {
        if !self.is_open() {
            self.open(page);
            return;
        }
        let (option, multiple) = {
            let mut st = self.inner.borrow_mut();
            let doc = page.document_mut();
            let list = st.dom.list;
            let origin = st.hovered_item(doc);
            let Some(next) = navigation::next_item(doc, list, origin, direction) else {
                return;
            };
            let Some(&option) = st.dom.items.get(&next) else {
                return;
            };
            let multiple = st.is_multiple(doc);
            if multiple {
                st.set_hover(doc, Some(option));
                let offset = navigation::centered_offset(doc, list, next);
                doc.set_scroll_top(list, offset);
            }
            (option, multiple)
        };
        if multiple {
            return;
        }
        // The marker follows only a selection that went through.
        if !self.select(page, Selection::Option(option), true) {
            return;
        }
        self.inner.borrow_mut().set_hover(page.document_mut(), Some(option));
        self.focus(page);
        self.open(page);
    }

    fn pick_hovered(&self, page: &mut Page) {
        let option = {
            let st = self.inner.borrow();
            st.hovered_item(page.document())
                .and_then(|item| st.dom.items.get(&item).copied())
        };
        if let Some(option) = option {
            self.inner.borrow_mut().hovered = Some(option);
            self.pick(page, option);
        }
    }

    /// Select an option from the list the way a user does.
    fn pick(&self, page: &mut Page, option: NodeId) {
        let doc = page.document();
        if doc.element(option).is_none_or(|e| e.is_disabled()) {
            return;
        }
        let old_scroll = doc.scroll_top(self.option_list());
        let multiple = self.is_multiple(doc);
        self.select(page, Selection::Option(option), true);
        if multiple {
            self.open_at(page, Some(old_scroll));
        }
        self.focus(page);
    }

    // --- helpers ---

    fn refuse_destroyed(&self, op: &'static str) -> bool {
        let st = self.inner.borrow();
        if st.lifecycle == Lifecycle::Destroyed {
            warn!(source = ?st.source, op, "dropdown was destroyed");
            return true;
        }
        false
    }

    fn run_hook(&self, doc: &Document, which: Cancelable, selection: Option<&Selection>) -> Hook {
        let (hook, source) = {
            let st = self.inner.borrow();
            (st.options.hooks.cancelable(which), st.source)
        };
        let Some(hook) = hook else {
            return Hook::Proceed;
        };
        let verdict = hook(&HookArgs {
            source,
            document: doc,
            selection,
        });
        if verdict == Hook::Cancel {
            debug!(?source, ?which, "hook cancelled operation");
        }
        verdict
    }

    fn notify(&self, doc: &Document, which: Notification) {
        let (hook, source) = {
            let st = self.inner.borrow();
            (st.options.hooks.notification(which), st.source)
        };
        if let Some(hook) = hook {
            hook(&HookArgs {
                source,
                document: doc,
                selection: None,
            });
        }
    }
}
