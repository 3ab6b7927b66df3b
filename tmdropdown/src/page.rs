// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page: a document, its listeners, and the dropdown delegator.
//!
//! Hosts feed input through [`Page::dispatch`]. Page-wide events (scroll, pointer
//! down, touch start, window blur) reach the delegator before any page listener,
//! as a window-level capture listener would, so nothing in the page can hide them
//! from the dropdowns. Other events run the page listeners first along the usual
//! capture/target/bubble path; unless one of them stops propagation, the delegator
//! then routes the event to the owning dropdown.

use tmdropdown_dom::{Document, NodeId};
use tmdropdown_events::{DispatchReport, Event, EventKind, EventTargets};
use tracing::trace;

use crate::delegator::Delegator;
use crate::widget::Dropdown;

/// Document plus event plumbing.
#[derive(Debug, Default)]
pub struct Page {
    document: Document,
    targets: EventTargets,
    delegator: Delegator,
}

impl Page {
    /// Wrap a document with a fresh delegator.
    pub fn new(document: Document) -> Self {
        Self::with_delegator(document, Delegator::new())
    }

    /// Wrap a document, sharing an existing delegator.
    pub fn with_delegator(document: Document, delegator: Delegator) -> Self {
        Self {
            document,
            targets: EventTargets::new(),
            delegator,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Page listeners.
    pub fn targets(&self) -> &EventTargets {
        &self.targets
    }

    /// Mutable access to the page listeners.
    pub fn targets_mut(&mut self) -> &mut EventTargets {
        &mut self.targets
    }

    /// The delegator.
    pub fn delegator(&self) -> &Delegator {
        &self.delegator
    }

    /// Dropdown bound to `source`.
    pub fn dropdown_for(&self, source: NodeId) -> Option<Dropdown> {
        self.delegator.instance_for(&self.document, source)
    }

    /// Deliver an event to page listeners and the dropdowns.
    pub fn dispatch(&mut self, event: Event) -> DispatchReport {
        trace!(kind = ?event.kind, target = ?event.target, "dispatch");
        let delegator = self.delegator.clone();
        if is_page_wide(event.kind) {
            delegator.handle(self, &event);
            return self.targets.dispatch(&self.document, &event);
        }
        let report = self.targets.dispatch(&self.document, &event);
        if !report.stopped {
            delegator.handle(self, &event);
        }
        report
    }

    /// Move focus to `node`, firing focus-out on the previously focused node and
    /// focus-in on `node`. Focusing the focused node fires nothing.
    pub fn focus(&mut self, node: NodeId) -> bool {
        let previous = self.document.focused();
        if previous == Some(node) {
            return true;
        }
        if !self.document.focus(node) {
            return false;
        }
        if let Some(previous) = previous {
            self.dispatch(Event::new(EventKind::FocusOut, previous));
        }
        // A focus-out handler may have moved focus again.
        if self.document.focused() == Some(node) {
            self.dispatch(Event::new(EventKind::FocusIn, node));
        }
        true
    }

    /// Clear focus, firing focus-out on the previously focused node.
    pub fn blur(&mut self) {
        if let Some(previous) = self.document.focused() {
            self.document.blur();
            self.dispatch(Event::new(EventKind::FocusOut, previous));
        }
    }

    /// Rebuild observing dropdowns whose sources changed. Returns how many were
    /// rebuilt.
    pub fn flush_mutations(&mut self) -> usize {
        let delegator = self.delegator.clone();
        delegator.flush(self)
    }
}

fn is_page_wide(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Scroll | EventKind::PointerDown | EventKind::TouchStart | EventKind::WindowBlur
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes;
    use crate::config::Options;
    use tmdropdown_dom::Tag;
    use tmdropdown_events::{EventType, Outcome};

    fn page_with_select() -> (Page, NodeId) {
        let mut doc = Document::default();
        let s = doc.create_element(Tag::Select);
        let o = doc.create_element(Tag::Option);
        doc.append_child(s, o);
        doc.append_child(doc.body(), s);
        (Page::new(doc), s)
    }

    #[test]
    fn stopped_events_do_not_reach_dropdowns() {
        let (mut page, s) = page_with_select();
        let d = Dropdown::new(&mut page, s, Options::new()).unwrap();
        let body = page.document().body();
        let id = page
            .targets_mut()
            .add_listener(body, EventType::Click, true, |_| Outcome::Stop);

        let report = page.dispatch(Event::new(EventKind::Click, d.current()));
        assert!(report.stopped);
        assert!(!d.is_open());

        page.targets_mut().remove_listener(id);
        page.dispatch(Event::new(EventKind::Click, d.current()));
        assert!(d.is_open());
    }

    #[test]
    fn focus_moves_between_dropdowns() {
        let (mut page, s) = page_with_select();
        let doc = page.document_mut();
        let t = doc.create_element(Tag::Select);
        let o = doc.create_element(Tag::Option);
        doc.append_child(t, o);
        doc.append_child(doc.body(), t);
        let a = Dropdown::new(&mut page, s, Options::new()).unwrap();
        let b = Dropdown::new(&mut page, t, Options::new()).unwrap();

        a.open(&mut page);
        assert!(page.focus(a.current()));
        assert!(page.document().has_class(a.wrapper(), classes::FOCUSED));

        assert!(page.focus(b.current()));
        let doc = page.document();
        assert!(!doc.has_class(a.wrapper(), classes::FOCUSED));
        assert!(doc.has_class(b.wrapper(), classes::FOCUSED));
        assert!(!a.is_open(), "losing focus closes the list");
        assert_eq!(doc.focused(), Some(b.current()));
    }

    #[test]
    fn focusing_detached_nodes_fails_quietly() {
        let (mut page, _s) = page_with_select();
        let loose = page.document_mut().create_element(Tag::Div);
        assert!(!page.focus(loose));
        assert_eq!(page.document().focused(), None);
        page.blur();
    }
}
