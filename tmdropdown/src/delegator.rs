// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The delegator: a registry of live dropdowns and page-level event routing.
//!
//! ## Routing
//!
//! - Scroll: every open dropdown the scroll did not happen inside closes, or
//!   repositions when its `closeOnScroll` option is off.
//! - Pointer down and touch start: open dropdowns the pointer landed outside of close.
//! - Window blur: every open dropdown closes.
//! - Anything else: handed to the one dropdown whose tree contains the target.
//!
//! Routing works on a snapshot of the registry, so handlers may create or destroy
//! dropdowns while an event is in flight.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use tmdropdown_dom::{BindingKey, Document, NodeId};
use tmdropdown_events::{Event, EventKind};
use tracing::trace;

use crate::page::Page;
use crate::widget::Dropdown;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    next_key: u64,
    entries: Vec<Dropdown>,
}

/// Shared registry of live dropdowns.
///
/// Cloning yields another handle to the same registry. A dropdown stays
/// registered until it is destroyed.
#[derive(Clone, Default)]
pub struct Delegator {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for Delegator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegator")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl Delegator {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_registry(registry: Rc<RefCell<Registry>>) -> Self {
        Self { registry }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Registry>> {
        Rc::downgrade(&self.registry)
    }

    pub(crate) fn issue_key(&self) -> BindingKey {
        let mut registry = self.registry.borrow_mut();
        registry.next_key += 1;
        BindingKey(registry.next_key)
    }

    pub(crate) fn add(&self, dropdown: &Dropdown) {
        let mut registry = self.registry.borrow_mut();
        if !registry.entries.contains(dropdown) {
            registry.entries.push(dropdown.clone());
        }
    }

    pub(crate) fn remove(&self, dropdown: &Dropdown) {
        self.registry.borrow_mut().entries.retain(|d| d != dropdown);
    }

    /// Number of registered dropdowns.
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Returns true if no dropdown is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().entries.is_empty()
    }

    /// Returns true if `dropdown` is registered here.
    pub fn contains(&self, dropdown: &Dropdown) -> bool {
        self.registry.borrow().entries.contains(dropdown)
    }

    /// Snapshot of the registered dropdowns, in registration order.
    pub fn instances(&self) -> Vec<Dropdown> {
        self.registry.borrow().entries.clone()
    }

    /// Dropdown bound to `source`, if it is registered here.
    pub fn instance_for(&self, doc: &Document, source: NodeId) -> Option<Dropdown> {
        let key = doc.binding(source)?;
        self.registry
            .borrow()
            .entries
            .iter()
            .find(|d| d.key() == key)
            .cloned()
    }

    /// Route a page event to the dropdowns it concerns.
    pub fn handle(&self, page: &mut Page, event: &Event) {
        let instances = self.instances();
        let target = event.target;
        match event.kind {
            EventKind::Scroll => {
                for dropdown in instances {
                    if !dropdown.is_open() || dropdown.is_event_target(page.document(), target) {
                        continue;
                    }
                    if dropdown.close_on_scroll() {
                        dropdown.close(page);
                    } else {
                        dropdown.reposition(page);
                    }
                }
            }
            EventKind::PointerDown | EventKind::TouchStart => {
                for dropdown in instances {
                    if dropdown.is_open() && !dropdown.is_event_target(page.document(), target) {
                        trace!(source = ?dropdown.source(), "pointer outside; closing");
                        dropdown.close(page);
                    }
                }
            }
            EventKind::WindowBlur => {
                for dropdown in instances.iter().filter(|d| d.is_open()) {
                    dropdown.close(page);
                }
            }
            _ => {
                let owner = instances
                    .into_iter()
                    .find(|d| d.is_event_target(page.document(), target));
                if let Some(dropdown) = owner {
                    dropdown.handle_event(page, event);
                }
            }
        }
    }

    /// Rebuild every observing dropdown whose source was mutated since the last
    /// flush. Returns how many were rebuilt.
    pub fn flush(&self, page: &mut Page) -> usize {
        let mut rebuilt = 0;
        for dropdown in self.instances() {
            let Some(observer) = dropdown.observer() else {
                continue;
            };
            if !page.document().has_records(observer) {
                continue;
            }
            let records = page.document_mut().take_records(observer);
            trace!(source = ?dropdown.source(), records = records.len(), "source mutated");
            if dropdown.refresh(page) {
                rebuilt += 1;
            }
        }
        rebuilt
    }
}
