// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle hooks.
//!
//! Cancelable hooks run before an operation touches any state and veto it by
//! returning [`Hook::Cancel`]. Notification hooks run after the fact.

use alloc::rc::Rc;
use core::fmt;

use tmdropdown_dom::{Document, NodeId};

use crate::config::Options;
use crate::widget::Selection;

/// Result of a cancelable hook.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Hook {
    /// Let the operation run.
    #[default]
    Proceed,
    /// Abort the operation before it changes anything.
    Cancel,
}

/// What a hook sees.
#[derive(Clone, Copy, Debug)]
pub struct HookArgs<'a> {
    /// Source element of the dropdown.
    pub source: NodeId,
    /// The document, read-only.
    pub document: &'a Document,
    /// The requested selection, for `before_option_selected`.
    pub selection: Option<&'a Selection>,
}

pub(crate) type CancelFn = Rc<dyn Fn(&HookArgs<'_>) -> Hook>;
pub(crate) type NotifyFn = Rc<dyn Fn(&HookArgs<'_>)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Cancelable {
    BeforeOpen,
    BeforeClose,
    BeforeDestroy,
    BeforeOptionSelected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Notification {
    AfterRefresh,
    AfterRendered,
}

/// The six lifecycle hooks of a dropdown.
#[derive(Clone, Default)]
pub struct Hooks {
    before_open: Option<CancelFn>,
    before_close: Option<CancelFn>,
    before_destroy: Option<CancelFn>,
    before_option_selected: Option<CancelFn>,
    after_refresh: Option<NotifyFn>,
    after_rendered: Option<NotifyFn>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_open", &self.before_open.is_some())
            .field("before_close", &self.before_close.is_some())
            .field("before_destroy", &self.before_destroy.is_some())
            .field("before_option_selected", &self.before_option_selected.is_some())
            .field("after_refresh", &self.after_refresh.is_some())
            .field("after_rendered", &self.after_rendered.is_some())
            .finish()
    }
}

impl Hooks {
    pub(crate) fn cancelable(&self, which: Cancelable) -> Option<CancelFn> {
        match which {
            Cancelable::BeforeOpen => self.before_open.clone(),
            Cancelable::BeforeClose => self.before_close.clone(),
            Cancelable::BeforeDestroy => self.before_destroy.clone(),
            Cancelable::BeforeOptionSelected => self.before_option_selected.clone(),
        }
    }

    pub(crate) fn notification(&self, which: Notification) -> Option<NotifyFn> {
        match which {
            Notification::AfterRefresh => self.after_refresh.clone(),
            Notification::AfterRendered => self.after_rendered.clone(),
        }
    }
}

impl Options {
    /// Run before the list opens; [`Hook::Cancel`] keeps it closed.
    pub fn on_before_open(mut self, f: impl Fn(&HookArgs<'_>) -> Hook + 'static) -> Self {
        self.hooks.before_open = Some(Rc::new(f));
        self
    }

    /// Run before the list closes; [`Hook::Cancel`] keeps it open.
    pub fn on_before_close(mut self, f: impl Fn(&HookArgs<'_>) -> Hook + 'static) -> Self {
        self.hooks.before_close = Some(Rc::new(f));
        self
    }

    /// Run before the dropdown is destroyed; [`Hook::Cancel`] keeps it.
    pub fn on_before_destroy(mut self, f: impl Fn(&HookArgs<'_>) -> Hook + 'static) -> Self {
        self.hooks.before_destroy = Some(Rc::new(f));
        self
    }

    /// Run before a selection is applied; [`Hook::Cancel`] drops it, and no change event fires.
    pub fn on_before_option_selected(
        mut self,
        f: impl Fn(&HookArgs<'_>) -> Hook + 'static,
    ) -> Self {
        self.hooks.before_option_selected = Some(Rc::new(f));
        self
    }

    /// Run after every rebuild.
    pub fn on_after_refresh(mut self, f: impl Fn(&HookArgs<'_>) + 'static) -> Self {
        self.hooks.after_refresh = Some(Rc::new(f));
        self
    }

    /// Run once, after construction.
    pub fn on_after_rendered(mut self, f: impl Fn(&HookArgs<'_>) + 'static) -> Self {
        self.hooks.after_rendered = Some(Rc::new(f));
        self
    }
}
