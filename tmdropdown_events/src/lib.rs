// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TmDropdown Events: deterministic event propagation over the TmDropdown document.
//!
//! - [`Router`](router::Router) reconstructs the root → target path with a
//!   [`ParentLookup`] and emits a capture → target → bubble sequence of [`Dispatch`] steps.
//! - [`dispatcher::run`] walks a sequence and honors [`Outcome::Stop`].
//! - [`EventTargets`] is a per-node listener registry that delivers an [`Event`] along
//!   its path and reports what happened in a [`DispatchReport`].
//!
//! ```
//! use tmdropdown_dom::{Document, Tag};
//! use tmdropdown_events::{Event, EventKind, EventTargets, EventType, Outcome};
//!
//! let mut doc = Document::default();
//! let select = doc.create_element(Tag::Select);
//! doc.append_child(doc.body(), select);
//!
//! let mut targets = EventTargets::new();
//! targets.add_listener(doc.body(), EventType::Change, false, |_| Outcome::Continue);
//!
//! let report = targets.dispatch(&doc, &Event::new(EventKind::Change, select));
//! assert_eq!(report.delivered, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod router;

mod listeners;
mod types;

pub use listeners::{DispatchReport, EventTargets, ListenerContext, ListenerId};
pub use types::{
    Dispatch, Event, EventKind, EventType, Key, NoParent, Outcome, ParentLookup, Phase,
};
