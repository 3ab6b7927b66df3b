// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TmDropdown DOM: a small in-memory document model.
//!
//! This crate stands in for the browser document that a dropdown widget is bound to.
//! It keeps just enough of the DOM to build, restyle, and tear down synthesized
//! widget trees next to a native-like select element.
//!
//! - Nodes live in a generational arena; stale [`NodeId`]s are rejected by every accessor.
//! - Elements carry a [`Tag`], an ordered [`ClassList`], inline [`Style`] declarations,
//!   their own text, and option/select state.
//! - Select semantics follow the native element: options inside groups are listed in tree
//!   order, single-selects keep exactly one option selected when possible, and
//!   [`Document::set_value`] picks the first matching option.
//! - Mutation observers record structural, attribute, and text changes inside a subtree.
//!   Selectedness is not an attribute and is never recorded.
//!
//! ## Not a layout engine
//!
//! The document stores a layout rectangle per element but computes none. Hosts measure
//! their boxes however they like and feed them in with [`Document::set_rect`]; the viewport
//! size is set with [`Document::set_viewport`].
//!
//! ## API overview
//!
//! - [`Document`]: node storage, structure, element updates, focus, and observation.
//! - [`Element`]: read-only view of per-node data.
//! - [`MutationRecord`] / [`MutationKind`] / [`ObserverId`]: observation results.
//! - [`BindingKey`]: opaque back-reference that higher layers store on bound elements.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod mutation;
mod select;
mod types;

pub use document::Document;
pub use mutation::{MutationKind, MutationRecord, ObserverId};
pub use types::{BindingKey, ClassList, Element, NodeId, Style, Tag};
