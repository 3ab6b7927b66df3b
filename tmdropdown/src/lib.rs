// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TmDropdown: a styleable replacement for the native select element.
//!
//! A [`Dropdown`] hides a source select and renders a synthesized tree next to it:
//! a wrapper with a current-value display and an option list. The source stays the
//! single source of truth for options, selection, and disabled state; the tree is
//! rebuilt from it on every [`Dropdown::refresh`].
//!
//! ## Pieces
//!
//! - [`Page`]: the document, page listeners, and the [`Delegator`] that routes input
//!   to dropdowns. Hosts feed events in with [`Page::dispatch`].
//! - [`Dropdown`]: one bound instance. Opening, closing, selecting, and destroying
//!   all go through it.
//! - [`Options`]: option overrides ([`OptionKey`]) plus lifecycle [`Hooks`].
//! - [`tm_dropdown`]: a collection-style adapter that applies one call to many
//!   elements, with string-named actions.
//! - [`classes`]: the class names stylesheets target.
//!
//! ## Example
//!
//! ```
//! use tmdropdown::{classes, Dropdown, OptionKey, Options, Page};
//! use tmdropdown_dom::{Document, Tag};
//!
//! let mut page = Page::new(Document::default());
//! let doc = page.document_mut();
//! let select = doc.create_element(Tag::Select);
//! for text in ["Red", "Green", "Blue"] {
//!     let option = doc.create_element(Tag::Option);
//!     doc.set_text(option, text);
//!     doc.append_child(select, option);
//! }
//! doc.append_child(doc.body(), select);
//!
//! let options = Options::new().with(OptionKey::Placeholder, "Pick a color");
//! let dropdown = Dropdown::new(&mut page, select, options).unwrap();
//! assert_eq!(page.document().text_content(dropdown.current()), "Red");
//!
//! dropdown.open(&mut page);
//! assert!(page.document().has_class(dropdown.wrapper(), classes::OPEN));
//!
//! dropdown.select(&mut page, "Blue", true);
//! assert_eq!(page.document().select_value(select), "Blue");
//! assert!(!dropdown.is_open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod classes;

mod binding;
mod builder;
mod config;
mod delegator;
mod error;
mod hooks;
mod navigation;
mod page;
mod position;
mod widget;

pub use binding::{Action, Call, CallOutcome, tm_dropdown};
pub use config::{
    DEFAULT_CLOSE_ON_SCROLL, DEFAULT_EMPTY_TEXT, DEFAULT_OBSERVE, DEFAULT_PLACEHOLDER,
    DEFAULT_WRAPPER_CLASS, OptionKey, OptionValue, Options, default_value,
};
pub use delegator::Delegator;
pub use error::Error;
pub use hooks::{Hook, HookArgs, Hooks};
pub use navigation::Direction;
pub use page::Page;
pub use position::Placement;
pub use widget::{Dropdown, Selection};
