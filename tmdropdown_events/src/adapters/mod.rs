// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with the TmDropdown document.
//!
//! - [`document`]: parent lookup over [`tmdropdown_dom::Document`] so the
//!   [`Router`](crate::router::Router) can reconstruct propagation paths.

pub mod document;
