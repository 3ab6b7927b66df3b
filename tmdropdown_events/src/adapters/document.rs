// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent lookup for the TmDropdown document.

use tmdropdown_dom::{Document, NodeId};

use crate::types::ParentLookup;

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Document::parent_of(self, *node)
    }
}
