// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation observation: records of changes inside observed subtrees.

use alloc::vec::Vec;

use crate::types::NodeId;

/// Handle of a registered observer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// What changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MutationKind {
    /// A child was inserted into or removed from `target`.
    ChildList,
    /// An attribute-like property (class, style, value, label, disabled, ...) changed.
    Attributes,
    /// Text content changed.
    CharacterData,
}

/// A single recorded change.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MutationRecord {
    /// Node whose data or child list changed.
    pub target: NodeId,
    /// Kind of change.
    pub kind: MutationKind,
}

#[derive(Clone, Debug)]
pub(crate) struct Observer {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) records: Vec<MutationRecord>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Observers {
    next: u32,
    pub(crate) list: Vec<Observer>,
}

impl Observers {
    pub(crate) fn add(&mut self, target: NodeId) -> ObserverId {
        self.next = self.next.wrapping_add(1);
        let id = ObserverId(self.next);
        self.list.push(Observer {
            id,
            target,
            records: Vec::new(),
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.list.len();
        self.list.retain(|o| o.id != id);
        before != self.list.len()
    }

    pub(crate) fn get_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.list.iter_mut().find(|o| o.id == id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
