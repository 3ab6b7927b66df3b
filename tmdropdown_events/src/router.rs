// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs the root → target path through a [`ParentLookup`] and emits a
//! capture → target → bubble sequence for it.
//!
//! - Capture visits every ancestor from the root down, excluding the target.
//! - Target visits only the target.
//! - Bubble visits the ancestors back up to the root and is omitted for
//!   non-bubbling events.

use alloc::vec::Vec;

use crate::types::{Dispatch, ParentLookup};

/// Deterministic propagation-path router.
#[derive(Clone, Debug, Default)]
pub struct Router<P> {
    parent: P,
}

impl<P> Router<P> {
    /// Create a router over a parent lookup.
    pub fn new(parent: P) -> Self {
        Self { parent }
    }

    /// Emit the dispatch sequence for `target`.
    pub fn dispatch_for<K: Copy>(&self, target: K, bubbles: bool) -> Vec<Dispatch<K>>
    where
        P: ParentLookup<K>,
    {
        let path = self.path_to(target);
        let mut out = Vec::with_capacity(path.len() * 2);
        let Some((target, ancestors)) = path.split_last() else {
            return out;
        };
        out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
        out.push(Dispatch::target(*target));
        if bubbles {
            out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
        }
        out
    }

    /// Root → target path.
    pub fn path_to<K: Copy>(&self, target: K) -> Vec<K>
    where
        P: ParentLookup<K>,
    {
        let mut out = Vec::new();
        let mut cur = target;
        // Collect to root; the lookup guarantees acyclic ancestry.
        loop {
            out.push(cur);
            match self.parent.parent_of(&cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NoParent, Phase};
    use alloc::vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    struct Node(u32);

    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    #[test]
    fn emits_capture_target_bubble() {
        let router = Router::new(Parents);
        let phases: Vec<(Phase, u32)> = router
            .dispatch_for(Node(3), true)
            .iter()
            .map(|d| (d.phase, d.node.0))
            .collect();
        assert_eq!(
            phases,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn non_bubbling_events_skip_bubble_phase() {
        let router = Router::new(Parents);
        let phases: Vec<Phase> = router
            .dispatch_for(Node(2), false)
            .iter()
            .map(|d| d.phase)
            .collect();
        assert_eq!(phases, vec![Phase::Capture, Phase::Target]);
    }

    #[test]
    fn root_target_is_a_singleton_path() {
        let router = Router::new(NoParent);
        assert_eq!(
            router.dispatch_for(Node(7), true),
            vec![Dispatch::target(Node(7))]
        );
    }
}
