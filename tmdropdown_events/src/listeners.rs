// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node listener registry.
//!
//! [`EventTargets`] maps nodes to listener lists and delivers events along the
//! path produced by the [`Router`]. Capture listeners fire in the capture and
//! target phases; the others fire in the target and bubble phases.
//!
//! A listener that returns [`Outcome::Stop`] lets the remaining listeners of the
//! same node run and then ends propagation.

use alloc::boxed::Box;
use hashbrown::HashMap;
use smallvec::SmallVec;
use tmdropdown_dom::{Document, NodeId};

use crate::dispatcher;
use crate::router::Router;
use crate::types::{Event, EventType, Outcome, Phase};

/// Handle of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a listener sees while handling an event.
#[derive(Debug)]
pub struct ListenerContext<'a> {
    /// The event being delivered.
    pub event: &'a Event,
    /// Node the listener is registered on.
    pub current: NodeId,
    /// Phase of this delivery.
    pub phase: Phase,
    default_prevented: bool,
}

impl ListenerContext<'_> {
    /// Suppress the default action of the event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns true if a listener called [`ListenerContext::prevent_default`].
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Summary of one [`EventTargets::dispatch`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of listener invocations.
    pub delivered: usize,
    /// Whether a listener stopped propagation.
    pub stopped: bool,
    /// Whether a listener prevented the default action.
    pub default_prevented: bool,
}

type Handler = Box<dyn FnMut(&mut ListenerContext<'_>) -> Outcome>;

struct Listener {
    id: ListenerId,
    event_type: EventType,
    capture: bool,
    handler: Handler,
}

impl Listener {
    fn fires_in(&self, phase: Phase) -> bool {
        match phase {
            Phase::Capture => self.capture,
            Phase::Target => true,
            Phase::Bubble => !self.capture,
        }
    }
}

/// Listener registry keyed by node.
#[derive(Default)]
pub struct EventTargets {
    next: u64,
    map: HashMap<NodeId, SmallVec<[Listener; 2]>>,
}

impl core::fmt::Debug for EventTargets {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventTargets")
            .field("nodes", &self.map.len())
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

impl EventTargets {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener on `node` for events of type `event_type`.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        capture: bool,
        handler: impl FnMut(&mut ListenerContext<'_>) -> Outcome + 'static,
    ) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.map.entry(node).or_default().push(Listener {
            id,
            event_type,
            capture,
            handler: Box::new(handler),
        });
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let mut found = false;
        self.map.retain(|_, list| {
            let before = list.len();
            list.retain(|l| l.id != id);
            found |= before != list.len();
            !list.is_empty()
        });
        found
    }

    /// Drop listeners registered on nodes that are no longer alive.
    pub fn retain_alive(&mut self, doc: &Document) {
        self.map.retain(|node, _| doc.is_alive(*node));
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.map.values().map(|l| l.len()).sum()
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Deliver `event` along its propagation path.
    pub fn dispatch(&mut self, doc: &Document, event: &Event) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !doc.is_alive(event.target) {
            return report;
        }
        let seq = Router::new(doc).dispatch_for(event.target, event.bubbles);
        let ty = event.kind.event_type();
        let map = &mut self.map;
        let stopped = dispatcher::run(&seq, &mut report, |d, report| {
            let Some(list) = map.get_mut(&d.node) else {
                return Outcome::Continue;
            };
            let mut outcome = Outcome::Continue;
            for l in list
                .iter_mut()
                .filter(|l| l.event_type == ty && l.fires_in(d.phase))
            {
                let mut cx = ListenerContext {
                    event,
                    current: d.node,
                    phase: d.phase,
                    default_prevented: report.default_prevented,
                };
                if (l.handler)(&mut cx) == Outcome::Stop {
                    outcome = Outcome::Stop;
                }
                report.default_prevented = cx.default_prevented;
                report.delivered += 1;
            }
            outcome
        });
        report.stopped = stopped.is_some();
        report
    }
}
