// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor stop outcomes.
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports where propagation stopped (if at all).
//! - "Default prevented" and similar flags live on the payload passed to [`run`].
//!
//! ```
//! use tmdropdown_events::dispatcher;
//! use tmdropdown_events::{Dispatch, Outcome, Phase};
//!
//! let seq = vec![
//!     Dispatch::capture(1_u32),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//!
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Target { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stopped, Some(&Dispatch::target(2)));
//! assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run a handler over a dispatch sequence.
///
/// Returns `None` if the whole sequence was visited, or the entry at which a
/// handler returned [`Outcome::Stop`].
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        vec![
            Dispatch::capture(1),
            Dispatch::capture(2),
            Dispatch::target(3),
            Dispatch::bubble(2),
            Dispatch::bubble(1),
        ]
    }

    #[test]
    fn continue_through_all() {
        let seq = mk_seq();
        let mut count = 0;
        let stopped = run(&seq, &mut count, |_, c| {
            *c += 1;
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(count, seq.len());
    }

    #[test]
    fn stop_in_capture_skips_target_and_bubble() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            if d.phase == Phase::Capture && d.node == 1 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped, Some(&Dispatch::capture(1)));
        assert_eq!(seen, vec![(Phase::Capture, 1)]);
    }

    #[test]
    fn stop_in_bubble_reports_location() {
        let seq = mk_seq();
        let mut seen = 0;
        let stopped = run(&seq, &mut seen, |d, seen| {
            *seen += 1;
            if d.phase == Phase::Bubble {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped, Some(&Dispatch::bubble(2)));
        assert_eq!(seen, 4);
    }
}
