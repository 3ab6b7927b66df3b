// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-relative placement of an open option list.

use alloc::format;
use kurbo::Rect;
use tmdropdown_dom::{Document, NodeId};

use crate::classes;

/// Where the list ended up relative to the wrapper.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Directly below the wrapper.
    Below,
    /// Flipped above the wrapper because it would overflow the viewport.
    Above,
}

/// Place `list` at fixed coordinates under `wrapper`, flipping it above when its
/// bottom edge would pass the viewport height.
///
/// Reads only the wrapper's rectangle, the list's height, and the viewport, so
/// repeated calls on an unchanged layout give the same result.
pub(crate) fn reposition(doc: &mut Document, wrapper: NodeId, list: NodeId) -> Placement {
    let anchor = doc.bounding_rect(wrapper);
    let height = doc.bounding_rect(list).height();

    let below = anchor.y1;
    let placement = if below + height > doc.viewport().height {
        Placement::Above
    } else {
        Placement::Below
    };
    let top = match placement {
        Placement::Below => below,
        Placement::Above => anchor.y0 - height,
    };

    doc.set_style(list, "position", "fixed");
    doc.set_style(list, "display", "block");
    doc.set_style(list, "left", &format!("{}px", anchor.x0));
    doc.set_style(list, "top", &format!("{top}px"));
    doc.set_style(list, "width", &format!("{}px", anchor.width()));
    doc.set_rect(list, Rect::new(anchor.x0, top, anchor.x1, top + height));

    let flipped = placement == Placement::Above;
    doc.set_class(list, classes::OPTION_LIST_TOP, flipped);
    doc.set_class(wrapper, classes::OPEN_TOP, flipped);
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use tmdropdown_dom::Tag;

    fn layout(wrapper_top: f64, list_height: f64) -> (Document, NodeId, NodeId) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let wrapper = doc.create_element(Tag::Div);
        let list = doc.create_element(Tag::Ul);
        doc.append_child(doc.body(), wrapper);
        doc.append_child(doc.body(), list);
        doc.set_rect(wrapper, Rect::new(10.0, wrapper_top, 210.0, wrapper_top + 30.0));
        doc.set_rect(list, Rect::new(0.0, 0.0, 0.0, list_height));
        (doc, wrapper, list)
    }

    #[test]
    fn opens_below_when_it_fits() {
        let (mut doc, wrapper, list) = layout(100.0, 200.0);
        assert_eq!(reposition(&mut doc, wrapper, list), Placement::Below);
        assert_eq!(doc.style(list, "position"), Some("fixed"));
        assert_eq!(doc.style(list, "display"), Some("block"));
        assert_eq!(doc.style(list, "left"), Some("10px"));
        assert_eq!(doc.style(list, "top"), Some("130px"));
        assert_eq!(doc.style(list, "width"), Some("200px"));
        assert!(!doc.has_class(list, classes::OPTION_LIST_TOP));
        assert_eq!(doc.bounding_rect(list), Rect::new(10.0, 130.0, 210.0, 330.0));
    }

    #[test]
    fn flips_above_when_bottom_would_overflow() {
        let (mut doc, wrapper, list) = layout(500.0, 200.0);
        assert_eq!(reposition(&mut doc, wrapper, list), Placement::Above);
        assert_eq!(doc.style(list, "top"), Some("300px"));
        assert!(doc.has_class(list, classes::OPTION_LIST_TOP));
        assert!(doc.has_class(wrapper, classes::OPEN_TOP));

        // The wrapper scrolls back up; the flip is undone.
        doc.set_rect(wrapper, Rect::new(10.0, 50.0, 210.0, 80.0));
        assert_eq!(reposition(&mut doc, wrapper, list), Placement::Below);
        assert!(!doc.has_class(list, classes::OPTION_LIST_TOP));
        assert!(!doc.has_class(wrapper, classes::OPEN_TOP));
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let (mut doc, wrapper, list) = layout(500.0, 200.0);
        let first = reposition(&mut doc, wrapper, list);
        let style = doc.element(list).unwrap().style().clone();
        let rect = doc.bounding_rect(list);
        let second = reposition(&mut doc, wrapper, list);
        assert_eq!(first, second);
        assert_eq!(doc.element(list).unwrap().style(), &style);
        assert_eq!(doc.bounding_rect(list), rect);
    }
}
