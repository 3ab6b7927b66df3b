// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear keyboard navigation over option items.
//!
//! Items are visited in document order, stepping into and out of group lists
//! transparently. Disabled items are skipped and traversal never wraps: moving
//! past the first or last enabled item yields `None`.

use alloc::vec::Vec;
use tmdropdown_dom::{Document, NodeId};

use crate::classes;

/// Direction of a navigation step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first item.
    Up,
    /// Towards the last item.
    Down,
}

/// Option items under `list` in document order, groups flattened.
pub(crate) fn option_items(doc: &Document, list: NodeId) -> Vec<NodeId> {
    doc.descendants(list)
        .into_iter()
        .filter(|&n| doc.has_class(n, classes::OPTION))
        .collect()
}

/// Next enabled item from `origin` in `direction`.
///
/// With no origin (or one that is not an item of `list`), `Down` starts at the
/// first enabled item and `Up` at the last.
pub(crate) fn next_item(
    doc: &Document,
    list: NodeId,
    origin: Option<NodeId>,
    direction: Direction,
) -> Option<NodeId> {
    let items = option_items(doc, list);
    let enabled = |n: &&NodeId| !doc.has_class(**n, classes::DISABLED);
    let origin_pos = origin.and_then(|o| items.iter().position(|&n| n == o));

    match (direction, origin_pos) {
        (Direction::Down, Some(pos)) => items[pos + 1..].iter().find(enabled).copied(),
        (Direction::Up, Some(pos)) => items[..pos].iter().rev().find(enabled).copied(),
        (Direction::Down, None) => items.iter().find(enabled).copied(),
        (Direction::Up, None) => items.iter().rev().find(enabled).copied(),
    }
}

/// Scroll offset that centers `item` in `list`, clamped at zero.
pub(crate) fn centered_offset(doc: &Document, list: NodeId, item: NodeId) -> f64 {
    let list_rect = doc.bounding_rect(list);
    let offset_top = doc.bounding_rect(item).y0 - list_rect.y0 + doc.scroll_top(list);
    (offset_top - list_rect.height() / 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use tmdropdown_dom::Tag;

    struct Fixture {
        doc: Document,
        list: NodeId,
        items: Vec<NodeId>,
    }

    /// a, [group: b (disabled), c], [empty group], d
    fn fixture() -> Fixture {
        let mut doc = Document::default();
        let list = doc.create_element(Tag::Ul);
        doc.append_child(doc.body(), list);
        let item = |doc: &mut Document, parent: NodeId, disabled: bool| {
            let li = doc.create_element(Tag::Li);
            doc.add_class(li, classes::OPTION);
            if disabled {
                doc.add_class(li, classes::DISABLED);
            }
            doc.append_child(parent, li);
            li
        };
        let group = |doc: &mut Document| {
            let li = doc.create_element(Tag::Li);
            doc.add_class(li, classes::GROUP);
            let label = doc.create_element(Tag::Div);
            doc.add_class(label, classes::GROUP_LABEL);
            let ul = doc.create_element(Tag::Ul);
            doc.add_class(ul, classes::GROUP_OPTIONS);
            doc.append_child(li, label);
            doc.append_child(li, ul);
            doc.append_child(list, li);
            ul
        };
        let a = item(&mut doc, list, false);
        let g1 = group(&mut doc);
        let b = item(&mut doc, g1, true);
        let c = item(&mut doc, g1, false);
        let _g2 = group(&mut doc);
        let d = item(&mut doc, list, false);
        Fixture {
            doc,
            list,
            items: alloc::vec![a, b, c, d],
        }
    }

    #[test]
    fn down_enters_groups_and_skips_disabled() {
        let f = fixture();
        let [a, _b, c, d] = f.items[..] else {
            unreachable!()
        };
        assert_eq!(next_item(&f.doc, f.list, Some(a), Direction::Down), Some(c));
        assert_eq!(next_item(&f.doc, f.list, Some(c), Direction::Down), Some(d));
    }

    #[test]
    fn up_leaves_groups_and_skips_empty_ones() {
        let f = fixture();
        let [a, _b, c, d] = f.items[..] else {
            unreachable!()
        };
        assert_eq!(next_item(&f.doc, f.list, Some(d), Direction::Up), Some(c));
        assert_eq!(next_item(&f.doc, f.list, Some(c), Direction::Up), Some(a));
    }

    #[test]
    fn boundaries_do_not_wrap() {
        let f = fixture();
        let [a, _b, _c, d] = f.items[..] else {
            unreachable!()
        };
        assert_eq!(next_item(&f.doc, f.list, Some(a), Direction::Up), None);
        assert_eq!(next_item(&f.doc, f.list, Some(d), Direction::Down), None);
    }

    #[test]
    fn missing_origin_starts_at_an_end() {
        let f = fixture();
        let [a, _b, _c, d] = f.items[..] else {
            unreachable!()
        };
        assert_eq!(next_item(&f.doc, f.list, None, Direction::Down), Some(a));
        assert_eq!(next_item(&f.doc, f.list, None, Direction::Up), Some(d));
    }

    #[test]
    fn centered_offset_accounts_for_scroll_and_clamps() {
        let mut f = fixture();
        let c = f.items[2];
        f.doc.set_rect(f.list, Rect::new(0.0, 100.0, 200.0, 200.0));
        f.doc.set_rect(c, Rect::new(0.0, 220.0, 200.0, 240.0));
        f.doc.set_scroll_top(f.list, 30.0);
        // offset_top = 220 - 100 + 30 = 150; centered = 150 - 50.
        assert_eq!(centered_offset(&f.doc, f.list, c), 100.0);

        f.doc.set_rect(c, Rect::new(0.0, 90.0, 200.0, 110.0));
        f.doc.set_scroll_top(f.list, 0.0);
        assert_eq!(centered_offset(&f.doc, f.list, c), 0.0);
    }
}
